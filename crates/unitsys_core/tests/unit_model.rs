use proptest::prelude::*;
use serde_json::json;
use unitsys_core::{
    BaseValue, BoundedRandomValue, ConfigError, Dimension, EngineConfig, Keyword, ManualClock,
    PositionConfig, RandomSource, RangeError, ReferenceUnit, ScaleConfig, SizeConfig,
    StdRandomSource, Unit, UnitConfig, UnitContext, UnitLifecycle, UnitManager, UnitType,
};

#[test]
fn size_config_deserializes_from_tagged_json() {
    let config: UnitConfig = serde_json::from_value(json!({
        "unit_type": "size",
        "id": "sidebar.width",
        "dimension": "width",
        "reference_unit": "parent_percent",
        "base_value": 25.0,
        "bounds": { "min": 120.0 }
    }))
    .unwrap();

    assert_eq!(config.unit_type(), UnitType::Size);
    let unit = Unit::from_config(config).unwrap();
    assert_eq!(unit.name, "sidebar.width");
    assert_eq!(unit.base_value, BaseValue::Number(25.0));
    assert_eq!(unit.options.bounds.min, Some(120.0));
    assert_eq!(unit.lifecycle, UnitLifecycle::Created);
    assert!(!unit.is_active);
}

#[test]
fn base_value_accepts_keyword_and_random_shapes() {
    let keyword: BaseValue = serde_json::from_value(json!("fill")).unwrap();
    assert_eq!(keyword, BaseValue::Keyword(Keyword::Fill));

    let random: BaseValue = serde_json::from_value(json!({ "min": 2.0, "max": 4.0 })).unwrap();
    let BaseValue::Random(random) = random else {
        panic!("expected random base value");
    };
    assert_eq!(random.current(), 2.0);

    let inverted = serde_json::from_value::<BaseValue>(json!({ "min": 4.0, "max": 2.0 }));
    assert!(inverted.is_err());
}

#[test]
fn unit_serializes_with_snake_case_tags() {
    let unit = Unit::from_config(UnitConfig::Scale(ScaleConfig::new(
        "zoom",
        Dimension::Width,
        ReferenceUnit::Factor,
        1.5,
    )))
    .unwrap();
    let value = serde_json::to_value(&unit).unwrap();
    assert_eq!(value["unit_type"], "scale");
    assert_eq!(value["reference_unit"], "factor");
    assert_eq!(value["lifecycle"], "created");
    assert_eq!(value["base_value"], 1.5);
}

#[test]
fn mismatched_descriptors_are_rejected_at_creation() {
    let position_on_width = UnitConfig::Position(PositionConfig::new(
        "p",
        Dimension::Width,
        ReferenceUnit::Pixel,
        1.0,
    ));
    assert_eq!(
        Unit::from_config(position_on_width).unwrap_err(),
        ConfigError::InvalidDimension {
            unit_type: UnitType::Position,
            dimension: Dimension::Width,
        }
    );

    let keyword_scale = UnitConfig::Scale(ScaleConfig::new(
        "s",
        Dimension::Width,
        ReferenceUnit::Factor,
        Keyword::Fit,
    ));
    assert!(matches!(
        Unit::from_config(keyword_scale),
        Err(ConfigError::UnsupportedKeyword { .. })
    ));

    let factor_size = UnitConfig::Size(SizeConfig::new(
        "w",
        Dimension::Width,
        ReferenceUnit::Factor,
        1.0,
    ));
    assert!(matches!(
        Unit::from_config(factor_size),
        Err(ConfigError::UnsupportedReference { .. })
    ));
}

#[test]
fn random_set_outside_range_leaves_current_untouched() {
    let mut random = BoundedRandomValue::with_current(0.0, 10.0, 5.0).unwrap();
    let err = random.set_current(11.0).unwrap_err();
    assert_eq!(
        err,
        RangeError::OutOfRange {
            value: 11.0,
            min: 0.0,
            max: 10.0
        }
    );
    assert_eq!(random.current(), 5.0);
}

/// Any finite float, spanning the full exponent range.
fn finite_f64() -> impl Strategy<Value = f64> {
    prop::num::f64::POSITIVE | prop::num::f64::NEGATIVE | prop::num::f64::NORMAL | prop::num::f64::ZERO
}

proptest! {
    #[test]
    fn random_draws_stay_within_bounds(
        seed in any::<u64>(),
        a in finite_f64(),
        b in finite_f64(),
    ) {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        let mut random = BoundedRandomValue::new(min, max).unwrap();
        let mut source = StdRandomSource::seeded(seed);
        for _ in 0..16 {
            let value = random.get_random_value(&mut source);
            prop_assert!(value >= min && value <= max);
            prop_assert_eq!(value, random.current());
        }
    }

    #[test]
    fn calculating_a_random_unit_never_panics(
        seed in any::<u64>(),
        a in finite_f64(),
        b in finite_f64(),
    ) {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        let mut manager = UnitManager::with_collaborators(
            EngineConfig::default(),
            Box::new(ManualClock::new()),
            Box::new(StdRandomSource::seeded(seed)),
        )
        .unwrap();
        manager
            .create_unit(UnitConfig::Size(SizeConfig::new(
                "a",
                Dimension::Width,
                ReferenceUnit::Pixel,
                1.0,
            )))
            .unwrap();
        manager
            .set_base_value("a", BaseValue::Random(BoundedRandomValue::new(min, max).unwrap()))
            .unwrap();

        let result = manager.calculate("a", &UnitContext::default()).unwrap();
        prop_assert!(result.value.is_finite());
        match &manager.get_unit("a").unwrap().base_value {
            BaseValue::Random(random) => prop_assert!(random.contains(random.current())),
            other => prop_assert!(false, "unexpected base value {}", other),
        }
    }

    #[test]
    fn std_source_respects_degenerate_ranges(seed in any::<u64>(), value in -100.0f64..100.0) {
        let mut source = StdRandomSource::seeded(seed);
        prop_assert_eq!(source.next_in_range(value, value), value);
    }
}
