use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use unitsys_core::validate::{RangeValidator, TypeValidator};
use unitsys_core::{
    BaseValue, Dimension, Keyword, ReferenceUnit, ScaleConfig, SizeConfig, Unit, UnitConfig,
    UnitContext, UnitValidator, ValidationIssue, ValidationOutcome, ValidatorChain,
};

fn chain(order: &[&str]) -> ValidatorChain {
    let mut chain = ValidatorChain::new();
    for name in order {
        match *name {
            "type" => chain.push(Arc::new(TypeValidator::new())),
            "range" => chain.push(Arc::new(RangeValidator::new(-1_000.0, 1_000.0))),
            other => panic!("unknown validator {other}"),
        }
    }
    chain
}

fn samples() -> Vec<Unit> {
    let valid = Unit::from_config(UnitConfig::Size(SizeConfig::new(
        "ok",
        Dimension::Width,
        ReferenceUnit::ParentPercent,
        50.0,
    )))
    .unwrap();

    let out_of_range = Unit::from_config(UnitConfig::Size(SizeConfig::new(
        "big",
        Dimension::Width,
        ReferenceUnit::Pixel,
        5_000.0,
    )))
    .unwrap();

    let mut wrong_shape = valid.clone();
    wrong_shape.dimension = Dimension::Y;

    let mut both = out_of_range.clone();
    both.dimension = Dimension::X;

    let mut scale_keyword = Unit::from_config(UnitConfig::Scale(ScaleConfig::new(
        "zoom",
        Dimension::Width,
        ReferenceUnit::Factor,
        1.0,
    )))
    .unwrap();
    scale_keyword.base_value = BaseValue::Keyword(Keyword::Stretch);

    vec![valid, out_of_range, wrong_shape, both, scale_keyword]
}

#[test]
fn verdict_does_not_depend_on_link_order() {
    let context = UnitContext::uniform(800.0, 600.0);
    let forward = chain(&["type", "range"]);
    let reverse = chain(&["range", "type"]);

    for unit in samples() {
        let a = forward.run(&unit, &context);
        let b = reverse.run(&unit, &context);
        assert_eq!(a.is_valid, b.is_valid, "unit {}", unit.id);
    }
}

#[test]
fn first_failing_link_short_circuits() {
    struct Counter(AtomicUsize);

    impl UnitValidator for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn validate(&self, _unit: &Unit, _context: &UnitContext) -> ValidationOutcome {
            self.0.fetch_add(1, Ordering::SeqCst);
            ValidationOutcome::valid()
        }
    }

    let counter = Arc::new(Counter(AtomicUsize::new(0)));
    let mut chain = chain(&["range"]);
    chain.push(counter.clone());

    let samples = samples();
    let unit = &samples[1];
    let outcome = chain.run(unit, &UnitContext::uniform(800.0, 600.0));
    assert!(!outcome.is_valid);
    assert_eq!(outcome.errors[0].code, "value_out_of_range");
    assert_eq!(counter.0.load(Ordering::SeqCst), 0);
}

#[test]
fn inserted_link_runs_first_and_can_be_removed() {
    struct Deny;

    impl UnitValidator for Deny {
        fn name(&self) -> &str {
            "deny"
        }

        fn validate(&self, _unit: &Unit, _context: &UnitContext) -> ValidationOutcome {
            ValidationOutcome::from_issues(vec![ValidationIssue::new("deny", "denied", "no")], vec![])
        }
    }

    let mut chain = chain(&["type", "range"]);
    chain.insert(0, Arc::new(Deny));
    assert_eq!(chain.names(), vec!["deny", "type", "range"]);

    let samples = samples();
    let unit = &samples[0];
    let context = UnitContext::uniform(800.0, 600.0);
    assert_eq!(chain.run(unit, &context).errors[0].code, "denied");

    assert!(chain.remove("deny"));
    assert!(chain.run(unit, &context).is_valid);
}

#[test]
fn warnings_do_not_fail_the_chain() {
    let unit = Unit::from_config(UnitConfig::Size(SizeConfig::new(
        "wide",
        Dimension::Width,
        ReferenceUnit::ParentPercent,
        150.0,
    )))
    .unwrap();
    let outcome = chain(&["type", "range"]).run(&unit, &UnitContext::uniform(800.0, 600.0));
    assert!(outcome.is_valid);
    assert_eq!(outcome.warnings[0].code, "percent_outside_unit_interval");
}
