//! Id-keyed unit table.

use crate::model::unit::{ConfigError, Unit, UnitConfig, UnitId};
use std::collections::BTreeMap;

/// Units keyed by id; iteration is id-ordered.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: BTreeMap<UnitId, Unit>,
}

/// Why a unit could not be added.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    Config(ConfigError),
    Duplicate(UnitId),
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a unit from `config` and stores it in the `created` state.
    pub fn create(&mut self, config: UnitConfig) -> Result<&Unit, RegistryError> {
        if self.units.contains_key(config.id()) {
            return Err(RegistryError::Duplicate(config.id().to_string()));
        }
        let unit = Unit::from_config(config).map_err(RegistryError::Config)?;
        self.insert(unit)
    }

    /// Stores an already built unit.
    pub fn insert(&mut self, unit: Unit) -> Result<&Unit, RegistryError> {
        use std::collections::btree_map::Entry;
        match self.units.entry(unit.id.clone()) {
            Entry::Occupied(entry) => Err(RegistryError::Duplicate(entry.key().clone())),
            Entry::Vacant(entry) => Ok(entry.insert(unit)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Unit> {
        self.units.get_mut(id)
    }

    /// Detaches the unit and marks it destroyed.
    pub fn remove(&mut self, id: &str) -> Option<Unit> {
        let mut unit = self.units.remove(id)?;
        unit.mark_destroyed();
        Some(unit)
    }

    pub fn list(&self) -> Vec<&Unit> {
        self.units.values().collect()
    }

    pub fn list_active(&self) -> Vec<&Unit> {
        self.units.values().filter(|unit| unit.is_active).collect()
    }

    pub fn ids(&self) -> Vec<UnitId> {
        self.units.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.units.contains_key(id)
    }

    /// Removes every unit, returning them marked destroyed in id order.
    pub fn drain(&mut self) -> Vec<Unit> {
        std::mem::take(&mut self.units)
            .into_values()
            .map(|mut unit| {
                unit.mark_destroyed();
                unit
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.units.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{RegistryError, UnitRegistry};
    use crate::model::unit::{
        Dimension, ReferenceUnit, SizeConfig, UnitConfig, UnitLifecycle,
    };

    fn config(id: &str) -> UnitConfig {
        UnitConfig::Size(SizeConfig::new(id, Dimension::Width, ReferenceUnit::Pixel, 5.0))
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = UnitRegistry::new();
        registry.create(config("b")).unwrap();
        let err = registry.create(config("b")).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("b".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn list_is_id_ordered_and_remove_marks_destroyed() {
        let mut registry = UnitRegistry::new();
        registry.create(config("b")).unwrap();
        registry.create(config("a")).unwrap();
        let ids: Vec<&str> = registry.list().iter().map(|unit| unit.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let removed = registry.remove("a").unwrap();
        assert_eq!(removed.lifecycle, UnitLifecycle::Destroyed);
        assert!(!registry.contains("a"));
        assert!(registry.remove("a").is_none());
    }

    #[test]
    fn list_active_filters_inactive() {
        let mut registry = UnitRegistry::new();
        registry.create(config("a")).unwrap();
        registry.create(config("b")).unwrap();
        registry.get_mut("b").unwrap().set_active(true);
        assert_eq!(registry.list_active().len(), 1);
    }

    #[test]
    fn invalid_config_surfaces_config_error() {
        let mut registry = UnitRegistry::new();
        let err = registry.create(config("Bad Id")).unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
    }
}
