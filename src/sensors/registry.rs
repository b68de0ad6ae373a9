/// Registry of sensor groups and discovery of auxiliary probes
use log::info;

use crate::models::Reading;
use crate::sensors::groups::{aux_group, aux_trigger_field, fixed_groups, SensorGroupDefinition, AUX_SENSOR_COUNT};

/// Groups known to the bridge, in the order they are dispatched.
///
/// Groups are only ever added; an id is registered at most once.
#[derive(Debug, Clone, Default)]
pub struct SensorGroupRegistry {
    groups: Vec<SensorGroupDefinition>,
}

impl SensorGroupRegistry {
    pub fn with_fixed_groups(indoor_enabled: bool) -> Self {
        Self {
            groups: fixed_groups(indoor_enabled),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.groups.iter().any(|g| g.id == id)
    }

    /// Add a group. Returns false if the id is already registered.
    pub fn register(&mut self, group: SensorGroupDefinition) -> bool {
        if self.contains(&group.id) {
            return false;
        }
        self.groups.push(group);
        true
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&SensorGroupDefinition> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorGroupDefinition> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Register groups for auxiliary probes that appear in `reading`
    ///
    /// Returns the definitions that were newly added, so the caller can
    /// announce them to the controller.
    pub fn discover(&mut self, reading: &Reading) -> Vec<SensorGroupDefinition> {
        let mut added = Vec::new();

        for index in 1..=AUX_SENSOR_COUNT {
            if !reading.contains_key(&aux_trigger_field(index)) {
                continue;
            }
            let group = aux_group(index);
            if self.register(group.clone()) {
                info!("Discovered auxiliary sensor {} ({})", index, group.id);
                added.push(group);
            }
        }

        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reading(value: serde_json::Value) -> Reading {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = SensorGroupRegistry::with_fixed_groups(false);
        let before = registry.len();
        assert!(registry.register(aux_group(1)));
        assert!(!registry.register(aux_group(1)));
        assert_eq!(registry.len(), before + 1);
    }

    #[test]
    fn discovery_registers_each_probe_once() {
        let mut registry = SensorGroupRegistry::with_fixed_groups(false);
        let r = reading(json!({"tempf": 70.0, "temp3f": 61.2, "humidity3": 45}));

        let added = registry.discover(&r);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].id, "sensor03");

        assert!(registry.discover(&r).is_empty());
        assert_eq!(registry.iter().filter(|g| g.id == "sensor03").count(), 1);
    }

    #[test]
    fn discovery_ignores_unknown_and_out_of_range_probes() {
        let mut registry = SensorGroupRegistry::with_fixed_groups(true);
        let r = reading(json!({"temp9f": 50.0, "humidity1": 30, "temp8f": 40.0}));

        let added: Vec<String> = registry.discover(&r).into_iter().map(|g| g.id).collect();
        assert_eq!(added, vec!["sensor08"]);
        assert!(!registry.contains("sensor01"));
        assert!(registry.get("indoor").is_some());
    }
}
