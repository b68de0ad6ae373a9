/// Value sink interface towards the home-automation controller
use log::{debug, info};
use std::collections::HashMap;

use crate::models::SlotUpdate;
use crate::sensors::SensorGroupDefinition;

/// Receiver of slot values.
///
/// Change detection belongs to the sink: an update whose value equals the
/// last transmitted one may be dropped unless `force` is set.
pub trait ValueSink {
    /// Announce a group before any of its slots are set.
    fn add_group(&mut self, group: &SensorGroupDefinition);

    fn set_value(&mut self, update: SlotUpdate);

    /// Called once after every dispatched reading.
    fn flush(&mut self);
}

/// Sink that logs transmitted values and suppresses unchanged ones.
#[derive(Debug, Default)]
pub struct LoggingSink {
    last_sent: HashMap<(String, &'static str), f64>,
    sent_since_flush: usize,
}

impl LoggingSink {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn last_value(&self, group_id: &str, slot: &'static str) -> Option<f64> {
        self.last_sent.get(&(group_id.to_string(), slot)).copied()
    }
}

impl ValueSink for LoggingSink {
    fn add_group(&mut self, group: &SensorGroupDefinition) {
        info!(
            "Adding group {} ({}) with {} slots",
            group.id,
            group.name,
            group.slots.len() + usize::from(group.derived.is_some())
        );
    }

    fn set_value(&mut self, update: SlotUpdate) {
        let key = (update.group_id.clone(), update.slot);
        let changed = self.last_sent.get(&key) != Some(&update.value);

        if !update.report || !(changed || update.force) {
            debug!("{}.{} unchanged at {}", update.group_id, update.slot, update.value);
            return;
        }

        info!(
            "{}.{} = {} (uom {}{})",
            update.group_id,
            update.slot,
            update.value,
            update.uom,
            if update.force { ", forced" } else { "" }
        );
        self.last_sent.insert(key, update.value);
        self.sent_since_flush += 1;
    }

    fn flush(&mut self) {
        debug!("Flushed {} values", self.sent_since_flush);
        self.sent_since_flush = 0;
    }
}
