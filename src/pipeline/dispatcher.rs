/// Mapping of one reading onto sensor group slots
use log::{debug, warn};

use crate::models::{DispatchSummary, Reading, SlotUpdate};
use crate::sensors::{DerivedSlot, SensorGroupRegistry, TrendCalculator, TrendRule};
use crate::sink::ValueSink;
use crate::utils::extract_field;

/// State carried from one tick to the next. Only the poller mutates it.
#[derive(Debug)]
pub struct PipelineContext {
    pub registry: SensorGroupRegistry,
    pub trend: TrendCalculator,
    /// Set until the first reading has been dispatched.
    pub first_poll: bool,
}

impl PipelineContext {
    pub fn new(indoor_enabled: bool, trend_rule: TrendRule) -> Self {
        Self {
            registry: SensorGroupRegistry::with_fixed_groups(indoor_enabled),
            trend: TrendCalculator::new(trend_rule),
            first_poll: true,
        }
    }
}

/// Push every resolvable slot of every registered group to the sink
///
/// Missing fields are logged and skipped; they never stop the remaining
/// slots from being sent. Values are forced on the first poll so the
/// controller always receives an initial value. The pressure trend is
/// always forced.
pub fn dispatch<S: ValueSink>(ctx: &mut PipelineContext, sink: &mut S, reading: &Reading) -> DispatchSummary {
    let mut summary = DispatchSummary::default();
    let force = ctx.first_poll;

    for group in ctx.registry.iter() {
        for binding in &group.slots {
            match extract_field(reading, &binding.field) {
                Some(value) => {
                    sink.set_value(SlotUpdate {
                        group_id: group.id.clone(),
                        slot: binding.slot,
                        value,
                        uom: binding.uom,
                        report: true,
                        force,
                    });
                    summary.pushed += 1;
                }
                None => {
                    warn!("Missing data: {} (for {}.{})", binding.field, group.id, binding.slot);
                    summary.missing += 1;
                }
            }
        }

        if let Some(DerivedSlot::PressureTrend { slot, source_field, uom }) = &group.derived {
            if let Some(current) = extract_field(reading, source_field) {
                let trend = ctx.trend.update(current);
                debug!("Pressure trend at {}: {:?}", current, trend);
                sink.set_value(SlotUpdate {
                    group_id: group.id.clone(),
                    slot: *slot,
                    value: trend.as_value(),
                    uom: *uom,
                    report: true,
                    force: true,
                });
                summary.pushed += 1;
            }
        }
    }

    sink.flush();
    summary
}
