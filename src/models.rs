/// One snapshot of station measurements, keyed by API field name.
pub type Reading = serde_json::Map<String, serde_json::Value>;

/// A single value pushed to the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotUpdate {
    pub group_id: String,
    pub slot: &'static str,
    pub value: f64,
    pub uom: u16,
    pub report: bool,
    pub force: bool,
}

/// What one dispatched reading produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub pushed: usize,
    pub missing: usize,
    pub discovered: usize,
}
