pub mod groups;
pub mod registry;
pub mod trend;

pub use groups::{DerivedSlot, SensorGroupDefinition};
pub use registry::SensorGroupRegistry;
pub use trend::{TrendCalculator, TrendRule};
