pub mod dispatcher;
pub mod poller;

pub use dispatcher::{dispatch, PipelineContext};
pub use poller::{Poller, TickOutcome};
