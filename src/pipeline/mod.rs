pub mod aggregator;
pub mod orchestrator;

pub use aggregator::ResultAggregator;
pub use orchestrator::{
    discover_archives, PipelineOrchestrator, PipelineOutcome, PipelineProgress, TaskFailure,
};
