//! Orchestration services for the analytics subsystem.

mod aggregator;
mod dashboard;
mod recorder;

pub use aggregator::{SummaryService, SummaryServiceError, SummaryServiceResult};
pub use dashboard::{DashboardService, DashboardServiceError, DashboardServiceResult};
pub use recorder::{
    EventRecorder, OpenSessionRequest, RecordInteractionRequest, RecorderError, RecorderResult,
};
