//! Pure domain types for the analytics subsystem.

mod error;
mod interaction;
mod period;
mod report;
mod session;
mod summary;

pub use error::AnalyticsDomainError;
pub use interaction::{
    EntityMap, Intent, Interaction, InteractionId, NewInteraction, PRODUCT_ENTITY_KEY,
};
pub use period::{PeriodType, TimeWindow};
pub use report::{
    DailyTrend, DashboardReport, ReportAverages, ReportPeriod, ReportTotals, TopProduct,
};
pub use session::{PersistedSessionData, Session, SessionActivity, SessionId, SessionMetadata};
pub use summary::{PeriodSummary, SummaryMetrics};
