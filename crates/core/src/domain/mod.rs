// Domain Layer - Report definitions and job lifecycle models

pub mod job;
pub mod report;

pub use job::{is_terminal_status, JobId, ReportJob, TrackedJob, TERMINAL_STATUSES};
pub use report::{ParameterOption, ReportDefinition, ReportParameter};
