// Port Layer - Interfaces for external dependencies

pub mod report_backend;
pub mod time_provider;

// Re-exports
pub use report_backend::ReportBackend;
pub use time_provider::{SystemTimeProvider, TimeProvider};
