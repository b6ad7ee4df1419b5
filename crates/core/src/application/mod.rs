// Application Layer - Tracker services

pub mod board;
pub mod cancel;
pub mod catalog;
pub mod poller;
pub mod registry;
pub mod session;
pub mod submit;
pub mod tracker;

pub use board::StatusBoard;
pub use cancel::JobCanceler;
pub use catalog::ReportCatalog;
pub use poller::JobPoller;
pub use registry::ActiveJobRegistry;
pub use session::ReportSession;
pub use submit::JobSubmitter;
pub use tracker::{merge_tracked, JobTracker};
