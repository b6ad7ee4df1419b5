// Reportrack Core - Domain Logic & Ports
// NO transport dependencies: HTTP lives in reportrack-infra-http

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{Result, TrackerError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
