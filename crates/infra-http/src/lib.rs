// Reportrack Infra-HTTP - reqwest adapter for the report backend

mod client;
mod decode;

pub use client::{BackendConfig, HttpReportBackend};
pub use decode::decode_payload;
