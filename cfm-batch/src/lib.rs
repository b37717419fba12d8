pub mod client;
pub mod report;
pub mod storage;

pub use cfm_core::{BatchRequest, BatchSuccess, ClientConfig, ClientError};
pub use client::BatchClient;
