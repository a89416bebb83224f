pub mod models;
pub mod target;
pub mod client;

pub use models::{BoefjeInput, BoefjeMeta, BoefjeOutput, OutputFile, TaskStatus, ERROR_TAG};
pub use target::{ScanTarget, Scheme};
pub use client::{TaskApi, TaskApiClient};
