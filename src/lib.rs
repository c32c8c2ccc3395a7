pub mod core;
pub mod export;
pub mod extract;
pub mod ingest;
pub mod photo;
pub mod pipeline;
pub mod resolve;

pub use crate::core::error::Rejection;
pub use crate::core::model::{Fragment, Identity};
