pub mod catalog;
pub mod client;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod urls;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JellyfinError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub use catalog::{Catalog, ItemQuery};
pub use client::JellyfinClient;
pub use urls::Endpoints;
