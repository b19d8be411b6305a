pub mod addon;
pub mod error;
pub mod model;
pub mod types;
