pub mod app;
pub mod config;
pub mod error;
pub mod fetch;
pub mod mock;
pub mod utils;

pub use error::{AppError, Result};
