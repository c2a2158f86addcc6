pub mod client;
pub mod error;
pub mod loader;

pub use client::{DataSource, HttpDataSource};
pub use error::LoaderError;
pub use loader::{LoaderOutcome, LoaderReport, load_descriptions};
