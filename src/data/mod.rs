//! Data module - CSV loading, schema and encoding

mod loader;
mod processor;
pub mod schema;

pub use loader::{DataLoader, LoaderError, DEFAULT_INPUT};
pub use processor::{CategoryPolicy, DataProcessor, ProcessorError};
