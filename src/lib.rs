pub mod api;
pub mod config;
pub mod description;
pub mod error;
pub mod generator;
pub mod index;
pub mod loader;
pub mod resolver;
pub mod schema;
pub mod session;
pub mod types;
pub mod utils;
mod class;
mod concept;
mod entities;
mod table;

pub use api::{generate, generate_with_appendix, GeneratedStubs};
pub use config::GeneratorConfig;
pub use error::GeneratorError;
