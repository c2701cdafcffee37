pub mod citations;
pub mod instructions;
pub mod mapping;
pub mod metrics;
pub mod providers;

pub use providers::{ModelClient, ProviderError};
