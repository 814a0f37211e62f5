//! Arkham Engine library.
//!
//! ## Structure
//!
//! - `config` - Environment configuration
//! - `infrastructure/` - Port implementations (randomness, CSV name tables)
//! - `use_cases/` - Investigator generation
//! - `presentation` - Text and JSON rendering

pub mod config;
pub mod infrastructure;
pub mod presentation;
pub mod use_cases;

pub use config::{ConfigError, GeneratorConfig, OutputFormat};
pub use use_cases::{GenerateError, GenerateInvestigator, GenerateRequest};
