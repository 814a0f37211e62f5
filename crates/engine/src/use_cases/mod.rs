//! Use cases - orchestration across domain rules and collaborators.

pub mod generate;

pub use generate::{GenerateError, GenerateInvestigator, GenerateRequest};
