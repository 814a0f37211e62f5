//! Aggregate roots - domain objects that own their related data
//!
//! An investigator owns its characteristics exclusively; nothing is shared
//! between investigators.

pub mod investigator;

pub use investigator::{AgeAdjustment, DerivedStats, Investigator, InvestigatorProfile};
