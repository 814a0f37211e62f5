//! Entities - scored traits and the characteristic record

mod attribute;
mod characteristic;

pub use attribute::{Attribute, CheckTier, Score, DEFAULT_MAXIMUM};
pub use characteristic::{Characteristic, Characteristics};
