//! Investigator creation rules for Call of Cthulhu 7th Edition.
//!
//! Pure domain crate: dice notation, attributes, the age table and derived
//! stats. Randomness and lookups come in through [`ports`].

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod game_systems;
pub mod ports;
pub mod value_objects;

pub use aggregates::{AgeAdjustment, DerivedStats, Investigator, InvestigatorProfile};
pub use entities::{Attribute, Characteristic, Characteristics, CheckTier, Score};
pub use error::DomainError;
pub use game_systems::{
    check_success, is_standard_age, AgeBracket, AgeModifiers, Coc7eRules, DamageBonus,
    SuccessLevel, AGE_MAX, AGE_MIN,
};
pub use ports::{NameLookupPort, NameQuery, NoOccupationEffects, OccupationEffectsPort, RandomPort};
pub use value_objects::{spread, DiceError, DiceExpression, DieSpec, Era, Gender};
