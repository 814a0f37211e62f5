//! Outbound ports the rule engine calls into.
//!
//! Randomness, name lookup and occupation effects are injected so the rules
//! stay pure and deterministic under test.

use crate::aggregates::Investigator;
use crate::value_objects::{Era, Gender};

// =============================================================================
// Randomness
// =============================================================================

/// Uniform random integer source.
///
/// `gen_range(min, max)` is inclusive on both ends. Every die, spread step and
/// percentile check in the domain draws through this single primitive.
#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    fn gen_range(&self, min: i32, max: i32) -> i32;
}

// =============================================================================
// Collaborators
// =============================================================================

/// Filters for a random name pick. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameQuery {
    pub gender: Option<Gender>,
    pub language: Option<String>,
    pub era: Option<Era>,
}

impl NameQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_era(mut self, era: Era) -> Self {
        self.era = Some(era);
        self
    }
}

/// Name lookup service.
///
/// Lookup failures are reported as absence; the caller decides what a missing
/// name means.
pub trait NameLookupPort: Send + Sync {
    fn first_name(&self, query: &NameQuery) -> Option<String>;
    fn surname(&self, query: &NameQuery) -> Option<String>;
}

/// Applies occupation-specific skill allocation to a freshly created investigator.
pub trait OccupationEffectsPort: Send + Sync {
    fn apply(&self, investigator: &mut Investigator, occupation: &str);
}

/// Occupation effects that leave the investigator untouched.
///
/// Skill allocation per occupation has no rule table yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOccupationEffects;

impl OccupationEffectsPort for NoOccupationEffects {
    fn apply(&self, _investigator: &mut Investigator, occupation: &str) {
        tracing::debug!(occupation, "No occupation effects defined");
    }
}

// =============================================================================
// Test doubles
// =============================================================================

/// Fixed random for testing. Always answers the same value.
#[cfg(test)]
pub struct FixedRandom(pub i32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        self.0.clamp(min, max)
    }
}

/// Scripted random for testing. Answers queued values in order, then `min`.
#[cfg(test)]
pub struct ScriptedRandom(std::sync::Mutex<std::collections::VecDeque<i32>>);

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self(std::sync::Mutex::new(values.into_iter().collect()))
    }

    pub fn remaining(&self) -> usize {
        self.0.lock().expect("script lock").len()
    }
}

#[cfg(test)]
impl RandomPort for ScriptedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        let next = self.0.lock().expect("script lock").pop_front();
        match next {
            Some(value) => {
                assert!(
                    (min..=max).contains(&value),
                    "scripted value {value} outside [{min}, {max}]"
                );
                value
            }
            None => min,
        }
    }
}

/// Seeded random for statistical tests.
#[cfg(test)]
pub struct SeededRandom(std::sync::Mutex<rand::rngs::StdRng>);

#[cfg(test)]
impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(std::sync::Mutex::new(rand::rngs::StdRng::seed_from_u64(seed)))
    }
}

#[cfg(test)]
impl RandomPort for SeededRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        use rand::Rng;
        self.0.lock().expect("rng lock").gen_range(min..=max)
    }
}
