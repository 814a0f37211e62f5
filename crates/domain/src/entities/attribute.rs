//! Attribute entity - one scored trait with regular/half/fifth thresholds.
//!
//! Values are clamped down to `maximum` on every write. There is no lower
//! clamp: deductions may leave an attribute below zero.

use serde::Serialize;
use std::fmt;

use crate::error::DomainError;
use crate::game_systems::{check_success, SuccessLevel};
use crate::ports::RandomPort;
use crate::value_objects::{D10, D100};

/// Default ceiling for attributes (skills go up to 100%).
pub const DEFAULT_MAXIMUM: i32 = 100;

/// Which threshold a check rolls against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CheckTier {
    /// Roll <= value
    Regular,
    /// Roll <= value / 2
    Hard,
    /// Roll <= value / 5
    Extreme,
}

/// A set value with its derived thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub regular: i32,
    pub half: i32,
    pub fifth: i32,
}

impl Score {
    fn new(regular: i32) -> Self {
        Self {
            regular,
            half: regular.div_euclid(2),
            fifth: regular.div_euclid(5),
        }
    }

    pub fn threshold(&self, tier: CheckTier) -> i32 {
        match tier {
            CheckTier::Regular => self.regular,
            CheckTier::Hard => self.half,
            CheckTier::Extreme => self.fifth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    description: String,
    code: Option<String>,
    score: Option<Score>,
    maximum: i32,
}

impl Attribute {
    /// Create an unset attribute with the default maximum.
    pub fn new(description: impl Into<String>, code: Option<&str>) -> Self {
        Self {
            description: description.into(),
            code: code.map(str::to_string),
            score: None,
            maximum: DEFAULT_MAXIMUM,
        }
    }

    pub fn with_maximum(mut self, maximum: i32) -> Self {
        self.maximum = maximum;
        if let Some(score) = self.score {
            self.set_value(score.regular);
        }
        self
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.set_value(value);
        self
    }

    // Accessors

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    pub fn score(&self) -> Option<Score> {
        self.score
    }

    pub fn value(&self) -> Option<i32> {
        self.score.map(|s| s.regular)
    }

    pub fn half(&self) -> Option<i32> {
        self.score.map(|s| s.half)
    }

    pub fn fifth(&self) -> Option<i32> {
        self.score.map(|s| s.fifth)
    }

    fn require_score(&self) -> Result<Score, DomainError> {
        self.score.ok_or_else(|| {
            DomainError::invalid_argument(format!("{} has no value yet", self.label()))
        })
    }

    fn label(&self) -> String {
        match &self.code {
            Some(code) => format!("{}/{}", self.description, code),
            None => self.description.clone(),
        }
    }

    // Mutations

    /// Store `min(value, maximum)` and recompute half and fifth.
    pub fn set_value(&mut self, value: i32) {
        let stored = if value > self.maximum {
            tracing::debug!(
                attribute = %self.label(),
                value,
                maximum = self.maximum,
                "Value exceeds maximum, limiting it to maximum"
            );
            self.maximum
        } else {
            value
        };
        self.score = Some(Score::new(stored));
    }

    /// Subtract `amount` from the current value.
    ///
    /// # Errors
    ///
    /// `DomainError::InvalidArgument` when the attribute is unset or the
    /// result does not fit in an `i32`. The value is left untouched.
    pub fn deduct(&mut self, amount: i32) -> Result<(), DomainError> {
        let score = self.require_score()?;
        let value = score.regular.checked_sub(amount).ok_or_else(|| {
            DomainError::invalid_argument(format!(
                "Deducting {amount} from {} ({}) overflows",
                self.label(),
                score.regular
            ))
        })?;
        tracing::info!(attribute = %self.label(), amount, from = score.regular, "Deducting");
        self.set_value(value);
        Ok(())
    }

    /// Replace the value with `candidate` if it is higher (or if unset).
    pub fn set_if_higher(&mut self, candidate: i32) {
        match self.value() {
            Some(current) if current >= candidate => {}
            _ => self.set_value(candidate),
        }
    }

    /// Perform `times` improvement checks.
    ///
    /// Each check rolls D100; when it beats the current value the attribute
    /// gains 1D10, re-clamped to the maximum. Returns the total gained.
    pub fn improvement_roll(
        &mut self,
        times: u32,
        random: &dyn RandomPort,
    ) -> Result<i32, DomainError> {
        let start = self.require_score()?.regular;
        for _ in 0..times {
            let current = self.require_score()?.regular;
            let check = D100.evaluate(random);
            if check > current {
                let gain = D10.evaluate(random);
                tracing::debug!(attribute = %self.label(), check, gain, "Improvement check passed");
                let improved = current.checked_add(gain).ok_or_else(|| {
                    DomainError::invalid_argument(format!(
                        "Improving {} ({current}) by {gain} overflows",
                        self.label()
                    ))
                })?;
                self.set_value(improved);
            } else {
                tracing::debug!(attribute = %self.label(), check, "Improvement check failed");
            }
        }
        let end = self.require_score()?.regular;
        end.checked_sub(start).ok_or_else(|| {
            DomainError::invalid_argument(format!(
                "{} gain from {start} to {end} overflows",
                self.label()
            ))
        })
    }

    // Checks

    /// Roll-under check against the tier's threshold.
    ///
    /// Without a `roll` one is drawn from D100.
    pub fn check(
        &self,
        roll: Option<i32>,
        tier: CheckTier,
        random: &dyn RandomPort,
    ) -> Result<bool, DomainError> {
        let score = self.require_score()?;
        let roll = roll.unwrap_or_else(|| D100.evaluate(random));
        Ok(roll <= score.threshold(tier))
    }

    /// Grade a D100 roll against this attribute, including criticals and fumbles.
    pub fn success_level(&self, roll: i32) -> Result<SuccessLevel, DomainError> {
        Ok(check_success(roll, self.require_score()?.regular))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.score {
            Some(score) => write!(
                f,
                "{}(R: {} H:{} F: {})",
                self.label(),
                score.regular,
                score.half,
                score.fifth
            ),
            None => write!(f, "{}(Not yet set)", self.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedRandom, MockRandomPort, ScriptedRandom, SeededRandom};
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn skill(value: i32) -> Attribute {
        Attribute::new("Spot Hidden", None).with_value(value)
    }

    #[test]
    fn test_new_attribute_is_unset() {
        let attribute = Attribute::new("Library Use", Some("LIB"));
        assert_eq!(attribute.value(), None);
        assert_eq!(attribute.half(), None);
        assert_eq!(attribute.maximum(), DEFAULT_MAXIMUM);
        assert_eq!(attribute.code(), Some("LIB"));
        assert_eq!(attribute.to_string(), "Library Use/LIB(Not yet set)");
    }

    #[test]
    fn test_set_value_recomputes_thresholds() {
        let mut attribute = skill(57);
        assert_eq!(attribute.value(), Some(57));
        assert_eq!(attribute.half(), Some(28));
        assert_eq!(attribute.fifth(), Some(11));

        attribute.set_value(40);
        assert_eq!(attribute.half(), Some(20));
        assert_eq!(attribute.fifth(), Some(8));
    }

    #[test]
    fn test_set_value_clamps_only_upper_bound() {
        let mut attribute = Attribute::new("Strength", Some("STR")).with_maximum(99);
        attribute.set_value(140);
        assert_eq!(attribute.value(), Some(99));

        attribute.set_value(-7);
        assert_eq!(attribute.value(), Some(-7));
        // Floor division, not truncation
        assert_eq!(attribute.half(), Some(-4));
        assert_eq!(attribute.fifth(), Some(-2));
    }

    #[test]
    fn test_lowering_maximum_reclamps() {
        let attribute = skill(90).with_maximum(50);
        assert_eq!(attribute.value(), Some(50));
    }

    #[test]
    fn test_deduct() {
        let mut attribute = skill(50);
        attribute.deduct(15).unwrap();
        assert_eq!(attribute.value(), Some(35));
        attribute.deduct(-80).unwrap();
        assert_eq!(attribute.value(), Some(100));
    }

    #[test]
    fn test_deduct_overflow_is_invalid_argument() {
        let mut attribute = Attribute::new("Skill", None).with_value(-10);
        assert!(matches!(
            attribute.deduct(i32::MAX),
            Err(DomainError::InvalidArgument(_))
        ));
        assert_eq!(attribute.value(), Some(-10));

        let mut attribute = skill(5);
        assert!(matches!(
            attribute.deduct(i32::MIN),
            Err(DomainError::InvalidArgument(_))
        ));
        assert_eq!(attribute.value(), Some(5));
    }

    #[test]
    fn test_deduct_unset_is_invalid_argument() {
        let mut attribute = Attribute::new("Luck", Some("LUCK"));
        assert!(matches!(
            attribute.deduct(5),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_set_if_higher() {
        let mut attribute = skill(50);
        attribute.set_if_higher(40);
        assert_eq!(attribute.value(), Some(50));
        attribute.set_if_higher(65);
        assert_eq!(attribute.value(), Some(65));

        let mut unset = Attribute::new("Luck", Some("LUCK"));
        unset.set_if_higher(45);
        assert_eq!(unset.value(), Some(45));
    }

    #[test]
    fn test_check_tiers_with_explicit_roll() {
        let attribute = skill(50);
        let random = FixedRandom(1);
        assert!(attribute.check(Some(50), CheckTier::Regular, &random).unwrap());
        assert!(!attribute.check(Some(51), CheckTier::Regular, &random).unwrap());
        assert!(attribute.check(Some(25), CheckTier::Hard, &random).unwrap());
        assert!(!attribute.check(Some(26), CheckTier::Hard, &random).unwrap());
        assert!(attribute.check(Some(10), CheckTier::Extreme, &random).unwrap());
        assert!(!attribute.check(Some(11), CheckTier::Extreme, &random).unwrap());
    }

    #[test]
    fn test_check_draws_percentile_when_no_roll() {
        let attribute = skill(50);
        assert!(attribute
            .check(None, CheckTier::Regular, &ScriptedRandom::new([42]))
            .unwrap());
        assert!(!attribute
            .check(None, CheckTier::Hard, &ScriptedRandom::new([42]))
            .unwrap());
    }

    #[test]
    fn test_improvement_only_on_failed_check() {
        let mut attribute = skill(60);
        // First check 30 (<= 60, no gain), second check 75 (> 60) then gain 7
        let random = ScriptedRandom::new([30, 75, 7]);
        let gained = attribute.improvement_roll(2, &random).unwrap();
        assert_eq!(gained, 7);
        assert_eq!(attribute.value(), Some(67));
        assert_eq!(random.remaining(), 0);
    }

    #[test]
    fn test_improvement_draws_percentile_then_d10() {
        let mut random = MockRandomPort::new();
        let mut seq = Sequence::new();
        random
            .expect_gen_range()
            .with(eq(1), eq(100))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(80);
        random
            .expect_gen_range()
            .with(eq(1), eq(10))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(4);

        let mut attribute = skill(50);
        assert_eq!(attribute.improvement_roll(1, &random).unwrap(), 4);
        assert_eq!(attribute.value(), Some(54));
    }

    #[test]
    fn test_improvement_skips_d10_when_check_fails() {
        let mut random = MockRandomPort::new();
        random
            .expect_gen_range()
            .with(eq(1), eq(100))
            .times(3)
            .return_const(20);

        let mut attribute = skill(50);
        assert_eq!(attribute.improvement_roll(3, &random).unwrap(), 0);
        assert_eq!(attribute.value(), Some(50));
    }

    #[test]
    fn test_improvement_from_extreme_low_value() {
        let mut attribute = Attribute::new("Skill", None).with_value(i32::MIN + 5);
        let random = ScriptedRandom::new([1, 10]);
        assert_eq!(attribute.improvement_roll(1, &random).unwrap(), 10);
        assert_eq!(attribute.value(), Some(i32::MIN + 15));
    }

    #[test]
    fn test_improvement_equal_roll_does_not_improve() {
        let mut attribute = skill(60);
        let random = ScriptedRandom::new([60]);
        assert_eq!(attribute.improvement_roll(1, &random).unwrap(), 0);
        assert_eq!(attribute.value(), Some(60));
    }

    #[test]
    fn test_improvement_never_exceeds_maximum() {
        let random = SeededRandom::new(9);
        for _ in 0..200 {
            let mut attribute = Attribute::new("Education", Some("EDU"))
                .with_maximum(99)
                .with_value(95);
            attribute.improvement_roll(4, &random).unwrap();
            let value = attribute.value().unwrap();
            assert!((95..=99).contains(&value));
        }
    }

    #[test]
    fn test_success_level() {
        let attribute = skill(50);
        assert_eq!(attribute.success_level(1).unwrap(), SuccessLevel::Critical);
        assert_eq!(attribute.success_level(9).unwrap(), SuccessLevel::Extreme);
        assert_eq!(attribute.success_level(100).unwrap(), SuccessLevel::Fumble);
    }

    #[test]
    fn test_display() {
        let attribute = Attribute::new("Strength", Some("STR")).with_value(55);
        assert_eq!(attribute.to_string(), "Strength/STR(R: 55 H:27 F: 11)");
        assert_eq!(skill(20).to_string(), "Spot Hidden(R: 20 H:10 F: 4)");
    }
}
