//! Call of Cthulhu 7th Edition rule tables.
//!
//! CoC 7e uses a percentile (d100) roll-under system.
//! Key features used by investigator creation:
//! - Nine characteristics (STR, CON, SIZ, DEX, APP, INT, POW, EDU, Luck)
//! - Three success tiers: Regular, Hard (half), Extreme (fifth)
//! - Age brackets that trade physical characteristics for education
//! - Damage bonus, build, move rate and hit points derived from characteristics

use serde::{Serialize, Serializer};
use std::fmt;

use crate::entities::Characteristic;
use crate::error::DomainError;

/// Youngest age the creation rules are written for.
pub const AGE_MIN: u32 = 15;
/// Oldest age the creation rules are written for.
pub const AGE_MAX: u32 = 90;

/// Whether `age` lies in the range the age table was designed for.
///
/// The age table itself accepts any age; callers wanting strict bounds check here first.
pub fn is_standard_age(age: u32) -> bool {
    (AGE_MIN..=AGE_MAX).contains(&age)
}

// ============================================================================
// Success levels
// ============================================================================

/// How well a percentile roll did against a skill, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SuccessLevel {
    Critical,
    Extreme,
    Hard,
    Regular,
    Failure,
    Fumble,
}

impl SuccessLevel {
    pub fn is_success(&self) -> bool {
        *self < SuccessLevel::Failure
    }
}

/// Lowest roll that fumbles: 96 below skill 50, otherwise only 100.
fn fumble_floor(skill: i32) -> i32 {
    if skill < 50 {
        96
    } else {
        100
    }
}

/// Grade `roll` against `skill`.
///
/// A 1 is always critical and the fumble band wins over the thresholds.
/// Hard and extreme use floor division, so a negative skill has thresholds
/// below zero rather than at it.
pub fn check_success(roll: i32, skill: i32) -> SuccessLevel {
    if is_critical(roll) {
        SuccessLevel::Critical
    } else if is_fumble(roll, skill) {
        SuccessLevel::Fumble
    } else if roll <= skill.div_euclid(5) {
        SuccessLevel::Extreme
    } else if roll <= skill.div_euclid(2) {
        SuccessLevel::Hard
    } else if roll <= skill {
        SuccessLevel::Regular
    } else {
        SuccessLevel::Failure
    }
}

pub fn is_fumble(roll: i32, skill: i32) -> bool {
    roll >= fumble_floor(skill)
}

pub fn is_critical(roll: i32) -> bool {
    roll == 1
}

// ============================================================================
// Age brackets
// ============================================================================

/// Age brackets of the creation rules. Exactly one applies; they never stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgeBracket {
    /// Under 20
    Youth,
    /// 20 to 39
    Adult,
    Forties,
    Fifties,
    Sixties,
    Seventies,
    /// 80 and over
    Eighties,
}

/// What one age bracket does to freshly rolled characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeModifiers {
    /// EDU improvement checks to make
    pub education_improvement_rolls: u32,
    /// Points deducted, spread at random over `deduction_targets`
    pub physical_deduction: i32,
    pub deduction_targets: &'static [Characteristic],
    /// Flat APP reduction
    pub appearance_penalty: i32,
    /// Flat EDU reduction
    pub education_penalty: i32,
    /// Roll Luck a second time and keep the higher value
    pub reroll_luck: bool,
}

const YOUTH_TARGETS: &[Characteristic] = &[Characteristic::Strength, Characteristic::Size];
const BODY_TARGETS: &[Characteristic] = &[
    Characteristic::Strength,
    Characteristic::Constitution,
    Characteristic::Dexterity,
];

impl AgeBracket {
    /// Pick the bracket by the half-open ranges <20, <40, <50, <60, <70, <80, >=80.
    pub fn for_age(age: u32) -> Self {
        match age {
            0..=19 => Self::Youth,
            20..=39 => Self::Adult,
            40..=49 => Self::Forties,
            50..=59 => Self::Fifties,
            60..=69 => Self::Sixties,
            70..=79 => Self::Seventies,
            _ => Self::Eighties,
        }
    }

    pub fn modifiers(&self) -> AgeModifiers {
        let aging = |rolls, deduction, appearance| AgeModifiers {
            education_improvement_rolls: rolls,
            physical_deduction: deduction,
            deduction_targets: BODY_TARGETS,
            appearance_penalty: appearance,
            education_penalty: 0,
            reroll_luck: false,
        };

        match self {
            Self::Youth => AgeModifiers {
                education_improvement_rolls: 0,
                physical_deduction: 5,
                deduction_targets: YOUTH_TARGETS,
                appearance_penalty: 0,
                education_penalty: 5,
                reroll_luck: true,
            },
            Self::Adult => AgeModifiers {
                education_improvement_rolls: 1,
                physical_deduction: 0,
                deduction_targets: &[],
                appearance_penalty: 0,
                education_penalty: 0,
                reroll_luck: false,
            },
            Self::Forties => aging(2, 5, 5),
            Self::Fifties => aging(3, 10, 10),
            Self::Sixties => aging(4, 20, 15),
            Self::Seventies => aging(4, 40, 20),
            Self::Eighties => aging(4, 80, 25),
        }
    }
}

// ============================================================================
// Damage bonus and build
// ============================================================================

/// Extra damage dealt in melee, from STR + SIZ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageBonus {
    MinusTwo,
    MinusOne,
    Zero,
    D4,
    D6,
}

impl DamageBonus {
    /// Token shown on the sheet ("-2", "-1", "0", "D4", "D6").
    pub fn token(&self) -> &'static str {
        match self {
            Self::MinusTwo => "-2",
            Self::MinusOne => "-1",
            Self::Zero => "0",
            Self::D4 => "D4",
            Self::D6 => "D6",
        }
    }

    /// Build paired with this damage bonus row.
    ///
    /// The D4 and D6 rows carry a build of -1 in this rule table.
    pub fn build(&self) -> i32 {
        match self {
            Self::MinusTwo => -2,
            Self::MinusOne => -1,
            Self::Zero => 0,
            Self::D4 => -1,
            Self::D6 => -1,
        }
    }
}

impl fmt::Display for DamageBonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl Serialize for DamageBonus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

/// Rule calculations for investigator creation.
pub struct Coc7eRules;

impl Coc7eRules {
    /// Calculate damage bonus from STR + SIZ.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` when STR + SIZ exceeds 204 (the table
    /// has no row above that) or does not fit in an `i32`.
    pub fn calculate_damage_bonus(strength: i32, size: i32) -> Result<DamageBonus, DomainError> {
        let total = strength.checked_add(size).ok_or_else(|| {
            DomainError::out_of_range(format!("SIZ + STR ({size} + {strength}) overflows"))
        })?;
        match total {
            i32::MIN..=64 => Ok(DamageBonus::MinusTwo),
            65..=84 => Ok(DamageBonus::MinusOne),
            85..=124 => Ok(DamageBonus::Zero),
            125..=164 => Ok(DamageBonus::D4),
            165..=204 => Ok(DamageBonus::D6),
            _ => Err(DomainError::out_of_range(format!(
                "SIZ + STR ({total}) > 204"
            ))),
        }
    }

    /// Calculate build from STR + SIZ.
    pub fn calculate_build(strength: i32, size: i32) -> Result<i32, DomainError> {
        Ok(Self::calculate_damage_bonus(strength, size)?.build())
    }

    /// Calculate move rate from DEX, STR, SIZ and age.
    ///
    /// Base 7 when DEX and STR are both below SIZ, 9 when both are above it,
    /// 8 otherwise. Then adds `max(0, age / 10 - 3)`.
    pub fn calculate_move_rate(dexterity: i32, strength: i32, size: i32, age: u32) -> i32 {
        let base = if dexterity < size && strength < size {
            7
        } else if dexterity > size && strength > size {
            9
        } else {
            8
        };
        let age_term = (age / 10).saturating_sub(3);
        base + age_term as i32
    }

    /// Calculate derived HP from CON and SIZ.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` when CON + SIZ does not fit in an `i32`.
    pub fn calculate_hp(constitution: i32, size: i32) -> Result<i32, DomainError> {
        constitution
            .checked_add(size)
            .map(|total| total.div_euclid(10))
            .ok_or_else(|| {
                DomainError::out_of_range(format!(
                    "CON + SIZ ({constitution} + {size}) overflows"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_grades_against_skill_50() {
        let grades: Vec<_> = [1, 10, 11, 25, 26, 50, 51, 99, 100]
            .into_iter()
            .map(|roll| check_success(roll, 50))
            .collect();
        assert_eq!(
            grades,
            vec![
                SuccessLevel::Critical,
                SuccessLevel::Extreme,
                SuccessLevel::Hard,
                SuccessLevel::Hard,
                SuccessLevel::Regular,
                SuccessLevel::Regular,
                SuccessLevel::Failure,
                SuccessLevel::Failure,
                SuccessLevel::Fumble,
            ]
        );
    }

    #[test]
    fn fumble_band_depends_on_skill() {
        assert_eq!(check_success(95, 49), SuccessLevel::Failure);
        assert_eq!(check_success(96, 49), SuccessLevel::Fumble);
        assert_eq!(check_success(96, 50), SuccessLevel::Failure);
        // The band beats a skill high enough to pass the roll
        assert_eq!(check_success(100, 150), SuccessLevel::Fumble);
        assert!(is_fumble(96, -20));
        assert!(!is_fumble(99, 50));
    }

    #[test]
    fn zero_and_negative_skills_use_floor_thresholds() {
        // A 1 stays critical whatever the skill
        assert_eq!(check_success(1, 0), SuccessLevel::Critical);
        assert_eq!(check_success(1, -40), SuccessLevel::Critical);

        assert_eq!(check_success(0, 0), SuccessLevel::Extreme);
        assert_eq!(check_success(2, 0), SuccessLevel::Failure);

        // -1 / 5 floors to -1, so 0 misses every threshold
        assert_eq!(check_success(0, -1), SuccessLevel::Failure);
        // -10 / 5 = -2 and -10 / 2 = -5
        assert_eq!(check_success(-3, -10), SuccessLevel::Extreme);
        assert_eq!(check_success(-5, -10), SuccessLevel::Extreme);
        assert_eq!(check_success(-2, -10), SuccessLevel::Extreme);
        assert_eq!(check_success(-1, -10), SuccessLevel::Failure);
        // Below zero the fifth is the highest threshold: extreme or nothing
        assert_eq!(check_success(-21, -21), SuccessLevel::Extreme);
        assert_eq!(check_success(-4, -21), SuccessLevel::Failure);
    }

    #[test]
    fn success_levels_order_best_first() {
        assert!(SuccessLevel::Critical < SuccessLevel::Extreme);
        assert!(SuccessLevel::Regular.is_success());
        assert!(!SuccessLevel::Failure.is_success());
        assert!(!SuccessLevel::Fumble.is_success());
    }

    #[test]
    fn age_brackets_follow_half_open_ranges() {
        assert_eq!(AgeBracket::for_age(15), AgeBracket::Youth);
        assert_eq!(AgeBracket::for_age(19), AgeBracket::Youth);
        assert_eq!(AgeBracket::for_age(20), AgeBracket::Adult);
        assert_eq!(AgeBracket::for_age(39), AgeBracket::Adult);
        assert_eq!(AgeBracket::for_age(40), AgeBracket::Forties);
        assert_eq!(AgeBracket::for_age(59), AgeBracket::Fifties);
        assert_eq!(AgeBracket::for_age(60), AgeBracket::Sixties);
        assert_eq!(AgeBracket::for_age(79), AgeBracket::Seventies);
        assert_eq!(AgeBracket::for_age(80), AgeBracket::Eighties);
        // Outside the standard range the comparison chain still answers.
        assert_eq!(AgeBracket::for_age(3), AgeBracket::Youth);
        assert_eq!(AgeBracket::for_age(120), AgeBracket::Eighties);
    }

    #[test]
    fn age_modifier_table() {
        let youth = AgeBracket::Youth.modifiers();
        assert_eq!(youth.physical_deduction, 5);
        assert_eq!(
            youth.deduction_targets,
            &[Characteristic::Strength, Characteristic::Size]
        );
        assert_eq!(youth.education_penalty, 5);
        assert!(youth.reroll_luck);

        let adult = AgeBracket::Adult.modifiers();
        assert_eq!(adult.education_improvement_rolls, 1);
        assert_eq!(adult.physical_deduction, 0);

        let rows = [
            (AgeBracket::Forties, 2, 5, 5),
            (AgeBracket::Fifties, 3, 10, 10),
            (AgeBracket::Sixties, 4, 20, 15),
            (AgeBracket::Seventies, 4, 40, 20),
            (AgeBracket::Eighties, 4, 80, 25),
        ];
        for (bracket, rolls, deduction, appearance) in rows {
            let modifiers = bracket.modifiers();
            assert_eq!(modifiers.education_improvement_rolls, rolls);
            assert_eq!(modifiers.physical_deduction, deduction);
            assert_eq!(modifiers.appearance_penalty, appearance);
            assert_eq!(modifiers.deduction_targets.len(), 3);
            assert!(!modifiers.reroll_luck);
        }
    }

    #[test]
    fn standard_age_range() {
        assert!(is_standard_age(15));
        assert!(is_standard_age(90));
        assert!(!is_standard_age(14));
        assert!(!is_standard_age(91));
    }

    #[test]
    fn hp_calculation() {
        assert_eq!(Coc7eRules::calculate_hp(60, 65), Ok(12));
        assert_eq!(Coc7eRules::calculate_hp(50, 50), Ok(10));
        assert_eq!(Coc7eRules::calculate_hp(-5, 0), Ok(-1));
    }

    #[test]
    fn hp_sum_overflow_is_out_of_range() {
        assert!(matches!(
            Coc7eRules::calculate_hp(i32::MAX, 1),
            Err(DomainError::OutOfRange(_))
        ));
        assert!(matches!(
            Coc7eRules::calculate_hp(i32::MIN, -1),
            Err(DomainError::OutOfRange(_))
        ));
    }

    #[test]
    fn move_rate_calculation() {
        // Both DEX and STR < SIZ
        assert_eq!(Coc7eRules::calculate_move_rate(50, 40, 60, 34), 7);

        // Both DEX and STR > SIZ
        assert_eq!(Coc7eRules::calculate_move_rate(60, 60, 40, 25), 9);

        // Mixed or equal
        assert_eq!(Coc7eRules::calculate_move_rate(50, 50, 50, 25), 8);
        assert_eq!(Coc7eRules::calculate_move_rate(70, 40, 60, 25), 8);

        // Age term is additive and never negative
        assert_eq!(Coc7eRules::calculate_move_rate(50, 40, 60, 15), 7);
        assert_eq!(Coc7eRules::calculate_move_rate(50, 40, 60, 45), 8);
        assert_eq!(Coc7eRules::calculate_move_rate(50, 40, 60, 85), 12);
    }

    #[test]
    fn damage_bonus_calculation() {
        assert_eq!(
            Coc7eRules::calculate_damage_bonus(30, 30),
            Ok(DamageBonus::MinusTwo)
        );
        assert_eq!(
            Coc7eRules::calculate_damage_bonus(40, 40),
            Ok(DamageBonus::MinusOne)
        );
        assert_eq!(
            Coc7eRules::calculate_damage_bonus(50, 50),
            Ok(DamageBonus::Zero)
        );
        assert_eq!(
            Coc7eRules::calculate_damage_bonus(70, 60),
            Ok(DamageBonus::D4)
        );
        assert_eq!(
            Coc7eRules::calculate_damage_bonus(100, 104),
            Ok(DamageBonus::D6)
        );
        assert!(matches!(
            Coc7eRules::calculate_damage_bonus(110, 100),
            Err(DomainError::OutOfRange(_))
        ));
    }

    #[test]
    fn damage_bonus_tier_boundaries() {
        let bonus = |total| Coc7eRules::calculate_damage_bonus(total, 0);
        assert_eq!(bonus(64), Ok(DamageBonus::MinusTwo));
        assert_eq!(bonus(65), Ok(DamageBonus::MinusOne));
        assert_eq!(bonus(84), Ok(DamageBonus::MinusOne));
        assert_eq!(bonus(85), Ok(DamageBonus::Zero));
        assert_eq!(bonus(124), Ok(DamageBonus::Zero));
        assert_eq!(bonus(125), Ok(DamageBonus::D4));
        assert_eq!(bonus(165), Ok(DamageBonus::D6));
        assert_eq!(bonus(204), Ok(DamageBonus::D6));
        assert!(bonus(205).is_err());
    }

    #[test]
    fn damage_bonus_sum_overflow_is_out_of_range() {
        assert!(matches!(
            Coc7eRules::calculate_damage_bonus(i32::MIN, -1),
            Err(DomainError::OutOfRange(_))
        ));
        assert!(matches!(
            Coc7eRules::calculate_build(i32::MAX, i32::MAX),
            Err(DomainError::OutOfRange(_))
        ));
        assert_eq!(
            Coc7eRules::calculate_damage_bonus(i32::MIN, 0),
            Ok(DamageBonus::MinusTwo)
        );
    }

    #[test]
    fn build_calculation() {
        assert_eq!(Coc7eRules::calculate_build(30, 30), Ok(-2));
        assert_eq!(Coc7eRules::calculate_build(40, 40), Ok(-1));
        assert_eq!(Coc7eRules::calculate_build(50, 50), Ok(0));
        assert_eq!(Coc7eRules::calculate_build(70, 60), Ok(-1));
        assert_eq!(Coc7eRules::calculate_build(90, 90), Ok(-1));
    }

    #[test]
    fn damage_bonus_tokens() {
        assert_eq!(DamageBonus::D4.token(), "D4");
        assert_eq!(DamageBonus::Zero.to_string(), "0");
        assert_eq!(
            serde_json::to_string(&DamageBonus::MinusTwo).unwrap(),
            "\"-2\""
        );
    }
}
