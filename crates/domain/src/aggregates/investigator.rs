//! Investigator aggregate - a freshly created CoC 7e character
//!
//! # Creation phases
//!
//! Creation runs in a fixed order and never revisits a phase:
//! 1. Roll base characteristics
//! 2. Apply the age bracket
//! 3. Derive damage bonus, build, movement and hit points
//!
//! [`Investigator::generate`] is the only way to obtain an `Investigator`, so
//! derived stats are always computed from the final characteristics. There is
//! no mutable access to characteristics afterwards.

use serde::Serialize;
use std::fmt;

use crate::entities::{Attribute, Characteristic, Characteristics};
use crate::error::DomainError;
use crate::game_systems::{AgeBracket, Coc7eRules, DamageBonus};
use crate::ports::RandomPort;
use crate::value_objects::{Gender, ROLL_3D6};

const MAX_FIELD_LENGTH: usize = 200;

// =============================================================================
// Profile
// =============================================================================

/// Identity fields of an investigator.
///
/// # Invariants
///
/// - every text field is trimmed, non-empty and at most 200 characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvestigatorProfile {
    first_name: String,
    surname: String,
    gender: Gender,
    occupation: String,
    birthplace: String,
    residence: String,
    age: u32,
}

impl InvestigatorProfile {
    pub fn new(
        first_name: impl Into<String>,
        surname: impl Into<String>,
        gender: Gender,
        occupation: impl Into<String>,
        birthplace: impl Into<String>,
        residence: impl Into<String>,
        age: u32,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            first_name: validated("first name", first_name.into())?,
            surname: validated("surname", surname.into())?,
            gender,
            occupation: validated("occupation", occupation.into())?,
            birthplace: validated("birthplace", birthplace.into())?,
            residence: validated("residence", residence.into())?,
            age,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn occupation(&self) -> &str {
        &self.occupation
    }

    pub fn birthplace(&self) -> &str {
        &self.birthplace
    }

    pub fn residence(&self) -> &str {
        &self.residence
    }

    pub fn age(&self) -> u32 {
        self.age
    }
}

fn validated(field: &str, value: String) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if trimmed.chars().count() > MAX_FIELD_LENGTH {
        return Err(DomainError::validation(format!(
            "{field} cannot exceed {MAX_FIELD_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

// =============================================================================
// Phase outcomes
// =============================================================================

/// What the age bracket did to the rolled characteristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeAdjustment {
    pub bracket: AgeBracket,
    /// EDU gained through improvement checks
    pub education_gained: i32,
    /// Points taken from each physical characteristic
    pub physical_deductions: Vec<(Characteristic, i32)>,
    pub education_lost: i32,
    pub appearance_lost: i32,
    /// The second Luck roll, when the bracket grants one
    pub luck_reroll: Option<i32>,
}

/// Secondary values computed from the final characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedStats {
    pub damage_bonus: DamageBonus,
    pub build: i32,
    pub hit_point_max: i32,
    pub movement: i32,
}

impl DerivedStats {
    /// # Errors
    ///
    /// `DomainError::OutOfRange` when STR + SIZ has no damage bonus row or
    /// a characteristic sum does not fit in an `i32`.
    pub fn derive(characteristics: &Characteristics, age: u32) -> Result<Self, DomainError> {
        let strength = characteristics.value(Characteristic::Strength);
        let size = characteristics.value(Characteristic::Size);
        let dexterity = characteristics.value(Characteristic::Dexterity);
        let constitution = characteristics.value(Characteristic::Constitution);

        let damage_bonus = Coc7eRules::calculate_damage_bonus(strength, size)?;
        Ok(Self {
            damage_bonus,
            build: damage_bonus.build(),
            hit_point_max: Coc7eRules::calculate_hp(constitution, size)?,
            movement: Coc7eRules::calculate_move_rate(dexterity, strength, size, age),
        })
    }
}

// =============================================================================
// Investigator
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Investigator {
    profile: InvestigatorProfile,
    characteristics: Characteristics,
    age_adjustment: AgeAdjustment,
    derived: DerivedStats,
    /// Allocated by occupation effects after creation
    skills: Vec<Attribute>,
}

impl Investigator {
    /// Create an investigator: roll characteristics, apply age, derive stats.
    ///
    /// This is the creation entry point.
    pub fn generate(
        profile: InvestigatorProfile,
        random: &dyn RandomPort,
    ) -> Result<Self, DomainError> {
        let characteristics = Characteristics::roll(random);
        Self::develop(profile, characteristics, random)
    }

    /// Run the age and derivation phases on already rolled characteristics.
    ///
    /// `generate` is `Characteristics::roll` followed by this, with the same
    /// random source. Call it directly only to continue from fixed or imported
    /// characteristics, such as a prepared scenario or a test fixture.
    pub fn develop(
        profile: InvestigatorProfile,
        mut characteristics: Characteristics,
        random: &dyn RandomPort,
    ) -> Result<Self, DomainError> {
        let age_adjustment = apply_age(profile.age, &mut characteristics, random)?;
        let derived = DerivedStats::derive(&characteristics, profile.age)?;
        tracing::debug!(
            name = %format!("{} {}", profile.first_name, profile.surname),
            ?derived,
            "Investigator created"
        );
        Ok(Self {
            profile,
            characteristics,
            age_adjustment,
            derived,
            skills: Vec::new(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn profile(&self) -> &InvestigatorProfile {
        &self.profile
    }

    pub fn characteristics(&self) -> &Characteristics {
        &self.characteristics
    }

    pub fn characteristic(&self, characteristic: Characteristic) -> &Attribute {
        self.characteristics.get(characteristic)
    }

    pub fn age_adjustment(&self) -> &AgeAdjustment {
        &self.age_adjustment
    }

    pub fn derived(&self) -> &DerivedStats {
        &self.derived
    }

    pub fn damage_bonus(&self) -> DamageBonus {
        self.derived.damage_bonus
    }

    pub fn build(&self) -> i32 {
        self.derived.build
    }

    pub fn hit_point_max(&self) -> i32 {
        self.derived.hit_point_max
    }

    pub fn movement(&self) -> i32 {
        self.derived.movement
    }

    // =========================================================================
    // Skills
    // =========================================================================

    pub fn skills(&self) -> &[Attribute] {
        &self.skills
    }

    pub fn skill(&self, description: &str) -> Option<&Attribute> {
        self.skills
            .iter()
            .find(|s| s.description().eq_ignore_ascii_case(description))
    }

    pub fn skill_mut(&mut self, description: &str) -> Option<&mut Attribute> {
        self.skills
            .iter_mut()
            .find(|s| s.description().eq_ignore_ascii_case(description))
    }

    /// Add a skill, replacing one with the same description.
    pub fn set_skill(&mut self, skill: Attribute) {
        match self.skill_mut(skill.description()) {
            Some(existing) => *existing = skill,
            None => self.skills.push(skill),
        }
    }
}

impl fmt::Display for Investigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = &self.profile;
        write!(
            f,
            "{} {} is a {} year old {} born in {} and living in {}. At the moment {} is a {}",
            profile.first_name,
            profile.surname,
            profile.age,
            profile.gender.person(),
            profile.birthplace,
            profile.residence,
            profile.gender.personal(),
            profile.occupation
        )
    }
}

/// Apply the single bracket matching `age`.
fn apply_age(
    age: u32,
    characteristics: &mut Characteristics,
    random: &dyn RandomPort,
) -> Result<AgeAdjustment, DomainError> {
    let bracket = AgeBracket::for_age(age);
    let modifiers = bracket.modifiers();
    tracing::info!(age, ?bracket, "Applying age modifiers");

    let mut adjustment = AgeAdjustment {
        bracket,
        education_gained: 0,
        physical_deductions: Vec::new(),
        education_lost: 0,
        appearance_lost: 0,
        luck_reroll: None,
    };

    if modifiers.education_improvement_rolls > 0 {
        adjustment.education_gained = characteristics
            .get_mut(Characteristic::Education)
            .improvement_roll(modifiers.education_improvement_rolls, random)?;
    }

    if modifiers.physical_deduction > 0 {
        let shares = characteristics.spread_deduction(
            modifiers.physical_deduction,
            modifiers.deduction_targets,
            random,
        )?;
        adjustment.physical_deductions = modifiers
            .deduction_targets
            .iter()
            .copied()
            .zip(shares)
            .collect();
    }

    if modifiers.education_penalty > 0 {
        characteristics
            .get_mut(Characteristic::Education)
            .deduct(modifiers.education_penalty)?;
        adjustment.education_lost = modifiers.education_penalty;
    }

    if modifiers.appearance_penalty > 0 {
        characteristics
            .get_mut(Characteristic::Appearance)
            .deduct(modifiers.appearance_penalty)?;
        adjustment.appearance_lost = modifiers.appearance_penalty;
    }

    if modifiers.reroll_luck {
        let reroll = 5 * ROLL_3D6.evaluate(random);
        characteristics
            .get_mut(Characteristic::Luck)
            .set_if_higher(reroll);
        adjustment.luck_reroll = Some(reroll);
    }

    Ok(adjustment)
}
