//! Characteristic identifiers and the fixed record holding one Attribute per characteristic.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::ports::RandomPort;
use crate::value_objects::{spread, DiceExpression, ROLL_2D6_PLUS_6, ROLL_3D6};

use super::Attribute;

/// The nine CoC 7e characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    #[serde(rename = "STR")]
    Strength,
    #[serde(rename = "CON")]
    Constitution,
    #[serde(rename = "SIZ")]
    Size,
    #[serde(rename = "DEX")]
    Dexterity,
    #[serde(rename = "APP")]
    Appearance,
    #[serde(rename = "INT")]
    Intelligence,
    #[serde(rename = "POW")]
    Power,
    #[serde(rename = "EDU")]
    Education,
    #[serde(rename = "LUCK")]
    Luck,
}

impl Characteristic {
    pub const ALL: [Characteristic; 9] = [
        Self::Strength,
        Self::Constitution,
        Self::Size,
        Self::Dexterity,
        Self::Appearance,
        Self::Intelligence,
        Self::Power,
        Self::Education,
        Self::Luck,
    ];

    /// Short uppercase code (e.g., "STR", "LUCK").
    pub fn code(&self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Constitution => "CON",
            Self::Size => "SIZ",
            Self::Dexterity => "DEX",
            Self::Appearance => "APP",
            Self::Intelligence => "INT",
            Self::Power => "POW",
            Self::Education => "EDU",
            Self::Luck => "LUCK",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::Constitution => "Constitution",
            Self::Size => "Size",
            Self::Dexterity => "Dexterity",
            Self::Appearance => "Appearance",
            Self::Intelligence => "Intelligence",
            Self::Power => "Power",
            Self::Education => "Education",
            Self::Luck => "Luck",
        }
    }

    /// Ceiling applied to the stored value.
    pub fn maximum(&self) -> i32 {
        match self {
            Self::Size | Self::Power => 200,
            Self::Luck => 9999,
            _ => 99,
        }
    }

    /// Dice rolled at creation; the result is multiplied by five.
    pub fn generation_roll(&self) -> &'static DiceExpression {
        match self {
            Self::Size | Self::Education => &ROLL_2D6_PLUS_6,
            _ => &ROLL_3D6,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Characteristic {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.code() == upper || c.description().to_uppercase() == upper)
            .ok_or_else(|| DomainError::invalid_argument(format!("Unknown characteristic: {s}")))
    }
}

/// One Attribute per characteristic, indexed by [`Characteristic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Characteristics {
    attributes: [Attribute; 9],
}

impl Characteristics {
    /// Build the record from a value per characteristic, applying each maximum.
    pub fn from_fn(mut value: impl FnMut(Characteristic) -> i32) -> Self {
        Self {
            attributes: Characteristic::ALL.map(|c| {
                Attribute::new(c.description(), Some(c.code()))
                    .with_maximum(c.maximum())
                    .with_value(value(c))
            }),
        }
    }

    /// Roll every characteristic: five times its generation roll.
    pub fn roll(random: &dyn RandomPort) -> Self {
        let characteristics = Self::from_fn(|c| 5 * c.generation_roll().evaluate(random));
        tracing::debug!(?characteristics, "Rolled base characteristics");
        characteristics
    }

    pub fn get(&self, characteristic: Characteristic) -> &Attribute {
        &self.attributes[characteristic.index()]
    }

    pub fn get_mut(&mut self, characteristic: Characteristic) -> &mut Attribute {
        &mut self.attributes[characteristic.index()]
    }

    /// Current value; every characteristic is set once the record exists.
    pub fn value(&self, characteristic: Characteristic) -> i32 {
        self.get(characteristic).value().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Characteristic, &Attribute)> {
        Characteristic::ALL.into_iter().zip(self.attributes.iter())
    }

    /// Deduct `amount` points, distributed at random over `targets`.
    ///
    /// Returns the share taken from each target, in `targets` order.
    pub fn spread_deduction(
        &mut self,
        amount: i32,
        targets: &[Characteristic],
        random: &dyn RandomPort,
    ) -> Result<Vec<i32>, DomainError> {
        let shares = spread(amount, targets.len(), random)?;
        for (target, share) in targets.iter().zip(&shares) {
            self.get_mut(*target).deduct(*share)?;
        }
        tracing::info!(amount, ?targets, ?shares, "Spread deduction applied");
        Ok(shares)
    }
}

impl Serialize for Characteristics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len()))?;
        for (characteristic, attribute) in self.iter() {
            map.serialize_entry(characteristic.code(), attribute)?;
        }
        map.end()
    }
}
