//! Campaign era, used to filter period-appropriate names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Era {
    /// Classic 1920s setting
    Twenties,
    Modern,
    Pulp,
}

impl Era {
    /// Code stored in the ERA column of the name tables.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Twenties => "1920s",
            Self::Modern => "modern",
            Self::Pulp => "pulp",
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Era {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1920s" | "twenties" | "1920" => Ok(Self::Twenties),
            "modern" => Ok(Self::Modern),
            "pulp" => Ok(Self::Pulp),
            other => Err(DomainError::validation(format!("Unknown era: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_era_codes_round_trip_through_from_str() {
        for era in [Era::Twenties, Era::Modern, Era::Pulp] {
            assert_eq!(Era::from_str(era.code()), Ok(era));
        }
        assert_eq!(Era::from_str("Twenties"), Ok(Era::Twenties));
        assert!(Era::from_str("victorian").is_err());
    }
}
