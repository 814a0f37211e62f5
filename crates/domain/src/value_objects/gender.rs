//! Investigator gender and the English words used to describe it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    X,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Self::Male, Self::Female, Self::X];

    /// Noun for a person of this gender ("man", "woman", "x").
    pub fn person(&self) -> &'static str {
        match self {
            Self::Male => "man",
            Self::Female => "woman",
            Self::X => "x",
        }
    }

    /// Personal pronoun ("he", "she", "they").
    pub fn personal(&self) -> &'static str {
        match self {
            Self::Male => "he",
            Self::Female => "she",
            Self::X => "they",
        }
    }

    /// Possessive pronoun ("his", "her", "theirs").
    pub fn possessive(&self) -> &'static str {
        match self {
            Self::Male => "his",
            Self::Female => "her",
            Self::X => "theirs",
        }
    }

    /// Object pronoun ("him", "her", "them").
    pub fn object(&self) -> &'static str {
        match self {
            Self::Male => "him",
            Self::Female => "her",
            Self::X => "them",
        }
    }

    /// One-letter code used by the name tables.
    pub fn short_code(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::X => "X",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::X => "x",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            "x" => Ok(Self::X),
            other => Err(DomainError::validation(format!("Unknown gender: {other}"))),
        }
    }
}
