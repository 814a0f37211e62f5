//! Generate investigator use case.
//!
//! Fills in whatever identity the caller left open (gender, age, names),
//! runs domain creation and then applies occupation effects.

use std::sync::Arc;

use arkham_domain::{
    is_standard_age, DomainError, Era, Gender, Investigator, InvestigatorProfile, NameLookupPort,
    NameQuery, OccupationEffectsPort, RandomPort, AGE_MAX, AGE_MIN,
};

use crate::config::GeneratorConfig;

/// What to generate. Unset fields are chosen at random.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub first_name: Option<String>,
    pub surname: Option<String>,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub language: Option<String>,
    pub era: Option<Era>,
    pub occupation: String,
    pub birthplace: String,
    pub residence: String,
}

impl GenerateRequest {
    pub fn new(
        occupation: impl Into<String>,
        birthplace: impl Into<String>,
        residence: impl Into<String>,
    ) -> Self {
        Self {
            first_name: None,
            surname: None,
            gender: None,
            age: None,
            language: None,
            era: None,
            occupation: occupation.into(),
            birthplace: birthplace.into(),
            residence: residence.into(),
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, surname: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.surname = Some(surname.into());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }
}

impl From<&GeneratorConfig> for GenerateRequest {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            first_name: None,
            surname: None,
            gender: config.gender,
            age: config.age,
            language: config.language.clone(),
            era: config.era,
            occupation: config.occupation.clone(),
            birthplace: config.birthplace.clone(),
            residence: config.residence.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("No {0} available for the requested filters")]
    NameUnavailable(&'static str),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Create an investigator with collaborators wired in.
pub struct GenerateInvestigator {
    random: Arc<dyn RandomPort>,
    names: Arc<dyn NameLookupPort>,
    occupations: Arc<dyn OccupationEffectsPort>,
}

impl GenerateInvestigator {
    pub fn new(
        random: Arc<dyn RandomPort>,
        names: Arc<dyn NameLookupPort>,
        occupations: Arc<dyn OccupationEffectsPort>,
    ) -> Self {
        Self {
            random,
            names,
            occupations,
        }
    }

    pub fn execute(&self, request: GenerateRequest) -> Result<Investigator, GenerateError> {
        let gender = request.gender.unwrap_or_else(|| self.random_gender());
        let age = match request.age {
            Some(age) => {
                if !is_standard_age(age) {
                    tracing::warn!(
                        age,
                        "Age outside {AGE_MIN}..={AGE_MAX}, applying nearest age bracket"
                    );
                }
                age
            }
            None => self.random_age(),
        };

        let mut query = NameQuery::new().with_gender(gender);
        query.language = request.language;
        query.era = request.era;

        let first_name = match request.first_name {
            Some(name) => name,
            None => self
                .names
                .first_name(&query)
                .ok_or(GenerateError::NameUnavailable("first name"))?,
        };
        let surname = match request.surname {
            Some(name) => name,
            None => self
                .names
                .surname(&query)
                .ok_or(GenerateError::NameUnavailable("surname"))?,
        };

        let profile = InvestigatorProfile::new(
            first_name,
            surname,
            gender,
            request.occupation,
            request.birthplace,
            request.residence,
            age,
        )?;
        let mut investigator = Investigator::generate(profile, self.random.as_ref())?;

        let occupation = investigator.profile().occupation().to_string();
        self.occupations.apply(&mut investigator, &occupation);

        tracing::info!(%investigator, "Generated investigator");
        Ok(investigator)
    }

    fn random_gender(&self) -> Gender {
        let last = Gender::ALL.len() as i32 - 1;
        Gender::ALL[self.random.gen_range(0, last).clamp(0, last) as usize]
    }

    fn random_age(&self) -> u32 {
        let age = self.random.gen_range(AGE_MIN as i32, AGE_MAX as i32);
        u32::try_from(age).unwrap_or(AGE_MIN).clamp(AGE_MIN, AGE_MAX)
    }
}
