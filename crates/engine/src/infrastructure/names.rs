//! Name lookup backed by colon-delimited CSV files.
//!
//! `first_names.csv` has the header `NAME:GENDER:LANG:ERA`, `names.csv` has
//! `NAME:LANG:ERA`. Each lookup reads the file, keeps the rows matching every
//! given filter and picks one uniformly.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arkham_domain::{NameLookupPort, NameQuery, RandomPort};

pub const FIRST_NAMES_FILE: &str = "first_names.csv";
pub const SURNAMES_FILE: &str = "names.csv";

const DELIMITER: char = ':';

#[derive(Debug, thiserror::Error)]
pub enum NameTableError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} has no header row")]
    MissingHeader { path: PathBuf },
    #[error("{path} has no {column} column")]
    MissingColumn { path: PathBuf, column: String },
    #[error("No row in {path} matches {criteria}")]
    NoMatch { path: PathBuf, criteria: String },
}

/// CSV name tables in a data directory.
pub struct CsvNameTable {
    first_names: PathBuf,
    surnames: PathBuf,
    random: Arc<dyn RandomPort>,
}

impl CsvNameTable {
    pub fn new(
        first_names: impl Into<PathBuf>,
        surnames: impl Into<PathBuf>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            first_names: first_names.into(),
            surnames: surnames.into(),
            random,
        }
    }

    /// Use the standard file names inside `data_dir`.
    pub fn in_dir(data_dir: &Path, random: Arc<dyn RandomPort>) -> Self {
        Self::new(
            data_dir.join(FIRST_NAMES_FILE),
            data_dir.join(SURNAMES_FILE),
            random,
        )
    }

    /// Pick the NAME of a random row matching all `(column, value)` filters.
    pub fn pick(&self, path: &Path, filters: &[(&str, &str)]) -> Result<String, NameTableError> {
        tracing::debug!(path = %path.display(), ?filters, "Picking a random row");

        let content = fs::read_to_string(path).map_err(|source| NameTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut lines = content.lines().filter(|line| !line.trim().is_empty());

        let header: Vec<&str> = lines
            .next()
            .ok_or_else(|| NameTableError::MissingHeader {
                path: path.to_path_buf(),
            })?
            .split(DELIMITER)
            .map(str::trim)
            .collect();

        let column = |name: &str| {
            header
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| NameTableError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };
        let name_index = column("NAME")?;
        let filter_indices = filters
            .iter()
            .map(|(name, value)| Ok((column(name)?, *value)))
            .collect::<Result<Vec<_>, NameTableError>>()?;

        let matches: Vec<&str> = lines
            .map(|line| line.split(DELIMITER).map(str::trim).collect::<Vec<_>>())
            .filter(|row| row.len() == header.len())
            .filter(|row| filter_indices.iter().all(|(i, value)| row[*i] == *value))
            .map(|row| row[name_index])
            .collect();

        if matches.is_empty() {
            return Err(NameTableError::NoMatch {
                path: path.to_path_buf(),
                criteria: describe(filters),
            });
        }

        let last = i32::try_from(matches.len() - 1).unwrap_or(i32::MAX);
        let index = self.random.gen_range(0, last).clamp(0, last) as usize;
        Ok(matches[index].to_string())
    }

    fn lookup(&self, path: &Path, filters: &[(&str, &str)]) -> Option<String> {
        match self.pick(path, filters) {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::warn!(error = %e, "Name lookup failed");
                None
            }
        }
    }
}

fn describe(filters: &[(&str, &str)]) -> String {
    if filters.is_empty() {
        return "no criteria".to_string();
    }
    filters
        .iter()
        .map(|(name, value)| format!("{name} = '{value}'"))
        .collect::<Vec<_>>()
        .join(" AND ")
}

impl NameLookupPort for CsvNameTable {
    fn first_name(&self, query: &NameQuery) -> Option<String> {
        let mut filters = Vec::new();
        if let Some(gender) = query.gender {
            filters.push(("GENDER", gender.short_code()));
        }
        if let Some(language) = &query.language {
            filters.push(("LANG", language.as_str()));
        }
        if let Some(era) = query.era {
            filters.push(("ERA", era.code()));
        }
        self.lookup(&self.first_names, &filters)
    }

    fn surname(&self, query: &NameQuery) -> Option<String> {
        let mut filters = Vec::new();
        if let Some(language) = &query.language {
            filters.push(("LANG", language.as_str()));
        }
        if let Some(era) = query.era {
            filters.push(("ERA", era.code()));
        }
        self.lookup(&self.surnames, &filters)
    }
}
