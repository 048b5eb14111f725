use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WebinError;

/// Sample accession (`SAMEA...`, `ERS...`) or submitter alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleId(String);

impl SampleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SampleId {
    type Err = WebinError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(WebinError::InvalidSampleId(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Which Webin deployment requests are sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Test,
}

impl Environment {
    pub fn default_base_uri(self) -> &'static str {
        match self {
            Environment::Production => "https://www.ebi.ac.uk/ena/submit/drop-box/",
            Environment::Test => "https://wwwdev.ebi.ac.uk/ena/submit/drop-box/",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Test => write!(f, "test"),
        }
    }
}
