//! # Custom Programs
//!
//! Utility incentive programs that override selected baseline rules.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PrmError;

/// A utility-specific rule override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CustomProgram {
    /// Xcel Energy Colorado Energy Design Assistance, Program Manual 2014.
    XcelEnergyCoEda,
}

impl CustomProgram {
    /// The program name as written in run configurations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::XcelEnergyCoEda => "Xcel Energy CO EDA",
        }
    }
}

impl std::fmt::Display for CustomProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomProgram {
    type Err = PrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Xcel Energy CO EDA" => Ok(Self::XcelEnergyCoEda),
            other => Err(PrmError::UnknownCustomProgram(other.to_string())),
        }
    }
}

impl TryFrom<String> for CustomProgram {
    type Error = PrmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CustomProgram> for String {
    fn from(value: CustomProgram) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_xcel() {
        let p: CustomProgram = "Xcel Energy CO EDA".parse().unwrap();
        assert_eq!(p, CustomProgram::XcelEnergyCoEda);
        assert_eq!(p.to_string(), "Xcel Energy CO EDA");
    }

    #[test]
    fn test_unknown_program() {
        assert!("Xcel".parse::<CustomProgram>().is_err());
    }
}
