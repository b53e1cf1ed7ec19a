//! # Template — Code Edition Taxonomy
//!
//! Defines the `Template` enum naming every energy-code edition the
//! standards tables are keyed on. This is the ONE definition used across
//! the workspace; rule selection matches on it exhaustively.
//!
//! ## Implements
//!
//! ASHRAE 90.1 editions 2004 through 2019, the 90.1-2019 Appendix G
//! Performance Rating Method, NECB editions, and the DOE reference vintages.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PrmError;

/// An energy-code edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Template {
    /// DOE reference buildings, pre-1980 construction.
    DoeRefPre1980,
    /// DOE reference buildings, 1980-2004 construction.
    DoeRef1980To2004,
    /// ASHRAE 90.1-2004.
    Ashrae2004,
    /// ASHRAE 90.1-2007.
    Ashrae2007,
    /// ASHRAE 90.1-2010.
    Ashrae2010,
    /// ASHRAE 90.1-2013.
    Ashrae2013,
    /// ASHRAE 90.1-2016.
    Ashrae2016,
    /// ASHRAE 90.1-2019.
    Ashrae2019,
    /// ASHRAE 90.1-2019 Appendix G (Performance Rating Method).
    Prm2019,
    /// NREL Zero Net Energy Ready 2017.
    NrelZneReady2017,
    /// National Energy Code of Canada for Buildings 2011.
    Necb2011,
    /// National Energy Code of Canada for Buildings 2015.
    Necb2015,
    /// National Energy Code of Canada for Buildings 2017.
    Necb2017,
}

impl Template {
    /// All templates in canonical order.
    pub fn all() -> &'static [Template] {
        &[
            Self::DoeRefPre1980,
            Self::DoeRef1980To2004,
            Self::Ashrae2004,
            Self::Ashrae2007,
            Self::Ashrae2010,
            Self::Ashrae2013,
            Self::Ashrae2016,
            Self::Ashrae2019,
            Self::Prm2019,
            Self::NrelZneReady2017,
            Self::Necb2011,
            Self::Necb2015,
            Self::Necb2017,
        ]
    }

    /// The name used as the `template` key in standards tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DoeRefPre1980 => "DOE Ref Pre-1980",
            Self::DoeRef1980To2004 => "DOE Ref 1980-2004",
            Self::Ashrae2004 => "90.1-2004",
            Self::Ashrae2007 => "90.1-2007",
            Self::Ashrae2010 => "90.1-2010",
            Self::Ashrae2013 => "90.1-2013",
            Self::Ashrae2016 => "90.1-2016",
            Self::Ashrae2019 => "90.1-2019",
            Self::Prm2019 => "90.1-PRM-2019",
            Self::NrelZneReady2017 => "NREL ZNE Ready 2017",
            Self::Necb2011 => "NECB2011",
            Self::Necb2015 => "NECB2015",
            Self::Necb2017 => "NECB2017",
        }
    }

    /// Whether this is a Canadian (NECB) edition.
    pub fn is_necb(&self) -> bool {
        matches!(self, Self::Necb2011 | Self::Necb2015 | Self::Necb2017)
    }

    /// Whether this is the Appendix G baseline edition.
    pub fn is_prm(&self) -> bool {
        matches!(self, Self::Prm2019)
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Template {
    type Err = PrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PrmError::UnknownTemplate(s.to_string()))
    }
}

impl TryFrom<String> for Template {
    type Error = PrmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Template> for String {
    fn from(value: Template) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_roundtrip() {
        for template in Template::all() {
            let parsed: Template = template.as_str().parse().unwrap_or_else(|e| {
                panic!("Failed to parse {:?}: {e}", template.as_str())
            });
            assert_eq!(*template, parsed);
        }
    }

    #[test]
    fn test_all_unique() {
        let mut seen = std::collections::HashSet::new();
        for t in Template::all() {
            assert!(seen.insert(t.as_str()), "Duplicate template: {t}");
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("90.1-2022".parse::<Template>().is_err());
        assert!("90.1-prm-2019".parse::<Template>().is_err());
        assert!("".parse::<Template>().is_err());
    }

    #[test]
    fn test_classification() {
        assert!(Template::Prm2019.is_prm());
        assert!(!Template::Ashrae2019.is_prm());
        assert!(Template::Necb2015.is_necb());
        assert!(!Template::Ashrae2016.is_necb());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        let json = serde_json::to_string(&Template::Prm2019).unwrap();
        assert_eq!(json, "\"90.1-PRM-2019\"");
        let back: Template = serde_json::from_str("\"90.1-2016\"").unwrap();
        assert_eq!(back, Template::Ashrae2016);
    }
}
