//! # Climate Zone — ASHRAE 169 Classification
//!
//! Parses and classifies ASHRAE 169 climate zone designations. Nearly every
//! standards lookup is keyed on the climate zone, and several rules branch on
//! the thermal number (0 through 8) or the moisture regime (A, B, C).
//!
//! ## Design
//!
//! The canonical string form is `"ASHRAE 169-<edition>-<code>"`, for example
//! `"ASHRAE 169-2013-5A"`. Both the 2006 and 2013 editions share the same
//! zone codes; rule decisions depend only on the code, while table lookups
//! use the full designation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PrmError;

/// Edition of ASHRAE Standard 169 the designation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClimateZoneSet {
    /// ASHRAE 169-2006.
    Ashrae169_2006,
    /// ASHRAE 169-2013.
    Ashrae169_2013,
}

impl ClimateZoneSet {
    /// The edition year as used in the canonical designation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ashrae169_2006 => "2006",
            Self::Ashrae169_2013 => "2013",
        }
    }
}

/// Moisture regime of a climate zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Moisture {
    /// Moist.
    A,
    /// Dry.
    B,
    /// Marine.
    C,
}

impl Moisture {
    /// Single-letter code.
    pub fn as_char(&self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
        }
    }
}

/// Every zone code recognized by the standards tables, in canonical order.
const ZONE_CODES: &[(u8, Moisture)] = &[
    (0, Moisture::A),
    (0, Moisture::B),
    (1, Moisture::A),
    (1, Moisture::B),
    (2, Moisture::A),
    (2, Moisture::B),
    (3, Moisture::A),
    (3, Moisture::B),
    (3, Moisture::C),
    (4, Moisture::A),
    (4, Moisture::B),
    (4, Moisture::C),
    (5, Moisture::A),
    (5, Moisture::B),
    (5, Moisture::C),
    (6, Moisture::A),
    (6, Moisture::B),
    (7, Moisture::A),
    (7, Moisture::B),
    (8, Moisture::A),
    (8, Moisture::B),
];

/// A parsed ASHRAE 169 climate zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClimateZone {
    set: ClimateZoneSet,
    number: u8,
    moisture: Moisture,
}

impl ClimateZone {
    const PREFIX: &'static str = "ASHRAE 169-";

    /// Build a climate zone from its edition and short code (`"5A"`).
    pub fn from_code(set: ClimateZoneSet, code: &str) -> Result<Self, PrmError> {
        let invalid = |reason: &str| PrmError::InvalidClimateZone {
            input: code.to_string(),
            reason: reason.to_string(),
        };
        let mut chars = code.trim().chars();
        let number = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .ok_or_else(|| invalid("missing thermal zone number"))? as u8;
        let moisture = match chars.next() {
            Some('A') => Moisture::A,
            Some('B') => Moisture::B,
            Some('C') => Moisture::C,
            _ => return Err(invalid("missing moisture regime")),
        };
        if chars.next().is_some() {
            return Err(invalid("trailing characters"));
        }
        if !ZONE_CODES.contains(&(number, moisture)) {
            return Err(invalid("zone code is not defined by ASHRAE 169"));
        }
        Ok(Self {
            set,
            number,
            moisture,
        })
    }

    /// All zones of one edition, in canonical order.
    pub fn all(set: ClimateZoneSet) -> Vec<ClimateZone> {
        ZONE_CODES
            .iter()
            .map(|&(number, moisture)| Self {
                set,
                number,
                moisture,
            })
            .collect()
    }

    /// The ASHRAE 169 edition.
    pub fn set(&self) -> ClimateZoneSet {
        self.set
    }

    /// Thermal zone number, 0 (extremely hot) through 8 (subarctic).
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Moisture regime.
    pub fn moisture(&self) -> Moisture {
        self.moisture
    }

    /// Short code such as `"5A"`.
    pub fn code(&self) -> String {
        format!("{}{}", self.number, self.moisture.as_char())
    }

    /// Whether the short code is one of `codes`.
    pub fn is_one_of(&self, codes: &[&str]) -> bool {
        let code = self.code();
        codes.iter().any(|c| *c == code)
    }
}

impl fmt::Display for ClimateZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}-{}{}",
            Self::PREFIX,
            self.set.as_str(),
            self.number,
            self.moisture.as_char()
        )
    }
}

impl FromStr for ClimateZone {
    type Err = PrmError;

    /// Parse `"ASHRAE 169-2006-5A"` or `"ASHRAE 169-2013-5A"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| PrmError::InvalidClimateZone {
                input: s.to_string(),
                reason: "expected an \"ASHRAE 169-\" designation".to_string(),
            })?;
        let (edition, code) = rest
            .split_once('-')
            .ok_or_else(|| PrmError::InvalidClimateZone {
                input: s.to_string(),
                reason: "missing edition separator".to_string(),
            })?;
        let set = match edition {
            "2006" => ClimateZoneSet::Ashrae169_2006,
            "2013" => ClimateZoneSet::Ashrae169_2013,
            other => {
                return Err(PrmError::InvalidClimateZone {
                    input: s.to_string(),
                    reason: format!("unsupported ASHRAE 169 edition {other:?}"),
                })
            }
        };
        Self::from_code(set, code).map_err(|_| PrmError::InvalidClimateZone {
            input: s.to_string(),
            reason: format!("unknown zone code {code:?}"),
        })
    }
}

impl TryFrom<String> for ClimateZone {
    type Error = PrmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClimateZone> for String {
    fn from(value: ClimateZone) -> Self {
        value.to_string()
    }
}
