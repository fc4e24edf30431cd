//! Decimal separator handling.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Which character separates the integer and fractional part of a number.
///
/// Instrument and solver exports written under a European locale use a
/// comma (`1,5`); everything else uses a period (`1.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalConvention {
    #[default]
    #[serde(alias = ".", alias = "dot")]
    Period,
    #[serde(alias = ",")]
    Comma,
}

impl DecimalConvention {
    /// Rewrite a token into period notation.
    pub fn normalize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        match self {
            Self::Comma if token.contains(',') => Cow::Owned(token.replace(',', ".")),
            _ => Cow::Borrowed(token),
        }
    }

    /// Parse a single field under this convention.
    pub fn parse_field(&self, token: &str) -> Option<f64> {
        self.normalize(token).parse::<f64>().ok()
    }

    /// The separator character.
    pub fn separator(&self) -> char {
        match self {
            Self::Period => '.',
            Self::Comma => ',',
        }
    }
}

impl FromStr for DecimalConvention {
    type Err = String;

    /// Parse from string (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "period" | "dot" | "." => Ok(Self::Period),
            "comma" | "," => Ok(Self::Comma),
            other => Err(format!(
                "unknown decimal convention '{}', expected 'period' or 'comma'",
                other
            )),
        }
    }
}

impl fmt::Display for DecimalConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Period => write!(f, "period"),
            Self::Comma => write!(f, "comma"),
        }
    }
}
