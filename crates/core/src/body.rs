use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Issuing body of a standard. Fixed per adapter, never inferred from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Astm,
    Iec,
    Ieee,
    Tse,
}

impl Body {
    pub const ALL: [Body; 4] = [Body::Astm, Body::Iec, Body::Ieee, Body::Tse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Astm => "astm",
            Self::Iec => "iec",
            Self::Ieee => "ieee",
            Self::Tse => "tse",
        }
    }

    /// Designation prefixes the body puts in front of its numbers, longest first.
    ///
    /// TSE numbers keep their prefix: "TS", "TS EN" and "TS EN ISO" are distinct
    /// families, so stripping them would merge unrelated standards.
    pub fn designation_prefixes(&self) -> &'static [&'static str] {
        match self {
            Self::Astm => &["ASTM"],
            Self::Iec => &["IEC"],
            Self::Ieee => &["IEEE STD", "IEEE"],
            Self::Tse => &[],
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Body {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "astm" => Ok(Self::Astm),
            "iec" => Ok(Self::Iec),
            "ieee" => Ok(Self::Ieee),
            "tse" => Ok(Self::Tse),
            other => Err(format!(
                "unknown body: {other:?} (expected astm, iec, ieee or tse)"
            )),
        }
    }
}
