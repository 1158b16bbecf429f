//! Access protection levels

use crate::errors::{Result, TokenError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access Protection Level declared by a native process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Apl {
    /// Ordinary service
    Normal,
    /// Basic system service
    SystemBasic,
    /// Core system service
    SystemCore,
}

impl Apl {
    /// Numeric level as persisted in the `APL` field
    pub fn level(self) -> i64 {
        match self {
            Apl::Normal => 1,
            Apl::SystemBasic => 2,
            Apl::SystemCore => 3,
        }
    }

    /// Canonical request string
    pub fn as_str(self) -> &'static str {
        match self {
            Apl::Normal => "normal",
            Apl::SystemBasic => "system_basic",
            Apl::SystemCore => "system_core",
        }
    }
}

impl TryFrom<i64> for Apl {
    type Error = TokenError;

    fn try_from(level: i64) -> Result<Self> {
        match level {
            1 => Ok(Apl::Normal),
            2 => Ok(Apl::SystemBasic),
            3 => Ok(Apl::SystemCore),
            other => Err(TokenError::malformed(format!("APL {other} out of range"))),
        }
    }
}

impl From<Apl> for i64 {
    fn from(apl: Apl) -> Self {
        apl.level()
    }
}

impl FromStr for Apl {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "system_core" => Ok(Apl::SystemCore),
            "system_basic" => Ok(Apl::SystemBasic),
            "normal" => Ok(Apl::Normal),
            other => Err(TokenError::invalid_request(format!(
                "unknown aplStr {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Apl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
