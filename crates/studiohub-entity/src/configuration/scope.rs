//! Configuration override scopes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four scopes a configuration override can be stored at.
///
/// Scopes are ordered by precedence: Organization < Headquarters <
/// Activity < Session. Later scopes win during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "config_scope", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConfigScope {
    /// Tenant-wide defaults.
    Organization,
    /// Per-gym overrides.
    Headquarters,
    /// Per-activity overrides.
    Activity,
    /// Per-session overrides.
    Session,
}

impl ConfigScope {
    /// Return the scope as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Headquarters => "headquarters",
            Self::Activity => "activity",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConfigScope {
    type Err = studiohub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "organization" => Ok(Self::Organization),
            "headquarters" => Ok(Self::Headquarters),
            "activity" => Ok(Self::Activity),
            "session" => Ok(Self::Session),
            _ => Err(studiohub_core::AppError::validation(format!(
                "Invalid config scope: '{s}'. Expected one of: organization, headquarters, activity, session"
            ))),
        }
    }
}
