//! Experimental conditions attached to every sample

use serde::{Deserialize, Serialize};
use std::fmt;

/// Experimental condition of a wing disc or landmark specimen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Standard,
    Hypoxia,
    Cold,
}

impl Condition {
    /// All conditions in legend order
    pub const ALL: [Condition; 3] = [Condition::Standard, Condition::Hypoxia, Condition::Cold];

    /// Normalize a raw label from one of the input tables.
    ///
    /// The preparation pipeline writes conditions in several spellings
    /// (`standard`, `Hypoxia`, `17C`, `lowtemp`, ...). Anything that is not
    /// recognized as hypoxia or cold is treated as the standard condition.
    pub fn from_label(raw: &str) -> Self {
        let label = raw.trim().to_lowercase();
        if label.contains("hypo") {
            Condition::Hypoxia
        } else if label.contains("cold") || label.contains("17c") || label.contains("low") {
            Condition::Cold
        } else {
            Condition::Standard
        }
    }

    /// Short label used by the morphometry and landmark views
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Standard => "standard",
            Condition::Hypoxia => "hypoxia",
            Condition::Cold => "cold",
        }
    }

    /// Label used by the gradient profile view
    pub fn profile_label(&self) -> &'static str {
        match self {
            Condition::Standard => "Normoxia",
            Condition::Hypoxia => "Hypoxia",
            Condition::Cold => "LowTemp",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
