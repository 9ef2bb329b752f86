// src/core/backend.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two independent services this client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Transactional REST API: jobs, organizations, applications, notifications.
    Primary,
    /// Recommendations, resume analysis, analytics and user records.
    Ai,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Primary => "primary",
            Backend::Ai => "ai",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
