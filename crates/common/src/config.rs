//! Common configuration types for Campus Admin components.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "campus_client=info,common=info";

/// Observability configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log filter directive (same syntax as `RUST_LOG`)
    pub log_filter: String,
    /// Enable JSON-formatted logs
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            json_logs: false,
        }
    }
}

impl ObservabilityConfig {
    /// Build from a variable map. `RUST_LOG` overrides the filter and
    /// `CAMPUS_LOG_JSON=true` switches to JSON output. Unparsable booleans
    /// fall back to plain text.
    #[must_use]
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let log_filter = vars
            .get("RUST_LOG")
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let json_logs = vars
            .get("CAMPUS_LOG_JSON")
            .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1");

        Self {
            log_filter,
            json_logs,
        }
    }
}
