//! Device family profiles: prompt and pagination patterns per vendor.
//!
//! A profile is plain data, serde-compatible so pattern sets can live in
//! inventory files. The builtin table is constructed fresh on each lookup;
//! there is no process-wide mutable registry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::channel::{DEFAULT_PAGING_PATTERNS, DEFAULT_PROMPT_PATTERN};

/// Prompt and pagination patterns for one device family.
///
/// Feed a profile to [`Executor::from_profile`](crate::Executor::from_profile)
/// to get an executor tuned for that family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Family name (e.g. "cisco_ios", "juniper_junos").
    pub name: String,

    /// Regex for the idle device prompt. An end-of-line anchor is added
    /// at compile time if missing.
    pub prompt_pattern: String,

    /// Pagination prompts in priority order.
    pub paging_patterns: Vec<String>,
}

impl DeviceProfile {
    /// Create a profile with the generic defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt_pattern: DEFAULT_PROMPT_PATTERN.to_string(),
            paging_patterns: DEFAULT_PAGING_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Set the prompt pattern.
    pub fn with_prompt_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.prompt_pattern = pattern.into();
        self
    }

    /// Replace the pagination pattern list.
    pub fn with_paging_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paging_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Look up a builtin profile by family name.
    pub fn builtin(name: &str) -> Option<DeviceProfile> {
        Self::builtins().get(name).cloned()
    }

    /// All builtin profiles, keyed by family name in definition order.
    pub fn builtins() -> IndexMap<String, DeviceProfile> {
        let profiles = [
            DeviceProfile::new("generic"),
            DeviceProfile::new("cisco_ios")
                .with_prompt_pattern(r"[\w.-]+[#>]\s*$")
                .with_paging_patterns([r"--More--"]),
            DeviceProfile::new("juniper_junos")
                .with_prompt_pattern(r"[\w.@-]+[%>#]\s*$")
                .with_paging_patterns([r"---\(more( \d+%)?\)---"]),
            DeviceProfile::new("hp_procurve")
                .with_paging_patterns([r"-- MORE --", r"Press any key to continue"]),
            DeviceProfile::new("linux")
                .with_prompt_pattern(r"[$#]\s*$")
                .with_paging_patterns(Vec::<String>::new()),
        ];

        profiles
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect()
    }
}
