//! Matching configuration.

use annoframe_core::{Error, MatchStrategy, Result, SpanComparator, SpanListPolicy};
use serde::{Deserialize, Serialize};

/// Configuration for aligning two annotation sets.
///
/// # Example
///
/// ```rust
/// use annoframe::eval::MatchConfig;
/// use annoframe::{MatchStrategy, SpanListPolicy};
///
/// let config = MatchConfig::new()
///     .with_strategy(MatchStrategy::SharedStart)
///     .with_list_policy(SpanListPolicy::Covering)
///     .with_type_match(false);
///
/// let loaded = MatchConfig::from_json_str(
///     r#"{"strategy": "shared_start", "list_policy": "covering", "require_type_match": false}"#,
/// )
/// .unwrap();
/// assert_eq!(config, loaded);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    /// Span matching strategy (default: strict).
    pub strategy: MatchStrategy,
    /// How the strategy is applied to discontinuous annotations
    /// (default: any pair).
    pub list_policy: SpanListPolicy,
    /// Whether root frame names must be equal (default: true).
    pub require_type_match: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Strict,
            list_policy: SpanListPolicy::AnyPair,
            require_type_match: true,
        }
    }
}

impl MatchConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the span matching strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the span list aggregation policy.
    #[must_use]
    pub fn with_list_policy(mut self, policy: SpanListPolicy) -> Self {
        self.list_policy = policy;
        self
    }

    /// Require (or not) equal root frame names.
    #[must_use]
    pub fn with_type_match(mut self, require: bool) -> Self {
        self.require_type_match = require;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] for malformed JSON, unknown fields or unknown
    /// strategy/policy names.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::parse(format!("match config: {e}")))
    }

    /// Serialize to pretty-printed JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Comparator described by this configuration.
    #[must_use]
    pub fn comparator(&self) -> Box<dyn SpanComparator + Send + Sync> {
        self.strategy.comparator(self.list_policy)
    }
}
