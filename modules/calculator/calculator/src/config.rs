use serde::{Deserialize, Serialize};

/// Configuration for the calculator module (`modules.calculator`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Entries returned by `GET /history` when no `limit` is given.
    #[serde(default = "default_history_limit")]
    pub default_history_limit: u64,
    /// Larger `limit` values are clamped to this.
    #[serde(default = "default_max_history_limit")]
    pub max_history_limit: u64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            default_history_limit: default_history_limit(),
            max_history_limit: default_max_history_limit(),
        }
    }
}

impl CalculatorConfig {
    /// Check that both limits are positive and consistent.
    ///
    /// # Errors
    /// Returns an error describing the first inconsistent value.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_history_limit == 0 {
            anyhow::bail!("modules.calculator.max_history_limit must be positive");
        }
        if self.default_history_limit == 0 || self.default_history_limit > self.max_history_limit {
            anyhow::bail!(
                "modules.calculator.default_history_limit must be between 1 and {}",
                self.max_history_limit
            );
        }
        Ok(())
    }
}

fn default_history_limit() -> u64 {
    50
}

fn default_max_history_limit() -> u64 {
    100
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = CalculatorConfig::default();
        assert_eq!(cfg.default_history_limit, 50);
        assert_eq!(cfg.max_history_limit, 100);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: CalculatorConfig =
            serde_json::from_value(serde_json::json!({"max_history_limit": 20})).unwrap();
        assert_eq!(cfg.default_history_limit, 50);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_max_is_rejected() {
        let cfg = CalculatorConfig {
            default_history_limit: 1,
            max_history_limit: 0,
        };
        assert!(cfg.validate().is_err());
    }
}
