//! CLI configuration.
//!
//! Sources, lowest precedence first:
//! 1. defaults in code
//! 2. optional `procura.toml` (or the file named by `--config`)
//! 3. `PROCURA__*` environment variables, e.g. `PROCURA__LOG__FORMAT=json`

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use procura_observability::LogSettings;
use procura_pricing::RankingCriterion;

#[derive(Debug, Clone, Deserialize)]
pub struct ProcuraConfig {
    #[serde(default)]
    pub log: LogSettings,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Criterion for best-offer queries when none is given on the command line.
    #[serde(default = "default_criteria")]
    pub default_criteria: String,
}

fn default_criteria() -> String {
    RankingCriterion::default().as_str().to_string()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_criteria: default_criteria(),
        }
    }
}

impl PricingConfig {
    pub fn default_criterion(&self) -> RankingCriterion {
        RankingCriterion::parse_lenient(&self.default_criteria)
    }
}

impl ProcuraConfig {
    /// Load from `file` (without extension, optional) and the environment.
    pub fn load(file: &str) -> Result<Self, ConfigError> {
        Self::load_with_env(file, Environment::with_prefix("PROCURA"))
    }

    fn load_with_env(file: &str, env: Environment) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?
            .set_default("pricing.default_criteria", default_criteria())?
            .add_source(File::with_name(file).required(false))
            .add_source(env.separator("__").try_parsing(true))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procura_observability::LogFormat;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("PROCURA").source(Some(source))
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let config = ProcuraConfig::load_with_env("does-not-exist", env(&[])).unwrap();

        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.pricing.default_criterion(), RankingCriterion::Priority);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ProcuraConfig::load_with_env(
            "does-not-exist",
            env(&[
                ("PROCURA__LOG__FORMAT", "json"),
                ("PROCURA__PRICING__DEFAULT_CRITERIA", "price"),
            ]),
        )
        .unwrap();

        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.pricing.default_criterion(), RankingCriterion::Price);
    }

    #[test]
    fn unknown_criteria_falls_back_to_priority() {
        let pricing = PricingConfig {
            default_criteria: "cheapest".to_string(),
        };
        assert_eq!(pricing.default_criterion(), RankingCriterion::Priority);
    }
}
