//! Typed pipeline configuration.
//!
//! The CLI and config loader are external; the core accepts this typed
//! value and fails with `ConfigInvalid` when required fields are missing
//! at IR build time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tmc_error::{Error, Result};

/// Project-level configuration for one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub project_name: String,
    /// e.g. `selenium-java`
    pub source_framework: String,
    /// e.g. `playwright`
    pub target_framework: String,
    #[serde(default = "default_architecture")]
    pub architecture_pattern: String,
    #[serde(default)]
    pub supports_parallel: bool,
    /// ISO-8601 creation stamp carried into the project document; the
    /// caller supplies it so repeated builds stay byte-identical.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(default)]
    pub environments: EnvironmentConfig,
    #[serde(default)]
    pub data_sets: Vec<DataSetConfig>,
    #[serde(default)]
    pub source_files: Vec<String>,
}

fn default_architecture() -> String {
    "page-object-model".to_string()
}

impl ProjectConfig {
    /// Minimal configuration for the given project/framework triple.
    pub fn new(
        project_name: impl Into<String>,
        source_framework: impl Into<String>,
        target_framework: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            source_framework: source_framework.into(),
            target_framework: target_framework.into(),
            architecture_pattern: default_architecture(),
            supports_parallel: false,
            created_on: None,
            environments: EnvironmentConfig::default(),
            data_sets: Vec::new(),
            source_files: Vec::new(),
        }
    }

    /// Check the fields stage F cannot proceed without.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("projectName", &self.project_name),
            ("sourceFramework", &self.source_framework),
            ("targetFramework", &self.target_framework),
        ] {
            if value.is_empty() {
                return Err(Error::config_invalid(format!("{field} is required"))
                    .with_operation("config::validate"));
            }
        }
        Ok(())
    }
}

/// Execution-environment settings carried into `environment.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub base_urls: BTreeMap<String, String>,
    #[serde(default = "default_execution_mode")]
    pub execution_mode: String,
    #[serde(default = "default_browsers")]
    pub browsers: Vec<String>,
    #[serde(default)]
    pub timeouts: Timeouts,
    #[serde(default)]
    pub retry_policy: RetryPolicy,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            base_urls: BTreeMap::new(),
            execution_mode: default_execution_mode(),
            browsers: default_browsers(),
            timeouts: Timeouts::default(),
            retry_policy: RetryPolicy::default(),
        }
    }
}

fn default_execution_mode() -> String {
    "local".to_string()
}

fn default_browsers() -> Vec<String> {
    vec!["chromium".to_string()]
}

/// Timeouts in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeouts {
    pub implicit: u64,
    pub explicit: u64,
    pub page_load: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            implicit: 5_000,
            explicit: 10_000,
            page_load: 30_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    pub enabled: bool,
    pub max_retries: u32,
}

/// A configured data set and the tests bound to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSetConfig {
    pub name: String,
    #[serde(rename = "type", default = "default_data_type")]
    pub kind: String,
    #[serde(default)]
    pub records: Vec<BTreeMap<String, Value>>,
    /// Names of tests that iterate over this set.
    #[serde(default)]
    pub tests: Vec<String>,
    #[serde(default = "default_iteration_strategy")]
    pub iteration_strategy: String,
}

fn default_data_type() -> String {
    "inline".to_string()
}

fn default_iteration_strategy() -> String {
    "sequential".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_core_fields() {
        let config = ProjectConfig::new("shop-checkout", "selenium-java", "playwright");
        assert!(config.validate().is_ok());

        let mut missing = config.clone();
        missing.project_name.clear();
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::new("p", "selenium-java", "cypress");
        assert_eq!(config.architecture_pattern, "page-object-model");
        assert_eq!(config.environments.execution_mode, "local");
        assert_eq!(config.environments.timeouts.page_load, 30_000);
        assert!(!config.environments.retry_policy.enabled);
    }

    #[test]
    fn test_config_from_json_camel_case() {
        let json = r#"{
            "projectName": "shop",
            "sourceFramework": "selenium-java",
            "targetFramework": "playwright",
            "supportsParallel": true,
            "environments": {
                "baseUrls": {"dev": "https://dev.shop.example"},
                "timeouts": {"implicit": 1000, "explicit": 2000, "pageLoad": 3000}
            },
            "dataSets": [
                {"name": "users", "records": [{"email": "a@b.c"}], "tests": ["testLogin"]}
            ]
        }"#;
        let config: ProjectConfig = serde_json::from_str(json).unwrap();
        assert!(config.supports_parallel);
        assert_eq!(config.environments.timeouts.page_load, 3000);
        assert_eq!(config.data_sets[0].kind, "inline");
        assert_eq!(config.data_sets[0].iteration_strategy, "sequential");
    }
}
