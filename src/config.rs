use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How a comparison operator is located inside a WHERE/ON condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorMatching {
    /// Leftmost operator outside quotes, two-character operators first
    #[default]
    Longest,
    /// First operator of `=, >, <, >=, <=, !=` found anywhere in the text.
    /// `a >= 1` splits as column `a >` and literal `1`.
    Legacy,
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub operator_matching: OperatorMatching,
    /// CREATE TABLE on an existing name replaces it instead of failing
    pub replace_existing_tables: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            operator_matching: OperatorMatching::Longest,
            replace_existing_tables: true,
        }
    }
}

impl Config {
    /// Loads a config from JSON; missing fields keep their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, OperatorMatching};
    use crate::error::{Error, Result};

    #[test]
    fn test_config_defaults() -> Result<()> {
        let config = Config::from_json("{}")?;
        assert_eq!(config, Config::default());
        assert_eq!(config.operator_matching, OperatorMatching::Longest);
        assert!(config.replace_existing_tables);
        Ok(())
    }

    #[test]
    fn test_config_from_json() -> Result<()> {
        let config = Config::from_json(
            r#"{ "operator_matching": "legacy", "replace_existing_tables": false }"#,
        )?;
        assert_eq!(config.operator_matching, OperatorMatching::Legacy);
        assert!(!config.replace_existing_tables);

        assert!(matches!(
            Config::from_json(r#"{ "operator_matching": "fuzzy" }"#),
            Err(Error::Config(_))
        ));
        Ok(())
    }
}
