use serde::{Deserialize, Serialize};

use crate::error::QueryResult;

/// Configuration for the `nix path-info` backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Program to run. Looked up on `PATH` unless absolute.
    pub program: String,
    /// Arguments inserted before the `path-info` subcommand.
    pub extra_args: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            program: "nix".into(),
            extra_args: vec![
                "--extra-experimental-features".into(),
                "nix-command".into(),
            ],
        }
    }
}

impl QueryConfig {
    /// Parse a config, filling absent keys from [`Default`].
    pub fn from_toml_str(text: &str) -> QueryResult<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    #[test]
    fn default_config() {
        let c = QueryConfig::default();
        assert_eq!(c.program, "nix");
        assert_eq!(c.extra_args, ["--extra-experimental-features", "nix-command"]);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = QueryConfig::from_toml_str("program = \"/run/current-system/sw/bin/nix\"").unwrap();
        assert_eq!(c.program, "/run/current-system/sw/bin/nix");
        assert_eq!(c.extra_args, QueryConfig::default().extra_args);
    }

    #[test]
    fn from_toml_str_reads_every_key() {
        let c = QueryConfig::from_toml_str(
            "program = \"nix\"\nextra_args = [\"--store\", \"daemon\"]",
        )
        .unwrap();
        assert_eq!(c.extra_args, ["--store", "daemon"]);
    }

    #[test]
    fn from_toml_str_rejects_bad_input() {
        let err = QueryConfig::from_toml_str("extra_args = \"not-a-list\"").unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));
        assert!(QueryConfig::from_toml_str("program = ").is_err());
    }
}
