use serde::{Deserialize, Serialize};

use storegraph_query::QueryConfig;
use storegraph_types::StoreDir;

use crate::error::GraphResult;

/// Configuration for a [`GraphLoader`](crate::GraphLoader).
///
/// ```toml
/// store_dir = "/nix/store"
///
/// [query]
/// program = "nix"
/// extra_args = ["--extra-experimental-features", "nix-command"]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub store_dir: StoreDir,
    pub query: QueryConfig,
}

impl LoaderConfig {
    pub fn from_toml_str(text: &str) -> GraphResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Defaults, with the store root taken from `NIX_STORE_DIR` when set.
    pub fn from_env() -> GraphResult<Self> {
        Ok(Self {
            store_dir: StoreDir::from_env()?,
            ..Default::default()
        })
    }
}
