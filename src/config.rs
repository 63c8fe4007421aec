use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine::score::Weights;
use crate::extract::classify::ClassifyConfig;

/// Name of the configuration file looked up at the project root.
pub const CONFIG_FILE_NAME: &str = "migration-graph.toml";

/// Database location used when neither the config nor the command line sets one.
pub const DEFAULT_DATABASE: &str = ".migration-graph/db.sqlite";

/// Copy command emitted per file by `copy` when no template is configured.
pub const DEFAULT_COPY_TEMPLATE: &str = "cp [[from]] [[to]]";

/// Configuration loaded from `migration-graph.toml` at the project root.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct MigrationGraphConfig {
    /// Additional path patterns to exclude from discovery (beyond .gitignore and node_modules).
    pub exclude: Option<Vec<String>>,
    /// SQLite database path, relative to the project root unless absolute.
    pub database: Option<PathBuf>,
    /// Shell template for `copy`, with `[[from]]` and `[[to]]` placeholders.
    pub copy_template: Option<String>,
    pub weights: Weights,
    pub classify: ClassifyConfig,
}

impl MigrationGraphConfig {
    /// Load configuration from `migration-graph.toml` in the given root directory.
    ///
    /// Returns a default configuration if the file does not exist or cannot be parsed.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(%err, "failed to parse {CONFIG_FILE_NAME}, using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                tracing::warn!(%err, "failed to read {CONFIG_FILE_NAME}, using defaults");
                Self::default()
            }
        }
    }

    /// Resolved database path: `override_path`, then `database`, then the default,
    /// with relative paths anchored at `root`.
    pub fn database_path(&self, root: &Path, override_path: Option<&Path>) -> PathBuf {
        let path = override_path
            .map(Path::to_path_buf)
            .or_else(|| self.database.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));
        if path.is_absolute() {
            path
        } else {
            root.join(path)
        }
    }

    pub fn copy_template(&self) -> &str {
        self.copy_template.as_deref().unwrap_or(DEFAULT_COPY_TEMPLATE)
    }
}
