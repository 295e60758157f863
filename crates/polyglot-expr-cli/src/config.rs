//! Configuration system for pgx.
//!
//! Loads config from:
//! 1. Global: ~/.config/pgx/config.toml
//! 2. Per-project: .pgx/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [transpile]
//! target = "c"
//!
//! [c]
//! prefix = "ui"
//! hint = "click"
//! ```

use polyglot_expr::Target;
use polyglot_expr::registry::DEFAULT_PREFIX;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Transpile defaults.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TranspileConfig {
    /// Target used when `--target` is not given.
    pub target: Option<Target>,
}

/// C target settings.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CConfig {
    /// Prefix for generated arrow function names.
    pub prefix: Option<String>,
    /// Context hint used when `--hint` is not given.
    pub hint: Option<String>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PgxConfig {
    pub transpile: TranspileConfig,
    pub c: CConfig,
}

impl PgxConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/pgx/config.toml,
    /// then merges with per-project config from .pgx/config.toml.
    pub fn load(root: &Path) -> Self {
        Self::load_from(Self::global_config_path().as_deref(), root)
    }

    /// Load with an explicit global config path.
    pub fn load_from(global: Option<&Path>, root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global) = global.and_then(Self::load_file) {
            config = config.merge(global);
        }

        // Per-project config overrides global
        let project_path = root.join(".pgx").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    pub fn target(&self) -> Target {
        self.transpile.target.unwrap_or(Target::Lua)
    }

    pub fn prefix(&self) -> &str {
        self.c.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }

    pub fn hint(&self) -> Option<&str> {
        self.c.hint.as_deref()
    }

    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("pgx").join("config.toml"))
    }

    /// Missing files are skipped silently; malformed ones with a warning.
    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring malformed config");
                None
            }
        }
    }

    /// Values set in `other` take precedence.
    fn merge(self, other: Self) -> Self {
        Self {
            transpile: TranspileConfig {
                target: other.transpile.target.or(self.transpile.target),
            },
            c: CConfig {
                prefix: other.c.prefix.or(self.c.prefix),
                hint: other.c.hint.or(self.c.hint),
            },
        }
    }
}
