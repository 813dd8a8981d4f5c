//! Engine settings.
//!
//! Everything the fit pass consults at runtime lives here and is passed
//! explicitly into [`Engine::new`](crate::engine::Engine::new); there is no
//! process-global state. The TOML form exists for the diagnostic binary and
//! for toolkits that expose the knobs in their own config files.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub debug: DebugSettings,
    #[serde(default)]
    pub limits: LimitSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct DebugSettings {
    /// Render the cell tree of every successful discovery to the log.
    #[serde(default = "no")]
    pub dump_cells: bool,
    /// Stop after the horizontal pass; the vertical pass is skipped.
    #[serde(default = "no")]
    pub horizontal_only: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LimitSettings {
    /// Hard cap on merge iterations per discovery pass. Valid layouts
    /// resolve in far fewer; the cap only guards malformed geometry.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Consecutive no-progress iterations tolerated before the pass
    /// switches from exact to overlap matching, and then gives up.
    #[serde(default = "default_stall_limit")]
    pub stall_limit: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        LimitSettings {
            max_iterations: default_max_iterations(),
            stall_limit: default_stall_limit(),
        }
    }
}

fn no() -> bool { false }
fn default_max_iterations() -> usize { 100 }
fn default_stall_limit() -> usize { 2 }

impl Settings {
    pub fn from_toml(text: &str) -> anyhow::Result<Settings> {
        toml::from_str(text).context("failed to parse settings")
    }

    pub fn load(path: &Path) -> anyhow::Result<Settings> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(!settings.debug.dump_cells);
        assert!(!settings.debug.horizontal_only);
        assert_eq!(settings.limits.max_iterations, 100);
        assert_eq!(settings.limits.stall_limit, 2);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let settings = Settings::from_toml(
            r#"
            [debug]
            dump_cells = true

            [limits]
            max_iterations = 10
            "#,
        )
        .unwrap();
        assert!(settings.debug.dump_cells);
        assert!(!settings.debug.horizontal_only);
        assert_eq!(settings.limits.max_iterations, 10);
        assert_eq!(settings.limits.stall_limit, 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::from_toml("[debug]\nverbose = true").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[limits]\nstall_limit = 3").unwrap();
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.limits.stall_limit, 3);
    }
}
