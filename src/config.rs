//! Generator configuration with multi-source merging

use crate::matrix::DigitRange;
use crate::render::OutputFormat;
use anyhow::{anyhow, bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PROJECT_CONFIG_FILE: &str = "zeropoint.toml";
pub const ENV_PREFIX: &str = "ZEROPOINT_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Where `generate` writes artifacts
    pub output_dir: PathBuf,
    pub rows: DigitRange,
    pub cols: DigitRange,
    /// Matrix renderings to write, one file each
    pub formats: Vec<OutputFormat>,
    /// Write docs/index.md and docs/digit-N.md
    pub docs: bool,
    /// Write fixtures/interactions.json
    pub fixtures: bool,
    /// Consciousness level for the fixture session
    pub consciousness: i64,
    /// Listen address for the API server
    pub bind: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output_dir: PathBuf::from("dist"),
            rows: DigitRange::digits(),
            cols: DigitRange::digits(),
            formats: OutputFormat::ALL.to_vec(),
            docs: true,
            fixtures: true,
            consciousness: 1,
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. `ZEROPOINT_*` environment variables
    /// 2. Explicit config path (must exist)
    /// 3. Project file `./zeropoint.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&Path>) -> Result<GeneratorConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(GeneratorConfig::default()));

        let project = PathBuf::from(PROJECT_CONFIG_FILE);
        if project.exists() {
            debug!(path = %project.display(), "Merging project config");
            figment = figment.merge(Toml::file(&project));
        }

        if let Some(path) = config_path {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            debug!(path = %path.display(), "Merging explicit config");
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        Self::extract(figment)
    }

    /// Defaults overlaid with a single TOML file, ignoring cwd and environment
    pub fn from_file(path: &Path) -> Result<GeneratorConfig> {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
        let figment = Figment::new()
            .merge(Serialized::defaults(GeneratorConfig::default()))
            .merge(Toml::file(path));

        Self::extract(figment)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> GeneratorConfig {
        GeneratorConfig::default()
    }

    fn extract(figment: Figment) -> Result<GeneratorConfig> {
        figment
            .extract()
            .map_err(|e| anyhow!("Invalid configuration: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();

        assert_eq!(config.output_dir, PathBuf::from("dist"));
        assert_eq!(config.rows, DigitRange::digits());
        assert_eq!(config.formats.len(), 4);
        assert!(config.docs);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zeropoint.toml");
        fs::write(
            &path,
            r#"
output_dir = "site"
rows = "1-9"
cols = "1..9"
formats = ["md", "csv"]
docs = false
"#,
        )
        .unwrap();

        let config = ConfigLoader::from_file(&path).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("site"));
        assert_eq!(config.rows, DigitRange::manifest());
        assert_eq!(config.cols, DigitRange::manifest());
        assert_eq!(config.formats, vec![OutputFormat::Markdown, OutputFormat::Csv]);
        assert!(!config.docs);
        // untouched keys keep their defaults
        assert!(config.fixtures);
        assert_eq!(config.bind, "0.0.0.0:3000");
    }

    #[test]
    fn test_source_precedence() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                PROJECT_CONFIG_FILE,
                r#"
output_dir = "project"
rows = "1-9"
docs = false
consciousness = 2
"#,
            )?;
            jail.create_file(
                "explicit.toml",
                r#"
output_dir = "explicit"
consciousness = 3
"#,
            )?;

            // project file over defaults
            let config = ConfigLoader::load(None).unwrap();
            assert_eq!(config.output_dir, PathBuf::from("project"));
            assert_eq!(config.rows, DigitRange::manifest());
            assert_eq!(config.consciousness, 2);
            assert!(config.fixtures);

            // explicit file over project file
            let config = ConfigLoader::load(Some(Path::new("explicit.toml"))).unwrap();
            assert_eq!(config.output_dir, PathBuf::from("explicit"));
            assert_eq!(config.consciousness, 3);
            assert_eq!(config.rows, DigitRange::manifest());
            assert!(!config.docs);

            // environment over everything
            jail.set_env("ZEROPOINT_CONSCIOUSNESS", "7");
            jail.set_env("ZEROPOINT_OUTPUT_DIR", "from-env");
            let config = ConfigLoader::load(Some(Path::new("explicit.toml"))).unwrap();
            assert_eq!(config.output_dir, PathBuf::from("from-env"));
            assert_eq!(config.consciousness, 7);
            assert_eq!(config.cols, DigitRange::digits());

            Ok(())
        });
    }

    #[test]
    fn test_invalid_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "rows = \"9..1\"\n").unwrap();

        assert!(ConfigLoader::from_file(&path).is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let missing = Path::new("/definitely/not/here/zeropoint.toml");
        assert!(ConfigLoader::from_file(missing).is_err());
        assert!(ConfigLoader::load(Some(missing)).is_err());
    }
}
