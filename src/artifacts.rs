// 📦 Artifact Generation - Write every rendering, then a checksummed manifest
//
// Layout under the output directory:
//   matrix.{md,json,csv,txt}     one per configured format
//   UNIVERSE.md, universe.json
//   docs/index.md, docs/digit-N.md
//   fixtures/interactions.json
//   manifest.json                paths, sizes and SHA-256 of everything above

use crate::config::GeneratorConfig;
use crate::docs;
use crate::gateway::GatewayClassifier;
use crate::interaction::vortex_session;
use crate::matrix::HarmonicMatrix;
use crate::render::render;
use crate::universe::Universe;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

pub const MANIFEST_FILE: &str = "manifest.json";

// ============================================================================
// MANIFEST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Relative to the output directory, `/`-separated
    pub path: String,
    pub bytes: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub generation_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub artifacts: Vec<Artifact>,
}

impl Manifest {
    pub fn find(&self, path: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.path == path)
    }

    pub fn total_bytes(&self) -> u64 {
        self.artifacts.iter().map(|a| a.bytes).sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "Generation {}: {} artifacts, {} bytes",
            self.generation_id,
            self.artifacts.len(),
            self.total_bytes()
        )
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// WRITER
// ============================================================================

pub struct ArtifactWriter {
    root: PathBuf,
    artifacts: Vec<Artifact>,
}

impl ArtifactWriter {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create output directory: {:?}", root))?;

        Ok(ArtifactWriter {
            root,
            artifacts: Vec::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one file and record it for the manifest
    pub fn write(&mut self, relative: &str, content: &str) -> Result<&Artifact> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write artifact: {:?}", path))?;

        let artifact = Artifact {
            path: relative.to_string(),
            bytes: content.len() as u64,
            sha256: sha256_hex(content.as_bytes()),
        };
        info!(path = %artifact.path, bytes = artifact.bytes, "Wrote artifact");

        self.artifacts.push(artifact);
        Ok(&self.artifacts[self.artifacts.len() - 1])
    }

    /// Write manifest.json. The manifest does not list itself.
    pub fn finish(self, generation_id: Uuid, generated_at: DateTime<Utc>) -> Result<Manifest> {
        let manifest = Manifest {
            generation_id,
            generated_at,
            version: crate::VERSION.to_string(),
            artifacts: self.artifacts,
        };

        let json = serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        let path = self.root.join(MANIFEST_FILE);
        fs::write(&path, json).with_context(|| format!("Failed to write manifest: {:?}", path))?;

        info!("{}", manifest.summary());
        Ok(manifest)
    }
}

// ============================================================================
// GENERATION
// ============================================================================

/// Build the matrix from `config` and write every artifact under `config.output_dir`
pub fn generate(config: &GeneratorConfig) -> Result<Manifest> {
    let matrix = HarmonicMatrix::build(config.rows, config.cols, &GatewayClassifier::new());
    let generation_id = Uuid::new_v4();
    let generated_at = Utc::now();

    info!(
        output_dir = %config.output_dir.display(),
        generation_id = %generation_id,
        "Generating artifacts"
    );

    let mut writer = ArtifactWriter::new(&config.output_dir)?;

    let mut seen = HashSet::new();
    for format in &config.formats {
        if !seen.insert(*format) {
            continue;
        }
        let content = render(&matrix, *format)?;
        writer.write(&format!("matrix.{}", format.extension()), &content)?;
    }

    let universe = Universe::new(&matrix, generation_id, generated_at);
    writer.write("UNIVERSE.md", &universe.to_markdown()?)?;
    writer.write("universe.json", &universe.to_json()?)?;

    if config.docs {
        for page in docs::pages(&matrix)? {
            writer.write(&page.path, &page.content)?;
        }
    }

    if config.fixtures {
        let log = vortex_session(config.consciousness);
        writer.write("fixtures/interactions.json", &log.to_json()?)?;
    }

    writer.finish(generation_id, generated_at)
}

pub fn load_manifest<P: AsRef<Path>>(dir: P) -> Result<Manifest> {
    let path = dir.as_ref().join(MANIFEST_FILE);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    serde_json::from_str(&content).context("Failed to parse manifest JSON")
}

/// True when `path` stays inside the directory it is joined onto
fn is_contained(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Re-hash every listed artifact. Returns the paths that are missing, changed,
/// or point outside `dir`; the latter are never read.
pub fn verify<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    let manifest = load_manifest(dir)?;
    let mut mismatched = Vec::new();

    for artifact in &manifest.artifacts {
        if !is_contained(&artifact.path) {
            warn!(path = %artifact.path, "Artifact path escapes the output directory");
            mismatched.push(artifact.path.clone());
            continue;
        }
        match fs::read(dir.join(&artifact.path)) {
            Ok(bytes) if sha256_hex(&bytes) == artifact.sha256 => {}
            Ok(_) => {
                warn!(path = %artifact.path, "Checksum mismatch");
                mismatched.push(artifact.path.clone());
            }
            Err(e) => {
                warn!(path = %artifact.path, error = %e, "Artifact missing");
                mismatched.push(artifact.path.clone());
            }
        }
    }

    Ok(mismatched)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DigitRange;
    use crate::render::OutputFormat;

    fn config_in(dir: &Path) -> GeneratorConfig {
        GeneratorConfig {
            output_dir: dir.to_path_buf(),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_generate_writes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = generate(&config_in(dir.path())).unwrap();

        // 4 matrices + 2 universe files + 11 docs + 1 fixture
        assert_eq!(manifest.artifacts.len(), 18);
        for path in ["matrix.md", "matrix.csv", "UNIVERSE.md", "docs/digit-9.md", "fixtures/interactions.json"] {
            assert!(manifest.find(path).is_some(), "missing {}", path);
            assert!(dir.path().join(path).exists());
        }
        assert!(dir.path().join(MANIFEST_FILE).exists());
    }

    #[test]
    fn test_manifest_digests_match_files() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = generate(&config_in(dir.path())).unwrap();

        for artifact in &manifest.artifacts {
            let bytes = fs::read(dir.path().join(&artifact.path)).unwrap();
            assert_eq!(bytes.len() as u64, artifact.bytes);
            assert_eq!(sha256_hex(&bytes), artifact.sha256);
        }

        let loaded = load_manifest(dir.path()).unwrap();
        assert_eq!(loaded.generation_id, manifest.generation_id);
        assert!(verify(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_verify_reports_tampering() {
        let dir = tempfile::tempdir().unwrap();
        generate(&config_in(dir.path())).unwrap();

        fs::write(dir.path().join("matrix.txt"), "tampered").unwrap();
        fs::remove_file(dir.path().join("universe.json")).unwrap();

        let mut bad = verify(dir.path()).unwrap();
        bad.sort();
        assert_eq!(bad, vec!["matrix.txt".to_string(), "universe.json".to_string()]);
    }

    #[test]
    fn test_verify_rejects_paths_outside_dir() {
        let outer = tempfile::tempdir().unwrap();
        let secret = outer.path().join("secret.txt");
        fs::write(&secret, "outside").unwrap();

        let dir = outer.path().join("dist");
        let mut writer = ArtifactWriter::new(&dir).unwrap();
        writer.write("matrix.txt", "inside").unwrap();
        let mut manifest = writer.finish(Uuid::new_v4(), Utc::now()).unwrap();

        let digest = sha256_hex(b"outside");
        for path in ["../secret.txt", secret.to_str().unwrap()] {
            manifest.artifacts.push(Artifact {
                path: path.to_string(),
                bytes: 7,
                sha256: digest.clone(),
            });
        }
        fs::write(dir.join(MANIFEST_FILE), serde_json::to_string(&manifest).unwrap()).unwrap();

        let bad = verify(&dir).unwrap();
        assert_eq!(bad, vec!["../secret.txt".to_string(), secret.to_str().unwrap().to_string()]);
    }

    #[test]
    fn test_contained_paths() {
        assert!(is_contained("matrix.md"));
        assert!(is_contained("docs/digit-3.md"));
        assert!(is_contained("./fixtures/interactions.json"));

        assert!(!is_contained(""));
        assert!(!is_contained("../secret.txt"));
        assert!(!is_contained("docs/../../secret.txt"));
        assert!(!is_contained("/etc/passwd"));
    }

    #[test]
    fn test_optional_outputs_and_duplicate_formats() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            output_dir: dir.path().join("nested/out"),
            rows: DigitRange::manifest(),
            cols: DigitRange::manifest(),
            formats: vec![OutputFormat::Json, OutputFormat::Json],
            docs: false,
            fixtures: false,
            ..GeneratorConfig::default()
        };

        let manifest = generate(&config).unwrap();
        let paths: Vec<&str> = manifest.artifacts.iter().map(|a| a.path.as_str()).collect();

        assert_eq!(paths, vec!["matrix.json", "UNIVERSE.md", "universe.json"]);

        let json = fs::read_to_string(dir.path().join("nested/out/matrix.json")).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 81);
    }

    #[test]
    fn test_missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_manifest(dir.path()).is_err());
        assert!(verify(dir.path()).is_err());
    }
}
