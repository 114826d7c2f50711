//! Manifest parsing and build orchestration
//!
//! Parses models.toml and converts every listed mesh.
//!
//! ```toml
//! [output]
//! dir = "build/models"
//!
//! [defaults]
//! tangents = true
//!
//! [meshes]
//! crate = "src/crate.obj"
//! level = { path = "src/level.obj", select = ["Floor", "Walls"], colors = false }
//! ```

use anyhow::{Context, Result};
use cmf_common::{Compression, ElementFormat, CMF_EXT};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::mesh::{AttributeSet, ExportOptions, NormalPolicy};

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub defaults: ExportSettings,
    #[serde(default)]
    pub meshes: BTreeMap<String, MeshEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("models/")
}

/// Export switches; unset fields fall back to the next layer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportSettings {
    pub positions: Option<bool>,
    pub texcoords: Option<bool>,
    pub normals: Option<bool>,
    pub tangents: Option<bool>,
    pub colors: Option<bool>,
    pub index: Option<bool>,
    pub normals_mode: Option<NormalPolicy>,
    /// Element format of float arrays ("float" or "double")
    pub float_format: Option<ElementFormat>,
    pub compression: Option<Compression>,
}

impl ExportSettings {
    /// Apply these settings on top of `base`
    pub fn apply(&self, base: &ExportOptions) -> ExportOptions {
        let attributes = AttributeSet {
            positions: self.positions.unwrap_or(base.attributes.positions),
            texcoords: self.texcoords.unwrap_or(base.attributes.texcoords),
            normals: self.normals.unwrap_or(base.attributes.normals),
            tangents: self.tangents.unwrap_or(base.attributes.tangents),
            colors: self.colors.unwrap_or(base.attributes.colors),
        };
        ExportOptions {
            attributes,
            index: self.index.unwrap_or(base.index),
            normals: self.normals_mode.unwrap_or(base.normals),
            float_format: self.float_format.unwrap_or(base.float_format),
            compression: self.compression.unwrap_or(base.compression),
            ..*base
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MeshEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default)]
        select: Vec<String>,
        #[serde(flatten)]
        settings: ExportSettings,
    },
}

impl MeshEntry {
    pub fn path(&self) -> &Path {
        match self {
            MeshEntry::Simple(p) => p,
            MeshEntry::Detailed { path, .. } => path,
        }
    }

    pub fn select(&self) -> &[String] {
        match self {
            MeshEntry::Simple(_) => &[],
            MeshEntry::Detailed { select, .. } => select,
        }
    }

    /// Final options: built-in defaults, then `[defaults]`, then the entry
    pub fn options(&self, defaults: &ExportSettings) -> ExportOptions {
        let base = defaults.apply(&ExportOptions::indexed());
        match self {
            MeshEntry::Simple(_) => base,
            MeshEntry::Detailed { settings, .. } => settings.apply(&base),
        }
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    parse_manifest(&content).with_context(|| format!("Failed to parse manifest: {:?}", path))
}

pub fn parse_manifest(content: &str) -> Result<Manifest> {
    Ok(toml::from_str(content)?)
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    for (name, entry) in &manifest.meshes {
        if !entry.path().exists() {
            anyhow::bail!("Mesh '{}' source not found: {:?}", name, entry.path());
        }
        if !is_obj(entry.path()) {
            anyhow::bail!("Unsupported mesh format for '{}': {:?}", name, entry.path());
        }
    }
    Ok(())
}

fn is_obj(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("obj"))
}

/// Build all meshes from a manifest
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<()> {
    let output_dir = output_override.unwrap_or(&manifest.output.dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    for (name, entry) in &manifest.meshes {
        let output = output_dir.join(format!("{}.{}", name, CMF_EXT));
        tracing::info!("Converting mesh: {} -> {:?}", name, output);

        if !is_obj(entry.path()) {
            anyhow::bail!("Unsupported mesh format for '{}': {:?}", name, entry.path());
        }
        let options = entry.options(&manifest.defaults);
        crate::mesh::convert_obj(entry.path(), &output, &options, entry.select())
            .with_context(|| format!("Failed to convert mesh '{}'", name))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest = parse_manifest(
            r#"
[output]
dir = "out"

[defaults]
tangents = true
float_format = "double"

[meshes]
crate = "crate.obj"
level = { path = "level.obj", select = ["Floor"], colors = false, index = false, normals_mode = "smooth" }
"#,
        )
        .unwrap();

        assert_eq!(manifest.output.dir, PathBuf::from("out"));
        assert_eq!(manifest.meshes.len(), 2);

        let simple = &manifest.meshes["crate"];
        assert_eq!(simple.path(), Path::new("crate.obj"));
        assert!(simple.select().is_empty());
        let options = simple.options(&manifest.defaults);
        assert!(options.index);
        assert!(options.attributes.tangents);
        assert!(options.attributes.colors);
        assert_eq!(options.float_format, ElementFormat::Double);

        let level = &manifest.meshes["level"];
        assert_eq!(level.select(), &["Floor".to_string()]);
        let options = level.options(&manifest.defaults);
        assert!(!options.index);
        assert!(!options.attributes.colors);
        assert!(options.attributes.tangents);
        assert_eq!(options.normals, NormalPolicy::Smooth);
    }

    #[test]
    fn test_reserved_formats_fail_at_build() {
        let dir = tempfile::tempdir().unwrap();
        let obj = dir.path().join("tri.obj");
        std::fs::write(&obj, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        for setting in ["float_format = \"half\"", "compression = \"zstd\""] {
            let content = format!(
                "[defaults]\n{}\n\n[meshes]\ntri = {:?}\n",
                setting,
                obj.to_str().unwrap()
            );
            let manifest = parse_manifest(&content).unwrap();
            let out = dir.path().join("out");
            assert!(build_all(&manifest, Some(&out)).is_err());
            assert!(!out.join("tri.cmf").exists());
        }
    }

    #[test]
    fn test_empty_manifest_defaults() {
        let manifest = parse_manifest("").unwrap();
        assert_eq!(manifest.output.dir, default_output_dir());
        assert!(manifest.meshes.is_empty());
        assert!(validate(&manifest).is_ok());
    }

    #[test]
    fn test_validate_missing_source() {
        let manifest = parse_manifest("[meshes]\nghost = \"does/not/exist.obj\"\n").unwrap();
        assert!(validate(&manifest).is_err());
    }

    #[test]
    fn test_build_all() {
        let dir = tempfile::tempdir().unwrap();
        let obj = dir.path().join("tri.obj");
        std::fs::write(&obj, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let content = format!("[meshes]\ntri = {:?}\n", obj.to_str().unwrap());
        let manifest = parse_manifest(&content).unwrap();
        validate(&manifest).unwrap();

        let out = dir.path().join("out");
        build_all(&manifest, Some(&out)).unwrap();
        assert!(out.join("tri.cmf").exists());
    }
}
