//! Scene to container conversion

use anyhow::{Context, Result};
use std::path::Path;

use super::collect::collect;
use super::obj::load_obj;
use super::types::ExportOptions;
use crate::formats::{write_cmf_file, CmfContainer};
use crate::scene::{ExportScope, GeometrySource};

/// Convert any geometry source to an in-memory container
pub fn convert_to_memory<G>(source: &G, options: &ExportOptions) -> Result<CmfContainer>
where
    G: GeometrySource + ?Sized,
{
    let mesh = collect(source, options).context("Failed to collect vertices")?;
    if mesh.corner_count() == 0 {
        tracing::warn!("No triangles in export scope, writing an empty container");
    }
    let container = CmfContainer::build(&mesh, options).context("Failed to encode mesh")?;
    Ok(container)
}

/// Convert an OBJ file to a CMF file
///
/// A non-empty `select` restricts the export to the named objects.
pub fn convert_obj(
    input: &Path,
    output: &Path,
    options: &ExportOptions,
    select: &[String],
) -> Result<CmfContainer> {
    let mut scene =
        load_obj(input).with_context(|| format!("Failed to load OBJ: {:?}", input))?;

    let mut options = *options;
    if !select.is_empty() {
        for name in scene.select(select) {
            tracing::warn!("Selected object '{}' not found in {:?}", name, input);
        }
        options.scope = ExportScope::Selected;
    }

    let container = convert_to_memory(&scene, &options)?;
    write_cmf_file(output, &container)
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    tracing::info!(
        "Converted mesh: {} objects, {} vertices, {} arrays, index format={}, {} bytes",
        scene.objects.len(),
        container.num_vertices(),
        container.arrays().len(),
        container
            .index_format()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "none".to_string()),
        container.filesize()
    );

    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{ArrayType, CmfHeader, ElementFormat};

    const TWO_OBJECTS: &str = "\
o Left
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
o Right
v 5 0 0
v 6 0 0
v 6 1 0
f 5 6 7
";

    #[test]
    fn test_convert_obj_indexed() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scene.obj");
        let output = dir.path().join("scene.cmf");
        std::fs::write(&input, TWO_OBJECTS).unwrap();

        let container = convert_obj(&input, &output, &ExportOptions::indexed(), &[]).unwrap();
        // Quad shares 2 corners; the triangle adds 3
        assert_eq!(container.num_vertices(), 7);
        assert_eq!(container.index_format(), Some(ElementFormat::UByte));

        let data = std::fs::read(&output).unwrap();
        let header = CmfHeader::from_bytes(&data).unwrap();
        assert_eq!(header.filesize as usize, data.len());
        assert_eq!(header.num_vertices, 7);
    }

    #[test]
    fn test_convert_obj_selection() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scene.obj");
        let output = dir.path().join("right.cmf");
        std::fs::write(&input, TWO_OBJECTS).unwrap();

        let select = vec!["Right".to_string()];
        let container = convert_obj(&input, &output, &ExportOptions::default(), &select).unwrap();
        assert_eq!(container.num_vertices(), 3);
        assert!(container
            .arrays()
            .iter()
            .all(|a| a.array_type() != ArrayType::Indices));
    }

    #[test]
    fn test_convert_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.cmf");
        let result = convert_obj(
            &dir.path().join("nope.obj"),
            &output,
            &ExportOptions::default(),
            &[],
        );
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
