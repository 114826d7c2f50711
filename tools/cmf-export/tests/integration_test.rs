//! Integration tests for cmf-export
//!
//! Tests the full pipeline: generate OBJ -> run the CLI -> verify output

use cmf_common::{ArrayHeader, ArrayType, CmfHeader, ElementFormat};
use std::path::Path;
use tempfile::tempdir;

/// Unit cube with 8 shared positions, 12 triangles, flat shading
const CUBE_OBJ: &str = "\
o Cube
v -1 -1 -1
v 1 -1 -1
v 1 1 -1
v -1 1 -1
v -1 -1 1
v 1 -1 1
v 1 1 1
v -1 1 1
f 1 4 3 2
f 5 6 7 8
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
o Marker
v 5 5 5
v 6 5 5
v 5 6 5
f 9 10 11
";

fn write_cube(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("cube.obj");
    std::fs::write(&path, CUBE_OBJ).expect("Failed to write OBJ");
    path
}

// Helper to run cmf-export mesh command
fn cmf_export_mesh(input: &Path, output: &Path, extra: &[&str]) -> bool {
    std::process::Command::new(env!("CARGO_BIN_EXE_cmf-export"))
        .args(["mesh", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .args(extra)
        .status()
        .expect("Failed to run cmf-export")
        .success()
}

/// Walk the sub-blocks and return their headers, checking the total size
fn verify_cmf(data: &[u8]) -> (CmfHeader, Vec<ArrayHeader>) {
    let header = CmfHeader::from_bytes(data).expect("Failed to parse CMF header");
    assert_eq!(header.filesize as usize, data.len(), "filesize mismatch");
    assert_eq!(header.flags, 0);

    let mut offset = CmfHeader::SIZE;
    let mut arrays = Vec::new();
    for _ in 0..header.num_arrays {
        let array = ArrayHeader::from_bytes(&data[offset..]).expect("Failed to parse array");
        offset += ArrayHeader::SIZE + array.byte_length as usize;
        arrays.push(array);
    }
    assert_eq!(offset, data.len(), "trailing bytes after last array");

    // Fixed type order
    assert!(arrays.windows(2).all(|w| w[0].array_type < w[1].array_type));
    (header, arrays)
}

#[test]
fn test_cube_indexed() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = write_cube(dir.path());
    let output = dir.path().join("cube.cmf");

    assert!(cmf_export_mesh(&input, &output, &[]), "mesh command failed");
    let data = std::fs::read(&output).expect("Failed to read CMF");
    let (header, arrays) = verify_cmf(&data);

    // Flat cube: 4 corners per side, plus the marker triangle
    assert_eq!(header.num_vertices, 6 * 4 + 3);
    assert_eq!(header.num_arrays, 5);

    let indices = arrays.last().unwrap();
    assert_eq!(indices.array_type, ArrayType::Indices);
    assert_eq!(indices.format, ElementFormat::UByte);
    assert_eq!(indices.element_count(), 13 * 3);

    let positions = &arrays[0];
    assert_eq!(positions.array_type, ArrayType::Positions);
    assert_eq!(positions.element_count(), header.num_vertices as usize * 3);
}

#[test]
fn test_cube_smooth_selected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = write_cube(dir.path());
    let output = dir.path().join("cube_smooth.cmf");

    let ok = cmf_export_mesh(
        &input,
        &output,
        &["--normals", "smooth", "--select", "Cube", "--tangents"],
    );
    assert!(ok, "mesh command failed");

    let data = std::fs::read(&output).expect("Failed to read CMF");
    let (header, arrays) = verify_cmf(&data);

    // Smoothed normals collapse every corner onto the 8 cube positions
    assert_eq!(header.num_vertices, 8);
    assert_eq!(header.num_arrays, 6);
    assert!(arrays.iter().any(|a| a.array_type == ArrayType::Tangents));
}

#[test]
fn test_unindexed_positions_only() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = write_cube(dir.path());
    let output = dir.path().join("soup.cmf");

    let ok = cmf_export_mesh(
        &input,
        &output,
        &["--no-index", "--no-texcoords", "--no-normals", "--no-colors"],
    );
    assert!(ok, "mesh command failed");

    let data = std::fs::read(&output).expect("Failed to read CMF");
    let (header, arrays) = verify_cmf(&data);
    assert_eq!(header.num_vertices, 13 * 3);
    assert_eq!(arrays.len(), 1);
    assert_eq!(arrays[0].byte_length, 13 * 3 * 3 * 4);
}

#[test]
fn test_deterministic_output() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = write_cube(dir.path());
    let first = dir.path().join("a.cmf");
    let second = dir.path().join("b.cmf");

    assert!(cmf_export_mesh(&input, &first, &[]));
    assert!(cmf_export_mesh(&input, &second, &[]));
    assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
}

#[test]
fn test_invalid_obj_leaves_no_output() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("broken.obj");
    let output = dir.path().join("broken.cmf");
    std::fs::write(&input, "v 0 0 0\nf 1 2 3\n").unwrap();

    assert!(!cmf_export_mesh(&input, &output, &[]));
    assert!(!output.exists());
}

#[test]
fn test_manifest_build() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = write_cube(dir.path());
    let manifest = dir.path().join("models.toml");
    std::fs::write(
        &manifest,
        format!(
            "[output]\ndir = {:?}\n\n[meshes]\ncube = {{ path = {:?}, select = [\"Marker\"] }}\n",
            dir.path().join("out").to_str().unwrap(),
            input.to_str().unwrap()
        ),
    )
    .unwrap();

    let status = std::process::Command::new(env!("CARGO_BIN_EXE_cmf-export"))
        .args(["build", manifest.to_str().unwrap()])
        .status()
        .expect("Failed to run cmf-export");
    assert!(status.success(), "build command failed");

    let data = std::fs::read(dir.path().join("out").join("cube.cmf")).unwrap();
    let (header, _) = verify_cmf(&data);
    assert_eq!(header.num_vertices, 3);
}
