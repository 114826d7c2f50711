//! Mesh export (scene -> .cmf)

mod collect;
mod convert;
mod obj;
mod tangents;
mod types;

// Re-export public API
pub use collect::{collect, collect_corners, resolve_triangle};
pub use convert::{convert_obj, convert_to_memory};
pub use obj::{load_obj, parse_obj};
pub use tangents::compute_tangents;
pub use types::{AttributeSet, CollectedMesh, ExportOptions, NormalPolicy, VertexCorner};
