//! Geometry sources consumed by the vertex collector
//!
//! A source hands out already-triangulated faces in a stable order. Each
//! corner carries both normal candidates so the collector can apply the
//! per-face smoothing flag (or an override) itself.

/// Which part of the scene is exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    /// Every mesh object
    #[default]
    All,
    /// Only objects marked as selected
    Selected,
}

/// One corner of a source triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceCorner {
    pub position: [f32; 3],
    /// `None` when the source has no texture coordinates for this corner
    pub texcoord: Option<[f32; 2]>,
    /// Smoothed normal of the underlying vertex
    pub vertex_normal: [f32; 3],
    /// `None` when the source has no vertex colors
    pub color: Option<[f32; 3]>,
}

/// A triangle as delivered by a geometry source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceTriangle {
    pub corners: [SourceCorner; 3],
    /// Flat normal of the owning face
    pub face_normal: [f32; 3],
    /// Per-face smoothing flag
    pub smooth: bool,
}

/// Supplier of triangulated geometry
pub trait GeometrySource {
    /// Triangles in scope, in a deterministic order
    fn triangles(&self, scope: ExportScope) -> Box<dyn Iterator<Item = SourceTriangle> + '_>;
}

/// A named mesh object
#[derive(Debug, Clone, Default)]
pub struct SceneObject {
    pub name: String,
    pub selected: bool,
    pub triangles: Vec<SourceTriangle>,
}

/// In-memory scene: an ordered list of mesh objects
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark objects whose name appears in `names` as selected
    ///
    /// Returns the names that matched no object.
    pub fn select<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<String> {
        for object in &mut self.objects {
            object.selected = names.iter().any(|n| n.as_ref() == object.name);
        }
        names
            .iter()
            .map(|n| n.as_ref())
            .filter(|n| !self.objects.iter().any(|o| o.name == *n))
            .map(str::to_string)
            .collect()
    }

    /// Total number of triangles across all objects
    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(|o| o.triangles.len()).sum()
    }
}

impl GeometrySource for Scene {
    fn triangles(&self, scope: ExportScope) -> Box<dyn Iterator<Item = SourceTriangle> + '_> {
        Box::new(
            self.objects
                .iter()
                .filter(move |o| scope == ExportScope::All || o.selected)
                .flat_map(|o| o.triangles.iter().copied()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(x: f32) -> SourceTriangle {
        let corner = SourceCorner {
            position: [x, 0.0, 0.0],
            texcoord: None,
            vertex_normal: [0.0, 0.0, 1.0],
            color: None,
        };
        SourceTriangle {
            corners: [corner; 3],
            face_normal: [0.0, 0.0, 1.0],
            smooth: false,
        }
    }

    fn scene() -> Scene {
        Scene {
            objects: vec![
                SceneObject {
                    name: "Cube".into(),
                    selected: false,
                    triangles: vec![triangle(1.0), triangle(2.0)],
                },
                SceneObject {
                    name: "Plane".into(),
                    selected: false,
                    triangles: vec![triangle(3.0)],
                },
            ],
        }
    }

    #[test]
    fn test_all_scope_keeps_order() {
        let scene = scene();
        let xs: Vec<f32> = scene
            .triangles(ExportScope::All)
            .map(|t| t.corners[0].position[0])
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
        assert_eq!(scene.triangle_count(), 3);
    }

    #[test]
    fn test_selected_scope() {
        let mut scene = scene();
        let missing = scene.select(&["Plane", "Sphere"]);
        assert_eq!(missing, vec!["Sphere".to_string()]);

        let xs: Vec<f32> = scene
            .triangles(ExportScope::Selected)
            .map(|t| t.corners[0].position[0])
            .collect();
        assert_eq!(xs, vec![3.0]);
    }

    #[test]
    fn test_selected_scope_with_nothing_selected() {
        let scene = scene();
        assert_eq!(scene.triangles(ExportScope::Selected).count(), 0);
    }
}
