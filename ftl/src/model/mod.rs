pub mod cloth;
pub mod collision;
pub mod geometry;
pub mod header;
pub mod progressive;

use glam::Vec3;

use cloth::{ClothSpring, ClothVertex};
use collision::CollisionSphere;
use geometry::{ActionPoint, Face, TexturePath, Vertex, VertexGroup, VertexSelection};
use header::{
    ClothHeader, CollisionHeader, GeometryHeader, PrimaryHeader, ProgressiveHeader,
    SecondaryHeader,
};
use progressive::ProgressiveVertex;

/// Every header found in the file. Section sub-headers are `None` when their section
/// is absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Headers {
    pub primary: PrimaryHeader,
    pub offsets: SecondaryHeader,
    pub geometry: Option<GeometryHeader>,
    pub collision: Option<CollisionHeader>,
    pub progressive: Option<ProgressiveHeader>,
    pub cloth: Option<ClothHeader>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub textures: Vec<TexturePath>,
    pub groups: Vec<VertexGroup>,
    pub actions: Vec<ActionPoint>,
    pub selections: Vec<VertexSelection>,
}

impl Geometry {
    /// Faces whose three corners name existing vertices.
    pub fn complete_faces(&self) -> impl Iterator<Item = &Face> + '_ {
        let count = self.vertices.len();
        self.faces
            .iter()
            .filter(move |f| f.vertices.iter().all(|&i| (i as usize) < count))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cloth {
    pub vertices: Vec<ClothVertex>,
    /// Rest state for resetting the simulation. Identical to `vertices` after loading.
    pub backup: Vec<ClothVertex>,
    pub springs: Vec<ClothSpring>,
}

impl Cloth {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.springs.is_empty()
    }
}

/// A decoded FTL model. Absent sections are left empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub headers: Headers,
    pub geometry: Geometry,
    pub collision_spheres: Vec<CollisionSphere>,
    pub progressive: Vec<ProgressiveVertex>,
    pub cloth: Cloth,
}

impl Model {
    /// Model name from the geometry header, empty without geometry.
    pub fn name(&self) -> &str {
        self.headers
            .geometry
            .as_ref()
            .map_or("", |g| g.name.as_str())
    }

    pub fn vertex_position(&self, index: i32) -> Option<Vec3> {
        let index = usize::try_from(index).ok()?;
        self.geometry.vertices.get(index).map(|v| v.position)
    }
}

#[cfg(test)]
mod model_tests {
    use super::*;

    #[test]
    fn model_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Model>();
    }

    #[test]
    fn vertex_lookup_rejects_out_of_range() {
        let model = Model {
            geometry: Geometry {
                vertices: vec![Vertex {
                    position: Vec3::X,
                    ..Default::default()
                }],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(model.vertex_position(0), Some(Vec3::X));
        assert_eq!(model.vertex_position(1), None);
        assert_eq!(model.vertex_position(-1), None);
        assert_eq!(model.name(), "");
    }

    #[test]
    fn complete_faces_skip_dangling_corners() {
        let face = |vertices| Face {
            vertices,
            ..Default::default()
        };
        let geometry = Geometry {
            vertices: vec![Vertex::default(); 3],
            faces: vec![face([0, 1, 2]), face([0, 3, 2]), face([2, 1, 0])],
            ..Default::default()
        };
        let kept: Vec<_> = geometry.complete_faces().map(|f| f.vertices).collect();
        assert_eq!(kept, [[0, 1, 2], [2, 1, 0]]);
    }
}
