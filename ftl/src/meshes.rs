use ahash::AHashMap;
use glam::{Vec2, Vec3};

use crate::model::Model;

/// Game space is Y-down; exported formats are Y-up.
pub fn to_export_space(v: Vec3) -> Vec3 {
    Vec3::new(v.x, -v.y, -v.z)
}

/// Triangle list sharing one material.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuilder {
    /// Texture slot, `None` for untextured faces.
    pub texture: Option<usize>,
    tris: Vec<u16>,
}

impl MeshBuilder {
    pub fn new(texture: Option<usize>) -> Self {
        Self {
            texture,
            tris: Vec::new(),
        }
    }

    pub fn add_tri(&mut self, tri: [u16; 3]) {
        self.tris.extend_from_slice(&tri);
    }

    pub fn tris(&self) -> &[u16] {
        &self.tris
    }

    pub fn min_max(&self) -> Option<(u16, u16)> {
        let min = *self.tris.iter().min()?;
        let max = *self.tris.iter().max()?;
        Some((min, max))
    }
}

/// Group faces by texture, untextured first, then by ascending texture slot. Faces with
/// dangling corners are left out.
pub fn build_meshes(model: &Model) -> Vec<MeshBuilder> {
    let texture_count = model.geometry.textures.len();
    let mut textured_tris = AHashMap::<Option<usize>, MeshBuilder>::new();

    for face in model.geometry.complete_faces() {
        let texture = face.texture_index(texture_count);
        textured_tris
            .entry(texture)
            .or_insert_with(|| MeshBuilder::new(texture))
            .add_tri(face.vertices);
    }

    let mut meshes: Vec<_> = textured_tris.into_values().collect();
    meshes.sort_by_key(|m| m.texture);
    meshes
}

/// Per-vertex attributes in export space.
#[derive(Clone, Debug, Default)]
pub struct VertexBuffers {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
}

impl VertexBuffers {
    /// UVs live on face corners; a vertex takes the UV of the last corner that uses it.
    pub fn new(model: &Model) -> Self {
        let vertices = &model.geometry.vertices;
        let positions = vertices
            .iter()
            .map(|v| to_export_space(v.position))
            .collect();
        let normals = vertices.iter().map(|v| to_export_space(v.normal)).collect();

        let mut uvs = vec![Vec2::ZERO; vertices.len()];
        for face in &model.geometry.faces {
            for (corner, &index) in face.vertices.iter().enumerate() {
                if let Some(uv) = uvs.get_mut(index as usize) {
                    *uv = face.uv(corner);
                }
            }
        }

        Self {
            positions,
            normals,
            uvs,
        }
    }

    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), &p| (min.min(p), max.max(p))),
        )
    }
}
