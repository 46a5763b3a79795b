use std::{io::Write, path::Path};

use serde::Serialize;
use serde_json::{json, ser::PrettyFormatter, Value};

use super::{prepare_dir, write_file, ExportError, Exporter};
use crate::{
    meshes::{build_meshes, to_export_space, VertexBuffers},
    model::Model,
};

const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;
const FLOAT: u32 = 5126;
const UNSIGNED_SHORT: u32 = 5123;
const TRIANGLES: u32 = 4;

/// Largest vertex count addressable by u16 indices.
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

/// glTF 2.0 scene as `model.gltf` with an external `model.bin`.
pub struct GltfExporter;

impl Exporter for GltfExporter {
    fn name(&self) -> &'static str {
        "gltf"
    }

    fn subdir(&self) -> &'static Path {
        Path::new("GLTF")
    }

    fn export(&self, model: &Model, dir: &Path) -> Result<(), ExportError> {
        let (root, bin) = build(model, "model.bin")?;
        let out = prepare_dir(self, dir)?;

        let mut text = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut text, PrettyFormatter::with_indent(b"    "));
        root.serialize(&mut ser)?;

        write_file(&out.join("model.bin"), |w| w.write_all(&bin))?;
        write_file(&out.join("model.gltf"), |w| w.write_all(&text))
    }
}

fn pad_to_4(data: &mut Vec<u8>) {
    while data.len() % 4 != 0 {
        data.push(0);
    }
}

/// Append a chunk at the next 4-byte boundary, returning its offset and length.
fn push_chunk(bin: &mut Vec<u8>, bytes: &[u8]) -> (usize, usize) {
    pad_to_4(bin);
    let offset = bin.len();
    bin.extend_from_slice(bytes);
    (offset, bytes.len())
}

/// Build the glTF document and its binary buffer.
pub fn build(model: &Model, bin_uri: &str) -> Result<(Value, Vec<u8>), ExportError> {
    let count = model.geometry.vertices.len();
    if count > MAX_VERTICES {
        return Err(ExportError::TooManyVertices {
            count,
            max: MAX_VERTICES,
        });
    }

    let buffers = VertexBuffers::new(model);
    let meshes = build_meshes(model);
    let mut bin = Vec::new();

    let mut buffer_views = Vec::new();
    for chunk in [
        bytemuck::cast_slice(&buffers.positions),
        bytemuck::cast_slice(&buffers.normals),
        bytemuck::cast_slice::<_, u8>(&buffers.uvs),
    ] {
        let (offset, len) = push_chunk(&mut bin, chunk);
        buffer_views.push(json!({
            "buffer": 0, "byteOffset": offset, "byteLength": len, "target": ARRAY_BUFFER,
        }));
    }

    let mut position = json!({
        "bufferView": 0, "componentType": FLOAT, "count": count, "type": "VEC3",
    });
    if let Some((min, max)) = buffers.bounds() {
        position["min"] = json!(min.to_array());
        position["max"] = json!(max.to_array());
    }
    let mut accessors = vec![
        position,
        json!({ "bufferView": 1, "componentType": FLOAT, "count": count, "type": "VEC3" }),
        json!({ "bufferView": 2, "componentType": FLOAT, "count": count, "type": "VEC2" }),
    ];

    for mesh in &meshes {
        let (offset, len) = push_chunk(&mut bin, bytemuck::cast_slice(mesh.tris()));
        let view = buffer_views.len();
        buffer_views.push(json!({
            "buffer": 0, "byteOffset": offset, "byteLength": len, "target": ELEMENT_ARRAY_BUFFER,
        }));
        let mut accessor = json!({
            "bufferView": view, "componentType": UNSIGNED_SHORT,
            "count": mesh.tris().len(), "type": "SCALAR",
        });
        if let Some((min, max)) = mesh.min_max() {
            accessor["min"] = json!([min]);
            accessor["max"] = json!([max]);
        }
        accessors.push(accessor);
    }
    pad_to_4(&mut bin);

    let textures = &model.geometry.textures;
    let images: Vec<Value> = textures
        .iter()
        .map(|t| json!({ "uri": t.file_name() }))
        .collect();
    let gl_textures: Vec<Value> = (0..textures.len()).map(|i| json!({ "source": i })).collect();
    let mut materials: Vec<Value> = (0..textures.len())
        .map(|i| {
            json!({
                "name": format!("Material_{i}"),
                "pbrMetallicRoughness": {
                    "baseColorTexture": { "index": i },
                    "metallicFactor": 0.0,
                    "roughnessFactor": 1.0,
                },
                "doubleSided": true,
            })
        })
        .collect();

    let default_material = meshes.iter().any(|m| m.texture.is_none()).then(|| {
        materials.push(json!({
            "name": "Default",
            "pbrMetallicRoughness": { "baseColorFactor": [0.8, 0.8, 0.8, 1.0] },
        }));
        materials.len() - 1
    });

    let first_index_accessor = 3;
    let primitives: Vec<Value> = meshes
        .iter()
        .enumerate()
        .map(|(i, mesh)| {
            json!({
                "attributes": { "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2 },
                "indices": first_index_accessor + i,
                "material": mesh.texture.or(default_material),
                "mode": TRIANGLES,
            })
        })
        .collect();

    let mut nodes = vec![json!({ "name": "Mesh", "mesh": 0 })];
    for action in &model.geometry.actions {
        let translation = match model.vertex_position(action.vertex) {
            Some(p) => to_export_space(p),
            None => {
                log::warn!(
                    "action point {:?} references missing vertex {}, placing it at the origin",
                    action.name,
                    action.vertex
                );
                glam::Vec3::ZERO
            }
        };
        nodes.push(json!({
            "name": action.name,
            "translation": translation.to_array(),
            "extras": { "type": "ActionPoint" },
        }));
    }
    let scene_nodes: Vec<usize> = (0..nodes.len()).collect();

    let mut root = json!({
        "asset": { "version": "2.0", "generator": concat!("ftl ", env!("CARGO_PKG_VERSION")) },
        "buffers": [{ "uri": bin_uri, "byteLength": bin.len() }],
        "bufferViews": buffer_views,
        "accessors": accessors,
        "materials": materials,
        "meshes": [{ "name": model.name(), "primitives": primitives }],
        "nodes": nodes,
        "scenes": [{ "nodes": scene_nodes }],
        "scene": 0,
    });
    if !images.is_empty() {
        root["images"] = Value::from(images);
        root["textures"] = Value::from(gl_textures);
    }

    Ok((root, bin))
}
