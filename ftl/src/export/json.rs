use std::{io::Write, path::Path};

use serde::Serialize;
use serde_json::{json, ser::PrettyFormatter, Value};

use super::{prepare_dir, write_file, ExportError, Exporter};
use crate::{consts::SectionKind, model::Model};

/// Raw dump of headers and sections as `Headers.json` and `Data.json`.
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn subdir(&self) -> &'static Path {
        Path::new("RAW/JSON")
    }

    fn export(&self, model: &Model, dir: &Path) -> Result<(), ExportError> {
        let out = prepare_dir(self, dir)?;
        write_json(&out.join("Headers.json"), &headers(model))?;
        write_json(&out.join("Data.json"), &data(model))
    }
}

fn write_json(path: &Path, value: &Value) -> Result<(), ExportError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    write_file(path, |w| w.write_all(&buf))
}

pub fn headers(model: &Model) -> Value {
    let h = &model.headers;
    let geometry = h.geometry.clone().unwrap_or_default();
    let cloth = h.cloth.unwrap_or_default();

    json!({
        "primary": {
            "identifier": h.primary.identifier(),
            "version": h.primary.version,
        },
        "secondary_offsets": {
            "3dData": h.offsets.raw(SectionKind::Geometry),
            "clothesData": h.offsets.raw(SectionKind::Cloth),
            "collisionSpheres": h.offsets.raw(SectionKind::CollisionSpheres),
            "progressiveData": h.offsets.raw(SectionKind::Progressive),
            "cylinder": h.offsets.raw(SectionKind::Cylinder),
            "physicsBox": h.offsets.raw(SectionKind::PhysicsBox),
        },
        "section_headers": {
            "3dData": {
                "vertexCount": geometry.vertex_count,
                "faceCount": geometry.face_count,
                "textureCount": geometry.texture_count,
                "groupCount": geometry.group_count,
                "actionCount": geometry.action_count,
                "selectionCount": geometry.selection_count,
                "originVertexIndex": geometry.origin,
                "modelName": geometry.name,
            },
            "clothes": {
                "vertexCount": cloth.vertex_count,
                "springCount": cloth.spring_count,
            },
            "progressive": {
                "vertexCount": h.progressive.map_or(0, |p| p.vertex_count),
            },
            "collisionSpheres": {
                "count": h.collision.map_or(0, |c| c.sphere_count),
            },
        },
    })
}

pub fn data(model: &Model) -> Value {
    let g = &model.geometry;

    let vertices: Vec<Value> = g
        .vertices
        .iter()
        .map(|v| {
            json!({
                "position": v.position.to_array(),
                "normal": v.normal.to_array(),
                "legacy": {
                    "screen": v.legacy.screen.to_array(),
                    "rhw": v.legacy.rhw,
                    "color": v.legacy.color,
                    "specular": v.legacy.specular,
                    "uv": v.legacy.uv.to_array(),
                },
            })
        })
        .collect();

    let faces: Vec<Value> = g
        .faces
        .iter()
        .map(|f| {
            json!({
                "indices": f.vertices,
                "texIndex": f.texture,
                "flags": f.face_type,
                "transparency": f.transparency,
                "texCoords": { "u": f.u, "v": f.v },
                "vertexColors": f.colors,
                "faceNormal": f.normal.to_array(),
            })
        })
        .collect();

    let groups: Vec<Value> = g
        .groups
        .iter()
        .map(|group| {
            json!({
                "name": group.name,
                "originVertex": group.origin,
                "radius": group.radius,
                "vertexIndices": group.indices,
            })
        })
        .collect();

    let actions: Vec<Value> = g
        .actions
        .iter()
        .map(|a| {
            json!({
                "name": a.name,
                "vertex": a.vertex,
                "flags": a.action,
                "soundId": a.sfx,
            })
        })
        .collect();

    let selections: Vec<Value> = g
        .selections
        .iter()
        .map(|s| json!({ "name": s.name, "vertexIndices": s.indices }))
        .collect();

    let textures: Vec<&str> = g.textures.iter().map(|t| t.0.as_str()).collect();

    let cloth_vertices: Vec<Value> = model
        .cloth
        .vertices
        .iter()
        .map(|cv| {
            json!({
                "meshIndex": cv.mesh_vertex,
                "pos": cv.position.to_array(),
                "mass": cv.mass,
                "flags": cv.flags,
                "collision": cv.collide,
            })
        })
        .collect();

    let springs: Vec<Value> = model
        .cloth
        .springs
        .iter()
        .map(|s| {
            json!({
                "v1": s.start,
                "v2": s.end,
                "restLength": s.rest_length,
                "stiffness": s.stiffness,
                "damping": s.damping,
                "type": s.kind,
            })
        })
        .collect();

    let spheres: Vec<Value> = model
        .collision_spheres
        .iter()
        .map(|s| json!({ "vertex": s.vertex, "flags": s.flags, "radius": s.radius }))
        .collect();

    let progressive: Vec<Value> = model
        .progressive
        .iter()
        .map(|p| {
            json!({
                "actualCollapse": p.actual_collapse,
                "needComputing": p.need_computing,
                "collapseRatio": p.collapse_ratio,
                "collapseCost": p.collapse_cost,
                "collapseCandidate": p.collapse_candidate,
            })
        })
        .collect();

    json!({
        "vertices": vertices,
        "faces": faces,
        "groups": groups,
        "actions": actions,
        "selections": selections,
        "textures": textures,
        "cloth": { "vertices": cloth_vertices, "springs": springs },
        "collisionSpheres": spheres,
        "progressive": progressive,
    })
}

#[cfg(test)]
mod json_tests {
    use super::*;
    use crate::model::{
        geometry::{Face, TexturePath, Vertex, VertexGroup},
        header::GeometryHeader,
        Geometry, Headers,
    };

    fn model() -> Model {
        Model {
            headers: Headers {
                geometry: Some(GeometryHeader {
                    vertex_count: 3,
                    face_count: 1,
                    name: "chest".into(),
                    ..Default::default()
                }),
                ..Default::default()
            },
            geometry: Geometry {
                vertices: vec![Vertex::default(); 3],
                faces: vec![Face {
                    vertices: [0, 1, 2],
                    texture: 0,
                    ..Default::default()
                }],
                textures: vec![TexturePath("GRAPH\\WOOD.BMP".into())],
                groups: vec![VertexGroup {
                    name: "lid".into(),
                    vertex_count: 2,
                    indices: vec![1, 2],
                    ..Default::default()
                }],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn headers_report_absent_offsets() {
        let value = headers(&model());
        assert_eq!(value["primary"]["identifier"], "FTL");
        assert_eq!(value["secondary_offsets"]["clothesData"], -1);
        assert_eq!(value["section_headers"]["3dData"]["modelName"], "chest");
        assert_eq!(value["section_headers"]["collisionSpheres"]["count"], 0);
    }

    #[test]
    fn data_lists_sections() {
        let value = data(&model());
        assert_eq!(value["vertices"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["faces"][0]["indices"], json!([0, 1, 2]));
        assert_eq!(value["groups"][0]["vertexIndices"], json!([1, 2]));
        assert_eq!(value["textures"][0], "GRAPH\\WOOD.BMP");
        assert!(value["cloth"]["springs"].as_array().is_some_and(Vec::is_empty));
    }

    #[test]
    fn files_use_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        JsonExporter.export(&model(), dir.path()).unwrap();
        let text = std::fs::read_to_string(dir.path().join("RAW/JSON/Headers.json")).unwrap();
        assert!(text.starts_with("{\n    \""));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, headers(&model()));
        assert!(dir.path().join("RAW/JSON/Data.json").is_file());
    }
}
