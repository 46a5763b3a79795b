use std::{
    io::{self, Write},
    path::Path,
};

use glam::Vec3;
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use super::{prepare_dir, write_file, ExportError, Exporter};
use crate::{consts::SectionKind, model::Model};

/// Attribute-oriented dump as `Headers.xml` and `Data.xml`.
pub struct XmlExporter;

impl Exporter for XmlExporter {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn subdir(&self) -> &'static Path {
        Path::new("RAW/XML")
    }

    fn export(&self, model: &Model, dir: &Path) -> Result<(), ExportError> {
        let out = prepare_dir(self, dir)?;
        write_file(&out.join("Headers.xml"), |w| write_headers(model, w))?;
        write_file(&out.join("Data.xml"), |w| write_data(model, w))
    }
}

fn document<W: Write>(w: W) -> io::Result<Writer<W>> {
    let mut writer = Writer::new_with_indent(w, b' ', 4);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(writer)
}

fn push_vec3(el: &mut BytesStart<'_>, name: &str, v: Vec3) {
    for (axis, value) in [("x", v.x), ("y", v.y), ("z", v.z)] {
        el.push_attribute((format!("{name}_{axis}").as_str(), value.to_string().as_str()));
    }
}

fn push<T: ToString>(el: &mut BytesStart<'_>, name: &str, value: T) {
    el.push_attribute((name, value.to_string().as_str()));
}

pub fn write_headers<W: Write>(model: &Model, w: W) -> io::Result<()> {
    let h = &model.headers;
    let mut writer = document(w)?;
    writer.write_event(Event::Start(BytesStart::new("FtlHeaders")))?;

    let mut primary = BytesStart::new("Primary");
    push(&mut primary, "ID", h.primary.identifier());
    push(&mut primary, "Ver", h.primary.version);
    writer.write_event(Event::Empty(primary))?;

    let mut offsets = BytesStart::new("Offsets");
    push(&mut offsets, "Data3D", h.offsets.raw(SectionKind::Geometry));
    push(&mut offsets, "Clothes", h.offsets.raw(SectionKind::Cloth));
    push(&mut offsets, "Collision", h.offsets.raw(SectionKind::CollisionSpheres));
    push(&mut offsets, "Progressive", h.offsets.raw(SectionKind::Progressive));
    writer.write_event(Event::Empty(offsets))?;

    if let Some(g) = &h.geometry {
        let mut header = BytesStart::new("Header3D");
        push(&mut header, "Vertices", g.vertex_count);
        push(&mut header, "Faces", g.face_count);
        push(&mut header, "Groups", g.group_count);
        push(&mut header, "ModelName", &g.name);
        writer.write_event(Event::Empty(header))?;
    }

    writer.write_event(Event::End(BytesEnd::new("FtlHeaders")))?;
    writer.into_inner().flush()
}

pub fn write_data<W: Write>(model: &Model, w: W) -> io::Result<()> {
    let g = &model.geometry;
    let mut writer = document(w)?;
    writer.write_event(Event::Start(BytesStart::new("FtlData")))?;

    let mut vertices = BytesStart::new("Vertices");
    push(&mut vertices, "count", g.vertices.len());
    writer.write_event(Event::Start(vertices))?;
    for (i, v) in g.vertices.iter().enumerate() {
        let mut el = BytesStart::new("V");
        push(&mut el, "id", i);
        push_vec3(&mut el, "p", v.position);
        push_vec3(&mut el, "n", v.normal);
        push(&mut el, "color", v.legacy.color);
        push(&mut el, "u", v.legacy.uv.x);
        push(&mut el, "v", v.legacy.uv.y);
        writer.write_event(Event::Empty(el))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Vertices")))?;

    let mut faces = BytesStart::new("Faces");
    push(&mut faces, "count", g.faces.len());
    writer.write_event(Event::Start(faces))?;
    for (i, f) in g.faces.iter().enumerate() {
        let mut el = BytesStart::new("F");
        push(&mut el, "id", i);
        push(&mut el, "tex", f.texture);
        push(&mut el, "flags", f.face_type);
        for c in 0..3 {
            push(&mut el, &format!("v{}", c + 1), f.vertices[c]);
        }
        for c in 0..3 {
            push(&mut el, &format!("u{}", c + 1), f.u[c]);
        }
        for c in 0..3 {
            push(&mut el, &format!("t{}", c + 1), f.v[c]);
        }
        writer.write_event(Event::Empty(el))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Faces")))?;

    writer.write_event(Event::Start(BytesStart::new("Groups")))?;
    for group in &g.groups {
        let mut el = BytesStart::new("Group");
        push(&mut el, "name", &group.name);
        push(&mut el, "root", group.origin);
        if group.indices.is_empty() {
            writer.write_event(Event::Empty(el))?;
            continue;
        }
        let text = group
            .indices
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        writer.write_event(Event::Start(el))?;
        writer.write_event(Event::Text(BytesText::new(&text)))?;
        writer.write_event(Event::End(BytesEnd::new("Group")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Groups")))?;

    writer.write_event(Event::Start(BytesStart::new("Cloth")))?;
    for cv in &model.cloth.vertices {
        let mut el = BytesStart::new("CV");
        push(&mut el, "ref", cv.mesh_vertex);
        push_vec3(&mut el, "pos", cv.position);
        writer.write_event(Event::Empty(el))?;
    }
    for cs in &model.cloth.springs {
        let mut el = BytesStart::new("CS");
        push(&mut el, "a", cs.start);
        push(&mut el, "b", cs.end);
        push(&mut el, "k", cs.stiffness);
        writer.write_event(Event::Empty(el))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Cloth")))?;

    writer.write_event(Event::End(BytesEnd::new("FtlData")))?;
    writer.into_inner().flush()
}

#[cfg(test)]
mod xml_tests {
    use super::*;
    use crate::model::{
        cloth::ClothSpring,
        geometry::{Face, Vertex, VertexGroup},
        header::GeometryHeader,
        Cloth, Geometry, Headers,
    };

    fn model() -> Model {
        Model {
            headers: Headers {
                geometry: Some(GeometryHeader {
                    vertex_count: 3,
                    name: "door & frame".into(),
                    ..Default::default()
                }),
                ..Default::default()
            },
            geometry: Geometry {
                vertices: vec![Vertex::default(); 3],
                faces: vec![Face {
                    vertices: [0, 1, 2],
                    texture: -1,
                    v: [0.0, 0.5, 1.0],
                    ..Default::default()
                }],
                groups: vec![
                    VertexGroup {
                        name: "hinge".into(),
                        indices: vec![0, 2],
                        ..Default::default()
                    },
                    VertexGroup {
                        name: "empty".into(),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
            cloth: Cloth {
                springs: vec![ClothSpring {
                    start: 0,
                    end: 1,
                    stiffness: 2.5,
                    ..Default::default()
                }],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn render(f: impl FnOnce(&Model, &mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&model(), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn headers_escape_names() {
        let xml = render(|m, w| write_headers(m, w));
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<Primary ID=\"FTL\""));
        assert!(xml.contains("Clothes=\"-1\""));
        assert!(xml.contains("ModelName=\"door &amp; frame\""));
    }

    #[test]
    fn data_elements() {
        let xml = render(|m, w| write_data(m, w));
        assert!(xml.contains("<Vertices count=\"3\">"));
        assert!(xml.contains("<V id=\"0\" p_x=\"0\""));
        assert!(xml.contains("v1=\"0\" v2=\"1\" v3=\"2\""));
        assert!(xml.contains("t2=\"0.5\""));
        assert!(xml.contains(">0 2</Group>"));
        assert!(xml.contains("<Group name=\"empty\" root=\"0\"/>"));
        assert!(xml.contains("<CS a=\"0\" b=\"1\" k=\"2.5\"/>"));
    }
}
