use std::{
    io::{self, Write},
    path::Path,
};

use super::{prepare_dir, write_file, ExportError, Exporter};
use crate::{meshes::to_export_space, model::Model};

pub const DEFAULT_MATERIAL: &str = "Default";

/// Wavefront `model.obj` plus its `model.mtl` library.
pub struct ObjExporter;

impl Exporter for ObjExporter {
    fn name(&self) -> &'static str {
        "obj"
    }

    fn subdir(&self) -> &'static Path {
        Path::new("OBJ")
    }

    fn export(&self, model: &Model, dir: &Path) -> Result<(), ExportError> {
        let out = prepare_dir(self, dir)?;
        write_file(&out.join("model.mtl"), |w| write_mtl(model, w))?;
        write_file(&out.join("model.obj"), |w| write_obj(model, w))
    }
}

fn material_name(texture: Option<usize>) -> String {
    match texture {
        Some(i) => format!("Material_{i}"),
        None => DEFAULT_MATERIAL.to_owned(),
    }
}

pub fn write_mtl<W: Write>(model: &Model, mut w: W) -> io::Result<()> {
    writeln!(w, "# FTL converter material library")?;
    for (i, texture) in model.geometry.textures.iter().enumerate() {
        writeln!(w, "newmtl {}", material_name(Some(i)))?;
        writeln!(w, "Ka 1.0 1.0 1.0\nKd 1.0 1.0 1.0\nKs 0.0 0.0 0.0")?;
        writeln!(w, "map_Kd {}\n", texture.file_name())?;
    }
    writeln!(w, "newmtl {DEFAULT_MATERIAL}")?;
    writeln!(w, "Ka 1.0 1.0 1.0\nKd 0.8 0.8 0.8\nKs 0.0 0.0 0.0")
}

/// Every face corner gets its own `vt`, so texture coordinate indices simply count up.
pub fn write_obj<W: Write>(model: &Model, mut w: W) -> io::Result<()> {
    let g = &model.geometry;
    writeln!(w, "# FTL converter export: {}", model.name())?;
    writeln!(w, "mtllib model.mtl")?;

    for v in &g.vertices {
        let p = to_export_space(v.position);
        writeln!(w, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
    }
    for face in g.complete_faces() {
        for corner in 0..3 {
            writeln!(w, "vt {:.6} {:.6}", face.u[corner], 1.0 - face.v[corner])?;
        }
    }
    for v in &g.vertices {
        let n = to_export_space(v.normal);
        writeln!(w, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
    }

    let texture_count = g.textures.len();
    let mut current = None;
    let mut uv = 1;
    for face in g.complete_faces() {
        if current != Some(face.texture) {
            current = Some(face.texture);
            writeln!(w, "usemtl {}", material_name(face.texture_index(texture_count)))?;
        }

        write!(w, "f")?;
        for &index in &face.vertices {
            let v = index as u32 + 1;
            write!(w, " {v}/{uv}/{v}")?;
            uv += 1;
        }
        writeln!(w)?;
    }
    Ok(())
}
