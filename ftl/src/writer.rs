//! Serialises a [`Model`] back into the decompressed FTL layout.
//!
//! Output is never compressed; it is what [`crate::parser::parse`] consumes. Used to build
//! fixtures and to check that decoding is stable.

use crate::{
    binaries::{write_all, BinaryData},
    consts::{SectionKind, PRIMARY_HEADER_SIZE, RESERVED_BLOCK_SIZE},
    cursor::Writer,
    model::{
        header::{ClothHeader, CollisionHeader, GeometryHeader, ProgressiveHeader},
        Model,
    },
};

/// Order sections are written in unless [`ModelWriter::order`] says otherwise.
pub const DEFAULT_ORDER: [SectionKind; 4] = [
    SectionKind::Geometry,
    SectionKind::CollisionSpheres,
    SectionKind::Progressive,
    SectionKind::Cloth,
];

pub struct ModelWriter<'a> {
    model: &'a Model,
    order: [SectionKind; 4],
    padding: usize,
}

impl<'a> ModelWriter<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            order: DEFAULT_ORDER,
            padding: 0,
        }
    }

    /// Write sections in this order. Each decoded section should appear once; reserved
    /// sections are ignored.
    pub fn order(mut self, order: [SectionKind; 4]) -> Self {
        self.order = order;
        self
    }

    /// Zero bytes written before every section.
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    fn count(len: usize) -> i32 {
        i32::try_from(len).unwrap_or(i32::MAX)
    }

    /// Whether a section is written. Data with no header still counts as present.
    pub fn writes(&self, section: SectionKind) -> bool {
        let m = self.model;
        match section {
            SectionKind::Geometry => {
                m.headers.geometry.is_some()
                    || !m.geometry.vertices.is_empty()
                    || !m.geometry.faces.is_empty()
            }
            SectionKind::CollisionSpheres => {
                m.headers.collision.is_some() || !m.collision_spheres.is_empty()
            }
            SectionKind::Progressive => m.headers.progressive.is_some() || !m.progressive.is_empty(),
            SectionKind::Cloth => m.headers.cloth.is_some() || !m.cloth.is_empty(),
            SectionKind::Cylinder | SectionKind::PhysicsBox => false,
        }
    }

    /// Lay out the headers and every present section in the configured order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        self.model.headers.primary.write(&mut w);
        w.write_zeroes(RESERVED_BLOCK_SIZE);

        let table = w.position();
        debug_assert_eq!(table, PRIMARY_HEADER_SIZE + RESERVED_BLOCK_SIZE);
        for _ in SectionKind::ALL {
            w.write_i32(-1);
        }

        for section in self.order {
            if !self.writes(section) {
                continue;
            }
            w.write_zeroes(self.padding);
            w.patch_i32(table + section as usize * 4, Self::count(w.position()));
            match section {
                SectionKind::Geometry => self.write_geometry(&mut w),
                SectionKind::CollisionSpheres => {
                    CollisionHeader {
                        sphere_count: Self::count(self.model.collision_spheres.len()),
                    }
                    .write(&mut w);
                    write_all(&self.model.collision_spheres, &mut w);
                }
                SectionKind::Progressive => {
                    ProgressiveHeader {
                        vertex_count: Self::count(self.model.progressive.len()),
                    }
                    .write(&mut w);
                    write_all(&self.model.progressive, &mut w);
                }
                SectionKind::Cloth => {
                    let cloth = &self.model.cloth;
                    ClothHeader {
                        vertex_count: Self::count(cloth.vertices.len()),
                        spring_count: Self::count(cloth.springs.len()),
                    }
                    .write(&mut w);
                    write_all(&cloth.vertices, &mut w);
                    write_all(&cloth.springs, &mut w);
                }
                SectionKind::Cylinder | SectionKind::PhysicsBox => {}
            }
        }

        w.into_bytes()
    }

    fn write_geometry(&self, w: &mut Writer) {
        let g = &self.model.geometry;
        let (origin, name) = self
            .model
            .headers
            .geometry
            .as_ref()
            .map_or((0, ""), |h| (h.origin, h.name.as_str()));

        GeometryHeader {
            vertex_count: Self::count(g.vertices.len()),
            face_count: Self::count(g.faces.len()),
            texture_count: Self::count(g.textures.len()),
            group_count: Self::count(g.groups.len()),
            action_count: Self::count(g.actions.len()),
            selection_count: Self::count(g.selections.len()),
            origin,
            name: name.to_owned(),
        }
        .write(w);

        write_all(&g.vertices, w);
        write_all(&g.faces, w);
        write_all(&g.textures, w);
        write_all(&g.groups, w);
        for group in &g.groups {
            write_all(&group.indices, w);
        }
        write_all(&g.actions, w);
        write_all(&g.selections, w);
        for selection in &g.selections {
            write_all(&selection.indices, w);
        }
    }
}
