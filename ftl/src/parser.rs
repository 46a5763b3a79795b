use crate::{
    binaries::BinaryData,
    consts::{SectionKind, RESERVED_BLOCK_SIZE},
    cursor::Cursor,
    error::Result,
    model::{
        header::{
            ClothHeader, CollisionHeader, GeometryHeader, PrimaryHeader, ProgressiveHeader,
            SecondaryHeader,
        },
        geometry::{VertexGroup, VertexSelection},
        Cloth, Geometry, Headers, Model,
    },
};

/// Walk a decompressed FTL buffer into a [`Model`].
///
/// Every present section is located through the offset table; sections need not be
/// contiguous or in order. The first failure aborts the whole parse.
pub fn parse(buffer: &[u8]) -> Result<Model> {
    let mut cursor = Cursor::new(buffer);

    let primary = PrimaryHeader::read(&mut cursor)?;
    primary.validate()?;
    cursor.skip(RESERVED_BLOCK_SIZE)?;
    let offsets = SecondaryHeader::read(&mut cursor)?;

    log::info!(
        "{} v{} ({} bytes), sections: {:?}",
        primary.identifier(),
        primary.version,
        buffer.len(),
        offsets.present().map(|(s, _)| s).collect::<Vec<_>>()
    );

    let mut model = Model {
        headers: Headers {
            primary,
            offsets,
            ..Default::default()
        },
        ..Default::default()
    };

    for (section, offset) in offsets.present() {
        if !section.is_decoded() {
            log::debug!("skipping reserved {section:?} section at {offset:#x}");
            continue;
        }

        let mut cursor = cursor.at_offset(offset as usize);
        match section {
            SectionKind::Geometry => {
                let (header, geometry) = read_geometry(&mut cursor)?;
                model.headers.geometry = Some(header);
                model.geometry = geometry;
            }
            SectionKind::CollisionSpheres => {
                let header = CollisionHeader::read(&mut cursor)?;
                model.collision_spheres = cursor.read_array(header.sphere_count)?;
                log::debug!("{} collision spheres", model.collision_spheres.len());
                model.headers.collision = Some(header);
            }
            SectionKind::Progressive => {
                let header = ProgressiveHeader::read(&mut cursor)?;
                model.progressive = cursor.read_array(header.vertex_count)?;
                log::debug!("{} progressive mesh records", model.progressive.len());
                model.headers.progressive = Some(header);
            }
            SectionKind::Cloth => {
                let (header, cloth) = read_cloth(&mut cursor)?;
                model.headers.cloth = Some(header);
                model.cloth = cloth;
            }
            SectionKind::Cylinder | SectionKind::PhysicsBox => {}
        }
    }

    Ok(model)
}

fn read_geometry(cursor: &mut Cursor<'_>) -> Result<(GeometryHeader, Geometry)> {
    let header = GeometryHeader::read(cursor)?;
    log::info!(
        "geometry {:?}: {} vertices, {} faces, {} textures, {} groups, {} actions, {} selections",
        header.name,
        header.vertex_count,
        header.face_count,
        header.texture_count,
        header.group_count,
        header.action_count,
        header.selection_count,
    );

    let vertices = cursor.read_array(header.vertex_count)?;
    let faces = cursor.read_array(header.face_count)?;
    let textures = cursor.read_array(header.texture_count)?;

    // All group records come first, then each group's index list.
    let mut groups: Vec<VertexGroup> = cursor.read_array(header.group_count)?;
    for group in &mut groups {
        group.indices = cursor.read_array(group.vertex_count)?;
    }

    let actions = cursor.read_array(header.action_count)?;

    let mut selections: Vec<VertexSelection> = cursor.read_array(header.selection_count)?;
    for selection in &mut selections {
        selection.indices = cursor.read_array(selection.vertex_count)?;
    }

    let geometry = Geometry {
        vertices,
        faces,
        textures,
        groups,
        actions,
        selections,
    };
    check_references(&geometry);

    log::debug!("geometry section ends at {:#x}", cursor.position());
    Ok((header, geometry))
}

/// Dangling face corners and texture slots are reported, not rejected. Mesh exporters
/// leave such faces out or untextured.
fn check_references(geometry: &Geometry) {
    let dangling = geometry.faces.len() - geometry.complete_faces().count();
    if dangling > 0 {
        log::warn!(
            "{dangling} faces reference vertices past the {} in the model",
            geometry.vertices.len()
        );
    }

    let texture_count = geometry.textures.len();
    let untextured = geometry
        .faces
        .iter()
        .filter(|f| f.texture >= 0 && f.texture_index(texture_count).is_none())
        .count();
    if untextured > 0 {
        log::warn!("{untextured} faces reference missing textures and will be untextured");
    }
}

fn read_cloth(cursor: &mut Cursor<'_>) -> Result<(ClothHeader, Cloth)> {
    let header = ClothHeader::read(cursor)?;
    let vertices: Vec<_> = cursor.read_array(header.vertex_count)?;
    // One payload in the file; the backup starts out as a copy of it.
    let backup = vertices.clone();
    let springs = cursor.read_array(header.spring_count)?;
    log::debug!("cloth: {} vertices, {} springs", vertices.len(), springs.len());

    Ok((
        header,
        Cloth {
            vertices,
            backup,
            springs,
        },
    ))
}
