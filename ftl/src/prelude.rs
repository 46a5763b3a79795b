pub use crate::consts::{FaceFlag, SectionKind};
pub use crate::error::DecodeError;
pub use crate::export::{ExportError, ExportFormat, Exporter};
pub use crate::model::{
    cloth::{ClothSpring, ClothVertex},
    collision::CollisionSphere,
    geometry::{ActionPoint, Face, TexturePath, Vertex, VertexGroup, VertexSelection},
    progressive::ProgressiveVertex,
    Cloth, Geometry, Headers, Model,
};
pub use crate::writer::ModelWriter;
pub use crate::{decode, decode_with, DecodeOptions};
