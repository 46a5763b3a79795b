#![allow(dead_code)]

use flagset::FlagSet;
use ftl::prelude::*;
use glam::Vec3;

/// Wrap `data` in a DCL stream of uncoded literals, which `explode` accepts as-is.
pub fn store(data: &[u8]) -> Vec<u8> {
    let mut bits = BitWriter::default();
    bits.out.extend_from_slice(&[0, 4]);
    for &b in data {
        bits.push(0, 1);
        bits.push(b as u32, 8);
    }
    // Length symbol 15 plus 255 extra: end of stream.
    bits.push(1, 1);
    bits.push(0, 7);
    bits.push(0xff, 8);
    bits.finish()
}

#[derive(Default)]
struct BitWriter {
    out: Vec<u8>,
    acc: u32,
    n: u32,
}

impl BitWriter {
    fn push(&mut self, value: u32, width: u32) {
        self.acc |= value << self.n;
        self.n += width;
        while self.n >= 8 {
            self.out.push(self.acc as u8);
            self.acc >>= 8;
            self.n -= 8;
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.n > 0 {
            self.out.push(self.acc as u8);
        }
        self.out
    }
}

pub fn encode(model: &Model) -> Vec<u8> {
    store(&ModelWriter::new(model).to_bytes())
}

/// Three vertices, one untextured face, nothing else.
pub fn triangle() -> Model {
    let vertices = [Vec3::ZERO, Vec3::X, Vec3::Y]
        .into_iter()
        .map(|position| Vertex {
            position,
            normal: Vec3::Z,
            ..Default::default()
        })
        .collect();

    let mut model = Model::default();
    model.headers.primary.version = 1.0;
    model.headers.geometry = Some(ftl::model::header::GeometryHeader {
        name: "triangle".into(),
        ..Default::default()
    });
    model.geometry = Geometry {
        vertices,
        faces: vec![Face {
            vertices: [0, 1, 2],
            texture: -1,
            v: [0.0, 0.0, 1.0],
            u: [0.0, 1.0, 0.0],
            ..Default::default()
        }],
        ..Default::default()
    };
    model
}

/// A model touching every section.
pub fn goblin() -> Model {
    let mut model = triangle();
    model.headers.geometry = Some(ftl::model::header::GeometryHeader {
        name: "goblin_base".into(),
        origin: 1,
        ..Default::default()
    });
    let g = &mut model.geometry;
    g.vertices.push(Vertex {
        position: Vec3::new(0.0, -10.0, 5.0),
        ..Default::default()
    });
    g.faces.push(Face {
        vertices: [1, 3, 2],
        texture: 0,
        face_type: FlagSet::from(FaceFlag::DoubleSided).bits(),
        ..Default::default()
    });
    g.faces.push(Face {
        vertices: [0, 3, 1],
        texture: 1,
        ..Default::default()
    });
    g.textures = vec![
        TexturePath("GRAPH\\OBJ3D\\TEXTURES\\GOBLIN_SKIN.BMP".into()),
        TexturePath("GRAPH\\OBJ3D\\TEXTURES\\GOBLIN_EYES.BMP".into()),
    ];
    g.groups = vec![
        VertexGroup {
            name: "head".into(),
            origin: 3,
            vertex_count: 2,
            radius: 4.0,
            indices: vec![2, 3],
            ..Default::default()
        },
        VertexGroup {
            name: "empty".into(),
            ..Default::default()
        },
    ];
    g.actions = vec![ActionPoint {
        name: "primary_attach".into(),
        vertex: 3,
        action: 1,
        sfx: -1,
    }];
    g.selections = vec![VertexSelection {
        name: "chest".into(),
        vertex_count: 3,
        indices: vec![0, 1, 2],
        ..Default::default()
    }];

    model.collision_spheres = vec![CollisionSphere {
        vertex: 3,
        flags: 0,
        radius: 12.5,
    }];
    model.progressive = vec![ProgressiveVertex::default(); 4];
    let cv = ClothVertex {
        mesh_vertex: 2,
        mass: 0.5,
        ..Default::default()
    };
    model.cloth = Cloth {
        vertices: vec![cv; 2],
        backup: vec![cv; 2],
        springs: vec![ClothSpring {
            start: 0,
            end: 1,
            rest_length: 1.0,
            stiffness: 0.8,
            damping: 0.1,
            kind: 0,
        }],
    };
    model
}
