use glam::Vec3;

use crate::{
    binaries::BinaryData,
    cursor::{Cursor, Writer},
    error::Result,
};

/// Mass point of the cloth simulation, bound to a mesh vertex.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ClothVertex {
    pub mesh_vertex: i16,
    pub flags: i8,
    pub collide: i8,
    pub position: Vec3,
    pub velocity: Vec3,
    pub force: Vec3,
    pub mass: f32,
    pub temp_position: Vec3,
    pub temp_velocity: Vec3,
    pub temp_force: Vec3,
    pub last_position: Vec3,
}

impl BinaryData for ClothVertex {
    const SIZE: usize = 92;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            mesh_vertex: cursor.read_i16()?,
            flags: cursor.read_i8()?,
            collide: cursor.read_i8()?,
            position: cursor.read_vec3()?,
            velocity: cursor.read_vec3()?,
            force: cursor.read_vec3()?,
            mass: cursor.read_f32()?,
            temp_position: cursor.read_vec3()?,
            temp_velocity: cursor.read_vec3()?,
            temp_force: cursor.read_vec3()?,
            last_position: cursor.read_vec3()?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_i16(self.mesh_vertex);
        writer.write_i8(self.flags);
        writer.write_i8(self.collide);
        writer.write_vec3(self.position);
        writer.write_vec3(self.velocity);
        writer.write_vec3(self.force);
        writer.write_f32(self.mass);
        writer.write_vec3(self.temp_position);
        writer.write_vec3(self.temp_velocity);
        writer.write_vec3(self.temp_force);
        writer.write_vec3(self.last_position);
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ClothSpring {
    pub start: i16,
    pub end: i16,
    pub rest_length: f32,
    pub stiffness: f32,
    pub damping: f32,
    pub kind: i32,
}

impl BinaryData for ClothSpring {
    const SIZE: usize = 20;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            start: cursor.read_i16()?,
            end: cursor.read_i16()?,
            rest_length: cursor.read_f32()?,
            stiffness: cursor.read_f32()?,
            damping: cursor.read_f32()?,
            kind: cursor.read_i32()?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_i16(self.start);
        writer.write_i16(self.end);
        writer.write_f32(self.rest_length);
        writer.write_f32(self.stiffness);
        writer.write_f32(self.damping);
        writer.write_i32(self.kind);
    }
}
