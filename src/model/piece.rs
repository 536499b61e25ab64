use crate::math;
use crate::model::collision::CollisionVolume;
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

/// Texture-coordinate channels kept per vertex.
pub const NUM_MODEL_UVCHANNS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub usize);

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize)]
pub struct PieceVertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub s_tangent: [f32; 3],
    pub t_tangent: [f32; 3],
    pub tex_coords: [[f32; 2]; NUM_MODEL_UVCHANNS],
}

impl Default for PieceVertex {
    fn default() -> Self {
        Self {
            pos: [0.0; 3],
            normal: [0.0, 1.0, 0.0],
            s_tangent: [0.0; 3],
            t_tangent: [0.0; 3],
            tex_coords: [[0.0; 2]; NUM_MODEL_UVCHANNS],
        }
    }
}

/// Order in which scripted rotation angles are applied, as stored in the
/// override document's `rotAxisMap` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisMapping {
    #[default]
    Xyz = 0,
    Zxy = 1,
    Yxz = 2,
    Xzy = 3,
    Zyx = 4,
    Yzx = 5,
}

impl AxisMapping {
    pub fn from_int(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Xyz),
            1 => Some(Self::Zxy),
            2 => Some(Self::Yxz),
            3 => Some(Self::Xzy),
            4 => Some(Self::Zyx),
            5 => Some(Self::Yzx),
            _ => None,
        }
    }

    /// Only these two orders have a defined rotation sequence.
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Xyz | Self::Xzy)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    pub name: String,
    /// Name of the declared parent; only meaningful until the hierarchy is linked.
    pub parent_name: String,
    pub parent: Option<PieceId>,
    pub children: Vec<PieceId>,

    pub offset: glm::Vec3,
    pub goffset: glm::Vec3,
    scales: glm::Vec3,
    /// Scripted pose rotation in radians (pitch, yaw, roll).
    pub rot_angles: glm::Vec3,
    pub rot_axis_signs: glm::Vec3,
    pub axis_map_type: AxisMapping,
    pub baked_rot_matrix: glm::Mat4,
    pub has_identity_rotation: bool,

    pub vertices: Vec<PieceVertex>,
    pub vertex_draw_indices: Vec<u32>,
    pub num_tex_coord_channels: usize,
    pub has_geometry_data: bool,

    pub mins: glm::Vec3,
    pub maxs: glm::Vec3,
    pub collision_volume: Option<CollisionVolume>,
}

impl Piece {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_name: String::new(),
            parent: None,
            children: Vec::new(),
            offset: glm::Vec3::zeros(),
            goffset: glm::Vec3::zeros(),
            scales: glm::vec3(1.0, 1.0, 1.0),
            rot_angles: glm::Vec3::zeros(),
            rot_axis_signs: glm::vec3(-1.0, -1.0, -1.0),
            axis_map_type: AxisMapping::Xyz,
            baked_rot_matrix: glm::identity::<f32, 4>(),
            has_identity_rotation: true,
            vertices: Vec::new(),
            vertex_draw_indices: Vec::new(),
            num_tex_coord_channels: 0,
            has_geometry_data: false,
            mins: math::def_mins(),
            maxs: math::def_maxs(),
            collision_volume: None,
        }
    }

    pub fn scales(&self) -> glm::Vec3 {
        self.scales
    }

    /// Non-uniform scaling is not supported; y and z always follow x.
    pub fn set_scales(&mut self, scales: glm::Vec3) {
        self.scales = glm::vec3(scales.x, scales.x, scales.x);
    }

    pub fn set_num_tex_coord_channels(&mut self, n: usize) {
        self.num_tex_coord_channels = self.num_tex_coord_channels.max(n);
    }

    /// Applies pose angles `r` to `m` in yaw, pitch, roll order for the
    /// piece's axis mapping. Unsupported mappings fall back to XYZ.
    pub fn compose_rotation(&self, m: &glm::Mat4, r: &glm::Vec3) -> glm::Mat4 {
        let signs = &self.rot_axis_signs;
        let mut m = *m;
        match self.axis_map_type {
            // Y and Z swapped: yaw about Z, roll about Y
            AxisMapping::Xzy => {
                if r.y != 0.0 {
                    m = glm::rotate_z(&m, r.y * signs.y);
                }
                if r.x != 0.0 {
                    m = glm::rotate_x(&m, r.x * signs.x);
                }
                if r.z != 0.0 {
                    m = glm::rotate_y(&m, r.z * signs.z);
                }
            }
            _ => {
                if r.y != 0.0 {
                    m = glm::rotate_y(&m, r.y * signs.y);
                }
                if r.x != 0.0 {
                    m = glm::rotate_x(&m, r.x * signs.x);
                }
                if r.z != 0.0 {
                    m = glm::rotate_z(&m, r.z * signs.z);
                }
            }
        }
        m
    }

    /// `T(t) * R(baked) * R(r) * S(s)`.
    pub fn compose_transform(&self, t: &glm::Vec3, r: &glm::Vec3, s: &glm::Vec3) -> glm::Mat4 {
        let mut m = glm::identity::<f32, 4>();
        if *t != glm::Vec3::zeros() {
            m = glm::translate(&m, t);
        }
        if !self.has_identity_rotation {
            m *= self.baked_rot_matrix;
        }
        m = self.compose_rotation(&m, r);
        if *s != glm::vec3(1.0, 1.0, 1.0) {
            m = glm::scale(&m, s);
        }
        m
    }

    /// Baked rotation and scale without translation.
    pub fn scale_rot_matrix(&self) -> glm::Mat4 {
        self.compose_transform(&glm::Vec3::zeros(), &glm::Vec3::zeros(), &self.scales)
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertex_draw_indices)
    }
}
