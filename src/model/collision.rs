use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

/// Axis-aligned box attached to a piece for hit and selection tests.
///
/// `scales` is the full size of the box, `offsets` its centre in piece space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionVolume {
    pub scales: glm::Vec3,
    pub offsets: glm::Vec3,
}

impl CollisionVolume {
    pub fn new_box(size: glm::Vec3, center: glm::Vec3) -> Self {
        Self {
            scales: glm::abs(&size),
            offsets: center,
        }
    }

    pub fn half_extents(&self) -> glm::Vec3 {
        self.scales * 0.5
    }

    pub fn bounding_radius(&self) -> f32 {
        glm::length(&self.half_extents())
    }

    /// Point given in the same space as `offsets`.
    pub fn contains(&self, p: &glm::Vec3) -> bool {
        let d = glm::abs(&(p - self.offsets));
        let h = self.half_extents();
        d.x <= h.x && d.y <= h.y && d.z <= h.z
    }
}
