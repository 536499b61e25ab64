use nalgebra_glm as glm;

/// Initial extents; any real vertex shrinks them.
pub const DEF_MIN_SIZE: f32 = 10000.0;
pub const DEF_MAX_SIZE: f32 = -10000.0;

pub fn def_mins() -> glm::Vec3 {
    glm::vec3(DEF_MIN_SIZE, DEF_MIN_SIZE, DEF_MIN_SIZE)
}

pub fn def_maxs() -> glm::Vec3 {
    glm::vec3(DEF_MAX_SIZE, DEF_MAX_SIZE, DEF_MAX_SIZE)
}

/// Splits a `T * R * S` matrix into its scale, rotation and translation.
///
/// A mirrored basis (negative determinant) is folded into a negative scale.
pub fn decompose(m: &glm::Mat4) -> (glm::Vec3, glm::Quat, glm::Vec3) {
    let translation = glm::vec3(m[(0, 3)], m[(1, 3)], m[(2, 3)]);

    let mut columns = [axis(m, 0), axis(m, 1), axis(m, 2)];
    let mut scale = glm::vec3(
        glm::length(&columns[0]),
        glm::length(&columns[1]),
        glm::length(&columns[2]),
    );

    let basis = glm::Mat3::from_columns(&columns);
    if glm::determinant(&basis) < 0.0 {
        scale = -scale;
    }

    for (i, column) in columns.iter_mut().enumerate() {
        if scale[i] != 0.0 {
            *column /= scale[i];
        }
    }

    let rotation = glm::mat3_to_quat(&glm::Mat3::from_columns(&columns));
    (scale, rotation, translation)
}

/// Column `i` of the upper 3x3 block.
pub fn axis(m: &glm::Mat4, i: usize) -> glm::Vec3 {
    glm::vec3(m[(0, i)], m[(1, i)], m[(2, i)])
}

/// Rotation-only matrix whose columns are the given axes.
pub fn from_axes(x: &glm::Vec3, y: &glm::Vec3, z: &glm::Vec3) -> glm::Mat4 {
    glm::Mat4::from_columns(&[
        glm::vec4(x.x, x.y, x.z, 0.0),
        glm::vec4(y.x, y.y, y.z, 0.0),
        glm::vec4(z.x, z.y, z.z, 0.0),
        glm::vec4(0.0, 0.0, 0.0, 1.0),
    ])
}

pub fn transform_point(m: &glm::Mat4, p: &glm::Vec3) -> glm::Vec3 {
    let v = m * glm::vec4(p.x, p.y, p.z, 1.0);
    glm::vec3(v.x, v.y, v.z)
}

pub fn is_identity(m: &glm::Mat4) -> bool {
    let identity = glm::identity::<f32, 4>();
    m.iter()
        .zip(identity.iter())
        .all(|(a, b)| (a - b).abs() <= 1e-6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &glm::Vec3, b: &glm::Vec3) -> bool {
        glm::length(&(a - b)) < 1e-4
    }

    #[test]
    fn decompose_recovers_trs() {
        let rotation = glm::quat_angle_axis(0.5, &glm::vec3(0.0, 1.0, 0.0));
        let m = glm::translation(&glm::vec3(1.0, 2.0, 3.0))
            * glm::quat_to_mat4(&rotation)
            * glm::scaling(&glm::vec3(2.0, 3.0, 4.0));

        let (s, r, t) = decompose(&m);
        assert!(close(&t, &glm::vec3(1.0, 2.0, 3.0)));
        assert!(close(&s, &glm::vec3(2.0, 3.0, 4.0)));

        let p = glm::vec3(1.0, 0.0, 0.0);
        assert!(close(&glm::quat_rotate_vec3(&r, &p), &glm::quat_rotate_vec3(&rotation, &p)));
    }

    #[test]
    fn mirrored_basis_gives_negative_scale() {
        let m = glm::scaling(&glm::vec3(-1.0, 1.0, 1.0));
        let (s, _, _) = decompose(&m);
        assert!(s.x < 0.0 && s.y < 0.0 && s.z < 0.0);
    }

    #[test]
    fn identity_detection() {
        assert!(is_identity(&glm::identity::<f32, 4>()));
        assert!(!is_identity(&glm::rotate_y(&glm::identity::<f32, 4>(), 0.1)));
    }

    #[test]
    fn point_transform_includes_translation() {
        let m = glm::translation(&glm::vec3(0.0, 5.0, 0.0));
        let p = transform_point(&m, &glm::vec3(1.0, 1.0, 1.0));
        assert!(close(&p, &glm::vec3(1.0, 6.0, 1.0)));
    }
}
