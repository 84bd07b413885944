//! Cube model for the 3D orientation view.
//!
//! The renderer draws two cubes: the live one following the sensor, and a
//! translucent overlay following the preset. Both use the same mesh and the
//! same rotation convention: rotate about X, then Y, then Z, each by the
//! angle in degrees, all about the fixed world axes.

use nalgebra::{Point3, Rotation3, Vector3};

/// Half the cube edge length
pub const CUBE_HALF_SIZE: f64 = 50.0;

/// Cube corners
pub const CUBE_VERTICES: [[f64; 3]; 8] = [
    [-CUBE_HALF_SIZE, -CUBE_HALF_SIZE, -CUBE_HALF_SIZE],
    [CUBE_HALF_SIZE, -CUBE_HALF_SIZE, -CUBE_HALF_SIZE],
    [CUBE_HALF_SIZE, CUBE_HALF_SIZE, -CUBE_HALF_SIZE],
    [-CUBE_HALF_SIZE, CUBE_HALF_SIZE, -CUBE_HALF_SIZE],
    [-CUBE_HALF_SIZE, -CUBE_HALF_SIZE, CUBE_HALF_SIZE],
    [CUBE_HALF_SIZE, -CUBE_HALF_SIZE, CUBE_HALF_SIZE],
    [CUBE_HALF_SIZE, CUBE_HALF_SIZE, CUBE_HALF_SIZE],
    [-CUBE_HALF_SIZE, CUBE_HALF_SIZE, CUBE_HALF_SIZE],
];

/// Two triangles per side, indices into [`CUBE_VERTICES`]
pub const CUBE_FACES: [[usize; 3]; 12] = [
    [0, 1, 2],
    [0, 2, 3],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [2, 3, 7],
    [2, 7, 6],
    [1, 2, 6],
    [1, 6, 5],
    [0, 3, 7],
    [0, 7, 4],
];

/// Rotation for the given angles in degrees: X first, then Y, then Z.
pub fn rotation(x_deg: f64, y_deg: f64, z_deg: f64) -> Rotation3<f64> {
    let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
    let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
    let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());
    rz * ry * rx
}

/// Cube corners after applying `rotation`
pub fn transformed_vertices(rotation: &Rotation3<f64>) -> [Point3<f64>; 8] {
    CUBE_VERTICES.map(|[x, y, z]| rotation * Point3::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector3<f64>, b: Vector3<f64>) {
        assert!((a - b).norm() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_identity() {
        let r = rotation(0.0, 0.0, 0.0);
        let v = transformed_vertices(&r);
        for (p, [x, y, z]) in v.iter().zip(CUBE_VERTICES) {
            assert_close(p.coords, Vector3::new(x, y, z));
        }
    }

    #[test]
    fn test_single_axis() {
        let r = rotation(90.0, 0.0, 0.0);
        assert_close(r * Vector3::y(), Vector3::z());

        let r = rotation(0.0, 0.0, 90.0);
        assert_close(r * Vector3::x(), Vector3::y());
    }

    #[test]
    fn test_x_applied_before_y() {
        // X leaves the x axis alone, then Y swings it to -z
        let r = rotation(90.0, 90.0, 0.0);
        assert_close(r * Vector3::x(), -Vector3::z());
        // y goes to z under X, then z goes to x under Y
        assert_close(r * Vector3::y(), Vector3::x());

        let r = rotation(0.0, 90.0, 90.0);
        assert_close(r * Vector3::x(), -Vector3::z());
        assert_close(r * Vector3::y(), -Vector3::x());
    }

    #[test]
    fn test_faces_reference_valid_vertices() {
        assert!(CUBE_FACES.iter().flatten().all(|&i| i < CUBE_VERTICES.len()));
    }

    #[test]
    fn test_rotation_preserves_size() {
        let r = rotation(17.2, 1.7, -75.0);
        for p in transformed_vertices(&r) {
            assert!((p.coords.norm() - CUBE_HALF_SIZE * 3f64.sqrt()).abs() < 1e-9);
        }
    }
}
