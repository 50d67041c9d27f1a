//! Random spawn placement and orientation

use ember_core::RandomSource;
use glam::{Quat, Vec3};

/// Uniform-by-area random point in the disk of `radius` around `center`,
/// lying in the plane orthogonal to `normal`.
pub fn random_point_in_disk(
    rng: &mut impl RandomSource,
    center: Vec3,
    normal: Vec3,
    radius: f32,
) -> Vec3 {
    let (u, v) = disk_basis(normal);
    let theta = rng.next_f32() * std::f32::consts::TAU;
    let r = rng.next_f32().sqrt() * radius;
    center + u * (r * theta.cos()) + v * (r * theta.sin())
}

/// Random rotation about a uniformly random unit axis
pub fn random_orientation(rng: &mut impl RandomSource) -> Quat {
    let axis = Vec3::from_array(rng.unit_vector()).normalize_or(Vec3::Y);
    let angle = rng.next_f32() * std::f32::consts::TAU;
    Quat::from_axis_angle(axis, angle)
}

/// Two unit vectors spanning the plane orthogonal to `normal`
fn disk_basis(normal: Vec3) -> (Vec3, Vec3) {
    let n = normal.normalize_or(Vec3::X);
    // Helper axis must stay well away from the normal or the cross product degenerates
    let helper = if n.z.abs() > 0.99 { Vec3::X } else { Vec3::Z };
    let u = helper.cross(n).normalize();
    let v = n.cross(u).normalize();
    (u, v)
}
