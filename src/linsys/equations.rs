//! Linear equation construction via cross-product elimination
//!
//! An unknown trajectory (P, V) meets an observed point (p, v) at some time t
//! exactly when P + tV = p + tv, i.e. (P - p) and (V - v) are anti-parallel:
//! (P - p) × (V - v) = 0. That constraint is bilinear in the unknowns, but
//! the bilinear P × V term is identical for every observed point, so
//! subtracting the expanded constraints of two points cancels it and leaves
//! three equations per pair that are linear in the six unknowns:
//!
//!   -[vi - vj]x * P + [pi - pj]x * V = pi x vi - pj x vj
//!
//! where [a]x is the skew-symmetric cross-product matrix. Two pairs drawn
//! from a triple of points stack into a 6x6 system.

use crate::observations::{ObservedPoint, Vec3};
use nalgebra::{Matrix3, Matrix3x6, Matrix6, Vector3, Vector6};

/// Skew-symmetric matrix of `v`, satisfying `skew(v) * w == v x w`
pub fn skew(v: Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(
        0.0, -v.z, v.y, //
        v.z, 0.0, -v.x, //
        -v.y, v.x, 0.0,
    )
}

fn cross_as_f64(a: &Vec3, b: &Vec3) -> Vector3<f64> {
    let (x, y, z) = a.cross_wide(b);
    Vector3::new(x as f64, y as f64, z as f64)
}

/// The three linear equations obtained by eliminating the bilinear term
/// between two observed points: a 3x6 coefficient block and its right-hand side
pub fn pair_equations(a: &ObservedPoint, b: &ObservedPoint) -> (Matrix3x6<f64>, Vector3<f64>) {
    let dv = (a.velocity - b.velocity).to_f64();
    let dp = (a.position - b.position).to_f64();

    let mut rows = Matrix3x6::zeros();
    rows.fixed_view_mut::<3, 3>(0, 0).copy_from(&(-skew(dv)));
    rows.fixed_view_mut::<3, 3>(0, 3).copy_from(&skew(dp));

    let rhs = cross_as_f64(&a.position, &a.velocity) - cross_as_f64(&b.position, &b.velocity);

    (rows, rhs)
}

/// Stack the equations of pairs (a, b) and (a, c) into a full 6x6 system
/// in the unknowns (px, py, pz, vx, vy, vz)
pub fn triple_system(
    a: &ObservedPoint,
    b: &ObservedPoint,
    c: &ObservedPoint,
) -> (Matrix6<f64>, Vector6<f64>) {
    let (rows_ab, rhs_ab) = pair_equations(a, b);
    let (rows_ac, rhs_ac) = pair_equations(a, c);

    let mut matrix = Matrix6::zeros();
    matrix.fixed_view_mut::<3, 6>(0, 0).copy_from(&rows_ab);
    matrix.fixed_view_mut::<3, 6>(3, 0).copy_from(&rows_ac);

    let mut rhs = Vector6::zeros();
    rhs.fixed_view_mut::<3, 1>(0, 0).copy_from(&rhs_ab);
    rhs.fixed_view_mut::<3, 1>(3, 0).copy_from(&rhs_ac);

    (matrix, rhs)
}
