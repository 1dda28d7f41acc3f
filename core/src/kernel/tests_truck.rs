// Solid construction through truck, checked by tessellated volume.

use super::*;
use crate::geometry::{Axis, Edge, Plane, Point3, Vector3};
use crate::profile::Profile;
use approx::assert_relative_eq;
use std::f64::consts::PI;

fn kernel() -> TruckKernel {
    TruckKernel::with_tolerance(0.005)
}

fn square(plane: Plane, side: f64) -> Profile {
    Profile::rectangle(plane, side, side)
}

#[test]
fn test_extrude_square_volume() {
    let k = kernel();
    let solid = k
        .extrude_profile(&square(Plane::xy(), 10.0), &ExtrudeParams::linear(5.0))
        .expect("extrude failed");
    let mesh = k.tessellate(&solid).expect("tessellation failed");
    assert_relative_eq!(mesh.volume(), 500.0, max_relative = 1e-6);
    assert_eq!(mesh.face_count(), 6);
}

#[test]
fn test_extrude_ignores_loop_direction() {
    let k = kernel();
    let ccw = square(Plane::xy(), 4.0);
    let cw = Profile {
        plane: ccw.plane,
        edges: ccw.edges.iter().rev().map(Edge::reversed).collect(),
    };
    let params = ExtrudeParams::linear(2.0);
    let a = k.tessellate(&k.extrude_profile(&ccw, &params).unwrap()).unwrap();
    let b = k.tessellate(&k.extrude_profile(&cw, &params).unwrap()).unwrap();
    assert_relative_eq!(a.volume(), b.volume(), max_relative = 1e-9);
    assert_relative_eq!(a.volume().abs(), 32.0, max_relative = 1e-6);
}

#[test]
fn test_extrude_both_sides() {
    let k = kernel();
    let solid = k
        .extrude_profile(&square(Plane::xy(), 2.0), &ExtrudeParams::linear(3.0).symmetric())
        .unwrap();
    let mesh = k.tessellate(&solid).unwrap();
    assert_relative_eq!(mesh.volume().abs(), 24.0, max_relative = 1e-6);
    let (lo, hi) = mesh.bounds().unwrap();
    assert_relative_eq!(lo.z, -3.0, epsilon = 1e-9);
    assert_relative_eq!(hi.z, 3.0, epsilon = 1e-9);
}

#[test]
fn test_extrude_circle_approximates_cylinder() {
    let k = kernel();
    let solid = k
        .extrude_profile(&Profile::circle(Plane::xy(), 5.0), &ExtrudeParams::linear(10.0))
        .unwrap();
    let mesh = k.tessellate(&solid).unwrap();
    assert_relative_eq!(mesh.volume().abs(), PI * 250.0, max_relative = 0.01);
}

#[test]
fn test_revolve_offset_square_into_ring() {
    let k = kernel();
    // 2x2 square centered 5 from the Z axis in the XZ plane
    let profile = square(Plane::xz().translated(Vector3::new(5.0, 0.0, 0.0)), 2.0);
    let params = RevolveParams { axis: Axis::z(), angle: std::f64::consts::TAU };
    let solid = k.revolve_profile(&profile, &params).expect("revolve failed");
    let mesh = k.tessellate(&solid).unwrap();
    assert_relative_eq!(mesh.volume().abs(), 2.0 * PI * 5.0 * 4.0, max_relative = 0.01);
}

#[test]
fn test_revolve_rejects_axis_through_centroid() {
    let k = kernel();
    let params = RevolveParams { axis: Axis::z(), angle: PI };
    let res = k.revolve_profile(&square(Plane::xz(), 2.0), &params);
    assert!(matches!(res, Err(KernelOpError::InvalidGeometry(_))));
}

#[test]
fn test_sweep_along_line() {
    let k = kernel();
    let path = [Edge::line(Point3::origin(), Point3::new(0.0, 0.0, 7.0))];
    let solid = k.sweep_profile(&square(Plane::xy(), 2.0), &path).unwrap();
    let mesh = k.tessellate(&solid).unwrap();
    assert_relative_eq!(mesh.volume().abs(), 28.0, max_relative = 1e-6);
}

#[test]
fn test_sweep_along_quarter_arc() {
    let k = kernel();
    // Path leaves the origin along +Y and bends about (10, 0, 0)
    let arc = Edge::arc(Point3::new(10.0, 0.0, 0.0), Point3::origin(), -Vector3::z(), PI / 2.0);
    let section = square(Plane::from_normal(Point3::origin(), arc.start_tangent()), 2.0);
    let solid = k.sweep_profile(&section, &[arc]).unwrap();
    let mesh = k.tessellate(&solid).unwrap();
    assert_relative_eq!(mesh.volume().abs(), PI / 2.0 * 4.0 * 10.0, max_relative = 0.01);
}

#[test]
fn test_zero_extrusion_is_rejected() {
    let k = kernel();
    let res = k.extrude_profile(&square(Plane::xy(), 1.0), &ExtrudeParams::linear(0.0));
    assert!(matches!(res, Err(KernelOpError::InvalidGeometry(_))));
}

#[test]
fn test_step_export_has_header() {
    let k = kernel();
    let solid = k
        .extrude_profile(&square(Plane::xy(), 1.0), &ExtrudeParams::linear(1.0))
        .unwrap();
    let step = k.export_step(&solid).expect("STEP export failed");
    assert!(step.starts_with("ISO-10303-21;"));
    assert!(step.contains("draft_export.step"));
}
