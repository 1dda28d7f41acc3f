// Resolver and builder-state tests.

use super::*;
use crate::geometry::ApproxEq;
use crate::line::ops::op_close;
use crate::position::{pos, x, xx, y, yy};
use crate::steps;

fn front() -> Plane {
    Plane::xz().offset(-5.0)
}

fn pt(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

#[test]
fn test_close_against_axis_makes_rectangle() {
    let mut lb = BuildLine::new(front());
    lb.append(steps![x(10.0), y(10.0), op_close().both(Axis::y()).op().unwrap()])
        .unwrap();

    let expected = [pt(0.0, 5.0, 0.0), pt(10.0, 5.0, 0.0), pt(10.0, 5.0, 10.0), pt(0.0, 5.0, 10.0)];
    assert_eq!(lb.len(), 4);
    for (seg, want) in lb.shapes().iter().zip(expected) {
        assert!(seg.start().approx_eq(&want), "got {:?}, want {:?}", seg.start(), want);
    }
    assert!(lb.end().approx_eq(&expected[0]));
    assert_eq!(lb.chains().len(), 1);
}

#[test]
fn test_resolution_is_idempotent() {
    let mut lb = BuildLine::new(front());
    lb.apply(x(3.0)).unwrap();
    for marker in [x(1.0), y(-2.0), xx(4.0), yy(1.5), pos(2.0, 2.0)] {
        assert_eq!(lb.to_vector(&marker, None), lb.to_vector(&marker, None));
    }
}

#[test]
fn test_direction_resolution_cases() {
    let lb = BuildLine::new(front());
    let up = Vector3::z();
    assert!(lb.to_direction(&(0.0, 1.0).into()).approx_eq(&up));
    assert!(lb.to_direction(&Vector3::y().into()).approx_eq(&Vector3::y()));
    assert!(lb.to_direction(&Axis::y().into()).approx_eq(&up));
    assert!(lb.to_direction(&y(1.0)).approx_eq(&up));
}

#[test]
fn test_offset_and_absolute_use_the_end_point() {
    let mut lb = BuildLine::new(Plane::xy());
    lb.apply((4.0, 3.0)).unwrap();
    assert!(lb.to_vector(&x(2.0), None).approx_eq(&pt(6.0, 3.0, 0.0)));
    assert!(lb.to_vector(&yy(-1.0), None).approx_eq(&pt(4.0, -1.0, 0.0)));
    assert!(lb.to_vector(&x(2.0), Some(Point3::origin())).approx_eq(&pt(2.0, 0.0, 0.0)));
}

#[test]
fn test_normal_plane_from_marker_and_axis() {
    let mut lb = BuildLine::new(Plane::xy());
    lb.apply((2.0, 1.0)).unwrap();

    let plane = lb.to_normal_plane(&x(3.0).into(), None).unwrap();
    assert!(plane.origin.approx_eq(&pt(5.0, 1.0, 0.0)));
    assert!(plane.z_dir.approx_eq(&Vector3::x()));

    let plane = lb.to_normal_plane(&Axis::x().offset(0.0, 4.0, 0.0).into(), None).unwrap();
    assert!(plane.contains(&pt(-7.0, 4.0, 0.0), 1e-9));
    assert!(plane.contains(&pt(3.0, 4.0, 2.0), 1e-9));
}

#[test]
fn test_normal_plane_needs_a_hint() {
    let lb = BuildLine::new(Plane::xy());
    let err = lb.to_normal_plane(&pos(1.0, 1.0).into(), None).unwrap_err();
    assert!(matches!(err, DraftError::MissingNormal));
    assert!(err.is_precondition());

    let shape = Segment::line(Point3::origin(), pt(1.0, 0.0, 0.0));
    assert!(lb.to_normal_plane(&shape.into(), None).is_err());
}

#[test]
fn test_start_state_before_any_segment() {
    let lb = BuildLine::starting_at(front(), (1.0, 2.0)).with_tangent((0.0, 1.0));
    assert!(lb.is_empty());
    assert!(lb.end().approx_eq(&pt(1.0, 5.0, 2.0)));
    assert!(lb.start().approx_eq(&lb.end()));
    assert!(lb.tangent().approx_eq(&Vector3::z()));
    assert!(lb.tangent_at(-1, 0.5).unwrap().approx_eq(&Vector3::z()));
    assert!(lb.first_end().is_none());
    assert!(lb.last_start().is_none());
}

#[test]
fn test_tangent_and_normal_follow_last_segment() {
    let mut lb = BuildLine::new(Plane::xy());
    lb.append(steps![x(5.0), y(5.0)]).unwrap();
    assert!(lb.tangent().approx_eq(&Vector3::y()));
    assert!(lb.normal().approx_eq(&-Vector3::x()));
    assert!(lb.tangent_at(0, 0.0).unwrap().approx_eq(&Vector3::x()));
    assert!(lb.normal_at(0, 1.0).unwrap().approx_eq(&Vector3::y()));
    assert!(lb.first_end().unwrap().approx_eq(&pt(5.0, 0.0, 0.0)));
    assert!(lb.last_start().unwrap().approx_eq(&pt(5.0, 0.0, 0.0)));
    assert!(matches!(lb.tangent_at(7, 0.0), Err(DraftError::NotFound(_))));
}

#[test]
fn test_normal_location_frame() {
    let mut lb = BuildLine::new(Plane::xy());
    lb.apply(x(4.0)).unwrap();
    let frame = lb.normal_location(-1, 0.5, false).unwrap();
    assert!(frame.origin.approx_eq(&pt(2.0, 0.0, 0.0)));
    assert!(frame.x_dir.approx_eq(&Vector3::x()));
    assert!(frame.z_dir.approx_eq(&Vector3::y()));

    let flipped = lb.normal_location(-1, 0.5, true).unwrap();
    assert!(flipped.x_dir.approx_eq(&-Vector3::x()));
    assert!(flipped.z_dir.approx_eq(&-Vector3::y()));
}

#[test]
fn test_index_and_name_access() {
    let mut lb = BuildLine::new(Plane::xy());
    lb.append(steps![x(1.0), Segment::line(pt(1.0, 0.0, 0.0), pt(1.0, 1.0, 0.0)).named("side")])
        .unwrap();
    assert!(lb.get_by_index(-1).unwrap().end().approx_eq(&pt(1.0, 1.0, 0.0)));
    assert!(lb.get_by_index(0).unwrap().end().approx_eq(&pt(1.0, 0.0, 0.0)));
    assert!(lb.get_by_index(2).is_none());
    assert!(lb.get_by_name("side").is_some());
    assert!(lb.get_by_name("missing").is_none());
}

#[test]
fn test_translate_moves_named_segments() {
    let mut lb = BuildLine::new(Plane::xy());
    lb.apply(Segment::line(Point3::origin(), pt(2.0, 0.0, 0.0)).named("a")).unwrap();
    lb.translate(&Vector3::new(0.0, 3.0, 0.0));
    assert!(lb.get_by_name("a").unwrap().start().approx_eq(&pt(0.0, 3.0, 0.0)));
}

#[test]
fn test_added_shape_and_edges() {
    let mut lb = BuildLine::new(Plane::xy());
    let added = lb.add_shape(Edge::line(Point3::origin(), pt(0.0, 2.0, 0.0))).end();
    assert!(added.approx_eq(&pt(0.0, 2.0, 0.0)));
    lb.apply(x(3.0)).unwrap();
    assert_eq!(lb.edges().len(), 2);
    assert_eq!(lb.wire().unwrap().edges.len(), 2);
    assert!(matches!(BuildLine::new(Plane::xy()).wire(), Err(DraftError::EmptyProfile)));
}

#[test]
fn test_open_profile_has_no_face() {
    let mut lb = BuildLine::new(Plane::xy());
    lb.append(steps![x(3.0), y(3.0)]).unwrap();
    assert!(matches!(lb.face(), Err(DraftError::OpenProfile(_))));
}
