// Operation tests on the XY plane unless noted.

use super::*;
use crate::geometry::ApproxEq;
use crate::line::ops::*;
use crate::position::{x, xx, y, yy};
use crate::steps;
use approx::assert_relative_eq;
use std::f64::consts::PI;

fn pt(x: f64, y: f64) -> Point3 {
    Point3::new(x, y, 0.0)
}

fn xy() -> BuildLine {
    BuildLine::new(Plane::xy())
}

fn assert_at(actual: Point3, expected: Point3) {
    assert!(actual.approx_eq(&expected), "got {actual:?}, want {expected:?}");
}

// ===== start / line =====

#[test]
fn test_start_moves_first_point() {
    let mut lb = xy();
    lb.append(steps![op_start().start((5.0, 5.0)).op().unwrap(), x(1.0)]).unwrap();
    assert_at(lb.start(), pt(5.0, 5.0));
    assert_at(lb.end(), pt(6.0, 5.0));
}

#[test]
fn test_line_length_and_angle() {
    let mut lb = xy();
    lb.append(steps![x(10.0), op_line().length(5.0).angle(90.0).op().unwrap()]).unwrap();
    assert_at(lb.end(), pt(10.0, 5.0));
}

#[test]
fn test_line_to_from_explicit_start() {
    let mut lb = xy();
    lb.apply(op_line().start((1.0, 1.0)).to(x(2.0)).op().unwrap()).unwrap();
    assert_at(lb.start(), pt(1.0, 1.0));
    assert_at(lb.end(), pt(3.0, 1.0));
}

#[test]
fn test_line_until_marker_plane() {
    let mut lb = xy();
    lb.apply(op_line().until(xx(7.0)).op().unwrap()).unwrap();
    assert_at(lb.end(), pt(7.0, 0.0));
}

#[test]
fn test_line_until_unreachable_target() {
    let mut lb = xy();
    let res = lb.apply(op_line().dir((0.0, 1.0)).until(Axis::y().offset(3.0, 0.0, 0.0)).op().unwrap());
    assert!(matches!(res, Err(DraftError::NotFound(_))));
}

#[test]
fn test_line_without_extent_is_rejected() {
    assert!(matches!(op_line().op(), Err(DraftError::InvalidArguments { .. })));
}

// ===== arc =====

#[test]
fn test_arc_tangent_sweep_both_directions() {
    let mut lb = xy();
    lb.apply(op_arc().radius(5.0).size(90.0).op().unwrap()).unwrap();
    assert_at(lb.end(), pt(5.0, 5.0));
    assert!(lb.tangent().approx_eq(&Vector3::y()));

    let mut lb = xy();
    lb.apply(op_arc().radius(5.0).size(-90.0).op().unwrap()).unwrap();
    assert_at(lb.end(), pt(5.0, -5.0));
    assert!(lb.tangent().approx_eq(&-Vector3::y()));
}

#[test]
fn test_arc_tangent_sweep_negative_radius_turns_right() {
    let mut lb = xy();
    lb.append(steps![x(10.0), op_arc().radius(-5.0).size(90.0).op().unwrap()]).unwrap();
    let arc = lb.get_by_index(-1).unwrap();
    assert_at(arc.arc_center().unwrap(), pt(10.0, -5.0));
    assert_at(arc.start(), pt(10.0, 0.0));
    assert_at(lb.end(), pt(15.0, -5.0));
    assert!(lb.tangent().approx_eq(&-Vector3::y()));
    assert_relative_eq!(arc.length(), 2.5 * PI, epsilon = 1e-9);
}

#[test]
fn test_arc_degenerate_radius_is_rejected() {
    for r in [0.0, f64::NAN, f64::INFINITY] {
        let res = op_arc().radius(r).size(90.0).op();
        assert!(matches!(res, Err(DraftError::InvalidArguments { .. })), "radius {r} accepted");
    }
    let res = op_arc().radius(0.0).size(90.0).center_at_end().op();
    assert!(matches!(res, Err(DraftError::InvalidArguments { .. })));
    assert!(op_arc().radius(5.0).size(f64::NAN).op().is_err());

    let bad = serde_json::from_str::<OpDescriptor>(r#"{"op": "arc", "radius": 0.0, "size": 90.0}"#);
    assert!(bad.is_err());
}

#[test]
fn test_arc_tangent_to_point() {
    let mut lb = xy();
    lb.apply(op_arc().to((10.0, 10.0)).op().unwrap()).unwrap();
    let arc = lb.get_by_index(-1).unwrap();
    assert_at(arc.arc_center().unwrap(), pt(0.0, 10.0));
    assert_at(lb.end(), pt(10.0, 10.0));
}

#[test]
fn test_arc_radius_to_point() {
    let mut lb = xy();
    lb.apply(op_arc().radius(5.0).to((10.0, 0.0)).no_tangent().op().unwrap()).unwrap();
    let arc = lb.get_by_index(-1).unwrap();
    assert_at(arc.arc_center().unwrap(), pt(5.0, 0.0));
    assert_at(arc.point_at(0.5), pt(5.0, 5.0));
}

#[test]
fn test_arc_negative_radius_bulges_right() {
    let mut lb = xy();
    lb.apply(op_arc().radius(-5.0).to((10.0, 0.0)).no_tangent().op().unwrap()).unwrap();
    assert_at(lb.get_by_index(-1).unwrap().point_at(0.5), pt(5.0, -5.0));
}

#[test]
fn test_arc_centered_at_end() {
    let mut lb = xy();
    lb.apply(op_arc().radius(5.0).size(90.0).center_at_end().op().unwrap()).unwrap();
    let arc = lb.get_by_index(-1).unwrap();
    assert_at(arc.start(), pt(5.0, 0.0));
    assert_at(arc.end(), pt(0.0, 5.0));
}

#[test]
fn test_arc_without_mode_is_rejected() {
    let err = op_arc().radius(5.0).op().unwrap_err();
    assert!(matches!(err, DraftError::NoConstructionMode));
    assert!(err.is_precondition());
}

#[test]
fn test_ellipse_arc_starts_at_end_point() {
    let mut lb = xy();
    lb.append(steps![x(10.0), op_ellipse_arc(4.0, 2.0, 0.0, 90.0).op().unwrap()]).unwrap();
    assert_at(lb.get_by_index(-1).unwrap().start(), pt(10.0, 0.0));
    assert_at(lb.end(), pt(6.0, 2.0));
}

// ===== extend =====

#[test]
fn test_extend_by_distance() {
    let mut lb = xy();
    lb.append(steps![x(10.0), op_extend().start(2.0).end(3.0).op().unwrap()]).unwrap();
    assert_eq!(lb.len(), 3);
    assert_at(lb.start(), pt(-2.0, 0.0));
    assert_at(lb.end(), pt(13.0, 0.0));
}

#[test]
fn test_extend_until_targets() {
    let mut lb = xy();
    lb.append(steps![
        x(10.0),
        op_extend().end(xx(20.0)).start(Axis::y().offset(-5.0, 0.0, 0.0)).op().unwrap()
    ])
    .unwrap();
    assert_at(lb.start(), pt(-5.0, 0.0));
    assert_at(lb.end(), pt(20.0, 0.0));
}

#[test]
fn test_extend_names_the_original_segment() {
    let mut lb = xy();
    lb.append(steps![x(10.0), op_extend().end(1.0).op().unwrap().named("base")]).unwrap();
    let named = lb.get_by_name("base").unwrap();
    assert_at(named.start(), pt(0.0, 0.0));
    assert_at(named.end(), pt(10.0, 0.0));
}

// ===== close =====

#[test]
fn test_close_back_to_start() {
    let mut lb = xy();
    lb.append(steps![x(10.0), y(5.0), op_close().op().unwrap()]).unwrap();
    assert_eq!(lb.len(), 3);
    assert_relative_eq!(lb.face().unwrap().area(), 25.0, epsilon = 1e-9);

    // already closed: nothing added
    lb.apply(op_close().op().unwrap()).unwrap();
    assert_eq!(lb.len(), 3);
}

#[test]
fn test_close_both_onto_marker_plane() {
    let mut lb = BuildLine::starting_at(Plane::xy(), (0.0, 2.0));
    lb.append(steps![x(10.0), op_close().both(yy(0.0)).op().unwrap()]).unwrap();
    assert_eq!(lb.len(), 4);
    assert_relative_eq!(lb.face().unwrap().area(), 20.0, epsilon = 1e-9);
}

#[test]
fn test_close_mirror() {
    let mut lb = xy();
    lb.append(steps![x(10.0), y(5.0), (4.0, 8.0), op_close().mirror(Axis::y()).op().unwrap()]).unwrap();
    assert_eq!(lb.len(), 5);
    assert_at(lb.end(), pt(0.0, 0.0));
    assert_relative_eq!(lb.face().unwrap().area(), 142.0, epsilon = 1e-9);
}

#[test]
fn test_close_needs_segments() {
    let res = xy().apply(op_close().op().unwrap());
    assert!(matches!(res, Err(DraftError::InvalidArguments { .. })));
}

// ===== trim =====

fn half_circle() -> BuildLine {
    // center (10, 5), from (10, 0) through (15, 5) to (10, 10)
    let mut lb = xy();
    lb.append(steps![x(10.0), op_arc().radius(5.0).size(180.0).op().unwrap()]).unwrap();
    lb
}

#[test]
fn test_trim_at_axis() {
    let mut lb = half_circle();
    lb.apply(op_trim(Axis::x().offset(0.0, 5.0, 0.0)).op().unwrap()).unwrap();
    assert_eq!(lb.len(), 2);
    assert_at(lb.end(), pt(15.0, 5.0));

    let mut lb = half_circle();
    lb.apply(op_trim(Axis::x().offset(0.0, 5.0, 0.0)).add().op().unwrap()).unwrap();
    assert_eq!(lb.len(), 3);
    assert_at(lb.end(), pt(0.0, 5.0));
}

#[test]
fn test_trim_by_tangent() {
    let touch = pt(10.0 + 5.0 / 3.0, 5.0 + 10.0 * 2f64.sqrt() / 3.0);

    let mut lb = half_circle();
    lb.apply(op_trim(by_tangent((25.0, 5.0))).op().unwrap()).unwrap();
    assert_at(lb.end(), touch);

    let mut lb = half_circle();
    lb.apply(op_trim(by_tangent((25.0, 5.0))).add().op().unwrap()).unwrap();
    assert_at(lb.get_by_index(-1).unwrap().start(), touch);
    assert_at(lb.end(), pt(25.0, 5.0));
}

#[test]
fn test_trim_by_tangent_needs_arc() {
    let mut lb = xy();
    lb.apply(x(5.0)).unwrap();
    let res = lb.apply(op_trim(by_tangent((5.0, 5.0))).op().unwrap());
    assert!(matches!(res, Err(DraftError::InvalidArguments { .. })));
}

#[test]
fn test_trim_missing_axis() {
    let mut lb = half_circle();
    let res = lb.apply(op_trim(Axis::x().offset(0.0, 50.0, 0.0)).op().unwrap());
    assert!(matches!(res, Err(DraftError::NotFound(_))));
}

// ===== fillet / chamfer =====

#[test]
fn test_fillet_square_corner() {
    let mut lb = xy();
    lb.append(steps![x(10.0), y(10.0), op_fillet(2.0).op().unwrap()]).unwrap();
    assert_eq!(lb.len(), 1);
    let composite = lb.get_by_index(-1).unwrap();
    assert_eq!(composite.edges.len(), 3);
    assert_at(composite.start(), pt(0.0, 0.0));
    assert_at(composite.end(), pt(10.0, 10.0));
    assert_at(composite.edges[1].arc_center().unwrap(), pt(8.0, 2.0));

    lb.append(steps![xx(0.0), op_close().op().unwrap()]).unwrap();
    assert_relative_eq!(lb.face().unwrap().area(), 96.0 + PI, epsilon = 1e-6);
}

#[test]
fn test_fillet_two_corners() {
    let mut lb = xy();
    lb.append(steps![x(10.0), y(10.0), x(-10.0), op_fillet(1.0).count(2).op().unwrap()]).unwrap();
    assert_eq!(lb.len(), 1);
    assert_eq!(lb.get_by_index(-1).unwrap().edges.len(), 5);
}

#[test]
fn test_fillet_too_large() {
    let mut lb = xy();
    lb.append(steps![x(1.0), y(1.0)]).unwrap();
    assert!(lb.apply(op_fillet(5.0).op().unwrap()).is_err());
}

#[test]
fn test_fillet_needs_enough_segments() {
    let mut lb = xy();
    lb.apply(x(1.0)).unwrap();
    let res = lb.apply(op_fillet(0.5).op().unwrap());
    assert!(matches!(res, Err(DraftError::InvalidArguments { .. })));
}

#[test]
fn test_corner_count_beyond_segments() {
    let mut lb = xy();
    lb.append(steps![x(10.0), y(10.0)]).unwrap();
    let res = lb.apply(op_fillet(1.0).count(usize::MAX).op().unwrap());
    assert!(matches!(res, Err(DraftError::InvalidArguments { .. })));
    let res = lb.apply(op_chamfer(1.0).count(2).op().unwrap());
    assert!(matches!(res, Err(DraftError::InvalidArguments { .. })));
    assert_eq!(lb.len(), 2);
}

#[test]
fn test_chamfer_square_corner() {
    let mut lb = xy();
    lb.append(steps![x(10.0), y(10.0), op_chamfer(3.0).op().unwrap()]).unwrap();
    let composite = lb.get_by_index(-1).unwrap();
    assert_eq!(composite.edges.len(), 3);
    assert_at(composite.edges[1].start(), pt(7.0, 0.0));
    assert_at(composite.edges[1].end(), pt(10.0, 3.0));
}

#[test]
fn test_chamfer_length_and_angle_are_exclusive() {
    let res = op_chamfer(1.0).length2(2.0).angle(30.0).op();
    assert!(matches!(res, Err(DraftError::InvalidArguments { .. })));
}

// ===== drop / move =====

#[test]
fn test_drop_last_and_by_index() {
    let mut lb = xy();
    lb.append(steps![x(1.0), y(1.0), x(1.0), op_drop().op().unwrap()]).unwrap();
    assert_eq!(lb.len(), 2);
    lb.apply(op_drop().idx(0).op().unwrap()).unwrap();
    assert_eq!(lb.len(), 1);
    assert_at(lb.start(), pt(1.0, 0.0));

    let res = lb.apply(op_drop().idx(5).op().unwrap());
    assert!(matches!(res, Err(DraftError::NotFound(_))));
}

#[test]
fn test_move_last_chain() {
    let mut lb = xy();
    lb.append(steps![x(10.0), y(5.0), op_move().start((2.0, 2.0)).op().unwrap()]).unwrap();
    assert_at(lb.start(), pt(2.0, 2.0));
    assert_at(lb.end(), pt(12.0, 7.0));

    lb.apply(op_move().end((0.0, 0.0)).op().unwrap()).unwrap();
    assert_at(lb.end(), pt(0.0, 0.0));
    assert_at(lb.start(), pt(-10.0, -5.0));
}

// ===== descriptor flags =====

#[test]
fn test_reverse_flips_last_chain() {
    let mut lb = xy();
    lb.append(steps![x(10.0), op_line().length(5.0).op().unwrap().reversed()]).unwrap();
    assert_at(lb.start(), pt(15.0, 0.0));
    assert_at(lb.end(), pt(0.0, 0.0));
}

#[test]
fn test_connect_bridges_gaps() {
    let mut lb = xy();
    lb.append(steps![
        x(5.0),
        op_line().start((0.0, 3.0)).length(5.0).op().unwrap(),
        op_line().start((0.0, 6.0)).length(5.0).op().unwrap().connected()
    ])
    .unwrap();
    assert_eq!(lb.chains().len(), 1);
    assert_eq!(lb.len(), 5);
    assert_at(lb.get_by_index(1).unwrap().end(), pt(0.0, 3.0));
}

#[test]
fn test_name_latest_wins() {
    let mut lb = xy();
    lb.append(steps![
        op_line().length(1.0).op().unwrap().named("edge"),
        op_line().length(2.0).op().unwrap().named("edge")
    ])
    .unwrap();
    assert_at(lb.get_by_name("edge").unwrap().end(), pt(3.0, 0.0));
}

#[test]
fn test_descriptor_from_json() {
    let op: OpDescriptor = serde_json::from_str(r#"{"op": "fillet", "radius": 1.5, "name": "round"}"#).unwrap();
    assert_eq!(op.kind, OpKind::Fillet(FilletArgs { radius: 1.5, count: 1 }));
    assert_eq!(op.name.as_deref(), Some("round"));

    let bad = serde_json::from_str::<OpDescriptor>(r#"{"op": "fillet", "radius": -1.0}"#);
    assert!(bad.is_err());
}
