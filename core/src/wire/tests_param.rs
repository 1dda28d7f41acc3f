use super::param::{param_on_point, param_on_point_abs, trim_wire};
use super::Segment;
use crate::error::DraftError;
use crate::geometry::{ApproxEq, Edge, Point3, Vector3};
use approx::assert_abs_diff_eq;
use std::f64::consts::PI;

fn p(x: f64) -> Point3 {
    Point3::new(x, 0.0, 0.0)
}

/// (10,0,0) -> (5,0,0) -> (0,0,0)
fn two_lines() -> Segment {
    Segment::from_edges(vec![Edge::line(p(10.0), p(5.0)), Edge::line(p(5.0), p(0.0))])
}

fn assert_chain(seg: &Segment, points: &[Point3]) {
    let edges = seg.oriented_edges();
    assert_eq!(edges.len(), points.len() - 1, "edge count");
    for (e, w) in edges.iter().zip(points.windows(2)) {
        assert!(e.start().approx_eq(&w[0]), "start {:?} != {:?}", e.start(), w[0]);
        assert!(e.end().approx_eq(&w[1]), "end {:?} != {:?}", e.end(), w[1]);
    }
}

#[test]
fn test_param_and_trim_forward() {
    let w = two_lines();
    let u = param_on_point(&w, &p(8.0)).unwrap();
    assert_abs_diff_eq!(u, 0.2, epsilon = 1e-12);

    let t = trim_wire(&w, 0.0, u).unwrap();
    assert!(t.start().approx_eq(&p(10.0)));
    assert!(t.end().approx_eq(&p(8.0)));
    assert_chain(&t, &[p(10.0), p(8.0)]);
}

#[test]
fn test_param_and_trim_reversed_edges() {
    let w = two_lines().reversed_edges();
    let u = param_on_point(&w, &p(8.0)).unwrap();
    assert_abs_diff_eq!(u, 0.8, epsilon = 1e-12);

    let t = trim_wire(&w, 0.0, u).unwrap();
    assert!(t.start().approx_eq(&p(0.0)));
    assert!(t.end().approx_eq(&p(8.0)));
    assert_chain(&t, &[p(0.0), p(5.0), p(8.0)]);
}

#[test]
fn test_param_and_trim_reversed_flag() {
    let w = two_lines().reversed();
    let u = param_on_point(&w, &p(8.0)).unwrap();
    assert_abs_diff_eq!(u, 0.8, epsilon = 1e-12);

    let t = trim_wire(&w, 0.0, u).unwrap();
    assert!(t.reversed, "trim keeps the reversal flag");
    assert!(t.start().approx_eq(&p(0.0)));
    assert!(t.end().approx_eq(&p(8.0)));
    assert_chain(&t, &[p(0.0), p(5.0), p(8.0)]);
}

#[test]
fn test_trim_start_side() {
    let w = two_lines();
    let t = trim_wire(&w, 0.3, 1.0).unwrap();
    assert_chain(&t, &[p(7.0), p(5.0), p(0.0)]);
}

#[test]
fn test_point_off_every_edge_is_not_found() {
    let w = two_lines();
    assert!(param_on_point(&w, &p(12.0)).is_none());
    assert!(param_on_point(&w, &p(-1.0)).is_none());
}

#[test]
fn test_closest_projection_wins() {
    // Point above the corner of an L: both edges project, the nearer one counts
    let w = Segment::from_edges(vec![
        Edge::line(Point3::origin(), p(10.0)),
        Edge::line(p(10.0), Point3::new(10.0, 10.0, 0.0)),
    ]);
    let u = param_on_point_abs(&w, &Point3::new(9.0, 3.0, 0.0)).unwrap();
    assert_abs_diff_eq!(u, 13.0, epsilon = 1e-12);
}

#[test]
fn test_arc_uses_true_arc_length() {
    let arc = Segment::from(Edge::arc(Point3::origin(), p(2.0), Vector3::z(), PI));
    let top = Point3::new(0.0, 2.0, 0.0);
    assert_abs_diff_eq!(param_on_point(&arc, &top).unwrap(), 0.5, epsilon = 1e-12);
    let half = trim_wire(&arc, 0.0, 0.5).unwrap();
    assert!(half.end().approx_eq(&top));
    assert_abs_diff_eq!(half.length(), PI, epsilon = 1e-12);
}

#[test]
fn test_empty_trim_is_degenerate() {
    let w = two_lines();
    assert!(matches!(trim_wire(&w, 0.5, 0.5), Err(DraftError::DegenerateTrim)));
}
