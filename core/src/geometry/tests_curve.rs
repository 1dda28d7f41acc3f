use super::*;
use approx::assert_abs_diff_eq;
use std::f64::consts::{FRAC_PI_2, PI};

#[test]
fn test_line_edge_basics() {
    let e = Edge::line(Point3::new(10.0, 0.0, 0.0), Point3::new(5.0, 0.0, 0.0));
    assert_abs_diff_eq!(e.length(), 5.0, epsilon = 1e-12);
    assert!(e.point_at(2.0).approx_eq(&Point3::new(8.0, 0.0, 0.0)));
    assert!(e.tangent_at(0.0).approx_eq(&-Vector3::x()));

    let r = e.reversed();
    assert!(r.start().approx_eq(&Point3::new(5.0, 0.0, 0.0)));
    assert!(r.point_at(2.0).approx_eq(&Point3::new(7.0, 0.0, 0.0)));
    assert!(r.end_tangent().approx_eq(&Vector3::x()));
}

#[test]
fn test_arc_length_and_tangents() {
    let arc = Edge::arc(Point3::origin(), Point3::new(2.0, 0.0, 0.0), Vector3::z(), PI);
    assert_abs_diff_eq!(arc.length(), 2.0 * PI, epsilon = 1e-12);
    assert!(arc.end().approx_eq(&Point3::new(-2.0, 0.0, 0.0)));
    assert!(arc.start_tangent().approx_eq(&Vector3::y()));
    assert!(arc.point_at(PI).approx_eq(&Point3::new(0.0, 2.0, 0.0)));
}

#[test]
fn test_three_point_arc() {
    let arc = Edge::three_point_arc(
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(-1.0, 0.0, 0.0),
    )
    .unwrap();
    assert!(arc.arc_center().unwrap().approx_eq(&Point3::origin()));
    assert_abs_diff_eq!(arc.t1, PI, epsilon = 1e-12);
    assert!(arc.end().approx_eq(&Point3::new(-1.0, 0.0, 0.0)));

    assert!(Edge::three_point_arc(Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)).is_none());
}

#[test]
fn test_tangent_arc_bends_towards_target() {
    // Leaving (40,20) upwards, ending at (0,20): semicircle around (20,20)
    let arc = Edge::tangent_arc(
        Point3::new(40.0, 20.0, 0.0),
        &Vector3::y(),
        Point3::new(0.0, 20.0, 0.0),
        &Vector3::z(),
    )
    .unwrap();
    assert!(arc.arc_center().unwrap().approx_eq(&Point3::new(20.0, 20.0, 0.0)));
    assert_abs_diff_eq!(arc.t1, PI, epsilon = 1e-9);
    assert!(arc.point_at(arc.length() / 2.0).approx_eq(&Point3::new(20.0, 40.0, 0.0)));

    // Target to the right turns clockwise
    let cw = Edge::tangent_arc(Point3::origin(), &Vector3::y(), Point3::new(4.0, 0.0, 0.0), &Vector3::z()).unwrap();
    assert!(cw.point_at(cw.length() / 2.0).approx_eq(&Point3::new(2.0, 2.0, 0.0)));
}

#[test]
fn test_ellipse_arc_length() {
    // Circle special case checks the quadrature
    let e = Edge::ellipse_arc(&Plane::xy(), 3.0, 3.0, 0.0, 90.0);
    assert_abs_diff_eq!(e.length(), 1.5 * PI, epsilon = 1e-9);

    let quarter = Edge::ellipse_arc(&Plane::xy(), 20.0, 8.0, 0.0, 90.0);
    assert!(quarter.start().approx_eq(&Point3::new(20.0, 0.0, 0.0)));
    assert!(quarter.end().approx_eq(&Point3::new(0.0, 8.0, 0.0)));
    let mid = quarter.point_at(quarter.length() / 2.0);
    let back = quarter.curve.project(&mid);
    assert!(back.1 < 1e-9);
    assert_abs_diff_eq!(quarter.native_length_to(back.0), quarter.length() / 2.0, epsilon = 1e-7);
}

#[test]
fn test_wrap_param_periodic() {
    let arc = Edge::new(
        Curve::Circle { center: Point3::origin(), x_dir: Vector3::x(), normal: Vector3::z(), radius: 1.0 },
        3.0 * FRAC_PI_2,
        5.0 * FRAC_PI_2,
    );
    // atan2 reports -PI/2 for the start point
    let t = arc.wrap_param(-FRAC_PI_2, 1e-9).unwrap();
    assert_abs_diff_eq!(t, 3.0 * FRAC_PI_2, epsilon = 1e-12);
    assert!(arc.wrap_param(PI, 1e-9).is_none());
}

#[test]
fn test_mirrored_arc_keeps_parametrisation() {
    let plane = Plane::yz();
    let arc = Edge::arc(Point3::new(3.0, 0.0, 0.0), Point3::new(5.0, 0.0, 0.0), Vector3::z(), FRAC_PI_2);
    let m = arc.mirrored(&plane);
    for s in [0.0, 0.5, 1.0, arc.length()] {
        assert!(m.point_at(s).approx_eq(&plane.mirror_point(&arc.point_at(s))));
    }
}
