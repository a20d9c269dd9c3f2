use super::*;

#[test]
fn rejects_unmounted_containers() {
    assert!(CoordinateMapper::new(Size::new(0.0, 100.0)).is_none());
    assert!(CoordinateMapper::new(Size::new(100.0, f64::NAN)).is_none());
    assert!(CoordinateMapper::new(Size::new(-5.0, 10.0)).is_none());
}

#[test]
fn half_size_container_halves_positions() {
    let m = CoordinateMapper::new(Size::new(540.0, 960.0)).unwrap();
    assert_eq!(m.scale_x(), 0.5);
    assert_eq!(m.scale_y(), 0.5);
    assert_eq!(m.to_screen(Point::new(1080.0, 400.0)), Point::new(540.0, 200.0));
    assert_eq!(m.to_logical(Point::new(540.0, 200.0)), Point::new(1080.0, 400.0));
    assert_eq!(
        m.screen_delta_to_logical(Vec2::new(10.0, -4.0)),
        Vec2::new(20.0, -8.0)
    );
}

#[test]
fn font_scale_uses_the_smaller_axis() {
    let m = CoordinateMapper::new(Size::new(1080.0, 960.0)).unwrap();
    assert_eq!(m.font_scale(), 0.5);
    assert_eq!(m.scale_length(48.0), 24.0);
}

#[test]
fn clamp_keeps_points_on_canvas() {
    let m = CoordinateMapper::new(Size::new(1080.0, 1920.0)).unwrap();
    assert_eq!(m.clamp(Point::new(-3.0, 5000.0)), Point::new(0.0, 1920.0));
    assert_eq!(m.clamp(Point::new(10.0, 20.0)), Point::new(10.0, 20.0));
}
