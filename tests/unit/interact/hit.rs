use super::*;
use crate::{render::text::ApproxTextMeasure, scene::elements::ShapeKind};

fn mapper() -> CoordinateMapper {
    CoordinateMapper::new(Size::new(540.0, 960.0)).unwrap()
}

#[test]
fn topmost_element_wins() {
    let mut scene = Scene::blank();
    let text = scene.add_text().unwrap();
    let shape = scene.add_shape(ShapeKind::Rectangle).unwrap();
    scene.select(None).unwrap();

    // Both sit at the canvas center; the shape is drawn last.
    let hit = hit_test(&scene, &mapper(), Point::new(270.0, 480.0), &mut ApproxTextMeasure);
    assert_eq!(hit, Some(PointerTarget::Body(shape.clone())));

    scene.delete_element(&shape).unwrap();
    let hit = hit_test(&scene, &mapper(), Point::new(270.0, 480.0), &mut ApproxTextMeasure);
    assert_eq!(hit, Some(PointerTarget::Body(text)));
}

#[test]
fn empty_space_hits_nothing() {
    let mut scene = Scene::blank();
    scene.add_shape(ShapeKind::Circle).unwrap();
    assert_eq!(
        hit_test(&scene, &mapper(), Point::new(5.0, 5.0), &mut ApproxTextMeasure),
        None
    );
}

#[test]
fn selected_element_exposes_corner_handles() {
    let mut scene = Scene::blank();
    let shape = scene.add_shape(ShapeKind::Rectangle).unwrap();
    scene.select(Some(shape.clone())).unwrap();

    // 150x100 at (540, 960): the se corner is (615, 1010), on screen (307.5, 505).
    let hit = hit_test(&scene, &mapper(), Point::new(306.0, 504.0), &mut ApproxTextMeasure);
    assert_eq!(hit, Some(PointerTarget::Handle(shape.clone(), Handle::Se)));

    scene.select(None).unwrap();
    let hit = hit_test(&scene, &mapper(), Point::new(306.0, 504.0), &mut ApproxTextMeasure);
    assert_eq!(hit, Some(PointerTarget::Body(shape)));
}

#[test]
fn rotated_frames_test_in_local_space() {
    let frame = ElementFrame {
        center: Point::new(100.0, 100.0),
        size: Size::new(80.0, 10.0),
        rotation_deg: 90.0,
    };
    assert!(frame.contains(Point::new(100.0, 135.0)));
    assert!(!frame.contains(Point::new(135.0, 100.0)));

    let se = frame.corner(Handle::Se);
    assert!((se.x - 95.0).abs() < 1e-9);
    assert!((se.y - 140.0).abs() < 1e-9);
}

#[test]
fn boxed_quote_uses_its_box() {
    let mut scene = Scene::new();
    scene.quote.as_mut().unwrap().width = Some(300.0);
    scene.quote.as_mut().unwrap().height = Some(120.0);
    let frame = element_frame(&scene, &ElementRef::Quote, &mut ApproxTextMeasure).unwrap();
    assert_eq!(frame.size, Size::new(300.0, 120.0));
}
