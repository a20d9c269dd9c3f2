use super::*;
use crate::scene::elements::ShapeKind;

const FULL: Option<Size> = Some(Size::new(1080.0, 1920.0));
const HALF: Option<Size> = Some(Size::new(540.0, 960.0));

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn scene_with_shape() -> (Scene, ElementRef) {
    let mut scene = Scene::blank();
    let r = scene.add_shape(ShapeKind::Rectangle).unwrap();
    (scene, r)
}

fn shape_id(r: &ElementRef) -> &str {
    match r {
        ElementRef::Shape(id) => id,
        _ => unreachable!(),
    }
}

#[test]
fn drag_maps_screen_delta_through_scale() {
    let mut scene = Scene::blank();
    let t = scene.add_text().unwrap();
    let mut c = InteractionController::new();

    assert!(c.pointer_down(&mut scene, PointerTarget::Body(t.clone()), Point::new(100.0, 100.0), HALF));
    assert!(c.pointer_move(&mut scene, Point::new(110.0, 95.0), HALF));
    let el = scene.texts()[0].clone();
    assert_eq!((el.x, el.y), (560.0, 950.0));

    // Positions derive from the drag origin, not the previous move.
    assert!(c.pointer_move(&mut scene, Point::new(110.0, 95.0), HALF));
    assert_eq!(scene.texts()[0].x, 560.0);

    c.pointer_up();
    assert!(c.is_idle());
    assert!(!c.pointer_move(&mut scene, Point::new(500.0, 500.0), HALF));
}

#[test]
fn drag_is_clamped_to_canvas() {
    let (mut scene, r) = scene_with_shape();
    let mut c = InteractionController::new();
    c.pointer_down(&mut scene, PointerTarget::Body(r.clone()), Point::ORIGIN, FULL);
    c.pointer_move(&mut scene, Point::new(-5000.0, 9000.0), FULL);
    let s = scene.shape(shape_id(&r)).unwrap();
    assert_eq!((s.x, s.y), (0.0, 1920.0));
}

#[test]
fn missing_container_is_a_no_op() {
    let (mut scene, r) = scene_with_shape();
    let before = scene.clone();
    let mut c = InteractionController::new();
    assert!(!c.pointer_down(&mut scene, PointerTarget::Body(r.clone()), Point::ORIGIN, None));
    assert!(c.is_idle());

    c.pointer_down(&mut scene, PointerTarget::Body(r), Point::ORIGIN, FULL);
    assert!(!c.pointer_move(&mut scene, Point::new(10.0, 10.0), None));
    assert!(!c.pointer_move(&mut scene, Point::new(10.0, 10.0), Some(Size::ZERO)));
    assert_eq!(scene.shapes(), before.shapes());
}

#[test]
fn se_handle_grows_shape_and_pins_nw_corner() {
    let (mut scene, r) = scene_with_shape();
    let nw_before = {
        let s = scene.shape(shape_id(&r)).unwrap();
        (s.x - s.width / 2.0, s.y - s.height / 2.0)
    };
    let mut c = InteractionController::new();
    assert!(c.pointer_down(
        &mut scene,
        PointerTarget::Handle(r.clone(), Handle::Se),
        Point::new(50.0, 50.0),
        FULL
    ));
    assert!(matches!(c.state(), Interaction::Resizing { .. }));
    c.pointer_move(&mut scene, Point::new(90.0, 90.0), FULL);

    let s = scene.shape(shape_id(&r)).unwrap();
    assert_eq!((s.width, s.height), (190.0, 140.0));
    assert!(approx(s.x - s.width / 2.0, nw_before.0));
    assert!(approx(s.y - s.height / 2.0, nw_before.1));
}

#[test]
fn nw_handle_pins_se_corner_and_respects_minimum() {
    let (mut scene, r) = scene_with_shape();
    let mut c = InteractionController::new();
    c.pointer_down(&mut scene, PointerTarget::Handle(r.clone(), Handle::Nw), Point::ORIGIN, FULL);
    c.pointer_move(&mut scene, Point::new(500.0, 500.0), FULL);

    let s = scene.shape(shape_id(&r)).unwrap();
    assert_eq!((s.width, s.height), (MIN_SHAPE_EXTENT, MIN_SHAPE_EXTENT));
    assert!(approx(s.x + s.width / 2.0, 615.0));
    assert!(approx(s.y + s.height / 2.0, 1010.0));
}

#[test]
fn handle_on_unselected_element_drags() {
    let (mut scene, r) = scene_with_shape();
    scene.select(None).unwrap();
    let mut c = InteractionController::new();
    c.pointer_down(&mut scene, PointerTarget::Handle(r.clone(), Handle::Se), Point::ORIGIN, FULL);
    assert!(matches!(c.state(), Interaction::Dragging { .. }));
    assert!(scene.is_selected(&r));
}

#[test]
fn text_handle_scales_font_and_clamps() {
    let mut scene = Scene::blank();
    let t = scene.add_text().unwrap();
    let mut c = InteractionController::new();
    c.pointer_down(&mut scene, PointerTarget::Handle(t.clone(), Handle::Se), Point::ORIGIN, FULL);

    c.pointer_move(&mut scene, Point::new(100.0, 0.0), FULL);
    assert!(approx(scene.texts()[0].font_size, 48.0 * 1.2));

    c.pointer_move(&mut scene, Point::new(-100.0, 20.0), FULL);
    assert!(scene.texts()[0].font_size < 48.0);

    c.pointer_move(&mut scene, Point::new(-2000.0, 0.0), FULL);
    assert_eq!(scene.texts()[0].font_size, MIN_FONT_SIZE);

    c.pointer_move(&mut scene, Point::new(0.0, 5000.0), FULL);
    assert_eq!(scene.texts()[0].font_size, MAX_FONT_SIZE);
}

#[test]
fn factor_sign_follows_dominant_axis() {
    assert!(font_scale_factor(Handle::Se, Vec2::new(-10.0, 3.0)) < 1.0);
    assert!(font_scale_factor(Handle::Se, Vec2::new(2.0, 10.0)) > 1.0);
    assert_eq!(font_scale_factor(Handle::Se, Vec2::ZERO), 1.0);
}

#[test]
fn factor_sign_is_oriented_by_handle() {
    // Outward from each corner grows.
    assert!(font_scale_factor(Handle::Nw, Vec2::new(-10.0, -3.0)) > 1.0);
    assert!(font_scale_factor(Handle::Ne, Vec2::new(2.0, -10.0)) > 1.0);
    assert!(font_scale_factor(Handle::Sw, Vec2::new(-10.0, 2.0)) > 1.0);
    // Inward shrinks.
    assert!(font_scale_factor(Handle::Nw, Vec2::new(10.0, 3.0)) < 1.0);
    assert!(font_scale_factor(Handle::Ne, Vec2::new(-2.0, 10.0)) < 1.0);
}

#[test]
fn dragging_nw_handle_outward_grows_text() {
    let mut scene = Scene::blank();
    let t = scene.add_text().unwrap();
    let mut c = InteractionController::new();
    c.pointer_down(&mut scene, PointerTarget::Handle(t, Handle::Nw), Point::new(200.0, 200.0), FULL);
    c.pointer_move(&mut scene, Point::new(150.0, 190.0), FULL);
    assert!(scene.texts()[0].font_size > 48.0);
}

#[test]
fn boxed_quote_resizes_box_and_font() {
    let mut scene = Scene::new();
    scene
        .update_quote(&QuotePatch {
            width: Some(400.0),
            height: Some(200.0),
            ..QuotePatch::default()
        })
        .unwrap();
    scene.select(Some(ElementRef::Quote)).unwrap();

    let mut c = InteractionController::new();
    c.pointer_down(&mut scene, PointerTarget::Handle(ElementRef::Quote, Handle::Ne), Point::ORIGIN, FULL);
    c.pointer_move(&mut scene, Point::new(-200.0, -100.0), FULL);

    let q = scene.quote().unwrap();
    assert_eq!(q.box_size(), Some((200.0, 300.0)));
    // Font follows the smaller ratio (200/400).
    assert!(approx(q.base.font_size, 16.0));
    // The sw corner stays put.
    assert!(approx(q.base.x - 100.0, 540.0 - 200.0));
    assert!(approx(q.base.y + 150.0, 960.0 + 100.0));

    c.pointer_move(&mut scene, Point::new(-1000.0, 1000.0), FULL);
    assert_eq!(scene.quote().unwrap().box_size(), Some((MIN_QUOTE_BOX, MIN_QUOTE_BOX)));
}

#[test]
fn editing_blocks_body_drag_but_not_handles() {
    let mut scene = Scene::blank();
    let t = scene.add_text().unwrap();
    let mut c = InteractionController::new();

    assert!(c.double_click(&mut scene, &t));
    assert!(!c.pointer_down(&mut scene, PointerTarget::Body(t.clone()), Point::ORIGIN, FULL));
    assert!(c.pointer_down(&mut scene, PointerTarget::Handle(t.clone(), Handle::Se), Point::ORIGIN, FULL));
    assert!(c.editing().is_some());
}

#[test]
fn enter_commits_single_line_text() {
    let mut scene = Scene::blank();
    let t = scene.add_text().unwrap();
    let mut c = InteractionController::new();
    c.double_click(&mut scene, &t);
    assert!(c.edit_text("Hello"));

    assert!(!c.key(&mut scene, EditKey::Enter, true));
    assert_eq!(scene.texts()[0].text, "Your text here");
    assert!(c.key(&mut scene, EditKey::Enter, false));
    assert_eq!(scene.texts()[0].text, "Hello");
    assert!(c.editing().is_none());
}

#[test]
fn quote_needs_ctrl_enter_or_escape() {
    let mut scene = Scene::new();
    let mut c = InteractionController::new();
    assert!(c.double_click(&mut scene, &ElementRef::Quote));
    c.edit_text("a\nb");

    assert!(!c.key(&mut scene, EditKey::Enter, false));
    assert!(c.key(&mut scene, EditKey::Enter, true));
    assert_eq!(scene.quote().unwrap().base.text, "a\nb");

    c.double_click(&mut scene, &ElementRef::Quote);
    c.edit_text("c");
    assert!(c.key(&mut scene, EditKey::Escape, false));
    assert_eq!(scene.quote().unwrap().base.text, "c");
}

#[test]
fn double_click_toggles_and_blur_commits() {
    let mut scene = Scene::blank();
    let t = scene.add_text().unwrap();
    let mut c = InteractionController::new();

    assert!(c.double_click(&mut scene, &t));
    c.edit_text("first");
    assert!(!c.double_click(&mut scene, &t));
    assert_eq!(scene.texts()[0].text, "first");

    c.double_click(&mut scene, &t);
    c.edit_text("second");
    assert!(c.blur(&mut scene));
    assert_eq!(scene.texts()[0].text, "second");
    assert!(!c.blur(&mut scene));
}

#[test]
fn shapes_are_not_editable() {
    let (mut scene, r) = scene_with_shape();
    let mut c = InteractionController::new();
    assert!(!c.double_click(&mut scene, &r));
    assert!(c.editing().is_none());
}

#[test]
fn deleted_target_ends_interaction_quietly() {
    let (mut scene, r) = scene_with_shape();
    let mut c = InteractionController::new();
    c.pointer_down(&mut scene, PointerTarget::Body(r.clone()), Point::ORIGIN, FULL);
    scene.delete_element(&r).unwrap();
    assert!(!c.pointer_move(&mut scene, Point::new(5.0, 5.0), FULL));
    assert!(c.is_idle());
}
