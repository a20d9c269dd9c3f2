use super::*;

fn bw(angle: f64) -> GradientSpec {
    GradientSpec::new(angle, vec![ColorDef::BLACK, ColorDef::WHITE]).unwrap()
}

fn px(buf: &[u8], canvas: Canvas, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * canvas.width + x) * 4) as usize;
    [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
}

#[test]
fn zero_degrees_runs_top_to_bottom() {
    let canvas = Canvas {
        width: 4,
        height: 100,
    };
    let buf = render_linear_gradient(canvas, &bw(0.0));
    let top = px(&buf, canvas, 0, 0);
    let bottom = px(&buf, canvas, 3, 99);
    assert!(top[0] < 5, "{top:?}");
    assert!(bottom[0] > 250, "{bottom:?}");
    assert_eq!(top[3], 255);

    for y in 1..100 {
        assert!(px(&buf, canvas, 2, y)[0] >= px(&buf, canvas, 2, y - 1)[0]);
    }
}

#[test]
fn ninety_degrees_runs_right_to_left() {
    let canvas = Canvas {
        width: 100,
        height: 4,
    };
    let buf = render_linear_gradient(canvas, &bw(90.0));
    assert!(px(&buf, canvas, 99, 0)[0] < 5);
    assert!(px(&buf, canvas, 0, 0)[0] > 250);
}

#[test]
fn middle_stop_is_hit_at_center() {
    let canvas = Canvas {
        width: 2,
        height: 101,
    };
    let red = ColorDef::from_rgba8(255, 0, 0, 255);
    let spec = GradientSpec::new(0.0, vec![ColorDef::BLACK, red, ColorDef::WHITE]).unwrap();
    let buf = render_linear_gradient(canvas, &spec);
    assert_eq!(px(&buf, canvas, 0, 50), [255, 0, 0, 255]);
}

#[test]
fn translucent_stops_are_premultiplied() {
    let canvas = Canvas {
        width: 1,
        height: 1,
    };
    let half_white = ColorDef::WHITE.with_alpha(0.5);
    let spec = GradientSpec::new(0.0, vec![half_white, half_white]).unwrap();
    assert_eq!(render_linear_gradient(canvas, &spec), vec![128, 128, 128, 128]);
}
