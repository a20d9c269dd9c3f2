use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let mut dst = vec![1, 2, 3, 4];
    premul_over_in_place_opacity(&mut dst, &[200, 200, 200, 200], 0.0).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 4]);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let mut dst = vec![0, 0, 0, 255];
    premul_over_in_place_opacity(&mut dst, &[255, 0, 0, 255], 1.0).unwrap();
    assert_eq!(dst, vec![255, 0, 0, 255]);
}

#[test]
fn over_onto_transparent_returns_src() {
    let mut dst = vec![0, 0, 0, 0];
    premul_over_in_place_opacity(&mut dst, &[100, 110, 120, 200], 1.0).unwrap();
    assert_eq!(dst, vec![100, 110, 120, 200]);
}

#[test]
fn mismatched_buffers_are_rejected() {
    let mut dst = vec![0u8; 8];
    assert!(premul_over_in_place_opacity(&mut dst, &[0u8; 4], 1.0).is_err());
    assert!(composite_over_rgba8_premul(&mut dst, &[0u8; 4], 1.0, BlendMode::Screen).is_err());
}

#[test]
fn solid_fill_with_zero_alpha_changes_nothing() {
    let mut dst = vec![10, 20, 30, 255, 40, 50, 60, 255];
    let before = dst.clone();
    fill_solid_over(&mut dst, Rgba8Premul::transparent());
    assert_eq!(dst, before);
}

#[test]
fn solid_half_black_halves_opaque_white() {
    let mut dst = vec![255, 255, 255, 255];
    fill_solid_over(&mut dst, Rgba8Premul::from_straight_rgba(0, 0, 0, 128));
    assert_eq!(dst[3], 255);
    assert!((126..=128).contains(&dst[0]));
}

#[test]
fn multiply_on_transparent_dst_is_plain_over() {
    let src = [120u8, 60, 30, 255];
    let mut a = vec![0u8; 4];
    let mut b = vec![0u8; 4];
    composite_over_rgba8_premul(&mut a, &src, 1.0, BlendMode::Multiply).unwrap();
    composite_over_rgba8_premul(&mut b, &src, 1.0, BlendMode::Normal).unwrap();
    assert_eq!(a, b);
}

#[test]
fn blend_formulas_on_opaque_pixels() {
    let grey = [128u8, 128, 128, 255];
    let white = [255u8, 255, 255, 255];

    let mut d = white.to_vec();
    composite_over_rgba8_premul(&mut d, &grey, 1.0, BlendMode::Multiply).unwrap();
    assert_eq!(d, grey.to_vec());

    let mut d = grey.to_vec();
    composite_over_rgba8_premul(&mut d, &white, 1.0, BlendMode::Screen).unwrap();
    assert_eq!(d, white.to_vec());

    let mut d = white.to_vec();
    composite_over_rgba8_premul(&mut d, &white, 1.0, BlendMode::Difference).unwrap();
    assert_eq!(d, vec![0, 0, 0, 255]);

    let mut d = grey.to_vec();
    composite_over_rgba8_premul(&mut d, &white, 1.0, BlendMode::Darken).unwrap();
    assert_eq!(d, grey.to_vec());
}
