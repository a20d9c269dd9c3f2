use super::*;

#[test]
fn zero_sigma_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(blur_rgba8_premul(&src, 1, 2, 0.0).unwrap(), src);
    assert_eq!(radius_for_sigma(-1.0), 0);
    assert_eq!(radius_for_sigma(2.0), 6);
}

#[test]
fn constant_image_stays_constant() {
    let (w, h) = (4u32, 3u32);
    let src = [10u8, 20, 30, 40].repeat((w * h) as usize);
    assert_eq!(blur_rgba8_premul(&src, w, h, 2.0).unwrap(), src);
}

#[test]
fn single_pixel_spreads_and_keeps_energy() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((4 * w + 4) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 1.0).unwrap();
    assert!(out.chunks_exact(4).filter(|px| px[3] != 0).count() > 1);
    let sum_a: i32 = out.chunks_exact(4).map(|px| i32::from(px[3])).sum();
    assert!((sum_a - 255).abs() <= 8);
}

#[test]
fn wrong_length_is_rejected() {
    assert!(blur_rgba8_premul(&[0u8; 12], 2, 2, 1.0).is_err());
}

#[test]
fn alpha_bounds_finds_ink() {
    let (w, h) = (5u32, 4u32);
    let mut data = vec![0u8; (w * h * 4) as usize];
    assert_eq!(alpha_bounds(&data, w, h), None);
    let idx = ((2 * w + 3) * 4) as usize;
    data[idx + 3] = 9;
    assert_eq!(alpha_bounds(&data, w, h), Some((3, 2, 4, 3)));
}

#[test]
fn sparse_blur_matches_full_blur_inside_region() {
    let (w, h) = (32u32, 32u32);
    let mut data = vec![0u8; (w * h * 4) as usize];
    let idx = ((16 * w + 16) * 4) as usize;
    data[idx..idx + 4].copy_from_slice(&[200, 100, 50, 255]);

    let full = blur_rgba8_premul(&data, w, h, 1.5).unwrap();
    let mut sparse = data.clone();
    blur_sparse_in_place(&mut sparse, w, h, 1.5).unwrap();
    assert_eq!(sparse, full);
}
