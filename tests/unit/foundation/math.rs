use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn mul_div255_identity_at_full_alpha() {
    for x in 0u16..=255 {
        assert_eq!(mul_div255_u16(x, 255), x);
    }
}

#[test]
fn unit_to_u8_clamps() {
    assert_eq!(unit_to_u8(-1.0), 0);
    assert_eq!(unit_to_u8(0.5), 128);
    assert_eq!(unit_to_u8(2.0), 255);
    assert_eq!(add_sat_u8(200, 100), 255);
    assert_eq!(lerp_f32(0.0, 10.0, 0.25), 2.5);
}
