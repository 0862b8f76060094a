use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(255, 0), 0);
    assert_eq!(mul_div255_u8(100, 128), 50);
}

#[test]
fn clamp01_handles_nan_and_range() {
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(-3.0), 0.0);
    assert_eq!(clamp01(0.25), 0.25);
    assert_eq!(clamp01(f64::INFINITY), 1.0);
}

#[test]
fn blend_channel_endpoints() {
    assert_eq!(blend_channel(200, 0, 0.0), 200);
    assert_eq!(blend_channel(200, 0, 1.0), 0);
    assert_eq!(blend_channel(100, 200, 0.5), 150);
    assert_eq!(blend_channel(10, 255, 7.0), 255);
}

#[test]
fn premultiply_zeroes_transparent_pixels() {
    let mut px = vec![255, 255, 255, 0, 255, 0, 0, 255, 200, 100, 50, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[0, 0, 0, 0]);
    assert_eq!(&px[4..8], &[255, 0, 0, 255]);
    assert_eq!(
        &px[8..12],
        &[
            ((200u16 * 128 + 127) / 255) as u8,
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}
