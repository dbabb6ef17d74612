use super::*;

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp_f32(10.0, 20.0, 0.0), 10.0);
    assert_eq!(lerp_f32(10.0, 20.0, 1.0), 20.0);
    assert_eq!(lerp_f32(10.0, 20.0, 0.5), 15.0);
}
