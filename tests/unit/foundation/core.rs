use super::*;
use serde_json::json;

#[test]
fn canvas_rejects_empty_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(400, 300).unwrap();
    assert_eq!(c.center(), Point::new(200.0, 150.0));
    assert_eq!(c.max_side(), 400.0);
    assert_eq!(c.diagonal(), 500.0);
}

#[test]
fn parses_hex_forms() {
    assert_eq!(Rgba8::from_hex("#ffffff").unwrap(), Rgba8::rgb(255, 255, 255));
    assert_eq!(Rgba8::from_hex("0a0a0f").unwrap(), Rgba8::rgb(10, 10, 15));
    assert_eq!(Rgba8::from_hex("#f00").unwrap(), Rgba8::rgb(255, 0, 0));
    let c = Rgba8::from_hex("#0000ff80").unwrap();
    assert_eq!(c.a, 128);
    assert!(Rgba8::from_hex("#12345").is_err());
    assert!(Rgba8::from_hex("#zzzzzz").is_err());
}

#[test]
fn hex_serde_is_symmetric() {
    let c: Rgba8 = serde_json::from_value(json!("#0A0A0F")).unwrap();
    assert_eq!(serde_json::to_value(c).unwrap(), json!("#0a0a0f"));
    assert!(serde_json::from_value::<Rgba8>(json!("nope")).is_err());
}

#[test]
fn premultiply_rounds_to_nearest() {
    let c = Rgba8 {
        r: 100,
        g: 50,
        b: 200,
        a: 128,
    };
    assert_eq!(
        c.to_premul_array(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}
