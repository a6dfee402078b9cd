use super::*;

#[test]
fn decode_accepts_integer_coordinates() {
    let point = decode_point(r#"{"x":100,"y":50}"#).expect("decode should succeed");
    assert_eq!(point, PointEvent { x: 100.0, y: 50.0 });
}

#[test]
fn decode_accepts_fractional_coordinates() {
    let point = decode_point(r#"{"y":12.75,"x":3.5}"#).expect("decode should succeed");
    assert_eq!(point, PointEvent { x: 3.5, y: 12.75 });
}

#[test]
fn encode_then_decode_preserves_coordinates() {
    for (x, y) in [(0.0, 0.0), (100.0, 50.0), (0.1, 0.2), (1919.5, 1079.25), (1e-7, 4096.0)] {
        let point = PointEvent::new(x, y).expect("valid point");
        let decoded = decode_point(&encode_point(&point)).expect("decode should succeed");
        assert_eq!(decoded, point);
    }
}

#[test]
fn encode_outputs_flat_object_with_two_fields() {
    let point = PointEvent::new(7.0, 9.0).expect("valid point");
    let value: serde_json::Value = serde_json::from_str(&encode_point(&point)).expect("json");
    let map = value.as_object().expect("object");
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("x").and_then(serde_json::Value::as_f64), Some(7.0));
    assert_eq!(map.get("y").and_then(serde_json::Value::as_f64), Some(9.0));
}

#[test]
fn decode_rejects_non_json() {
    let err = decode_point("not json").expect_err("should fail");
    assert!(matches!(err, CodecError::InvalidJson(_)));
}

#[test]
fn decode_rejects_missing_field() {
    let err = decode_point(r#"{"x":1}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::InvalidJson(_)));
}

#[test]
fn decode_rejects_unknown_field() {
    let err = decode_point(r#"{"x":1,"y":2,"color":"red"}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::InvalidJson(_)));
}

#[test]
fn decode_rejects_string_coordinate() {
    let err = decode_point(r#"{"x":"1","y":2}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::InvalidJson(_)));
}

#[test]
fn decode_rejects_non_object_payload() {
    assert!(decode_point("[1,2]").is_err());
    assert!(decode_point("null").is_err());
}

#[test]
fn decode_rejects_negative_coordinate() {
    let err = decode_point(r#"{"x":5,"y":-1}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::NegativeCoordinate { axis: Axis::Y, .. }));
}

#[test]
fn new_rejects_non_finite_values() {
    let err = PointEvent::new(f64::NAN, 0.0).expect_err("nan");
    assert!(matches!(err, CodecError::NonFinite { axis: Axis::X }));
    let err = PointEvent::new(0.0, f64::INFINITY).expect_err("inf");
    assert!(matches!(err, CodecError::NonFinite { axis: Axis::Y }));
}

#[test]
fn error_messages_name_the_axis() {
    let err = PointEvent::new(-2.0, 0.0).expect_err("negative");
    assert_eq!(err.to_string(), "negative x coordinate: -2");
}
