use super::*;

#[test]
fn decode_server_event_reads_tagged_object() {
    let event = decode_server_event(r#"{"type":"ERROR","value":"game full"}"#).expect("decode");
    assert_eq!(event, ServerEvent::Error { value: "game full".to_owned() });
}

#[test]
fn decode_server_event_rejects_invalid_json() {
    let err = decode_server_event("{not json").expect_err("should fail");
    assert!(matches!(err, CodecError::Json(_)));
}

#[test]
fn decode_server_event_rejects_missing_fields() {
    let err = decode_server_event(r#"{"type":"INIT"}"#).expect_err("playerId is required");
    assert!(matches!(err, CodecError::Json(_)));
}

#[test]
fn encode_client_event_writes_shot() {
    let text = encode_client_event(&ClientEvent::Shot { x: 10.0, y: -5.5 }).expect("encode");
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value, serde_json::json!({ "type": "SHOT", "x": 10.0, "y": -5.5 }));
}

#[test]
fn encode_client_event_writes_ready() {
    let text = encode_client_event(&ClientEvent::IsReady { value: true }).expect("encode");
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value, serde_json::json!({ "type": "IS_READY", "value": true }));
}

#[test]
fn encode_server_event_is_readable_by_decoder() {
    let event = ServerEvent::SaveDemoMap { jwt: "abc".to_owned() };
    let text = encode_server_event(&event).expect("encode");
    assert_eq!(decode_server_event(&text).expect("decode"), event);
}

#[test]
fn codec_error_messages_name_the_cell() {
    let err = CodecError::MissingTile { column: 3, row: 7 };
    assert_eq!(err.to_string(), "missing tile at column 3, row 7");
}
