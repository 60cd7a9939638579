use speech_stream::protocol::{
    decode_audio_chunk, encode_finalize, encode_init, encode_text_chunk, InitMessage,
    TextChunkMessage, VoiceSettings,
};

#[test]
fn test_init_message_serialization() {
    let settings = VoiceSettings {
        stability: 0.3,
        similarity_boost: 0.9,
        speed: 1.2,
    };
    let bytes = encode_init(&InitMessage::new(settings)).unwrap();
    let json = String::from_utf8(bytes).unwrap();

    assert!(json.contains("\"text\":\" \""));
    assert!(json.contains("\"voice_settings\""));
    assert!(json.contains("\"similarity_boost\":0.9"));
    assert!(json.contains("\"speed\":1.2"));

    let deserialized: InitMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.text, " ");
    assert_eq!(deserialized.voice_settings.stability, 0.3);
}

#[test]
fn test_finalize_marker() {
    let bytes = encode_finalize().unwrap();
    let json = String::from_utf8(bytes).unwrap();

    assert!(json.contains("\"text\":\"\""));

    let deserialized: TextChunkMessage = serde_json::from_str(&json).unwrap();
    assert!(deserialized.is_finalize());
    assert_eq!(
        encode_text_chunk(&TextChunkMessage::finalize()).unwrap(),
        encode_finalize().unwrap()
    );
}

#[test]
fn test_text_chunk_keeps_unicode() {
    let bytes = encode_text_chunk(&TextChunkMessage::new("Grüße, 世界", true)).unwrap();

    let deserialized: TextChunkMessage = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(deserialized.text, "Grüße, 世界");
    assert!(deserialized.try_trigger_generation);
    assert!(!deserialized.is_finalize());
}

#[test]
fn test_audio_chunk_final_without_audio() {
    let json = r#"{
        "audio": "",
        "isFinal": true,
        "normalizedAlignment": null
    }"#;

    let msg = decode_audio_chunk(json.as_bytes()).unwrap();
    assert!(!msg.has_audio());
    assert!(msg.is_last_chunk());
    assert!(msg.normalized_alignment.is_none());
}

#[test]
fn test_audio_chunk_without_final_flag() {
    let msg = decode_audio_chunk(br#"{"audio": "QUJD"}"#).unwrap();

    assert!(msg.has_audio());
    assert_eq!(msg.audio(), "QUJD");
    assert_eq!(msg.is_final, None);
    assert!(!msg.is_last_chunk());
}

#[test]
fn test_audio_chunk_truncated_payload() {
    assert!(decode_audio_chunk(br#"{"audio": "QUJ"#).is_err());
    assert!(decode_audio_chunk(b"").is_err());
}
