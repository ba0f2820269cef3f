use crate::error::{Error, ErrorKind, Result};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::borrow::Cow;

/// Name of the one event the relay rebroadcasts.
pub const MSG_EVENT: &str = "msg";

/// A named event with an opaque payload, exchanged as one JSON text frame:
/// `{"event": "msg", "data": <any JSON>}`.
///
/// `data` keeps the exact bytes the client sent, so key order and number
/// formatting survive the trip through the relay. A missing or `null` payload
/// is `None` and is written back as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

impl Envelope {
    pub fn decode(frame: &str) -> Result<Self> {
        serde_json::from_str(frame).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Decode,
        })
    }

    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Encode,
        })
    }

    pub fn is_msg(&self) -> bool {
        self.event == MSG_EVENT
    }

    /// The payload's JSON text, exactly as received.
    pub fn payload(&self) -> &str {
        self.data.as_deref().map_or("null", RawValue::get)
    }

    /// The payload for log lines: string payloads without their JSON quotes,
    /// anything else as raw JSON.
    pub fn display_payload(&self) -> Cow<'_, str> {
        match serde_json::from_str::<String>(self.payload()) {
            Ok(text) => Cow::Owned(text),
            Err(_) => Cow::Borrowed(self.payload()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_string_payload() {
        let envelope = Envelope::decode(r#"{"event":"msg","data":"hello"}"#).unwrap();
        assert!(envelope.is_msg());
        assert_eq!(envelope.payload(), r#""hello""#);
        assert_eq!(envelope.display_payload(), "hello");
    }

    #[test]
    fn decode_object_payload_keeps_bytes() {
        let envelope =
            Envelope::decode(r#"{"event":"msg","data":{"user":"x", "text":"hi"}}"#).unwrap();
        assert_eq!(envelope.payload(), r#"{"user":"x", "text":"hi"}"#);
        assert_eq!(envelope.display_payload(), r#"{"user":"x", "text":"hi"}"#);
    }

    #[test]
    fn decode_missing_data_is_null() {
        let envelope = Envelope::decode(r#"{"event":"msg"}"#).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.payload(), "null");
        assert_eq!(envelope.encode().unwrap(), r#"{"event":"msg","data":null}"#);
    }

    #[test]
    fn decode_other_event_is_not_msg() {
        let envelope = Envelope::decode(r#"{"event":"typing","data":true}"#).unwrap();
        assert!(!envelope.is_msg());
    }

    #[test]
    fn decode_rejects_invalid_frames() {
        for frame in ["hello", "{", r#"{"data":"no event"}"#, "[1,2]"] {
            let err = Envelope::decode(frame).unwrap_err();
            assert_eq!(err.error_kind, ErrorKind::Decode, "frame: {frame}");
        }
    }

    #[test]
    fn encode_writes_payload_verbatim() {
        let frame = r#"{"event":"msg","data":{"user":"x","text":"hi","big":123456789012345678901234,"f":1.50}}"#;
        let encoded = Envelope::decode(frame).unwrap().encode().unwrap();
        assert_eq!(encoded, frame);
    }
}
