use serde::Deserialize;

/// One inbound job message as delivered by the queue transport.
///
/// `metadata` stays opaque here; it is only interpreted by the generation
/// stage, so an envelope with valid fields but a broken graph description
/// still counts as parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct JobMessage {
    pub customizer_name: String,
    pub metadata: serde_json::Value,
    pub output_object_key: String,
    pub callback_url: String,
}

impl JobMessage {
    pub fn from_bytes(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}
