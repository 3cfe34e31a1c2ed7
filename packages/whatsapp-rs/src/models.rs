use serde::{Deserialize, Serialize};

/// Response from POST /{phone_number_id}/messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub messaging_product: String,
    #[serde(default)]
    pub contacts: Vec<MessageContact>,
    #[serde(default)]
    pub messages: Vec<MessageId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageContact {
    pub input: String,
    pub wa_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageId {
    pub id: String,
}

impl SendMessageResponse {
    /// Message ID of the first (usually only) accepted message.
    pub fn message_id(&self) -> Option<&str> {
        self.messages.first().map(|m| m.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cloud_api_response() {
        let body = r#"{
            "messaging_product": "whatsapp",
            "contacts": [{"input": "+15551234567", "wa_id": "15551234567"}],
            "messages": [{"id": "wamid.HBgL"}]
        }"#;

        let parsed: SendMessageResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.messaging_product, "whatsapp");
        assert_eq!(parsed.message_id(), Some("wamid.HBgL"));
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let parsed: SendMessageResponse =
            serde_json::from_str(r#"{"messaging_product": "whatsapp"}"#).unwrap();
        assert!(parsed.message_id().is_none());
    }
}
