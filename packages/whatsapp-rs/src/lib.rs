// https://developers.facebook.com/docs/whatsapp/cloud-api/reference/messages

use reqwest::{header, Client};
use serde_json::{json, Value};

pub mod models;

use crate::models::SendMessageResponse;

const GRAPH_API_BASE: &str = "https://graph.facebook.com/v19.0";

#[derive(Debug, Clone)]
pub struct WhatsAppOptions {
    pub access_token: String,
    pub phone_number_id: String,
    /// Override for the Graph API base URL (sandbox/test deployments).
    pub api_base: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WhatsAppService {
    options: WhatsAppOptions,
}

impl WhatsAppService {
    pub fn new(options: WhatsAppOptions) -> Self {
        Self { options }
    }

    fn messages_url(&self) -> String {
        let base = self
            .options
            .api_base
            .as_deref()
            .unwrap_or(GRAPH_API_BASE);
        format!(
            "{base}/{phone_id}/messages",
            phone_id = self.options.phone_number_id
        )
    }

    /// Send a free-form text message to a phone number in E.164 format.
    pub async fn send_text(
        &self,
        recipient: &str,
        body: &str,
    ) -> Result<SendMessageResponse, &'static str> {
        let payload = json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": recipient,
            "type": "text",
            "text": { "preview_url": false, "body": body },
        });

        self.post_message(payload).await
    }

    /// Send a pre-approved template message.
    ///
    /// `components` follows the Cloud API template component schema; pass
    /// `None` for templates without variables.
    pub async fn send_template(
        &self,
        recipient: &str,
        template_name: &str,
        language_code: &str,
        components: Option<Value>,
    ) -> Result<SendMessageResponse, &'static str> {
        let mut template = json!({
            "name": template_name,
            "language": { "code": language_code },
        });
        if let Some(components) = components {
            template["components"] = components;
        }

        let payload = json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": recipient,
            "type": "template",
            "template": template,
        });

        self.post_message(payload).await
    }

    async fn post_message(&self, payload: Value) -> Result<SendMessageResponse, &'static str> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "Content-Type",
            "application/json"
                .parse()
                .expect("Header value should parse correctly"),
        );

        let client = Client::new();
        let res = client
            .post(self.messages_url())
            .bearer_auth(&self.options.access_token)
            .headers(headers)
            .json(&payload)
            .send()
            .await;

        match res {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    // Log the error response from the Graph API
                    let error_body = response.text().await.unwrap_or_default();
                    eprintln!("WhatsApp error ({}): {}", status, error_body);
                    return Err("WhatsApp returned an error");
                }

                let result = response.json::<SendMessageResponse>().await;
                match result {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        eprintln!("Failed to parse WhatsApp response: {}", e);
                        Err("Error parsing message response")
                    }
                }
            }
            Err(e) => {
                eprintln!("Request to WhatsApp failed: {}", e);
                Err("Error sending message")
            }
        }
    }
}
