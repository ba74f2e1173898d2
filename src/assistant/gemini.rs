use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::{ReceiptExtraction, Transaction};

use super::{
    category_prompt, insights_prompt, parse_receipt_response, Assistant, AssistantError,
    AssistantResult,
};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const RECEIPT_INSTRUCTION: &str = "Extract transaction details from this receipt. Return JSON.";

/// Calls the Gemini `generateContent` REST endpoint.
pub struct GeminiAssistant {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GeminiAssistant {
    pub fn new(
        api_key: impl Into<String>,
        model: &str,
        timeout_secs: u64,
    ) -> AssistantResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|err| AssistantError::Http(err.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Points requests at another base URL, e.g. a proxy.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn generate(&self, request: &GenerateRequest) -> AssistantResult<String> {
        tracing::debug!(model = %self.model, "sending generateContent request");
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .map_err(|err| AssistantError::Http(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let payload: GenerateResponse = response
            .json()
            .map_err(|err| AssistantError::Parse(err.to_string()))?;
        response_text(payload)
    }
}

impl Assistant for GeminiAssistant {
    fn extract_transaction(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> AssistantResult<ReceiptExtraction> {
        let text = self.generate(&receipt_request(image, mime_type))?;
        parse_receipt_response(&text)
    }

    fn suggest_category(
        &self,
        merchant: &str,
        description: Option<&str>,
    ) -> AssistantResult<String> {
        let text = self.generate(&text_request(category_prompt(merchant, description)))?;
        Ok(text.trim().to_string())
    }

    fn generate_insights(&self, transactions: &[Transaction]) -> AssistantResult<String> {
        self.generate(&text_request(insights_prompt(transactions)))
    }
}

fn text_request(prompt: String) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: Some(prompt),
                inline_data: None,
            }],
        }],
        generation_config: None,
    }
}

fn receipt_request(image: &[u8], mime_type: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: mime_type.to_string(),
                        data: STANDARD.encode(image),
                    }),
                },
                Part {
                    text: Some(RECEIPT_INSTRUCTION.to_string()),
                    inline_data: None,
                },
            ],
        }],
        generation_config: Some(json!({
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "merchant": { "type": "STRING" },
                    "date": { "type": "STRING", "description": "YYYY-MM-DD format" },
                    "amount": { "type": "NUMBER" },
                    "category": {
                        "type": "STRING",
                        "description": "A general category like Food, Transport, Utilities"
                    },
                    "items": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["merchant", "amount", "date"]
            }
        })),
    }
}

fn response_text(payload: GenerateResponse) -> AssistantResult<String> {
    let text: String = payload
        .candidates
        .into_iter()
        .next()
        .map(|candidate| {
            candidate
                .content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        Err(AssistantError::EmptyResponse)
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_request_inlines_base64_image() {
        let request = receipt_request(b"abc", "image/png");
        let json = serde_json::to_value(&request).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "YWJj");
        assert!(parts[0].get("text").is_none());
        assert_eq!(parts[1]["text"], RECEIPT_INSTRUCTION);
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn text_request_omits_generation_config() {
        let json = serde_json::to_value(text_request("hi".into())).unwrap();
        assert!(json.get("generationConfig").is_none());
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let payload: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Food"},{"text":"!"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response_text(payload).unwrap(), "Food!");

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            response_text(empty),
            Err(AssistantError::EmptyResponse)
        ));
    }

    #[test]
    fn url_targets_configured_model() {
        let assistant = GeminiAssistant::new("key", "gemini-2.5-flash", 5)
            .unwrap()
            .with_endpoint("http://localhost:9/");
        assert_eq!(
            assistant.url(),
            "http://localhost:9/models/gemini-2.5-flash:generateContent"
        );
    }
}
