use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::extract::VisionExtractor;
use crate::ingest::{SourceImage, SourcePool};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";

/// Vision models degrade past a handful of images per request, so the
/// pool is sent in chunks and the extracted records are concatenated.
const MAX_IMAGES_PER_REQUEST: usize = 5;

const SYSTEM_PROMPT: &str = r#"You are an identity document analysis assistant.
You will be provided with images of Indian identity documents (Aadhar card, PAN card, Driving Licence) and told the filename of each image.

Identify every distinct physical document across the images and extract its fields. Return ONLY valid JSON of the form:
{"documents": [ { ... }, { ... } ]}

Each document object must contain:
- "Document Type": "Aadhar", "PAN" or "Driving Licence" (or the closest literal description if none applies)
- "Name": holder's full name
- "Father's Name": if printed
- "DOB": date of birth, normalized to YYYY-MM-DD
- "Gender": if printed
- "Aadhar Number": the 12-digit number, for Aadhar cards
- "PAN Number": the 10-character alphanumeric number, for PAN cards
- "DL Number": the licence number, for Driving Licences
- "Address": full address, if printed
- "Sides Detected": for Aadhar only, which sides appear across the images: ["Front"], ["Back"] or ["Front", "Back"]
- "Source Files": the filenames (exactly as given) of the images this document was read from

Rules:
- If a field is missing or unreadable, return null for it.
- A document's front and back on two images is ONE document, not two.
- Do not invent values. Be careful with '0' (zero) versus 'O' (letter O) in numbers."#;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat-completions client used for vision extraction.
/// The collaborator is passed explicitly to the pipeline; there is no
/// process-wide client state.
#[derive(Debug, Clone)]
pub struct GroqVisionClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GroqVisionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn extract_chunk(&self, images: &[SourceImage]) -> Result<Vec<Value>> {
        let mut content = vec![json!({"type": "text", "text": SYSTEM_PROMPT})];
        for image in images {
            content.push(json!({
                "type": "text",
                "text": format!("The next image is from file: {}", image.filename),
            }));
            let encoded = encode_image(&image.path)?;
            content.push(json!({
                "type": "image_url",
                "image_url": {"url": format!("data:image/jpeg;base64,{encoded}")},
            }));
        }
        content.push(json!({
            "type": "text",
            "text": "Generate the JSON response for the images above.",
        }));

        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": content}],
            "response_format": {"type": "json_object"},
        });

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .with_context(|| format!("vision extraction request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            anyhow::bail!("vision extraction service returned {status}: {detail}");
        }

        let parsed: ChatResponse = response
            .json()
            .with_context(|| "failed to decode vision extraction response")?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        if content.is_empty() {
            anyhow::bail!("vision extraction service returned empty content");
        }

        debug!(bytes = content.len(), "received extraction payload");
        Ok(parse_documents(&content))
    }
}

impl VisionExtractor for GroqVisionClient {
    fn extract(&self, pool: &SourcePool) -> Result<Vec<Value>> {
        let mut documents = Vec::new();
        for chunk in pool.images().chunks(MAX_IMAGES_PER_REQUEST) {
            documents.extend(self.extract_chunk(chunk)?);
        }
        Ok(documents)
    }
}

/// Pulls the document list out of the model's JSON reply. Tolerates both
/// `{"documents": [...]}` and a bare top-level array; anything else is
/// treated as zero documents rather than an error.
fn parse_documents(content: &str) -> Vec<Value> {
    let value: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(_) => return Vec::new(),
    };
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("documents") {
            Some(Value::Array(items)) => items,
            // single document returned as a bare object
            None if !map.is_empty() => vec![Value::Object(map)],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn encode_image(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read image {}", path.display()))?;
    Ok(BASE64.encode(bytes))
}
