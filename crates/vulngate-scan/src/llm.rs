use serde_json::Value;
use vulngate_core::{InferenceSettings, VulngateError, ENV_TOKEN};

/// Normalized shape of an inference API response body.
///
/// Text-generation endpoints answer in several layouts depending on the
/// model and its loading state. [`InferenceResponse::from_value`] tries
/// each known layout in order and falls back to [`Opaque`](Self::Opaque).
///
/// # Examples
///
/// ```
/// use vulngate_scan::llm::InferenceResponse;
///
/// let value = serde_json::json!([{ "generated_text": "PASS" }]);
/// let parsed = InferenceResponse::from_value(&value);
/// assert_eq!(parsed, InferenceResponse::Batch("PASS".into()));
/// assert_eq!(parsed.into_text().unwrap(), "PASS");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceResponse {
    /// `[{"generated_text": "..."}, ...]`: text of the first element.
    Batch(String),
    /// `{"generated_text": "..."}`.
    Single(String),
    /// `{"error": "..."}`: the service-reported message.
    Error(String),
    /// Any other JSON, kept as its raw text.
    Opaque(String),
}

impl InferenceResponse {
    /// Match `value` against the known response layouts, in order.
    pub fn from_value(value: &Value) -> Self {
        if let Some(text) = value
            .as_array()
            .and_then(|items| items.first())
            .and_then(|first| first.get("generated_text"))
            .and_then(Value::as_str)
        {
            return Self::Batch(text.to_string());
        }

        if let Some(object) = value.as_object() {
            if let Some(text) = object.get("generated_text").and_then(Value::as_str) {
                return Self::Single(text.to_string());
            }
            if let Some(error) = object.get("error") {
                let message = match error {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                return Self::Error(message);
            }
        }

        Self::Opaque(value.to_string())
    }

    /// Collapse into the text handed to verdict classification.
    ///
    /// # Errors
    ///
    /// Returns [`VulngateError::Llm`] for [`Error`](Self::Error), carrying
    /// the service message.
    ///
    /// # Examples
    ///
    /// ```
    /// use vulngate_scan::llm::InferenceResponse;
    ///
    /// let err = InferenceResponse::Error("model loading".into()).into_text().unwrap_err();
    /// assert!(err.to_string().contains("model loading"));
    /// ```
    pub fn into_text(self) -> Result<String, VulngateError> {
        match self {
            Self::Batch(text) | Self::Single(text) | Self::Opaque(text) => Ok(text),
            Self::Error(message) => Err(VulngateError::Llm(format!(
                "Hugging Face API error: {message}"
            ))),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Batch(_) => "batch",
            Self::Single(_) => "single",
            Self::Error(_) => "error",
            Self::Opaque(_) => "opaque",
        }
    }
}

/// Client for a hosted text-generation inference API.
///
/// Posts `{"inputs": ..., "options": {"wait_for_model": true}}` to
/// `{base_url}/models/{model}` with a bearer token. One request per
/// call, bounded by the configured timeout; no retries.
///
/// # Examples
///
/// ```
/// use vulngate_core::VulngateConfig;
/// use vulngate_scan::llm::InferenceClient;
///
/// let settings = VulngateConfig::default()
///     .resolve(|key| (key == "HF_TOKEN").then(|| "hf_test".to_string()))
///     .unwrap();
/// let client = InferenceClient::new(&settings.inference).unwrap();
/// assert_eq!(client.model(), "HuggingFaceH4/zephyr-7b-beta");
/// ```
pub struct InferenceClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    token: String,
}

impl InferenceClient {
    /// Create a client from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns [`VulngateError::Config`] if no token is configured, or
    /// [`VulngateError::Llm`] if the HTTP client cannot be built.
    pub fn new(settings: &InferenceSettings) -> Result<Self, VulngateError> {
        let token = settings.token.clone().ok_or_else(|| {
            VulngateError::Config(format!("missing {ENV_TOKEN} env var (CI secret not set)"))
        })?;
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| VulngateError::Llm(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: settings.endpoint(),
            model: settings.model.clone(),
            token,
        })
    }

    /// Model identifier this client posts to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full request URL, including the model path.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `prompt` and return the normalized generated text.
    ///
    /// # Errors
    ///
    /// Returns [`VulngateError::Llm`] on transport failure or timeout, a
    /// non-2xx status, a body that is not JSON, or a service-reported
    /// error.
    pub async fn generate(&self, prompt: &str) -> Result<String, VulngateError> {
        let body = serde_json::json!({
            "inputs": prompt,
            "options": { "wait_for_model": true },
        });

        tracing::debug!(url = %self.endpoint, prompt_chars = prompt.chars().count(), "posting prompt");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VulngateError::Llm(format!("request to {} timed out", self.endpoint))
                } else {
                    VulngateError::Llm(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(VulngateError::Llm(format!(
                "inference API error {status}: {body_text}"
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| VulngateError::Llm(format!("failed to parse response: {e}")))?;

        let parsed = InferenceResponse::from_value(&value);
        tracing::debug!(shape = parsed.kind(), "normalized inference response");
        if let InferenceResponse::Opaque(raw) = &parsed {
            tracing::warn!(%raw, "unrecognized response shape, using raw body");
        }
        parsed.into_text()
    }
}
