//! Live adapter for the EchoMimic audio-to-video HTTP service.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Map, Value};

use crate::config::EchoMimicSettings;
use crate::error::ProviderError;
use crate::ports::talking_video::{
    GenerateFuture, GenerationConfig, GenerationResult, TalkingVideoProvider,
};

/// Live EchoMimic provider. One POST per call, no retries.
pub struct EchoMimicProvider {
    client: Client,
    url: String,
    silent_audio: String,
    talking_audio: String,
    timeout: Duration,
}

impl EchoMimicProvider {
    /// Create a provider from resolved settings.
    #[must_use]
    pub fn new(settings: EchoMimicSettings) -> Self {
        Self {
            client: Client::new(),
            url: settings.url,
            silent_audio: settings.silent_audio,
            talking_audio: settings.talking_audio,
            timeout: settings.timeout,
        }
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Audio reference substituted when none is supplied.
    pub fn silent_audio(&self) -> &str {
        &self.silent_audio
    }

    /// Sample talking-audio reference.
    pub fn talking_audio(&self) -> &str {
        &self.talking_audio
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the JSON body sent to EchoMimic.
    ///
    /// `extra` is merged into `config` last, so its keys win.
    pub fn request_body(&self, image: &str, audio: Option<&str>, config: &GenerationConfig) -> Value {
        let audio = match audio {
            Some(a) if !a.is_empty() => a,
            _ => self.silent_audio.as_str(),
        };

        let mut options = Map::new();
        options.insert("facecrop_dilation_ratio".into(), json!(config.face_crop_ratio));
        options.insert("height".into(), json!(config.height));
        if let Some(width) = config.width {
            options.insert("width".into(), json!(width));
        }
        for (key, value) in &config.extra {
            options.insert(key.clone(), value.clone());
        }

        json!({
            "ref_image_url": image,
            "audio_url": audio,
            "config": options,
        })
    }

    async fn call(&self, body: &Value) -> Result<String, ProviderError> {
        tracing::info!(url = %self.url, "calling EchoMimic");
        tracing::debug!(%body, "EchoMimic request body");

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: Value = response.json().await?;
        extract_output_path(&parsed)
    }
}

impl TalkingVideoProvider for EchoMimicProvider {
    fn generate(
        &self,
        image: &str,
        audio: Option<&str>,
        config: Option<&GenerationConfig>,
    ) -> GenerateFuture<'_> {
        let default_config = GenerationConfig::default();
        let body = self.request_body(image, audio, config.unwrap_or(&default_config));

        Box::pin(async move {
            match self.call(&body).await {
                Ok(output_path) => {
                    tracing::info!(%output_path, "EchoMimic generation successful");
                    GenerationResult::succeeded(output_path)
                }
                Err(e) => {
                    let message = e.to_string();
                    tracing::error!("{message}");
                    GenerationResult::failed(message)
                }
            }
        })
    }

    fn name(&self) -> &str {
        "echomimic"
    }
}

/// Pull `output_path` out of the response and make it absolute.
fn extract_output_path(body: &Value) -> Result<String, ProviderError> {
    let raw = match body.get("output_path") {
        None | Some(Value::Null) => "",
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(ProviderError::Generation(format!(
                "output_path is not a string: {other}"
            )));
        }
    };
    Ok(normalize_output_path(raw))
}

/// Prefix a non-empty relative path with `/`.
fn normalize_output_path(path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
