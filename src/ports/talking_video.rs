//! Talking-video provider port.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default face crop dilation ratio.
pub const DEFAULT_FACE_CROP_RATIO: f64 = 2.0;

/// Default output video height in pixels.
pub const DEFAULT_HEIGHT: u32 = 256;

/// Options for a single generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// How far the detected face box is dilated before cropping.
    pub face_crop_ratio: f64,
    /// Output video height.
    pub height: u32,
    /// Output video width (backend decides when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Backend-specific options merged over the built-in ones.
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            face_crop_ratio: DEFAULT_FACE_CROP_RATIO,
            height: DEFAULT_HEIGHT,
            width: None,
            extra: Map::new(),
        }
    }
}

impl GenerationConfig {
    /// Sets the face crop dilation ratio.
    #[must_use]
    pub fn with_face_crop_ratio(mut self, ratio: f64) -> Self {
        self.face_crop_ratio = ratio;
        self
    }

    /// Sets the output height.
    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// Sets the output width.
    #[must_use]
    pub fn with_width(mut self, width: Option<u32>) -> Self {
        self.width = width;
        self
    }

    /// Adds one backend-specific option.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Outcome of a generation call.
///
/// Only constructible through [`GenerationResult::succeeded`] and
/// [`GenerationResult::failed`], so a successful result never carries an
/// error and a failed one never carries an output path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGenerationResult")]
pub struct GenerationResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_path: Option<String>,
    #[serde(with = "base64_bytes", skip_serializing_if = "Option::is_none")]
    video_data: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl GenerationResult {
    /// A successful result pointing at the generated video on the backend.
    pub fn succeeded(output_path: impl Into<String>) -> Self {
        Self { success: true, output_path: Some(output_path.into()), video_data: None, error: None }
    }

    /// A failed result carrying a human-readable message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, output_path: None, video_data: None, error: Some(error.into()) }
    }

    /// Attaches raw video bytes to a successful result.
    #[must_use]
    pub fn with_video_data(mut self, data: Vec<u8>) -> Self {
        if self.success {
            self.video_data = Some(data);
        }
        self
    }

    /// Whether generation succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Remote path of the generated video.
    pub fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    /// Raw video bytes, when the backend returns them inline.
    pub fn video_data(&self) -> Option<&[u8]> {
        self.video_data.as_deref()
    }

    /// Failure message.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Wire shape used to validate deserialized results.
#[derive(Deserialize)]
struct RawGenerationResult {
    success: bool,
    #[serde(default)]
    output_path: Option<String>,
    #[serde(default, with = "base64_bytes")]
    video_data: Option<Vec<u8>>,
    #[serde(default)]
    error: Option<String>,
}

impl TryFrom<RawGenerationResult> for GenerationResult {
    type Error = String;

    fn try_from(raw: RawGenerationResult) -> Result<Self, Self::Error> {
        match (raw.success, raw.error) {
            (true, None) => {
                let result = Self::succeeded(raw.output_path.unwrap_or_default());
                Ok(match raw.video_data {
                    Some(data) => result.with_video_data(data),
                    None => result,
                })
            }
            (false, Some(error)) if raw.output_path.is_none() => Ok(Self::failed(error)),
            (true, Some(_)) => Err("successful result must not carry an error".to_string()),
            (false, _) => Err("failed result needs an error and no output_path".to_string()),
        }
    }
}

/// Boxed future returned by [`TalkingVideoProvider::generate`].
pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = GenerationResult> + Send + 'a>>;

/// Generates a talking-head video from a portrait and an audio track.
///
/// Implementations report every failure through [`GenerationResult::failed`]
/// instead of returning an error.
pub trait TalkingVideoProvider: Send + Sync {
    /// Generate a video for `image`, optionally driven by `audio`.
    ///
    /// `None` for `config` means [`GenerationConfig::default`].
    fn generate(
        &self,
        image: &str,
        audio: Option<&str>,
        config: Option<&GenerationConfig>,
    ) -> GenerateFuture<'_>;

    /// Short provider name used in logs.
    fn name(&self) -> &str;
}

/// Serde helper for `Option<Vec<u8>>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match data {
            Some(bytes) => {
                serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let Some(s) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        base64::engine::general_purpose::STANDARD
            .decode(&s)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GenerationConfig::default();
        assert!((config.face_crop_ratio - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.height, 256);
        assert!(config.width.is_none());
        assert!(config.extra.is_empty());
    }

    #[test]
    fn config_without_extra_deserializes_to_empty_map() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{"face_crop_ratio": 1.5, "height": 512}"#).unwrap();
        assert!(config.extra.is_empty());
        assert_eq!(config.height, 512);
    }

    #[test]
    fn succeeded_has_no_error() {
        let result = GenerationResult::succeeded("/videos/out.mp4");
        assert!(result.is_success());
        assert_eq!(result.output_path(), Some("/videos/out.mp4"));
        assert!(result.error().is_none());
    }

    #[test]
    fn failed_has_error_and_no_path() {
        let result = GenerationResult::failed("boom");
        assert!(!result.is_success());
        assert!(result.output_path().is_none());
        assert_eq!(result.error(), Some("boom"));
    }

    #[test]
    fn video_data_ignored_on_failure() {
        let result = GenerationResult::failed("boom").with_video_data(vec![1, 2, 3]);
        assert!(result.video_data().is_none());
    }

    #[test]
    fn result_with_video_data_survives_json() {
        let result = GenerationResult::succeeded("/a.mp4").with_video_data(vec![0, 0, 0, 0x18]);
        let json = serde_json::to_string(&result).unwrap();
        let back: GenerationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn inconsistent_result_rejected() {
        let bad = r#"{"success": true, "output_path": "/a.mp4", "error": "boom"}"#;
        assert!(serde_json::from_str::<GenerationResult>(bad).is_err());

        let bad = r#"{"success": false}"#;
        assert!(serde_json::from_str::<GenerationResult>(bad).is_err());

        let bad = r#"{"success": false, "output_path": "/a.mp4", "error": "boom"}"#;
        assert!(serde_json::from_str::<GenerationResult>(bad).is_err());
    }
}
