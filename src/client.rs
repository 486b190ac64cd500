//! Client facade binding a portrait, an audio track and a provider.

use crate::adapters::live::EchoMimicProvider;
use crate::config::EchoMimicSettings;
use crate::error::GenerationError;
use crate::ports::{GenerationConfig, GenerationResult, TalkingVideoProvider};

/// Called once with every result, successful or not.
pub type CompletionCallback = Box<dyn Fn(&GenerationResult) + Send + Sync>;

/// Generates a talking video for one portrait/audio pair.
///
/// ```no_run
/// # async fn demo() -> Result<(), portrait_to_talking::GenerationError> {
/// use portrait_to_talking::{EchoMimicSettings, TalkingVideoClient};
///
/// let client = TalkingVideoClient::echomimic("portrait.jpg", EchoMimicSettings::from_env())
///     .with_audio("speech.wav");
/// let result = client.generate(None).await?;
/// println!("{}", result.output_path().unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub struct TalkingVideoClient {
    image: String,
    audio: Option<String>,
    config: GenerationConfig,
    provider: Box<dyn TalkingVideoProvider>,
    callback: Option<CompletionCallback>,
}

impl TalkingVideoClient {
    /// Client for `image` using the given provider.
    pub fn new(image: impl Into<String>, provider: Box<dyn TalkingVideoProvider>) -> Self {
        Self {
            image: image.into(),
            audio: None,
            config: GenerationConfig::default(),
            provider,
            callback: None,
        }
    }

    /// Client for `image` backed by an EchoMimic provider.
    pub fn echomimic(image: impl Into<String>, settings: EchoMimicSettings) -> Self {
        Self::new(image, Box::new(EchoMimicProvider::new(settings)))
    }

    /// Drive the video with this audio instead of silence.
    #[must_use]
    pub fn with_audio(mut self, audio: impl Into<String>) -> Self {
        self.audio = Some(audio.into());
        self
    }

    /// Replace the generation options.
    #[must_use]
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a completion callback.
    #[must_use]
    pub fn on_complete(mut self, callback: impl Fn(&GenerationResult) + Send + Sync + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run one generation.
    ///
    /// The callback, if any, sees the result before a failure is turned into
    /// an error. `output_path` does not trigger a download: the video stays
    /// on the backend at [`GenerationResult::output_path`].
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Failed`] with the provider's message when
    /// generation fails.
    pub async fn generate(&self, output_path: Option<&str>) -> Result<GenerationResult, GenerationError> {
        tracing::info!(image = %self.image, provider = self.provider.name(), "generating talking video");

        let result = self
            .provider
            .generate(&self.image, self.audio.as_deref(), Some(&self.config))
            .await;

        if let Some(callback) = &self.callback {
            callback(&result);
        }

        if !result.is_success() {
            let message = result.error().unwrap_or("generation failed").to_string();
            return Err(GenerationError::Failed(message));
        }

        // TODO: download once EchoMimic serves videos over HTTP; it returns a server-side path today.
        if let (Some(local), Some(remote)) = (output_path, result.output_path()) {
            if !remote.is_empty() {
                tracing::warn!(
                    %remote,
                    %local,
                    "video generated on the backend; downloading to a local path is not supported"
                );
            }
        }

        Ok(result)
    }
}

/// One-shot helper: build a client and run [`TalkingVideoClient::generate`].
///
/// # Errors
///
/// Same as [`TalkingVideoClient::generate`].
pub async fn generate_talking_video(
    image: &str,
    audio: Option<&str>,
    output_path: Option<&str>,
    provider: Box<dyn TalkingVideoProvider>,
    config: GenerationConfig,
) -> Result<GenerationResult, GenerationError> {
    let mut client = TalkingVideoClient::new(image, provider).with_config(config);
    if let Some(audio) = audio {
        client = client.with_audio(audio);
    }
    client.generate(output_path).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::ports::GenerateFuture;

    type Seen = Arc<Mutex<Vec<(String, Option<String>, Option<GenerationConfig>)>>>;

    /// Returns a fixed result and remembers its arguments.
    struct Scripted {
        result: GenerationResult,
        seen: Seen,
    }

    impl Scripted {
        fn new(result: GenerationResult) -> (Self, Seen) {
            let seen = Seen::default();
            (Self { result, seen: Arc::clone(&seen) }, seen)
        }
    }

    impl TalkingVideoProvider for Scripted {
        fn generate(
            &self,
            image: &str,
            audio: Option<&str>,
            config: Option<&GenerationConfig>,
        ) -> GenerateFuture<'_> {
            self.seen.lock().unwrap().push((
                image.to_string(),
                audio.map(str::to_string),
                config.cloned(),
            ));
            let result = self.result.clone();
            Box::pin(async move { result })
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&GenerationResult) + Send + Sync + 'static) {
        let calls = Arc::new(AtomicUsize::new(0));
        let hook = Arc::clone(&calls);
        (calls, move |_: &GenerationResult| {
            hook.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test]
    async fn delegates_held_arguments() {
        let (provider, seen) = Scripted::new(GenerationResult::succeeded("/v.mp4"));
        let config = GenerationConfig::default().with_height(512).with_width(Some(384));
        let client = TalkingVideoClient::new("face.jpg", Box::new(provider))
            .with_audio("speech.wav")
            .with_config(config.clone());

        let result = client.generate(None).await.unwrap();
        assert_eq!(result.output_path(), Some("/v.mp4"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "face.jpg");
        assert_eq!(seen[0].1.as_deref(), Some("speech.wav"));
        assert_eq!(seen[0].2.as_ref(), Some(&config));
    }

    #[tokio::test]
    async fn failure_becomes_error_after_callback() {
        let (provider, _) = Scripted::new(GenerationResult::failed("EchoMimic request timeout"));
        let (calls, hook) = counter();
        let client = TalkingVideoClient::new("face.jpg", Box::new(provider)).on_complete(hook);

        let err = client.generate(None).await.unwrap_err();
        assert!(matches!(err, GenerationError::Failed(_)));
        assert_eq!(err.to_string(), "EchoMimic request timeout");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn callback_runs_once_on_success() {
        let (provider, _) = Scripted::new(GenerationResult::succeeded("/v.mp4"));
        let (calls, hook) = counter();
        let client = TalkingVideoClient::new("face.jpg", Box::new(provider)).on_complete(hook);

        client.generate(Some("local.mp4")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn output_path_does_not_touch_the_filesystem() {
        let local = std::env::temp_dir().join("p2t_client_no_download.mp4");
        let _ = std::fs::remove_file(&local);
        let (provider, _) = Scripted::new(GenerationResult::succeeded("/remote/v.mp4"));
        let client = TalkingVideoClient::new("face.jpg", Box::new(provider));

        let result = client.generate(local.to_str()).await.unwrap();
        assert_eq!(result.output_path(), Some("/remote/v.mp4"));
        assert!(!local.exists());
    }

    #[tokio::test]
    #[should_panic(expected = "callback exploded")]
    async fn callback_panic_propagates() {
        let (provider, _) = Scripted::new(GenerationResult::succeeded("/v.mp4"));
        let client = TalkingVideoClient::new("face.jpg", Box::new(provider))
            .on_complete(|_| panic!("callback exploded"));
        let _ = client.generate(None).await;
    }

    #[tokio::test]
    async fn helper_passes_audio_and_config() {
        let (provider, seen) = Scripted::new(GenerationResult::succeeded("/v.mp4"));
        let config = GenerationConfig::default().with_extra("seed", 7);

        generate_talking_video("face.jpg", Some("a.wav"), None, Box::new(provider), config)
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].1.as_deref(), Some("a.wav"));
        assert_eq!(seen[0].2.as_ref().unwrap().extra["seed"], 7);
    }

    #[test]
    fn echomimic_client_reports_provider_name() {
        let client = TalkingVideoClient::echomimic("face.jpg", EchoMimicSettings::default());
        assert_eq!(client.provider_name(), "echomimic");
    }
}
