//! Recording adapter for the `TalkingVideoProvider` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::talking_video::{GenerateFuture, GenerationConfig, TalkingVideoProvider};

/// Arguments of one `generate` call as stored in a cassette.
#[derive(Serialize)]
struct GenerateInput<'a> {
    image: &'a str,
    audio: Option<&'a str>,
    config: Option<&'a GenerationConfig>,
}

/// Records generation interactions while delegating to an inner provider.
pub struct RecordingTalkingVideoProvider {
    inner: Box<dyn TalkingVideoProvider>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingTalkingVideoProvider {
    /// Wrap `inner`, writing every call into `recorder`.
    pub fn new(inner: Box<dyn TalkingVideoProvider>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl TalkingVideoProvider for RecordingTalkingVideoProvider {
    fn generate(
        &self,
        image: &str,
        audio: Option<&str>,
        config: Option<&GenerationConfig>,
    ) -> GenerateFuture<'_> {
        let image = image.to_string();
        let audio = audio.map(str::to_string);
        let config = config.cloned();

        Box::pin(async move {
            let result = self.inner.generate(&image, audio.as_deref(), config.as_ref()).await;
            let input =
                GenerateInput { image: &image, audio: audio.as_deref(), config: config.as_ref() };
            record_interaction(&self.recorder, "talking_video", "generate", &input, &result);
            result
        })
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::talking_video::GenerationResult;

    struct Fixed;

    impl TalkingVideoProvider for Fixed {
        fn generate(
            &self,
            _image: &str,
            _audio: Option<&str>,
            _config: Option<&GenerationConfig>,
        ) -> GenerateFuture<'_> {
            Box::pin(async { GenerationResult::succeeded("/fixed.mp4") })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn records_and_passes_through() {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new("unused.yaml", "t", "c")));
        let provider = RecordingTalkingVideoProvider::new(Box::new(Fixed), Arc::clone(&recorder));

        let result = provider.generate("face.jpg", Some("hi.wav"), None).await;
        assert_eq!(result.output_path(), Some("/fixed.mp4"));
        assert_eq!(provider.name(), "fixed");
        assert_eq!(recorder.lock().unwrap().len(), 1);
    }
}
