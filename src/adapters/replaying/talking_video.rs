//! Replaying adapter for the `TalkingVideoProvider` port.

use std::sync::{Arc, Mutex};

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::talking_video::{
    GenerateFuture, GenerationConfig, GenerationResult, TalkingVideoProvider,
};

/// Serves recorded generation results from a cassette. Arguments are ignored.
pub struct ReplayingTalkingVideoProvider {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingTalkingVideoProvider {
    /// Create a replaying provider backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl TalkingVideoProvider for ReplayingTalkingVideoProvider {
    fn generate(
        &self,
        _image: &str,
        _audio: Option<&str>,
        _config: Option<&GenerationConfig>,
    ) -> GenerateFuture<'_> {
        let result = next_output(&self.replayer, "talking_video", "generate")
            .and_then(|output| {
                serde_json::from_value::<GenerationResult>(output)
                    .map_err(|e| format!("Failed to decode replayed result: {e}"))
            })
            .unwrap_or_else(GenerationResult::failed);
        Box::pin(async move { result })
    }

    fn name(&self) -> &str {
        "replay"
    }
}
