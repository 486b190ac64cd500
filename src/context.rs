//! Service context that selects the provider for a run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::EchoMimicProvider;
use crate::adapters::recording::talking_video::RecordingTalkingVideoProvider;
use crate::adapters::replaying::talking_video::ReplayingTalkingVideoProvider;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::EchoMimicSettings;
use crate::error::GenerationError;
use crate::ports::TalkingVideoProvider;

/// Environment variable naming a cassette to replay.
pub const REPLAY_ENV: &str = "PORTRAIT_TO_TALKING_REPLAY";

/// Environment variable enabling recording (`1` or `true`).
pub const RECORD_ENV: &str = "PORTRAIT_TO_TALKING_REC";

/// Bundles the provider used for a run.
pub struct ServiceContext {
    /// Talking-video provider port.
    pub provider: Box<dyn TalkingVideoProvider>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Write the cassette to disk.
    ///
    /// Call after the recording provider has been dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is still alive or the file cannot be
    /// written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording provider still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Live EchoMimic context.
    #[must_use]
    pub fn live(settings: EchoMimicSettings) -> Self {
        Self { provider: Box::new(EchoMimicProvider::new(settings)) }
    }

    /// Live context whose calls are also written to a cassette under
    /// `.portrait-to-talking/cassettes/<timestamp>/`.
    #[must_use]
    pub fn recording(settings: EchoMimicSettings) -> (Self, RecordingSession) {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".portrait-to-talking/cassettes")
            .join(&timestamp)
            .join("talking_video.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-talking_video"),
            commit_hash(),
        )));

        let live = Self::live(settings);
        let provider = RecordingTalkingVideoProvider::new(live.provider, Arc::clone(&recorder));
        (Self { provider: Box::new(provider) }, RecordingSession { recorder })
    }

    /// Replaying context backed by a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, GenerationError> {
        let replayer = load_cassette(path)
            .map_err(|e| GenerationError::Config(format!("Failed to load cassette: {e}")))?;
        let provider = ReplayingTalkingVideoProvider::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { provider: Box::new(provider) })
    }
}

/// Current git commit hash, or "unknown".
fn commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
