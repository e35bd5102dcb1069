//! Selects the image generator for a run: live, recording or replaying.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::gemini::GeminiGenerator;
use crate::adapters::recording::image_generator::RecordingImageGenerator;
use crate::adapters::replaying::image_generator::ReplayingImageGenerator;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::{Config, GEMINI_KEY_ENV};
use crate::error::GenerateError;
use crate::ports::ImageGenerator;

/// Cassette served instead of the live API when set.
pub const REPLAY_ENV: &str = "TOPIC_IMAGES_REPLAY";
/// Records live calls to a cassette when set to `1` or `true`.
pub const RECORD_ENV: &str = "TOPIC_IMAGES_REC";

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Image generator port.
    pub generator: Box<dyn ImageGenerator>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette file to disk.
    ///
    /// The context holding the recording generator must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, GenerateError> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| GenerateError::Config("Recording adapter still has references".into()))?
            .into_inner()
            .map_err(|e| GenerateError::Config(format!("Recorder lock poisoned: {e}")))?;
        tracing::debug!(
            interactions = recorder.interactions().len(),
            failed = recorder.failed_calls(),
            "writing cassette"
        );
        recorder.finish()
    }
}

impl ServiceContext {
    /// Create a live Gemini context.
    ///
    /// # Errors
    ///
    /// Returns an error if no Gemini API key is configured.
    pub fn live(config: &Config) -> Result<Self, GenerateError> {
        let key = config.gemini_key().ok_or_else(|| GenerateError::MissingApiKey {
            provider: "Gemini".into(),
            env_var: GEMINI_KEY_ENV.into(),
        })?;
        Ok(Self { generator: Box::new(GeminiGenerator::new(key)) })
    }

    /// Create a recording context that wraps the live adapter with a recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context cannot be created.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), GenerateError> {
        let live_ctx = Self::live(config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".topic-images/cassettes")
            .join(&timestamp)
            .join("image_generator.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-topic-batch"),
            get_commit_hash(),
        )));

        let recording_gen = RecordingImageGenerator::new(live_ctx.generator, Arc::clone(&recorder));

        Ok((Self { generator: Box::new(recording_gen) }, RecordingSession { recorder }))
    }

    /// Create a replaying context from a cassette file. Needs no API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, GenerateError> {
        let replayer = load_cassette(path)
            .map_err(|e| GenerateError::Config(format!("Failed to load cassette: {e}")))?;
        let generator = Box::new(ReplayingImageGenerator::new(Arc::new(Mutex::new(replayer))));
        Ok(Self { generator })
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
