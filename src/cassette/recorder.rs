//! Builds a cassette from the generate calls of one batch run.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};
use crate::error::GenerateError;

/// Accumulates a batch's port calls and writes them out as one YAML cassette.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    cassette: Cassette,
}

impl CassetteRecorder {
    /// Start an empty cassette for the batch `name`, to be written to `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        let cassette = Cassette {
            name: name.into(),
            recorded_at: Utc::now(),
            commit: commit.into(),
            interactions: Vec::new(),
        };
        Self { path: path.into(), cassette }
    }

    /// Append a call. Its `seq` is its position in the cassette, so replay
    /// serves topics in the order they were generated.
    pub fn record(
        &mut self,
        port: &str,
        method: &str,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        let seq = self.cassette.interactions.len();
        self.cassette.interactions.push(Interaction {
            seq,
            port: port.to_string(),
            method: method.to_string(),
            input,
            output,
        });
    }

    /// Calls recorded so far.
    #[must_use]
    pub fn interactions(&self) -> &[Interaction] {
        &self.cassette.interactions
    }

    /// Recorded calls whose output is an `Err`.
    #[must_use]
    pub fn failed_calls(&self) -> usize {
        self.interactions().iter().filter(|i| i.output.get("Err").is_some()).count()
    }

    /// Stamp the finish time and write the cassette, creating its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be serialized or written.
    pub fn finish(mut self) -> Result<PathBuf, GenerateError> {
        self.cassette.recorded_at = Utc::now();
        let yaml = serde_yaml::to_string(&self.cassette)
            .map_err(|e| GenerateError::Config(format!("Failed to serialize cassette: {e}")))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::config::load_cassette;
    use serde_json::json;

    fn generate_input(prompt: &str) -> serde_json::Value {
        json!({
            "model": "gemini-3-pro-image-preview",
            "prompt": prompt,
            "aspect_ratio": "16:9",
            "size": "2K",
            "response_modalities": ["TEXT", "IMAGE"],
        })
    }

    #[test]
    fn written_batch_replays_in_topic_order() {
        let dir = std::env::temp_dir().join("topic_images_recorder_batch");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("image_generator.cassette.yaml");

        let name = "2026-10-19T09-00-00-topic-batch";
        let mut recorder = CassetteRecorder::new(&path, name, "abc123");
        recorder.record(
            "image_generator",
            "generate",
            generate_input("moon landing"),
            json!({"Ok": {"parts": [
                {"kind": "text", "text": "Earthrise over the lunar horizon"},
                {"kind": "image", "data": "AQID", "mime_type": "image/jpeg"},
            ]}}),
        );
        recorder.record(
            "image_generator",
            "generate",
            generate_input("free will"),
            json!({"Err": "API error (503): overloaded"}),
        );
        recorder.record(
            "image_generator",
            "generate",
            generate_input("climate change"),
            json!({"Ok": {"parts": []}}),
        );
        assert_eq!(recorder.failed_calls(), 1);

        let written = recorder.finish().unwrap();
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        let cassette: Cassette = serde_yaml::from_str(&content).unwrap();
        assert_eq!(cassette.name, name);
        assert_eq!(cassette.commit, "abc123");
        let seqs: Vec<_> = cassette.interactions.iter().map(|i| i.seq).collect();
        assert_eq!(seqs, [0, 1, 2]);

        let mut replayer = load_cassette(&path).unwrap();
        let first = replayer.next_interaction("image_generator", "generate").unwrap();
        assert_eq!(first.input["prompt"], "moon landing");
        assert_eq!(first.output["Ok"]["parts"][1]["kind"], "image");
        let second = replayer.next_interaction("image_generator", "generate").unwrap();
        assert_eq!(second.output["Err"], "API error (503): overloaded");
        let third = replayer.next_interaction("image_generator", "generate").unwrap();
        assert_eq!(third.output, json!({"Ok": {"parts": []}}));
        assert!(replayer.next_interaction("image_generator", "generate").is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn finish_into_unwritable_path_is_io_error() {
        let file = std::env::temp_dir().join("topic_images_recorder_blocker");
        std::fs::write(&file, "not a directory").unwrap();

        let recorder = CassetteRecorder::new(file.join("cassette.yaml"), "blocked", "c");
        assert!(matches!(recorder.finish(), Err(GenerateError::Io(_))));

        let _ = std::fs::remove_file(&file);
    }
}
