//! Replaying adapter for the `ImageGenerator` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::GenerateError;
use crate::ports::image_generator::{
    GenerateFuture, GenerationRequest, GenerationResponse, ImageGenerator,
};

/// Serves recorded generation results from a cassette, in recorded order.
pub struct ReplayingImageGenerator {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageGenerator {
    /// Create a replaying generator backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ImageGenerator for ReplayingImageGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        tracing::debug!(prompt_len = request.prompt.len(), "replaying generate");
        let output = next_output(&self.replayer, "image_generator", "generate");
        Box::pin(async move {
            let output = output?;
            replay_result::<GenerationResponse>(output)
                .map_err(|e| GenerateError::Replayed(e.to_string()))
        })
    }
}
