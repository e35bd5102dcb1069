//! The topic batch: one generation call per topic, failures contained per topic.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::RunSettings;
use crate::error::GenerateError;
use crate::output::{save_jpeg, topic_output_path};
use crate::ports::{GenerationRequest, ImageGenerator, ResponsePart};
use crate::topics::Topic;

/// Characters of model commentary echoed to the console.
const TEXT_PREVIEW_CHARS: usize = 100;

/// What happened to one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The first image part was written to `path`.
    Saved {
        /// Written file.
        path: PathBuf,
        /// How many of the report's texts came before the image part.
        texts_before: usize,
    },
    /// The response carried no image part. Not an error.
    NoImage,
    /// The call, the decode or the write failed.
    Failed {
        /// Error message.
        message: String,
    },
}

/// Per-topic result, including the model commentary seen in the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicReport {
    /// Topic id.
    pub id: String,
    /// Text parts in response order, up to the failing part if the topic failed.
    pub texts: Vec<String>,
    /// Outcome.
    pub outcome: Outcome,
}

/// Outcomes of a whole run, in topic order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// One entry per processed topic.
    pub topics: Vec<TopicReport>,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.topics.iter().filter(|t| pred(&t.outcome)).count()
    }

    /// Topics whose image was written.
    #[must_use]
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Saved { .. }))
    }

    /// Topics answered without an image.
    #[must_use]
    pub fn without_image(&self) -> usize {
        self.count(|o| matches!(o, Outcome::NoImage))
    }

    /// Topics that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }
}

/// Drives topics through an [`ImageGenerator`] one at a time.
pub struct Batch<'a> {
    generator: &'a dyn ImageGenerator,
    model: String,
    aspect_ratio: String,
    size: String,
    output_dir: PathBuf,
}

impl<'a> Batch<'a> {
    /// Create a batch for a resolved model and validated settings.
    #[must_use]
    pub fn new(generator: &'a dyn ImageGenerator, model: &str, settings: &RunSettings) -> Self {
        Self {
            generator,
            model: model.to_string(),
            aspect_ratio: settings.aspect_ratio.clone(),
            size: settings.size.clone(),
            output_dir: settings.output_dir.clone(),
        }
    }

    /// Directory images are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate and persist the image for one topic. Never fails: errors end
    /// up in [`Outcome::Failed`].
    pub async fn generate(&self, topic: &Topic) -> TopicReport {
        let mut texts = Vec::new();
        let outcome = match self.try_generate(topic, &mut texts).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(topic = %topic.id, error = %e, "topic failed");
                Outcome::Failed { message: e.to_string() }
            }
        };
        TopicReport { id: topic.id.clone(), texts, outcome }
    }

    /// Text parts land in `texts` as they are scanned, so they survive a failed save.
    async fn try_generate(
        &self,
        topic: &Topic,
        texts: &mut Vec<String>,
    ) -> Result<Outcome, GenerateError> {
        let request =
            GenerationRequest::new(&self.model, &topic.prompt, &self.aspect_ratio, &self.size);
        let response = self.generator.generate(&request).await?;
        tracing::debug!(topic = %topic.id, parts = response.parts.len(), "response received");

        let mut outcome = Outcome::NoImage;
        for part in response.parts {
            match part {
                ResponsePart::Text { text } => texts.push(text),
                ResponsePart::Image { data, mime_type } if matches!(outcome, Outcome::NoImage) => {
                    let path = topic_output_path(&self.output_dir, &topic.id);
                    save_jpeg(&data, &mime_type, &path)?;
                    tracing::info!(
                        topic = %topic.id,
                        path = %path.display(),
                        %mime_type,
                        "image saved"
                    );
                    outcome = Outcome::Saved { path, texts_before: texts.len() };
                }
                ResponsePart::Image { mime_type, .. } => {
                    tracing::debug!(topic = %topic.id, %mime_type, "extra image part ignored");
                }
            }
        }
        Ok(outcome)
    }

    /// Process every topic in order, printing progress to `out`, and finish
    /// with a summary and the completion line regardless of failures.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `out` fails.
    pub async fn run<W: Write>(
        &self,
        topics: &[Topic],
        out: &mut W,
    ) -> Result<BatchReport, std::io::Error> {
        let mut report = BatchReport::default();

        for topic in topics {
            writeln!(out, "Generating image for: {}...", topic.id)?;
            out.flush()?;

            let result = self.generate(topic).await;
            let split = match &result.outcome {
                Outcome::Saved { texts_before, .. } => *texts_before,
                Outcome::NoImage | Outcome::Failed { .. } => result.texts.len(),
            };
            let (before, after) = result.texts.split_at(split);
            write_texts(out, before)?;
            match &result.outcome {
                Outcome::Saved { path, .. } => writeln!(out, "  Saved: {}", path.display())?,
                Outcome::NoImage => {}
                Outcome::Failed { message } => {
                    writeln!(out, "  Error generating {}: {message}", result.id)?;
                }
            }
            write_texts(out, after)?;
            report.topics.push(result);
        }

        writeln!(out)?;
        writeln!(
            out,
            "Summary: {} saved, {} without image, {} failed",
            report.saved(),
            report.without_image(),
            report.failed()
        )?;
        writeln!(out, "Done generating topic images!")?;
        Ok(report)
    }
}

fn write_texts<W: Write>(out: &mut W, texts: &[String]) -> Result<(), std::io::Error> {
    for text in texts {
        writeln!(out, "  Response text: {}...", preview(text, TEXT_PREVIEW_CHARS))?;
    }
    Ok(())
}

/// First `max_chars` characters of `text`.
fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
