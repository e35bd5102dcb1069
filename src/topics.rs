//! Topic descriptors: the built-in list, topic files and validation.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::GenerateError;
use crate::output::sanitize_for_filename;

/// One hero image to generate: `id` names the output file, `prompt` describes the picture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Topic {
    /// Kebab-case slug used as the output filename stem.
    pub id: String,
    /// Free-form description of the desired image.
    pub prompt: String,
}

impl Topic {
    fn new(id: &str, prompt: &str) -> Self {
        Self { id: id.to_string(), prompt: prompt.to_string() }
    }
}

#[derive(Deserialize)]
struct TopicFile {
    #[serde(default)]
    topics: Vec<Topic>,
}

/// The topics generated when no topic file is given.
#[must_use]
pub fn builtin_topics() -> Vec<Topic> {
    vec![
        Topic::new(
            "moon-landing",
            "Create an atmospheric, artistic visualization of the Moon landing legacy. \
             Show a dramatic view of Earth rising over the lunar horizon, with subtle hints of \
             human achievement - perhaps distant footprints or the gentle curve of a spacecraft. \
             Use a warm golden hour color palette with deep space blues. Style: cinematic, \
             contemplative, awe-inspiring. Photo-realistic quality with artistic lighting. \
             No text.",
        ),
        Topic::new(
            "simulation-hypothesis",
            "Create an ethereal, philosophical visualization of reality as a simulation. \
             Abstract digital particles dissolving into code, reality fragmenting into geometric \
             patterns. Deep purples and electric blues with hints of copper and gold. \
             Matrix-inspired but more elegant and contemplative. Suggests the boundary between \
             real and simulated. Style: abstract digital art, cinematic, mysterious. No text.",
        ),
        Topic::new(
            "ai-risk",
            "Create a thought-provoking visualization of artificial general intelligence. \
             An abstract neural network forming into something vast and unknowable, circuits and \
             light forming patterns that suggest both intelligence and uncertainty. Warm copper \
             tones transitioning to cool technological blues. Neither utopian nor dystopian - \
             genuinely uncertain. Style: abstract technological art, contemplative, sublime. \
             No text.",
        ),
        Topic::new(
            "free-will",
            "Create a philosophical visualization of the free will debate. Branching paths and \
             decision trees rendered in an abstract, organic style. Neural pathways interweaving \
             with paths through a landscape. Warm earthy tones - sepia, copper, gold - suggesting \
             the ancient nature of the question. Style: abstract philosophical art, \
             contemplative, elegant. No text.",
        ),
        Topic::new(
            "climate-change",
            "Create a striking visualization of Earth's climate system. Dramatic atmospheric \
             layers, ocean currents rendered as flowing ribbons of color, the delicate balance of \
             planetary systems. Deep ocean blues, atmospheric whites, with warming copper and gold \
             tones suggesting both beauty and urgency. Style: scientific visualization meets fine \
             art, sublime, powerful. No text.",
        ),
    ]
}

/// Load a topic list from a TOML file of `[[topics]]` tables.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_topics(path: &Path) -> Result<Vec<Topic>, GenerateError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        GenerateError::InvalidTopic(format!("Failed to read {}: {e}", path.display()))
    })?;
    let file: TopicFile = toml::from_str(&contents).map_err(|e| {
        GenerateError::InvalidTopic(format!("Failed to parse {}: {e}", path.display()))
    })?;
    Ok(file.topics)
}

/// Check that a topic list can be processed: at least one topic, every id a
/// usable file stem, no duplicate ids, no blank prompts.
///
/// # Errors
///
/// Returns the first problem found.
pub fn validate_topics(topics: &[Topic]) -> Result<(), GenerateError> {
    if topics.is_empty() {
        return Err(GenerateError::InvalidTopic("no topics to generate".into()));
    }

    let mut seen = HashSet::new();
    for topic in topics {
        if topic.id.is_empty() {
            return Err(GenerateError::InvalidTopic("topic with empty id".into()));
        }
        let slug = sanitize_for_filename(&topic.id, topic.id.len());
        if slug != topic.id {
            return Err(GenerateError::InvalidTopic(format!(
                "topic id '{}' is not a kebab-case slug (try '{slug}')",
                topic.id
            )));
        }
        if topic.prompt.trim().is_empty() {
            return Err(GenerateError::InvalidTopic(format!(
                "topic '{}' has an empty prompt",
                topic.id
            )));
        }
        if !seen.insert(topic.id.as_str()) {
            return Err(GenerateError::InvalidTopic(format!("duplicate topic id '{}'", topic.id)));
        }
    }
    Ok(())
}

/// Restrict `topics` to the ids in `only`, keeping list order. An empty
/// filter keeps every topic.
///
/// # Errors
///
/// Returns an error if `only` names an id that is not in the list.
pub fn select_topics(topics: Vec<Topic>, only: &[String]) -> Result<Vec<Topic>, GenerateError> {
    if only.is_empty() {
        return Ok(topics);
    }
    if let Some(unknown) = only.iter().find(|id| !topics.iter().any(|t| &t.id == *id)) {
        return Err(GenerateError::InvalidArgument(format!("unknown topic id '{unknown}'")));
    }
    Ok(topics.into_iter().filter(|t| only.contains(&t.id)).collect())
}
