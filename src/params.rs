//! Validation of the image config parameters sent to Gemini.

/// Aspect ratios Gemini image models accept.
const ASPECT_RATIOS: &[&str] =
    &["1:1", "2:3", "3:2", "3:4", "4:3", "4:5", "5:4", "9:16", "16:9", "21:9"];

/// Validate that an aspect ratio is supported.
///
/// # Errors
///
/// Returns an error if the ratio is not recognized.
pub fn validate_aspect_ratio(ratio: &str) -> Result<(), String> {
    if ASPECT_RATIOS.contains(&ratio) {
        Ok(())
    } else {
        Err(format!("Unsupported aspect ratio '{ratio}'. Valid: {}", ASPECT_RATIOS.join(", ")))
    }
}

/// Validate the image size tier.
///
/// # Errors
///
/// Returns an error if the size is not recognized.
pub fn validate_size(size: &str) -> Result<(), String> {
    match size {
        "1K" | "2K" | "4K" => Ok(()),
        _ => Err(format!("Unsupported size '{size}'. Valid: 1K, 2K, 4K")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_aspect_ratio_valid() {
        assert!(validate_aspect_ratio("1:1").is_ok());
        assert!(validate_aspect_ratio("16:9").is_ok());
        assert!(validate_aspect_ratio("21:9").is_ok());
    }

    #[test]
    fn validate_aspect_ratio_invalid() {
        let err = validate_aspect_ratio("100:200").unwrap_err();
        assert!(err.contains("Unsupported aspect ratio"));
        assert!(err.contains("16:9"));
    }

    #[test]
    fn validate_size_valid() {
        assert!(validate_size("1K").is_ok());
        assert!(validate_size("2K").is_ok());
        assert!(validate_size("4K").is_ok());
    }

    #[test]
    fn validate_size_invalid() {
        assert!(validate_size("8K").is_err());
        assert!(validate_size("2k").is_err());
    }
}
