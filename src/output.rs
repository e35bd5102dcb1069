//! Output paths and JPEG persistence.

use std::path::{Path, PathBuf};

use crate::error::GenerateError;

/// Sanitize a string for use in a filename.
///
/// Converts to lowercase, replaces non-alphanumeric chars with hyphens,
/// collapses consecutive hyphens, and trims to max length.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true; // Prevents leading hyphen

    for ch in input.chars().take(max_len * 2) {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "image".to_string()
    } else {
        result
    }
}

/// Path of the image for `topic_id`: `<output_dir>/<topic_id>.jpg`.
#[must_use]
pub fn topic_output_path(output_dir: &Path, topic_id: &str) -> PathBuf {
    output_dir.join(format!("{topic_id}.jpg"))
}

/// Write image bytes as a JPEG file, overwriting any existing file.
///
/// JPEG payloads are written verbatim; anything else is decoded and
/// re-encoded. The parent directory is never created.
///
/// # Errors
///
/// Returns an error if decoding fails or the file cannot be written.
pub fn save_jpeg(data: &[u8], source_mime: &str, output_path: &Path) -> Result<(), GenerateError> {
    if is_jpeg_mime(source_mime) {
        std::fs::write(output_path, data).map_err(GenerateError::Io)
    } else {
        convert_to_jpeg(data, output_path)
    }
}

fn is_jpeg_mime(mime: &str) -> bool {
    matches!(mime, "image/jpeg" | "image/jpg")
}

fn convert_to_jpeg(data: &[u8], output_path: &Path) -> Result<(), GenerateError> {
    let img = image::load_from_memory(data)
        .map_err(|e| GenerateError::ImageConversion(format!("Failed to decode image: {e}")))?;

    // JPEG has no alpha channel.
    img.to_rgb8()
        .save_with_format(output_path, image::ImageFormat::Jpeg)
        .map_err(|e| match e {
            image::ImageError::IoError(io) => GenerateError::Io(io),
            other => GenerateError::ImageConversion(format!("Failed to save as jpeg: {other}")),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(format: image::ImageFormat) -> Vec<u8> {
        let img = image::DynamicImage::new_rgba8(2, 2);
        let img = if format == image::ImageFormat::Jpeg {
            image::DynamicImage::ImageRgb8(img.to_rgb8())
        } else {
            img
        };
        let mut buf = std::io::Cursor::new(Vec::<u8>::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn sanitize_basic() {
        assert_eq!(sanitize_for_filename("Hello World", 50), "hello-world");
    }

    #[test]
    fn sanitize_special_chars() {
        assert_eq!(
            sanitize_for_filename("A cat!! sitting on a mat...", 50),
            "a-cat-sitting-on-a-mat"
        );
    }

    #[test]
    fn sanitize_truncates() {
        let long = "a".repeat(100);
        assert!(sanitize_for_filename(&long, 10).len() <= 10);
    }

    #[test]
    fn sanitize_empty() {
        assert_eq!(sanitize_for_filename("", 50), "image");
        assert_eq!(sanitize_for_filename("!!!", 50), "image");
    }

    #[test]
    fn sanitize_keeps_valid_slug() {
        assert_eq!(sanitize_for_filename("ai-risk", 7), "ai-risk");
    }

    #[test]
    fn output_path_uses_id_and_jpg() {
        let path = topic_output_path(Path::new("/site/images"), "free-will");
        assert_eq!(path, PathBuf::from("/site/images/free-will.jpg"));
    }

    #[test]
    fn jpeg_written_verbatim_and_overwritten() {
        let dir = std::env::temp_dir().join("topic_images_output_verbatim");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("a.jpg");
        std::fs::write(&path, b"stale").unwrap();

        save_jpeg(&[0xFF, 0xD8, 0xFF, 0xE0, 1, 2], "image/jpeg", &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn png_is_reencoded_as_jpeg() {
        let dir = std::env::temp_dir().join("topic_images_output_convert");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("b.jpg");

        save_jpeg(&encoded(image::ImageFormat::Png), "image/png", &path).unwrap();
        let data = std::fs::read(&path).unwrap();
        assert_eq!(&data[..2], &[0xFF, 0xD8]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn undecodable_payload_fails() {
        let path = std::env::temp_dir().join("topic_images_output_garbage.jpg");
        let err = save_jpeg(b"not an image", "image/png", &path).unwrap_err();
        assert!(matches!(err, GenerateError::ImageConversion(_)));
    }

    #[test]
    fn missing_directory_is_not_created() {
        let dir = std::env::temp_dir().join("topic_images_output_absent");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("c.jpg");

        let err = save_jpeg(&encoded(image::ImageFormat::Jpeg), "image/jpeg", &path).unwrap_err();
        assert!(matches!(err, GenerateError::Io(_)));
        assert!(!dir.exists());
    }
}
