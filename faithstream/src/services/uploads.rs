//! Attachment acceptance checks
//!
//! Audio and thumbnail files are only referenced, never stored. Before a
//! reference is accepted the file type and size are checked, and a simulated
//! progress sequence is reported while the "upload" runs.

use crate::config;
use crate::error::Result;
use rand::Rng;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tokio::sync::watch;

/// Name, type and size of a local file offered as an attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl FileInfo {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    /// Describe a file on disk, guessing the MIME type from its extension
    pub async fn from_path(path: &Path) -> Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mime_type = mime_from_name(&name).to_string();

        Ok(Self {
            name,
            mime_type,
            size: metadata.len(),
        })
    }
}

fn mime_from_name(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Accept an MP3 of at most 100 MiB
pub fn check_audio(file: &FileInfo) -> std::result::Result<(), String> {
    let is_mp3 = file.mime_type == "audio/mpeg" || file.name.to_lowercase().ends_with(".mp3");
    if !is_mp3 {
        return Err("Unsupported format. Only MP3 files are accepted.".to_string());
    }
    if file.size > config::MAX_AUDIO_SIZE {
        return Err("File too large. Maximum allowed size is 100MB.".to_string());
    }
    Ok(())
}

/// Accept an image of at most 5 MiB
pub fn check_image(file: &FileInfo) -> std::result::Result<(), String> {
    if !file.mime_type.starts_with("image/") {
        return Err("Please select a valid image file (PNG/JPG).".to_string());
    }
    if file.size > config::MAX_IMAGE_SIZE {
        return Err("Thumbnail exceeds 5MB limit.".to_string());
    }
    Ok(())
}

/// Publish simulated upload progress until it reaches 100.
///
/// Each tick adds a random step of up to 20 percent. Returns early if every
/// receiver has gone away.
pub async fn simulate_upload(progress: watch::Sender<u8>, tick: Duration) {
    let mut interval = tokio::time::interval(tick);
    let mut current = 0.0_f64;

    loop {
        interval.tick().await;

        current += rand::thread_rng().gen_range(0.0..config::UPLOAD_MAX_STEP);
        let done = current >= 100.0;
        let value = if done { 100 } else { current.floor() as u8 };

        if progress.send(value).is_err() {
            tracing::debug!("Upload progress abandoned at {}%", value);
            return;
        }
        if done {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_accepts_mp3_by_type_or_name() {
        assert!(check_audio(&FileInfo::new("talk.bin", "audio/mpeg", 10)).is_ok());
        assert!(check_audio(&FileInfo::new("TALK.MP3", "", 10)).is_ok());
    }

    #[test]
    fn test_audio_rejects_other_formats_and_large_files() {
        assert_eq!(
            check_audio(&FileInfo::new("talk.wav", "audio/wav", 10)),
            Err("Unsupported format. Only MP3 files are accepted.".to_string())
        );
        assert_eq!(
            check_audio(&FileInfo::new("talk.mp3", "audio/mpeg", config::MAX_AUDIO_SIZE + 1)),
            Err("File too large. Maximum allowed size is 100MB.".to_string())
        );
        assert!(check_audio(&FileInfo::new("talk.mp3", "audio/mpeg", config::MAX_AUDIO_SIZE)).is_ok());
    }

    #[test]
    fn test_image_checks() {
        assert!(check_image(&FileInfo::new("cover.png", "image/png", 1024)).is_ok());
        assert_eq!(
            check_image(&FileInfo::new("cover.pdf", "application/pdf", 1024)),
            Err("Please select a valid image file (PNG/JPG).".to_string())
        );
        assert_eq!(
            check_image(&FileInfo::new("cover.jpg", "image/jpeg", config::MAX_IMAGE_SIZE + 1)),
            Err("Thumbnail exceeds 5MB limit.".to_string())
        );
    }

    #[test]
    fn test_mime_guess() {
        assert_eq!(mime_from_name("sermon.MP3"), "audio/mpeg");
        assert_eq!(mime_from_name("cover.jpeg"), "image/jpeg");
        assert_eq!(mime_from_name("notes"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_from_path_reads_size() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("message.mp3");
        tokio::fs::write(&path, b"ID3").await.unwrap();

        let info = FileInfo::from_path(&path).await.unwrap();

        assert_eq!(info.name, "message.mp3");
        assert_eq!(info.mime_type, "audio/mpeg");
        assert_eq!(info.size, 3);
        assert!(check_audio(&info).is_ok());
    }

    #[tokio::test]
    async fn test_simulated_progress_is_monotonic_and_completes() {
        let (tx, mut rx) = watch::channel(0u8);
        let task = tokio::spawn(simulate_upload(tx, Duration::from_millis(1)));

        let mut last = 0;
        while rx.changed().await.is_ok() {
            let value = *rx.borrow_and_update();
            assert!(value >= last);
            last = value;
        }
        task.await.unwrap();

        assert_eq!(last, 100);
    }
}
