//! Audio player state
//!
//! Tracks what the bottom-bar player shows: the selected media, whether it is
//! playing, position and volume. Selecting media counts one play; the
//! download button counts one download.

use crate::config;
use crate::database::Media;
use crate::error::{AppError, Result};
use crate::services::media::{DownloadTicket, MediaService};
use crate::storage::KeyValueStore;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerState {
    pub media: Option<Media>,
    pub is_playing: bool,
    /// Playback position, 0.0 to 100.0
    pub progress: f64,
    /// 0 to 100
    pub volume: u8,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            media: None,
            is_playing: false,
            progress: 0.0,
            volume: config::DEFAULT_VOLUME,
        }
    }
}

pub struct Player<S> {
    media_service: MediaService<S>,
    state: PlayerState,
}

impl<S: KeyValueStore> Player<S> {
    pub fn new(media_service: MediaService<S>) -> Self {
        Self {
            media_service,
            state: PlayerState::default(),
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Load `media`, start playing and count one play
    pub async fn select(&mut self, media: Media) -> Result<()> {
        let play_count = self.media_service.record_play(&media.id).await?;

        tracing::info!("Now playing: {} ({} plays)", media.title, play_count);

        self.state.media = Some(Media { play_count, ..media });
        self.state.is_playing = true;
        self.state.progress = 0.0;
        Ok(())
    }

    /// Flip between playing and paused; no effect without media
    pub fn toggle_play(&mut self) {
        if self.state.media.is_some() {
            self.state.is_playing = !self.state.is_playing;
        }
    }

    /// Jump to a position given in percent
    pub fn seek(&mut self, percent: f64) {
        if self.state.media.is_some() && percent.is_finite() {
            self.state.progress = percent.clamp(0.0, 100.0);
        }
    }

    /// Update the position from the element's current time and duration
    pub fn time_update(&mut self, current_secs: f64, duration_secs: f64) {
        let progress = current_secs / duration_secs * 100.0;
        self.state.progress = if progress.is_finite() {
            progress.clamp(0.0, 100.0)
        } else {
            0.0
        };
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.state.volume = volume.min(100);
    }

    /// Count a download of the current media
    pub async fn download(&mut self) -> Result<DownloadTicket> {
        let media = self
            .state
            .media
            .as_mut()
            .ok_or_else(|| AppError::Generic("Nothing is loaded in the player".to_string()))?;

        let ticket = self.media_service.record_download(&media.id).await?;
        media.download_count = ticket.download_count;
        Ok(ticket)
    }

    pub fn close(&mut self) {
        self.state = PlayerState {
            volume: self.state.volume,
            ..PlayerState::default()
        };
    }
}

/// Render seconds as `m:ss`
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
