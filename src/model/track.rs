//! Track metadata shared by the online catalog and the local library

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// A playable audio item.
///
/// Online tracks deserialize straight from catalog payloads. Local tracks are
/// built from [`LocalTrack`] and carry a file path in `preview`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub artist: Artist,
    #[serde(default)]
    pub album: Album,
    /// Media locator: an HTTP(S) URL for catalog previews, a path for local files.
    #[serde(default)]
    pub preview: String,
    /// Length in whole seconds.
    #[serde(default)]
    pub duration: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub cover_small: String,
    #[serde(default)]
    pub cover_medium: String,
    #[serde(default)]
    pub cover_big: String,
}

impl Track {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration))
    }

    pub fn artwork_url(&self) -> Option<&str> {
        if self.album.cover.is_empty() {
            None
        } else {
            Some(self.album.cover.as_str())
        }
    }

    pub fn is_streamed(&self) -> bool {
        self.preview.starts_with("http://") || self.preview.starts_with("https://")
    }

    pub fn is_playable(&self) -> bool {
        !self.preview.is_empty()
    }
}

/// An audio file found in the local music directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalTrack {
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Length in milliseconds.
    pub duration_ms: u64,
    pub path: String,
}

impl From<LocalTrack> for Track {
    fn from(local: LocalTrack) -> Self {
        Track {
            id: local.id,
            title: local.title,
            artist: Artist {
                id: 0,
                name: local.artist,
            },
            album: Album {
                id: 0,
                title: local.album,
                ..Default::default()
            },
            preview: local.path,
            duration: (local.duration_ms / 1000) as u32,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_track(id: u64, title: &str) -> Track {
    Track {
        id,
        title: title.to_string(),
        artist: Artist {
            id: 10,
            name: "Artist".to_string(),
        },
        album: Album {
            id: 20,
            title: "Album".to_string(),
            cover: format!("https://covers.example/{id}.jpg"),
            ..Default::default()
        },
        preview: format!("https://cdn.example/{id}.mp3"),
        duration: 30,
    }
}
