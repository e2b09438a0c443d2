//! Local music directory scanning

use std::io;
use std::path::{Path, PathBuf};

use lofty::prelude::*;
use lofty::read_from_path;
use walkdir::WalkDir;

use crate::model::LocalTrack;

/// Supported audio file extensions
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "wav", "aac", "m4a", "opus"];

const UNKNOWN: &str = "<unknown>";

/// On-device track listing rooted at the music directory.
#[derive(Clone, Debug)]
pub struct LocalLibrary {
    root: PathBuf,
}

impl LocalLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Enumerate every audio file under the root, sorted by title.
    ///
    /// Ids are assigned 1..=n in sorted order, so they stay stable for an
    /// unchanged directory.
    pub fn scan(&self) -> io::Result<Vec<LocalTrack>> {
        if !self.root.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("music directory {} does not exist", self.root.display()),
            ));
        }
        if !self.root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", self.root.display()),
            ));
        }

        let mut tracks: Vec<LocalTrack> = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_audio_file(entry.path()))
            .map(|entry| read_local_track(entry.path()))
            .collect();

        tracks.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.path.cmp(&b.path))
        });
        for (i, track) in tracks.iter_mut().enumerate() {
            track.id = i as u64 + 1;
        }

        tracing::debug!(root = %self.root.display(), count = tracks.len(), "Local library scanned");
        Ok(tracks)
    }

    /// Tracks whose title, artist or album contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> io::Result<Vec<LocalTrack>> {
        let needle = query.to_lowercase();
        Ok(self
            .scan()?
            .into_iter()
            .filter(|track| matches_query(track, &needle))
            .collect())
    }
}

fn matches_query(track: &LocalTrack, needle: &str) -> bool {
    track.title.to_lowercase().contains(needle)
        || track.artist.to_lowercase().contains(needle)
        || track.album.to_lowercase().contains(needle)
}

/// Check if a file is a supported audio file
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read tags for one file. Unreadable tags fall back to the file name.
fn read_local_track(path: &Path) -> LocalTrack {
    let fallback_title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| UNKNOWN.to_string());

    let mut track = LocalTrack {
        id: 0,
        title: fallback_title,
        artist: UNKNOWN.to_string(),
        album: UNKNOWN.to_string(),
        duration_ms: 0,
        path: path.to_string_lossy().into_owned(),
    };

    let tagged_file = match read_from_path(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "No readable tags");
            return track;
        }
    };

    track.duration_ms = tagged_file.properties().duration().as_millis() as u64;

    if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        if let Some(title) = tag.title().filter(|t| !t.trim().is_empty()) {
            track.title = title.into_owned();
        }
        if let Some(artist) = tag.artist().filter(|a| !a.trim().is_empty()) {
            track.artist = artist.into_owned();
        }
        if let Some(album) = tag.album().filter(|a| !a.trim().is_empty()) {
            track.album = album.into_owned();
        }
    }

    track
}
