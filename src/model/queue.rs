//! The ordered list of tracks currently in play, plus the current-position pointer

use super::track::Track;

/// Track queue with wrap-around navigation.
///
/// Invariant: `current` is `None` or a valid index into `tracks`.
#[derive(Clone, Debug, Default)]
pub struct TrackQueue {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl TrackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the queue contents.
    ///
    /// The current track stays selected if it is part of the new list.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        let current_id = self.current().map(|t| t.id);
        self.tracks = tracks;
        self.current = current_id.and_then(|id| self.position_of(id));
    }

    /// Point the queue at the first track with `id`. Clears the selection if absent.
    pub fn select_by_id(&mut self, id: u64) -> Option<&Track> {
        self.current = self.position_of(id);
        self.current()
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Advance to the next track, wrapping from the last to the first.
    pub fn next(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(i) if i + 1 < self.tracks.len() => i + 1,
            _ => 0,
        };
        self.current = Some(next);
        self.current()
    }

    /// Step back to the previous track, wrapping from the first to the last.
    pub fn previous(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let previous = match self.current {
            Some(i) if i > 0 => i - 1,
            _ => self.tracks.len() - 1,
        };
        self.current = Some(previous);
        self.current()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn position_of(&self, id: u64) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }
}
