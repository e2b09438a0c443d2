//! Track list fetching and selection

use tokio::task::JoinHandle;

use crate::model::{ActiveScreen, FetchState, ListKind};

use super::AppController;

impl AppController {
    /// Fetch a list in the background so input stays responsive.
    pub fn refresh_list(&self, kind: ListKind) -> JoinHandle<()> {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.fetch_tracks(kind).await;
        })
    }

    /// Load a screen's list: the default listing for a blank query, a search
    /// otherwise. A successful load becomes the playback queue.
    pub async fn fetch_tracks(&self, kind: ListKind) {
        let query = self.model.get_query(kind).await.trim().to_string();
        let generation = self.model.begin_fetch(kind).await;
        tracing::debug!(?kind, query = %query, generation, "Fetching tracks");

        let result = match (kind, query.is_empty()) {
            (ListKind::Online, true) => self.repository.get_chart_tracks().await,
            (ListKind::Online, false) => self.repository.search_tracks(&query).await,
            (ListKind::Local, true) => self.repository.get_local_tracks().await,
            (ListKind::Local, false) => self.repository.search_local_tracks(&query).await,
        };

        match result {
            Ok(tracks) => {
                tracing::info!(?kind, query = %query, count = tracks.len(), "Tracks loaded");
                let applied = self
                    .model
                    .finish_fetch(kind, generation, FetchState::Success(tracks.clone()))
                    .await;
                if applied {
                    self.model.replace_queue(tracks).await;
                } else {
                    tracing::debug!(?kind, generation, "Discarding stale fetch result");
                }
            }
            Err(e) => {
                tracing::error!(?kind, query = %query, error = %e, "Failed to load tracks");
                self.model
                    .finish_fetch(kind, generation, FetchState::Error(e.to_string()))
                    .await;
            }
        }
    }

    /// Leave the search box and run the query it holds.
    pub async fn submit_search(&self, kind: ListKind) {
        self.model.set_search_focused(false).await;
        self.refresh_list(kind);
    }

    /// Play the highlighted track with its whole list as the queue.
    pub async fn select_track(&self, kind: ListKind) {
        let Some(track) = self.model.selected_track(kind).await else {
            return;
        };
        tracing::debug!(?kind, id = track.id, title = %track.title, "Track selected");

        let tracks = self.model.list_tracks(kind).await;
        self.model.replace_queue(tracks).await;
        self.model.select_in_queue(track.id).await;
        self.model.set_active_screen(ActiveScreen::Player).await;
        self.play_current().await;
    }
}
