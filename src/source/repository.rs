//! Single entry point for every track listing the screens ask for

use std::sync::Arc;

use async_trait::async_trait;

use super::deezer::DeezerClient;
use super::error::{Result, SourceError};
use super::local::LocalLibrary;
use crate::model::Track;

/// Track listings from the catalog and the local library.
///
/// Every method catches its failures and reports them as [`SourceError`];
/// nothing panics into the UI layer.
#[async_trait]
pub trait MusicRepository: Send + Sync {
    async fn get_chart_tracks(&self) -> Result<Vec<Track>>;
    async fn search_tracks(&self, query: &str) -> Result<Vec<Track>>;
    async fn get_track(&self, id: u64) -> Result<Track>;
    async fn get_local_tracks(&self) -> Result<Vec<Track>>;
    async fn search_local_tracks(&self, query: &str) -> Result<Vec<Track>>;
}

pub struct MusicRepositoryImpl {
    api: DeezerClient,
    library: Arc<LocalLibrary>,
}

impl MusicRepositoryImpl {
    pub fn new(api: DeezerClient, library: LocalLibrary) -> Self {
        Self {
            api,
            library: Arc::new(library),
        }
    }
}

#[async_trait]
impl MusicRepository for MusicRepositoryImpl {
    async fn get_chart_tracks(&self) -> Result<Vec<Track>> {
        self.api.chart().await
    }

    async fn search_tracks(&self, query: &str) -> Result<Vec<Track>> {
        self.api.search(query).await
    }

    async fn get_track(&self, id: u64) -> Result<Track> {
        self.api.track(id).await
    }

    async fn get_local_tracks(&self) -> Result<Vec<Track>> {
        let library = self.library.clone();
        let scanned = tokio::task::spawn_blocking(move || library.scan())
            .await
            .map_err(|e| SourceError::LocalLoad(e.to_string()))?
            .map_err(|e| SourceError::LocalLoad(e.to_string()))?;
        Ok(scanned.into_iter().map(Track::from).collect())
    }

    async fn search_local_tracks(&self, query: &str) -> Result<Vec<Track>> {
        let library = self.library.clone();
        let query = query.to_string();
        let found = tokio::task::spawn_blocking(move || library.search(&query))
            .await
            .map_err(|e| SourceError::LocalSearch(e.to_string()))?
            .map_err(|e| SourceError::LocalSearch(e.to_string()))?;
        Ok(found.into_iter().map(Track::from).collect())
    }
}
