//! Track data sources
//!
//! - `deezer`: HTTP catalog client (chart, search, track-by-id)
//! - `local`: music directory scan with tag reading
//! - `repository`: the `MusicRepository` seam the controller fetches through
//! - `error`: the error taxonomy shown to the user

mod error;
mod deezer;
mod local;
mod repository;

pub use error::{Result, SourceError};
pub use deezer::{DeezerClient, DEFAULT_API_URL};
pub use local::{is_audio_file, LocalLibrary};
pub use repository::{MusicRepository, MusicRepositoryImpl};
