//! Terminal music player: catalog charts and search, the local music
//! directory, and a queue-backed playback session.

pub mod audio;
pub mod config;
pub mod controller;
pub mod logging;
pub mod model;
pub mod service;
pub mod source;
pub mod view;

#[cfg(test)]
mod testing;
