//! Media actions delivered from the now-playing surface

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const ACTION_PREFIX: &str = "musicplayer.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaAction {
    PlayPause,
    Next,
    Previous,
    Stop,
}

impl MediaAction {
    pub const ALL: [MediaAction; 4] = [
        MediaAction::PlayPause,
        MediaAction::Next,
        MediaAction::Previous,
        MediaAction::Stop,
    ];

    fn suffix(self) -> &'static str {
        match self {
            MediaAction::PlayPause => "PLAY_PAUSE",
            MediaAction::Next => "NEXT",
            MediaAction::Previous => "PREVIOUS",
            MediaAction::Stop => "STOP",
        }
    }

    /// Button label; play/pause depends on the current state.
    pub fn label(self, is_playing: bool) -> &'static str {
        match self {
            MediaAction::PlayPause if is_playing => "Pause",
            MediaAction::PlayPause => "Play",
            MediaAction::Next => "Next",
            MediaAction::Previous => "Previous",
            MediaAction::Stop => "Stop",
        }
    }
}

impl fmt::Display for MediaAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ACTION_PREFIX, self.suffix())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown media action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for MediaAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(ACTION_PREFIX)
            .and_then(|suffix| Self::ALL.into_iter().find(|a| a.suffix() == suffix))
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// Whatever can carry out a media action
#[async_trait]
pub trait TransportControls: Send + Sync {
    async fn play_pause(&self);
    async fn skip_next(&self);
    async fn skip_previous(&self);
    async fn stop(&self);
}

pub async fn dispatch<C: TransportControls + ?Sized>(action: MediaAction, controls: &C) {
    tracing::debug!(action = %action, "Media action received");
    match action {
        MediaAction::PlayPause => controls.play_pause().await,
        MediaAction::Next => controls.skip_next().await,
        MediaAction::Previous => controls.skip_previous().await,
        MediaAction::Stop => controls.stop().await,
    }
}

/// Forward actions to `controls` until every sender is dropped.
pub fn spawn_action_relay<C>(mut actions: mpsc::UnboundedReceiver<MediaAction>, controls: C) -> JoinHandle<()>
where
    C: TransportControls + 'static,
{
    tokio::spawn(async move {
        while let Some(action) = actions.recv().await {
            dispatch(action, &controls).await;
        }
        tracing::debug!("Media action relay stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<&'static str>>>);

    #[async_trait]
    impl TransportControls for Recorder {
        async fn play_pause(&self) {
            self.0.lock().unwrap().push("play_pause");
        }
        async fn skip_next(&self) {
            self.0.lock().unwrap().push("next");
        }
        async fn skip_previous(&self) {
            self.0.lock().unwrap().push("previous");
        }
        async fn stop(&self) {
            self.0.lock().unwrap().push("stop");
        }
    }

    #[test]
    fn identifiers_round_trip() {
        for action in MediaAction::ALL {
            let id = action.to_string();
            assert!(id.starts_with("musicplayer."));
            assert_eq!(id.parse::<MediaAction>(), Ok(action));
        }
        assert_eq!(MediaAction::PlayPause.to_string(), "musicplayer.PLAY_PAUSE");
    }

    #[test]
    fn rejects_unknown_identifiers() {
        assert!("musicplayer.SHUFFLE".parse::<MediaAction>().is_err());
        assert!("PLAY_PAUSE".parse::<MediaAction>().is_err());
        assert_eq!(
            "".parse::<MediaAction>().unwrap_err().to_string(),
            "Unknown media action: "
        );
    }

    #[test]
    fn play_pause_label_follows_state() {
        assert_eq!(MediaAction::PlayPause.label(true), "Pause");
        assert_eq!(MediaAction::PlayPause.label(false), "Play");
    }

    #[tokio::test]
    async fn relay_forwards_in_order() {
        let recorder = Recorder::default();
        let (tx, rx) = mpsc::unbounded_channel();
        let relay = spawn_action_relay(rx, recorder.clone());

        for action in [MediaAction::Next, MediaAction::PlayPause, MediaAction::Previous, MediaAction::Stop] {
            tx.send(action).unwrap();
        }
        drop(tx);
        relay.await.unwrap();

        assert_eq!(*recorder.0.lock().unwrap(), vec!["next", "play_pause", "previous", "stop"]);
    }
}
