use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::command::ServerCommand;

/// Identifier of a player connected to the server.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> PlayerId {
        PlayerId(id.into())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Point-in-time state of the actively controlled player, as last reported
/// by the transport layer.
#[derive(Clone, Debug, Default)]
pub struct PlayerStatus {
    pub player: Option<PlayerId>,
    /// Index of the currently playing entry in the player's playlist.
    pub playlist_index: usize,
}

/// Cheap to clone, shareable handle on the player status.  The transport
/// layer updates it as player notifications arrive; the view layer reads it
/// synchronously while merging pages.
#[derive(Clone, Default)]
pub struct PlayerStatusHandle {
    inner: Arc<Mutex<PlayerStatus>>,
}

impl PlayerStatusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, status: PlayerStatus) {
        *self.inner.lock() = status;
    }

    pub fn set_active_player(&self, player: Option<PlayerId>) {
        self.inner.lock().player = player;
    }

    pub fn set_playlist_index(&self, index: usize) {
        self.inner.lock().playlist_index = index;
    }

    pub fn active_player(&self) -> Option<PlayerId> {
        self.inner.lock().player.clone()
    }

    pub fn playlist_index(&self) -> usize {
        self.inner.lock().playlist_index
    }
}

/// Boundary to the transport/session layer.  Both calls are fire-and-forget:
/// responses and echoed notifications come back asynchronously as
/// `ViewEvent`s.
pub trait MenuService {
    /// Request one page of at most `limit` records for `command`, starting
    /// at `offset`.  How pagination is encoded on the wire is the
    /// transport's business.
    fn fetch_page(&self, command: &ServerCommand, offset: usize, limit: usize);

    /// Dispatch a command without expecting browsable results.
    fn issue_command(&self, command: &ServerCommand);
}
