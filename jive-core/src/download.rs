use serde_json::Value;

use crate::{action::Action, command::ServerCommand, record::Record};

/// Song fields requested when fetching raw track lists for download:
/// artist roles, duration, album, artwork, bitrate, track number, sample
/// rate, file url and the remote marker.
pub const SONG_TAGS: &str = "ABdejJKlrStTux";

/// Parameters of a play action that may be carried over into a track-list
/// fetch.
const TITLES_PARAMS: [&str; 5] = ["track_id", "album_id", "artist_id", "genre_id", "year"];

/// Derive the "fetch raw media list" command for a locally downloadable
/// item, from its already-resolved action slots.  Items that are not backed
/// by local content yield nothing.
pub fn derive(
    record: &Record,
    go_action: Option<&Action>,
    more_action: Option<&Action>,
    play_action: Option<&Action>,
) -> Option<ServerCommand> {
    if record.string_value("trackType").as_deref() == Some("local")
        && (go_action.is_some() || more_action.is_some())
    {
        let invocation = more_action.or(go_action)?.invocation()?;
        let track_id = invocation
            .params
            .get("track_id")
            .and_then(scalar_string)
            .unwrap_or_default();
        return Some(track_list_command().param("track_id", track_id));
    }

    let invocation = play_action?.invocation()?;
    let loads_playlist = invocation.cmd == ["playlistcontrol"]
        && invocation.params.get("cmd").and_then(Value::as_str) == Some("load");
    if !loads_playlist {
        return None;
    }

    if let Some(folder_id) = invocation.params.get("folder_id") {
        Some(
            ServerCommand::new()
                .cmd(&["musicfolder"])
                .param("tags", "cu")
                .param("recursive", "1")
                .param("folder_id", folder_id.clone()),
        )
    } else if let Some(playlist_id) = invocation.params.get("playlist_id") {
        Some(
            ServerCommand::new()
                .cmd(&["playlists", "tracks"])
                .param("tags", SONG_TAGS)
                .param("playlist_id", playlist_id.clone()),
        )
    } else {
        let mut command = track_list_command();
        for key in TITLES_PARAMS {
            if let Some(value) = invocation.params.get(key) {
                if !value.is_null() {
                    command = command.param(key, value.clone());
                }
            }
        }
        Some(command)
    }
}

/// Command fetching the track list for a single known track id.
pub fn download_command(track_id: &str) -> ServerCommand {
    track_list_command().param("track_id", track_id)
}

fn track_list_command() -> ServerCommand {
    ServerCommand::new().cmd(&["titles"]).param("tags", SONG_TAGS)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
