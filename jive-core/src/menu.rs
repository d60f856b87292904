//! Fixed menu items every client session starts from.  They are built once,
//! from small synthetic records, and never mutated afterwards.

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::{
    command::ServerCommand,
    item::Item,
    record::Record,
    window::{Window, WindowStyle},
};

pub static HOME: Lazy<Item> = Lazy::new(|| node("home", None, "Home", 1, WindowStyle::HomeMenu));

pub static CURRENT_PLAYLIST: Lazy<Item> =
    Lazy::new(|| node("status", None, "Playlist", 1, WindowStyle::PlayList));

pub static EXTRAS: Lazy<Item> =
    Lazy::new(|| node("extras", Some("home"), "Extras", 50, WindowStyle::HomeMenu));

pub static SETTINGS: Lazy<Item> =
    Lazy::new(|| node("settings", Some("home"), "Settings", 1005, WindowStyle::HomeMenu));

pub static ADVANCED_SETTINGS: Lazy<Item> = Lazy::new(|| {
    node(
        "advancedSettings",
        Some("settings"),
        "Advanced settings",
        105,
        WindowStyle::TextOnly,
    )
});

pub static ARCHIVE: Lazy<Item> =
    Lazy::new(|| node("archiveNode", Some("home"), "Archive", 10, WindowStyle::HomeMenu));

/// Context-menu entries the client adds locally to browsed items.
pub static DOWNLOAD: Lazy<Item> = Lazy::new(|| entry("downloadItem", "Download"));
pub static RANDOM_PLAY: Lazy<Item> = Lazy::new(|| entry("randomPlay", "Random play folder"));
pub static PLAY_NOW: Lazy<Item> = Lazy::new(|| entry("playNow", "Play now"));
pub static ADD_TO_END: Lazy<Item> = Lazy::new(|| entry("playAdd", "Add to end"));
pub static PLAY_NEXT: Lazy<Item> = Lazy::new(|| entry("playNext", "Play next"));
pub static MORE: Lazy<Item> = Lazy::new(|| entry("more", "More"));

/// Server command paging the current playlist of the active player.
pub fn status_command() -> ServerCommand {
    ServerCommand::new().cmd(&["status"])
}

fn node(id: &str, parent: Option<&str>, name: &str, weight: i64, style: WindowStyle) -> Item {
    let mut fields = Map::new();
    fields.insert("id".to_string(), Value::from(id));
    if let Some(parent) = parent {
        fields.insert("node".to_string(), Value::from(parent));
    }
    fields.insert("name".to_string(), Value::from(name));
    fields.insert("weight".to_string(), Value::from(weight));
    let mut item = Item::from_record(&Record::from(fields), None).expect("built-in menu record");
    item.window = Some(Window::with_style(style));
    item
}

fn entry(id: &str, name: &str) -> Item {
    let mut fields = Map::new();
    fields.insert("id".to_string(), Value::from(id));
    fields.insert("node".to_string(), Value::from(id));
    fields.insert("name".to_string(), Value::from(name));
    Item::from_record(&Record::from(fields), None).expect("built-in menu record")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_nodes_carry_their_window_style() {
        assert_eq!(HOME.id, "home");
        assert_eq!(HOME.window.as_ref().unwrap().style, WindowStyle::HomeMenu);
        assert_eq!(
            CURRENT_PLAYLIST.window.as_ref().unwrap().style,
            WindowStyle::PlayList
        );
        assert_eq!(SETTINGS.node.as_deref(), Some("home"));
        assert_eq!(SETTINGS.weight, 1005);
    }

    #[test]
    fn context_entries_sit_under_their_own_node() {
        assert_eq!(MORE.id, "more");
        assert_eq!(MORE.node.as_deref(), Some("more"));
        assert!(MORE.window.is_none());
    }
}
