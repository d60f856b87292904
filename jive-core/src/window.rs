use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Display style of a menu window.  Resolution always lands on exactly one
/// of these; `TextOnly` is the final fallback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowStyle {
    HomeMenu,
    IconList,
    PlayList,
    #[default]
    TextOnly,
}

impl WindowStyle {
    pub fn from_tag(tag: &str) -> Option<WindowStyle> {
        match tag {
            "home_menu" => Some(Self::HomeMenu),
            "icon_list" => Some(Self::IconList),
            "play_list" => Some(Self::PlayList),
            "text_list" => Some(Self::TextOnly),
            _ => None,
        }
    }

    /// Older servers send a menu style instead of a window style; map the
    /// known ones to an equivalent window style.
    fn from_menu_style(tag: &str) -> Option<WindowStyle> {
        match tag {
            "album" => Some(Self::IconList),
            "playlist" => Some(Self::PlayList),
            _ => None,
        }
    }
}

/// Display descriptor for the window an item opens.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub window_id: Option<String>,
    pub text: Option<String>,
    /// Multi-line help body.  Escaped newlines from the wire are normalized
    /// to real ones.
    pub textarea: String,
    pub textarea_token: Option<String>,
    pub help: Option<String>,
    pub html: Option<String>,
    pub icon: String,
    pub title_style: Option<String>,
    pub style: WindowStyle,
}

impl Window {
    pub fn with_style(style: WindowStyle) -> Window {
        Window {
            style,
            ..Window::default()
        }
    }
}

/// Merge the base and per-item window sub-records (item values win key by
/// key) and resolve the window style.  Yields nothing when neither side sent
/// a window.
pub fn extract_window(item_window: Option<&Record>, base_window: Option<&Record>) -> Option<Window> {
    if item_window.is_none() && base_window.is_none() {
        return None;
    }
    let merged = Record::merged(base_window, item_window);

    let style = merged
        .string_value("windowStyle")
        .and_then(|tag| WindowStyle::from_tag(&tag))
        .or_else(|| {
            merged
                .string_value("menuStyle")
                .and_then(|tag| WindowStyle::from_menu_style(&tag))
        })
        .unwrap_or_default();

    let icon_key = if merged.contains("icon-id") { "icon-id" } else { "icon" };

    Some(Window {
        window_id: merged.string_value("windowId"),
        text: merged.string_value("text"),
        textarea: merged.string_or_empty("textarea").replace("\\n", "\n"),
        textarea_token: merged.string_value("textAreaToken"),
        help: merged.string_value("help"),
        html: merged.string_value("html"),
        icon: merged.string_or_empty(icon_key),
        title_style: merged.string_value("titleStyle"),
        style,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(value: Value) -> Record {
        Record::from_value(&value).unwrap()
    }

    #[test]
    fn absent_on_both_sides_yields_none() {
        assert_eq!(extract_window(None, None), None);
    }

    #[test]
    fn item_values_override_base_values() {
        let base = record(json!({ "text": "Base title", "icon": "base.png" }));
        let item = record(json!({ "text": "Item title" }));
        let window = extract_window(Some(&item), Some(&base)).unwrap();
        assert_eq!(window.text.as_deref(), Some("Item title"));
        assert_eq!(window.icon, "base.png");
    }

    #[test]
    fn explicit_style_wins_over_menu_style() {
        let item = record(json!({ "windowStyle": "home_menu", "menuStyle": "album" }));
        let window = extract_window(Some(&item), None).unwrap();
        assert_eq!(window.style, WindowStyle::HomeMenu);
    }

    #[test]
    fn legacy_menu_style_degrades_before_default() {
        let item = record(json!({ "menuStyle": "playlist" }));
        let window = extract_window(Some(&item), None).unwrap();
        assert_eq!(window.style, WindowStyle::PlayList);

        let item = record(json!({ "menuStyle": "somethingNew" }));
        let window = extract_window(Some(&item), None).unwrap();
        assert_eq!(window.style, WindowStyle::TextOnly);
    }

    #[test]
    fn textarea_newlines_are_normalized() {
        let item = record(json!({ "textarea": "line one\\nline two" }));
        let window = extract_window(Some(&item), None).unwrap();
        assert_eq!(window.textarea, "line one\nline two");
    }

    #[test]
    fn icon_id_wins_over_icon() {
        let item = record(json!({ "icon-id": "17", "icon": "cover.png" }));
        let window = extract_window(Some(&item), None).unwrap();
        assert_eq!(window.icon, "17");
    }
}
