use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    action::{self, Action, NextWindow},
    command::ServerCommand,
    download,
    error::Error,
    record::Record,
    window::{self, Window},
};

/// Free-text input descriptor attached to an item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub len: i64,
    pub softbutton1: Option<String>,
    pub softbutton2: Option<String>,
    pub input_style: Option<String>,
    pub title: Option<String>,
    pub initial_text: Option<String>,
    pub allowed_chars: Option<String>,
    pub help: Option<HelpText>,
}

impl Input {
    fn from_record(record: &Record) -> Input {
        Input {
            len: record.int_value("len").unwrap_or(0),
            softbutton1: record.string_value("softbutton1"),
            softbutton2: record.string_value("softbutton2"),
            input_style: record.string_value("_inputStyle"),
            title: record.string_value("title"),
            initial_text: record.string_value("initialText"),
            allowed_chars: record.string_value("allowedChars"),
            help: record.record("help").map(|help| HelpText {
                text: help.string_value("text"),
                token: help.string_value("token"),
            }),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HelpText {
    pub text: Option<String>,
    pub token: Option<String>,
}

/// Value range descriptor for slider items.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub min: i64,
    pub max: i64,
    pub adjust: i64,
    pub initial: i64,
    pub slider_icons: Option<String>,
    pub help: Option<String>,
}

impl Slider {
    fn from_record(record: &Record) -> Slider {
        Slider {
            min: record.int_value("min").unwrap_or(0),
            max: record.int_value("max").unwrap_or(0),
            adjust: record.int_value("adjust").unwrap_or(0),
            initial: record.int_value("initial").unwrap_or(0),
            slider_icons: record.string_value("sliderIcons"),
            help: record.string_value("help"),
        }
    }
}

/// Checkbox state with the paired toggle actions.  Either action may be
/// absent when the server omitted it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkbox {
    pub checked: bool,
    pub on_action: Option<Action>,
    pub off_action: Option<Action>,
}

/// A menu item decoded from a server record, with display text, icon,
/// window style and action slots resolved against the shared base record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub text2: String,
    pub textkey: String,
    pub icon: String,
    pub icon_style: Option<String>,
    pub extid: Option<String>,
    pub node: Option<String>,
    pub original_node: Option<String>,
    pub weight: i64,
    pub item_type: Option<String>,
    pub next_window: Option<NextWindow>,
    pub input: Option<Input>,
    pub input_value: Option<String>,
    pub window: Option<Window>,
    /// The item needs no navigation, only invocation of `go_action`.
    pub do_action: bool,
    pub go_action: Option<Action>,
    pub play_action: Option<Action>,
    pub add_action: Option<Action>,
    pub insert_action: Option<Action>,
    pub more_action: Option<Action>,
    /// `None` when the record carried no item list at all; `Some` (possibly
    /// empty) when it did.  The two are not interchangeable.
    pub sub_items: Option<Vec<Item>>,
    pub show_big_artwork: bool,
    pub selected_index: i64,
    pub choice_strings: Vec<String>,
    pub checkbox: Option<Checkbox>,
    pub radio: Option<bool>,
    pub slider: Option<Slider>,
    pub web_link: String,
    pub download_command: Option<ServerCommand>,
    pub random_play_folder_command: Option<ServerCommand>,
}

impl Item {
    /// Decode a server record into an item.  `base_override` supplies the
    /// shared defaults record when the enclosing response carries one;
    /// otherwise the record's own "base" sub-record is used.
    ///
    /// Fails only when no identifier can be resolved.  Every other missing
    /// field degrades to its default.
    pub fn from_record(record: &Record, base_override: Option<&Record>) -> Result<Item, Error> {
        let id_key = if record.contains("cmd") { "cmd" } else { "id" };
        let id = record.string_or_empty(id_key);
        if id.is_empty() {
            return Err(Error::MissingItemId);
        }

        let text_key = if record.contains("name") { "name" } else { "text" };
        let (name, text2) = split_item_text(&record.string_or_empty(text_key));

        let icon_key = if record.contains("icon-id") { "icon-id" } else { "icon" };
        let node = record.string_value("node");

        let base = base_override
            .cloned()
            .or_else(|| record.record("base"));
        let base = base.as_ref();
        let base_window = base.and_then(|base| base.record("window"));

        let next_window = record
            .string_value("nextWindow")
            .and_then(|tag| NextWindow::from_tag(&tag));
        let input = record.record("input").as_ref().map(Input::from_record);
        let window = window::extract_window(record.record("window").as_ref(), base_window.as_ref());

        // "do" takes precedence over "go"; the record may also name an
        // alternate action to use instead of "go".
        let mut go_action = action::resolve("do", record, base);
        let mut do_action = go_action.is_some();
        if go_action.is_none() {
            let go_name = record
                .string_value("goAction")
                .unwrap_or_else(|| "go".to_string());
            go_action = action::resolve(&go_name, record, base);
        }

        let play_action = action::resolve("play", record, base);
        let add_action = action::resolve("add", record, base);
        let insert_action = action::resolve("add-hold", record, base);
        let mut more_action = action::resolve("more", record, base);
        if let Some(invocation) = more_action.as_mut().and_then(Action::invocation_mut) {
            invocation
                .params
                .insert("xmlBrowseInterimCM".to_string(), Value::from("1"));
        }

        let download_command = download::derive(
            record,
            go_action.as_ref(),
            more_action.as_ref(),
            play_action.as_ref(),
        );

        let sub_items = match record.record_list("item_loop") {
            Some(children) => {
                let mut items = Vec::with_capacity(children.len());
                for child in &children {
                    items.push(Item::from_record(child, Some(record))?);
                }
                Some(items)
            }
            None => None,
        };

        // An empty go command means there is nothing to navigate to; the
        // action is invoke-only.
        if let Some(invocation) = go_action.as_ref().and_then(Action::invocation) {
            if invocation.cmd.is_empty() {
                do_action = true;
            }
        }

        let checkbox = if record.contains("checkbox") {
            Some(Checkbox {
                checked: record.int_value("checkbox").unwrap_or(0) != 0,
                on_action: action::resolve("on", record, base),
                off_action: action::resolve("off", record, base),
            })
        } else {
            None
        };
        let radio = if record.contains("radio") {
            Some(record.int_value("radio").unwrap_or(0) != 0)
        } else {
            None
        };
        let slider = if record.contains("slider") {
            Some(Slider::from_record(record))
        } else {
            None
        };

        Ok(Item {
            id,
            name,
            text2,
            textkey: record.string_or_empty("textkey"),
            icon: record.string_or_empty(icon_key),
            icon_style: record.string_value("iconStyle"),
            extid: record.string_value("extid"),
            original_node: node.clone(),
            node,
            weight: record.int_value("weight").unwrap_or(0),
            item_type: record.string_value("type"),
            next_window,
            input,
            input_value: None,
            window,
            do_action,
            go_action,
            play_action,
            add_action,
            insert_action,
            more_action,
            sub_items,
            show_big_artwork: record.contains("showBigArtwork"),
            selected_index: record.int_value("selectedIndex").unwrap_or(0),
            choice_strings: record.string_list("choiceStrings"),
            checkbox,
            radio,
            slider,
            web_link: record.string_or_empty("weblink"),
            random_play_folder_command: download_command.clone(),
            download_command,
        })
    }

    /// Icon for this item, falling back to the enclosing window's icon.
    pub fn icon(&self) -> &str {
        if self.icon.is_empty() {
            if let Some(window) = &self.window {
                return &window.icon;
            }
        }
        &self.icon
    }

    pub fn has_sub_items(&self) -> bool {
        self.sub_items.is_some()
    }

    pub fn has_input_field(&self) -> bool {
        self.input.is_some()
    }

    pub fn has_choices(&self) -> bool {
        !self.choice_strings.is_empty()
    }

    pub fn has_input(&self) -> bool {
        self.has_input_field() || self.has_choices()
    }

    pub fn has_slider(&self) -> bool {
        self.slider.is_some()
    }

    pub fn is_input_ready(&self) -> bool {
        self.input_value.as_deref().is_some_and(|v| !v.is_empty())
    }

    pub fn has_web_link(&self) -> bool {
        !self.web_link.is_empty()
    }

    pub fn is_selectable(&self) -> bool {
        self.go_action.is_some()
            || self.next_window.is_some()
            || self.has_sub_items()
            || self.node.is_some()
            || self.checkbox.is_some()
            || self.has_web_link()
    }

    pub fn has_context_menu(&self) -> bool {
        self.play_action.is_some()
            || self.add_action.is_some()
            || self.insert_action.is_some()
            || self.more_action.is_some()
            || self.checkbox.is_some()
            || self.radio.is_some()
    }

    pub fn can_download(&self) -> bool {
        self.download_command.is_some()
    }

    /// Move the item to another menu node; the original placement stays
    /// readable from `original_node`.
    pub fn set_node(&mut self, node: impl Into<String>) {
        self.node = Some(node.into());
    }

    pub fn set_weight(&mut self, weight: i64) {
        self.weight = weight;
    }

    /// Marshal the item for inter-process or saved-state transfer.  The
    /// schema covers every field, so `from_bytes` restores an identical
    /// item, down to the null-vs-empty sub-item distinction.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Item, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Split a combined text field into name and secondary text on the first
/// newline.  Happens often enough that regular expressions would hurt.
fn split_item_text(text: &str) -> (String, String) {
    match text.find('\n') {
        Some(pos) if pos > 0 => (text[..pos].to_string(), text[pos + 1..].to_string()),
        _ => (text.to_string(), String::new()),
    }
}

/// One decoded page of a paginated menu response: the covered window of
/// items plus the totals reported by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuPage {
    pub total: usize,
    pub offset: usize,
    pub items: Vec<Item>,
}

impl MenuPage {
    /// Decode a whole response envelope: the enveloping "base" record, if
    /// any, supplies shared defaults for every entry of the item list.
    ///
    /// A decode error in any record fails this page; sibling pages are
    /// unaffected.
    pub fn from_record(response: &Record) -> Result<MenuPage, Error> {
        let base = response.record("base");
        let items = match response.record_list("item_loop") {
            Some(records) => {
                let mut items = Vec::with_capacity(records.len());
                for record in &records {
                    items.push(Item::from_record(record, base.as_ref())?);
                }
                items
            }
            None => Vec::new(),
        };
        Ok(MenuPage {
            total: response
                .int_value("count")
                .map(|count| count.max(0) as usize)
                .unwrap_or(items.len()),
            offset: response.int_value("offset").unwrap_or(0).max(0) as usize,
            items,
        })
    }
}
