use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::Record;

/// Screen transition the server requests after an action fires.  Unknown
/// tags read as "none" and fall through the usual fallback chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextWindow {
    /// Open the action's results in a new window.
    NewWindow,
    /// Pop back to the parent window.
    Parent,
    /// Return all the way to the home menu.
    Home,
    /// Stay put and redraw the current window.
    Refresh,
    /// Start playback and show the now-playing screen.
    NowPlaying,
}

impl NextWindow {
    pub fn from_tag(tag: &str) -> Option<NextWindow> {
        match tag {
            "newWindow" => Some(Self::NewWindow),
            "parent" => Some(Self::Parent),
            "home" => Some(Self::Home),
            "refresh" => Some(Self::Refresh),
            "nowPlaying" => Some(Self::NowPlaying),
            _ => None,
        }
    }

    fn from_record(record: &Record) -> Option<NextWindow> {
        record
            .string_value("nextWindow")
            .and_then(|tag| Self::from_tag(&tag))
    }
}

/// Window descriptor attached to an action definition.  The only field the
/// menu protocol puts here is the context-menu marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionWindow {
    pub is_context_menu: bool,
}

/// One resolved server invocation: command tokens, parameters, player
/// restriction and the follow-up navigation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub cmd: Vec<String>,
    pub params: Map<String, Value>,
    /// Player ids the invocation is restricted to.  `None` means
    /// unrestricted, an empty list means the action applies to no specific
    /// player (the server sent the literal `"0"`).
    pub players: Option<Vec<String>>,
    pub next_window: Option<NextWindow>,
    pub window: Option<ActionWindow>,
    pub is_context_menu: bool,
}

/// A resolved action slot: either a single invocation, or the variants of a
/// radio-style multi-choice action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Single(Invocation),
    Choices(Vec<Invocation>),
}

impl Action {
    /// The single invocation, if this is not a multi-choice action.
    pub fn invocation(&self) -> Option<&Invocation> {
        match self {
            Self::Single(invocation) => Some(invocation),
            Self::Choices(_) => None,
        }
    }

    pub fn invocation_mut(&mut self) -> Option<&mut Invocation> {
        match self {
            Self::Single(invocation) => Some(invocation),
            Self::Choices(_) => None,
        }
    }
}

/// Resolve the action named `name` for `record`, using `base` as the shared
/// defaults record.
///
/// The per-item action table wins.  A base-table definition applies only
/// when its `itemsParams` key names a sub-record that actually exists on the
/// item; that sub-record then supplies the per-item parameters.  Anything
/// else resolves to no action.
pub fn resolve(name: &str, record: &Record, base: Option<&Record>) -> Option<Action> {
    let mut item_params = None;
    let mut definition = record
        .record("actions")
        .and_then(|actions| actions.record(name));
    if definition.is_none() {
        let base_action = base
            .and_then(|base| base.record("actions"))
            .and_then(|actions| actions.record(name))?;
        let indirection = base_action.string_value("itemsParams")?;
        item_params = Some(record.record(&indirection)?);
        definition = Some(base_action);
    }
    let definition = definition?;

    if let Some(choices) = definition.record_list("choices") {
        let variants = choices
            .iter()
            .map(|choice| resolve_invocation(choice, item_params.as_ref(), record, base))
            .collect();
        Some(Action::Choices(variants))
    } else {
        Some(Action::Single(resolve_invocation(
            &definition,
            item_params.as_ref(),
            record,
            base,
        )))
    }
}

fn resolve_invocation(
    definition: &Record,
    item_params: Option<&Record>,
    record: &Record,
    base: Option<&Record>,
) -> Invocation {
    let players = if definition.string_value("player").as_deref() == Some("0") {
        Some(Vec::new())
    } else if definition.contains("player") {
        Some(definition.string_list("player"))
    } else {
        None
    };

    // First present value wins: the definition itself, then the item's own
    // top-level directive, then the base record's.
    let next_window = NextWindow::from_record(definition)
        .or_else(|| NextWindow::from_record(record))
        .or_else(|| base.and_then(NextWindow::from_record));

    let definition_params = definition.record("params");
    let mut params = Map::new();
    if let Some(own) = &definition_params {
        params.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    if let Some(indirect) = item_params {
        params.extend(indirect.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    params.insert("useContextMenu".to_string(), Value::from("1"));

    let window = definition.record("window").map(|window| ActionWindow {
        is_context_menu: window.int_value("isContextMenu").unwrap_or(0) != 0,
    });

    // The server may also send isContextMenu inside the itemsParams
    // sub-record; the legacy controller ignores it there, and so must we.
    // Only the definition's own params block and window descriptor count.
    let is_context_menu = definition_params
        .map(|own| own.contains("isContextMenu"))
        .unwrap_or(false)
        || window
            .as_ref()
            .map(|window| window.is_context_menu)
            .unwrap_or(false);

    Invocation {
        cmd: definition.string_list("cmd"),
        params,
        players,
        next_window,
        window,
        is_context_menu,
    }
}
