//! Keeps a displayed playlist in step with the server.
//!
//! All state lives behind a single owner: events are funneled through one
//! channel and `handle` is driven from one thread, the way the presentation
//! layer drives it:
//!
//! ```ignore
//! for event in view.receiver() {
//!     view.handle(event);
//! }
//! ```
//!
//! Decoding is pure and can happen anywhere; only the merge into view state
//! is serialized here.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::{
    command::ServerCommand,
    item::{Item, MenuPage},
    menu,
    service::{MenuService, PlayerId, PlayerStatusHandle},
};

#[derive(Clone, Debug)]
pub struct ViewConfig {
    /// Number of items requested per page when reloading.
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { page_size: 200 }
    }
}

/// Local mutations of the playlist, issued against the active player.
#[derive(Clone, Debug)]
pub enum ViewCommand {
    /// Throw the visible list away and reload it from the start.
    Reload,
    Clear,
    Remove { index: usize },
    Move { from: usize, to: usize },
    /// Jump playback to the entry at `index`.
    PlayIndex { index: usize },
    Save { name: String },
}

#[derive(Clone, Debug)]
pub enum ViewEvent {
    Command(ViewCommand),
    /// The active player moved to another playlist entry.
    TrackChanged { player: PlayerId, index: usize },
    /// A player's playlist content changed.
    PlaylistChanged { player: PlayerId },
    /// One decoded page arrived from the transport layer.
    Page(MenuPage),

    // Instructions for the presentation layer.  Ignored on the input side.
    ListInvalidated,
    RowsChanged { rows: Vec<usize> },
    ScrollTo { index: usize },
}

/// Reconciles the displayed playlist against remote change notifications,
/// suppressing the echoes of its own mutations.
pub struct PlaylistView<S> {
    service: S,
    status: PlayerStatusHandle,
    config: ViewConfig,
    items: Vec<Option<Item>>,
    total: usize,
    selected_index: usize,
    /// Echo notifications still expected for locally issued mutations.
    skip_playlist_changed: usize,
    sender: Sender<ViewEvent>,
    receiver: Receiver<ViewEvent>,
}

impl<S: MenuService> PlaylistView<S> {
    pub fn new(service: S, status: PlayerStatusHandle, config: ViewConfig) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            service,
            status,
            config,
            items: Vec::new(),
            total: 0,
            selected_index: 0,
            skip_playlist_changed: 0,
            sender,
            receiver,
        }
    }

    pub fn sender(&self) -> Sender<ViewEvent> {
        self.sender.clone()
    }

    pub fn receiver(&self) -> Receiver<ViewEvent> {
        self.receiver.clone()
    }

    /// Visible rows; `None` marks a row whose page has not arrived yet.
    pub fn items(&self) -> &[Option<Item>] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)?.as_ref()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn handle(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::Command(command) => {
                self.handle_command(command);
            }
            ViewEvent::TrackChanged { player, index } => {
                self.handle_track_changed(player, index);
            }
            ViewEvent::PlaylistChanged { player } => {
                self.handle_playlist_changed(player);
            }
            ViewEvent::Page(page) => {
                self.handle_page(page);
            }
            ViewEvent::ListInvalidated | ViewEvent::RowsChanged { .. } | ViewEvent::ScrollTo { .. } => {}
        }
    }

    fn handle_command(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::Reload => self.invalidate(),
            ViewCommand::Clear => {
                self.mutate(ServerCommand::new().cmd(&["playlist", "clear"]));
            }
            ViewCommand::Remove { index } => {
                self.mutate(ServerCommand::new().cmd(&["playlist", "delete", &index.to_string()]));
            }
            ViewCommand::Move { from, to } => {
                self.mutate(
                    ServerCommand::new().cmd(&[
                        "playlist",
                        "move",
                        &from.to_string(),
                        &to.to_string(),
                    ]),
                );
            }
            ViewCommand::PlayIndex { index } => {
                // Selects a track without changing the playlist, so no echo
                // is expected.
                self.service
                    .issue_command(&ServerCommand::new().cmd(&["playlist", "index", &index.to_string()]));
            }
            ViewCommand::Save { name } => {
                self.service
                    .issue_command(&ServerCommand::new().cmd(&["playlist", "save", &name]));
            }
        }
    }

    /// Issue a mutation that will be echoed back as a playlist-changed
    /// notification.  The counter must be up before the command leaves, so
    /// the echo always observes it.
    fn mutate(&mut self, command: ServerCommand) {
        self.skip_playlist_changed += 1;
        self.service.issue_command(&command);
    }

    fn handle_playlist_changed(&mut self, player: PlayerId) {
        if Some(&player) != self.status.active_player().as_ref() {
            return;
        }
        if self.skip_playlist_changed > 0 {
            self.skip_playlist_changed -= 1;
            log::debug!("skipping expected echo of a local playlist mutation");
            return;
        }
        self.invalidate();
    }

    fn handle_track_changed(&mut self, player: PlayerId, index: usize) {
        if Some(&player) != self.status.active_player().as_ref() {
            return;
        }
        let previous = self.selected_index;
        self.selected_index = index;
        let rows = if previous == index {
            vec![index]
        } else {
            vec![previous, index]
        };
        self.emit(ViewEvent::RowsChanged { rows });
    }

    fn handle_page(&mut self, page: MenuPage) {
        let MenuPage { total, offset, items } = page;

        // Global-action pseudo-items are handled locally, never shown in
        // the playlist.
        let mut total = total;
        let mut surviving = Vec::with_capacity(items.len());
        for mut item in items {
            if item.has_sub_items() || item.has_input() {
                total = total.saturating_sub(1);
                continue;
            }
            // Playlist rows are only actionable through the context menu.
            if item.more_action.is_none() {
                item.more_action = item.go_action.take();
            }
            surviving.push(item);
        }

        self.total = total;
        self.items.resize(total, None);
        let merged_len = surviving.len();
        for (i, item) in surviving.into_iter().enumerate() {
            if let Some(row) = self.items.get_mut(offset + i) {
                *row = Some(item);
            }
        }

        let cursor = self.status.playlist_index();
        self.selected_index = cursor;
        // Position the list at the playing entry.  Repeated for later pages
        // covering the cursor, because newly filled rows may have pushed it
        // off screen.
        if offset == 0 || (offset <= cursor && cursor < offset + merged_len) {
            self.emit(ViewEvent::ScrollTo { index: cursor });
        }
    }

    fn invalidate(&mut self) {
        self.items.clear();
        self.total = 0;
        self.emit(ViewEvent::ListInvalidated);
        self.service
            .fetch_page(&menu::status_command(), 0, self.config.page_size);
    }

    fn emit(&mut self, event: ViewEvent) {
        self.sender.send(event).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::service::PlayerStatus;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        Fetch(ServerCommand, usize, usize),
        Issue(ServerCommand),
    }

    #[derive(Clone, Default)]
    struct FakeService {
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl FakeService {
        fn drain(&self) -> Vec<Call> {
            self.calls.lock().drain(..).collect()
        }
    }

    impl MenuService for FakeService {
        fn fetch_page(&self, command: &ServerCommand, offset: usize, limit: usize) {
            self.calls.lock().push(Call::Fetch(command.clone(), offset, limit));
        }

        fn issue_command(&self, command: &ServerCommand) {
            self.calls.lock().push(Call::Issue(command.clone()));
        }
    }

    fn active(id: &str) -> PlayerStatusHandle {
        let status = PlayerStatusHandle::new();
        status.update(PlayerStatus {
            player: Some(PlayerId::new(id)),
            playlist_index: 0,
        });
        status
    }

    fn view(status: PlayerStatusHandle) -> (PlaylistView<FakeService>, FakeService) {
        let service = FakeService::default();
        let view = PlaylistView::new(service.clone(), status, ViewConfig::default());
        (view, service)
    }

    fn emitted(view: &PlaylistView<FakeService>) -> Vec<ViewEvent> {
        view.receiver().try_iter().collect()
    }

    fn song(id: &str) -> Item {
        let record = Record::from_value(&json!({
            "id": id,
            "name": format!("Song {id}"),
            "actions": { "go": { "cmd": ["songinfo"] } }
        }))
        .unwrap();
        Item::from_record(&record, None).unwrap()
    }

    fn pseudo(id: &str) -> Item {
        let record = Record::from_value(&json!({
            "id": id,
            "name": "Save playlist",
            "item_loop": []
        }))
        .unwrap();
        Item::from_record(&record, None).unwrap()
    }

    #[test]
    fn local_mutation_suppresses_exactly_one_echo() {
        let status = active("aa:bb");
        let (mut view, service) = view(status);

        view.handle(ViewEvent::Command(ViewCommand::Clear));
        assert_eq!(view.skip_playlist_changed, 1);
        let calls = service.drain();
        assert!(matches!(&calls[..], [Call::Issue(c)] if c.cmd == ["playlist", "clear"]));

        // The expected echo is swallowed without a reload.
        view.handle(ViewEvent::PlaylistChanged { player: PlayerId::new("aa:bb") });
        assert_eq!(view.skip_playlist_changed, 0);
        assert!(service.drain().is_empty());
        assert!(emitted(&view).is_empty());

        // An unrelated change triggers the full reload.
        view.handle(ViewEvent::PlaylistChanged { player: PlayerId::new("aa:bb") });
        assert_eq!(view.skip_playlist_changed, 0);
        let calls = service.drain();
        assert!(matches!(&calls[..], [Call::Fetch(c, 0, _)] if c.cmd == ["status"]));
        assert!(matches!(&emitted(&view)[..], [ViewEvent::ListInvalidated]));
    }

    #[test]
    fn foreign_player_notifications_are_ignored() {
        let (mut view, service) = view(active("aa:bb"));
        view.handle(ViewEvent::PlaylistChanged { player: PlayerId::new("cc:dd") });
        view.handle(ViewEvent::TrackChanged { player: PlayerId::new("cc:dd"), index: 3 });
        assert!(service.drain().is_empty());
        assert!(emitted(&view).is_empty());
        assert_eq!(view.selected_index(), 0);
    }

    #[test]
    fn track_change_redraws_only_the_two_affected_rows() {
        let status = active("aa:bb");
        let (mut view, _service) = view(status);
        view.selected_index = 2;

        view.handle(ViewEvent::TrackChanged { player: PlayerId::new("aa:bb"), index: 5 });

        assert_eq!(view.selected_index(), 5);
        let events = emitted(&view);
        assert!(matches!(&events[..], [ViewEvent::RowsChanged { rows }] if rows == &vec![2, 5]));
    }

    #[test]
    fn pseudo_items_shrink_the_reported_total() {
        let status = active("aa:bb");
        let (mut view, _service) = view(status);

        view.handle(ViewEvent::Page(MenuPage {
            total: 3,
            offset: 0,
            items: vec![song("one"), pseudo("save"), song("two")],
        }));

        assert_eq!(view.total(), 2);
        assert_eq!(view.items().len(), 2);
        assert_eq!(view.item(0).unwrap().id, "one");
        assert_eq!(view.item(1).unwrap().id, "two");
    }

    #[test]
    fn surviving_rows_are_reparented_onto_the_more_slot() {
        let status = active("aa:bb");
        let (mut view, _service) = view(status);

        view.handle(ViewEvent::Page(MenuPage {
            total: 1,
            offset: 0,
            items: vec![song("one")],
        }));

        let row = view.item(0).unwrap();
        assert!(row.go_action.is_none());
        let invocation = row.more_action.as_ref().unwrap().invocation().unwrap();
        assert_eq!(invocation.cmd, vec!["songinfo"]);
    }

    #[test]
    fn first_page_scrolls_to_the_playing_entry() {
        let status = active("aa:bb");
        status.set_playlist_index(1);
        let (mut view, _service) = view(status);

        view.handle(ViewEvent::Page(MenuPage {
            total: 2,
            offset: 0,
            items: vec![song("one"), song("two")],
        }));

        assert_eq!(view.selected_index(), 1);
        let events = emitted(&view);
        assert!(matches!(&events[..], [ViewEvent::ScrollTo { index: 1 }]));
    }

    #[test]
    fn later_pages_scroll_only_when_they_cover_the_cursor() {
        let status = active("aa:bb");
        status.set_playlist_index(5);
        let (mut view, _service) = view(status.clone());

        view.handle(ViewEvent::Page(MenuPage {
            total: 8,
            offset: 2,
            items: vec![song("three"), song("four")],
        }));
        assert!(emitted(&view).is_empty());

        view.handle(ViewEvent::Page(MenuPage {
            total: 8,
            offset: 4,
            items: vec![song("five"), song("six")],
        }));
        let events = emitted(&view);
        assert!(matches!(&events[..], [ViewEvent::ScrollTo { index: 5 }]));
        assert_eq!(view.item(5).unwrap().id, "six");
        // Rows of pages that have not arrived stay pending.
        assert!(view.item(7).is_none());
    }

    #[test]
    fn reload_races_keep_their_own_suppression_bookkeeping() {
        let status = active("aa:bb");
        let (mut view, service) = view(status);

        // A reload is in flight...
        view.handle(ViewEvent::PlaylistChanged { player: PlayerId::new("aa:bb") });
        assert_eq!(service.drain().len(), 1);

        // ...when a local mutation and its echo race it.  The echo is still
        // consumed by the counter, not by the pending reload.
        view.handle(ViewEvent::Command(ViewCommand::Remove { index: 0 }));
        assert_eq!(view.skip_playlist_changed, 1);
        view.handle(ViewEvent::PlaylistChanged { player: PlayerId::new("aa:bb") });
        assert_eq!(view.skip_playlist_changed, 0);
        // No second reload was requested for the echo.
        let calls = service.drain();
        assert!(matches!(&calls[..], [Call::Issue(_)]));
    }
}
