use chrono::{Local, Utc};
use ratatui::widgets::TableState;
use famly::error::FamlyError;
use famly::models::{Family, Item, ResetInterval, Session, Store};
use famly::storage::{load_session, load_store, save_store};

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
}

#[derive(PartialEq, Clone, Copy)]
pub enum ViewMode {
    Tasks,
    Shopping,
}

/// Feedback from the last action, shown in the help bar.
#[derive(Debug, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

impl Status {
    pub fn text(&self) -> &str {
        match self {
            Status::Info(s) | Status::Error(s) => s,
        }
    }
}

/// Whether the table shows lists or the items of one list.
#[derive(PartialEq, Clone, Copy)]
pub enum Screen {
    Lists,
    Items(u64),
}

pub struct App {
    pub store: Store,
    pub session: Session,
    pub view_mode: ViewMode,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub list_state: TableState,
    pub item_state: TableState,
    pub status: Option<Status>,
}

impl App {
    /// Loads the snapshot. Fails if nobody is signed in or no family is selected.
    pub fn new() -> Result<App, FamlyError> {
        let store = load_store()?;
        let session = load_session()?;
        store.current_family(&session)?;
        let mut app = App {
            store,
            session,
            view_mode: ViewMode::Tasks,
            screen: Screen::Lists,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            list_state: TableState::default(),
            item_state: TableState::default(),
            status: None,
        };
        app.clamp_selection();
        Ok(app)
    }

    pub fn family(&self) -> Option<&Family> {
        self.store.current_family(&self.session).ok()
    }

    /// Ids and titles of the lists in the current view.
    pub fn list_ids(&self) -> Vec<u64> {
        match (self.family(), self.view_mode) {
            (Some(f), ViewMode::Tasks) => f.task_lists.iter().map(|l| l.id).collect(),
            (Some(f), ViewMode::Shopping) => f.shopping_lists.iter().map(|l| l.id).collect(),
            (None, _) => Vec::new(),
        }
    }

    /// Items of the open list, if a list is open.
    pub fn open_items(&self) -> Option<(&str, &[Item])> {
        let Screen::Items(id) = self.screen else { return None };
        let family = self.family()?;
        match self.view_mode {
            ViewMode::Tasks => family.task_list(id).ok().map(|l| (l.title.as_str(), l.items.as_slice())),
            ViewMode::Shopping => family.shopping_list(id).ok().map(|l| (l.title.as_str(), l.items.as_slice())),
        }
    }

    fn active_len(&self) -> usize {
        match self.screen {
            Screen::Lists => self.list_ids().len(),
            Screen::Items(_) => self.open_items().map(|(_, items)| items.len()).unwrap_or(0),
        }
    }

    fn active_state(&mut self) -> &mut TableState {
        match self.screen {
            Screen::Lists => &mut self.list_state,
            Screen::Items(_) => &mut self.item_state,
        }
    }

    fn selected_list(&self) -> Option<u64> {
        self.list_state.selected().and_then(|i| self.list_ids().get(i).copied())
    }

    fn selected_item(&self) -> Option<u64> {
        let (_, items) = self.open_items()?;
        self.item_state.selected().and_then(|i| items.get(i)).map(|i| i.id)
    }

    /// Selects the next row, wrapping around.
    pub fn next(&mut self) {
        let len = self.active_len();
        if len == 0 { return; }
        let state = self.active_state();
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        state.select(Some(i));
    }

    /// Selects the previous row, wrapping around.
    pub fn previous(&mut self) {
        let len = self.active_len();
        if len == 0 { return; }
        let state = self.active_state();
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    /// Switches between task lists and shopping lists.
    pub fn toggle_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Tasks => ViewMode::Shopping,
            ViewMode::Shopping => ViewMode::Tasks,
        };
        self.screen = Screen::Lists;
        self.list_state.select(None);
        self.clamp_selection();
    }

    /// Opens the selected list.
    pub fn open_selected(&mut self) {
        if self.screen != Screen::Lists { return; }
        if let Some(id) = self.selected_list() {
            self.screen = Screen::Items(id);
            self.item_state.select(None);
            self.clamp_selection();
        }
    }

    /// Returns to the lists. Returns `false` if already there.
    pub fn back(&mut self) -> bool {
        if self.screen == Screen::Lists {
            return false;
        }
        self.screen = Screen::Lists;
        true
    }

    /// Checks or unchecks the selected item.
    pub fn toggle_selected(&mut self) {
        let Screen::Items(list) = self.screen else { return };
        let Some(item) = self.selected_item() else { return };
        let view = self.view_mode;
        self.mutate(|f| match view {
            ViewMode::Tasks => f.toggle_task(list, item).map(|_| ()),
            ViewMode::Shopping => f.toggle_shopping_item(list, item).map(|_| ()),
        });
    }

    /// Deletes the selected list or item.
    pub fn delete_selected(&mut self) {
        let view = self.view_mode;
        match self.screen {
            Screen::Lists => {
                let Some(list) = self.selected_list() else { return };
                self.mutate(|f| match view {
                    ViewMode::Tasks => f.remove_task_list(list).map(|_| ()),
                    ViewMode::Shopping => f.remove_shopping_list(list).map(|_| ()),
                });
            }
            Screen::Items(list) => {
                let Some(item) = self.selected_item() else { return };
                self.mutate(|f| match view {
                    ViewMode::Tasks => f.remove_task(list, item).map(|_| ()),
                    ViewMode::Shopping => f.remove_shopping_item(list, item).map(|_| ()),
                });
            }
        }
    }

    /// Clears every task list whose reset is due.
    pub fn reset_due(&mut self) {
        let now = Local::now();
        let mut count = 0;
        self.mutate(|f| {
            count = f.reset_due_task_lists(&now).len();
            Ok(())
        });
        if self.status.is_none() {
            self.status = Some(Status::Info(format!("Reset {} task list(s)", count)));
        }
    }

    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input_buffer.clear();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Adds a list or an item named by the input buffer.
    pub fn handle_input(&mut self) {
        let name = std::mem::take(&mut self.input_buffer);
        self.input_mode = InputMode::Normal;
        let view = self.view_mode;
        match self.screen {
            Screen::Lists => self.mutate(|f| match view {
                ViewMode::Tasks => f.add_task_list(&name, ResetInterval::default(), Utc::now()).map(|_| ()),
                ViewMode::Shopping => f.add_shopping_list(&name, Utc::now()).map(|_| ()),
            }),
            Screen::Items(list) => self.mutate(|f| match view {
                ViewMode::Tasks => f.add_task(list, &name).map(|_| ()),
                ViewMode::Shopping => f.add_shopping_item(list, &name).map(|_| ()),
            }),
        }
    }

    /// Applies `op` to the current family and saves the store.
    fn mutate(&mut self, op: impl FnOnce(&mut Family) -> Result<(), FamlyError>) {
        let applied = self.store.current_family_mut(&self.session).and_then(op);
        let result = applied.and_then(|_| save_store(&self.store));
        self.status = result.err().map(|e| Status::Error(e.to_string()));
        if let Screen::Items(id) = self.screen {
            if !self.list_ids().contains(&id) {
                self.screen = Screen::Lists;
            }
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let lists = self.list_ids().len();
        clamp(&mut self.list_state, lists);
        let items = self.open_items().map(|(_, items)| items.len()).unwrap_or(0);
        clamp(&mut self.item_state, items);
    }
}

fn clamp(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
    } else if let Some(i) = state.selected() {
        if i >= len {
            state.select(Some(len - 1));
        }
    } else {
        state.select(Some(0));
    }
}
