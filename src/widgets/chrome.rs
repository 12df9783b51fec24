use crate::store::{StoreHandle, DARK_MODE_KEY};
use crate::widget_state::WidgetState;

/// Page level state shared by every widget: the persisted dark mode flag and
/// the side menu, which always starts closed.
pub struct PageChrome {
    dark_mode: WidgetState<bool>,
    menu_open: bool,
}

impl PageChrome {
    pub fn load(store: StoreHandle) -> Self {
        Self {
            dark_mode: WidgetState::load(store, DARK_MODE_KEY, || false),
            menu_open: false,
        }
    }

    pub fn dark_mode(&self) -> bool {
        *self.dark_mode.get()
    }

    /// Flip dark mode and persist it. Returns the new value.
    pub fn toggle_dark_mode(&mut self) -> anyhow::Result<bool> {
        self.dark_mode.mutate(|dark| {
            *dark = !*dark;
            *dark
        })
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    /// Handle a click anywhere on the page. An open menu closes when the
    /// click hit neither the menu nor its switch. Returns `true` if it closed.
    pub fn page_click(&mut self, inside_menu: bool, on_switch: bool) -> bool {
        if self.menu_open && !inside_menu && !on_switch {
            self.menu_open = false;
            return true;
        }
        false
    }
}
