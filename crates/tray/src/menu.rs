//! Context menu for the system tray.

/// Actions that can be triggered from the tray context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// User asked for the per-model details popup.
    ShowModels,
    /// User requested to quit the application.
    Quit,
}

/// A single menu item.
#[derive(Debug, Clone)]
pub struct MenuItem {
    /// Display text.
    pub label: String,
    /// Whether the item is enabled (clickable).
    pub enabled: bool,
    /// Action triggered on click.
    pub action: MenuAction,
}

/// Labels used to build the context menu.
#[derive(Debug, Clone)]
pub struct MenuState {
    pub show_models_label: String,
    pub quit_label: String,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            show_models_label: "Show models".into(),
            quit_label: "Quit".into(),
        }
    }
}

impl MenuState {
    /// Builds the menu items, in display order.
    pub fn build_menu(&self) -> Vec<MenuItem> {
        vec![
            MenuItem {
                label: self.show_models_label.clone(),
                enabled: true,
                action: MenuAction::ShowModels,
            },
            MenuItem {
                label: self.quit_label.clone(),
                enabled: true,
                action: MenuAction::Quit,
            },
        ]
    }
}
