use std::cell::Cell;
use std::rc::Rc;

use crate::config::ThemeSettings;
use crate::dom::Element;
use crate::platform::KeyValueStore;

const THEME_ATTRIBUTE: &str = "data-theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon advertising the other theme.
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Light => "fas fa-moon",
            Self::Dark => "fas fa-sun",
        }
    }
}

pub struct ThemeManager<E: Element> {
    toggle: E,
    root: E,
    store: Rc<dyn KeyValueStore>,
    settings: ThemeSettings,
    current: Cell<Theme>,
}

impl<E: Element> ThemeManager<E> {
    pub fn new(toggle: E, root: E, store: Rc<dyn KeyValueStore>, settings: ThemeSettings) -> Self {
        let current = Cell::new(settings.default_theme);
        Self {
            toggle,
            root,
            store,
            settings,
            current,
        }
    }

    pub fn init(&self) {
        let stored = self
            .store
            .get(&self.settings.storage_key)
            .as_deref()
            .and_then(Theme::parse);
        self.set_theme(stored.unwrap_or(self.settings.default_theme));
    }

    pub fn current(&self) -> Theme {
        self.current.get()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.root.set_attribute(THEME_ATTRIBUTE, theme.as_str());
        self.current.set(theme);
        self.store.set(&self.settings.storage_key, theme.as_str());

        if let Some(icon) = self.toggle.query("i") {
            icon.set_attribute("class", theme.icon_class());
        }
    }

    pub fn toggle_theme(&self) -> Theme {
        let next = self.current.get().toggled();
        self.set_theme(next);
        next
    }
}
