use std::cell::Cell;
use std::rc::Rc;

use crate::config::NavigationSettings;
use crate::dom::{Document, Element};
use crate::platform::Viewport;

const ACTIVE_CLASS: &str = "active";
const SCROLLED_CLASS: &str = "scrolled";

// Per-bar styles for the open hamburger: (bar index, property, value).
const OPEN_BAR_STYLES: [(usize, &str, &str); 3] = [
    (0, "transform", "rotate(45deg) translate(5px, 5px)"),
    (1, "opacity", "0"),
    (2, "transform", "rotate(-45deg) translate(7px, -6px)"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    Open,
}

impl MenuState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionBounds {
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn contains(&self, position: f64) -> bool {
        position >= self.top && position <= self.top + self.height
    }
}

/// First section, in document order, whose range holds `position`.
pub fn active_section(sections: &[SectionBounds], position: f64) -> Option<usize> {
    sections.iter().position(|bounds| bounds.contains(position))
}

pub struct NavigationManager<E: Element> {
    navbar: E,
    menu: E,
    hamburger: E,
    links: Vec<E>,
    sections: Vec<E>,
    document: Rc<dyn Document<Element = E>>,
    viewport: Rc<dyn Viewport>,
    settings: NavigationSettings,
    state: Cell<MenuState>,
}

impl<E: Element> NavigationManager<E> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        navbar: E,
        menu: E,
        hamburger: E,
        links: Vec<E>,
        sections: Vec<E>,
        document: Rc<dyn Document<Element = E>>,
        viewport: Rc<dyn Viewport>,
        settings: NavigationSettings,
    ) -> Self {
        Self {
            navbar,
            menu,
            hamburger,
            links,
            sections,
            document,
            viewport,
            settings,
            state: Cell::new(MenuState::Closed),
        }
    }

    pub fn state(&self) -> MenuState {
        self.state.get()
    }

    pub fn is_menu_open(&self) -> bool {
        self.state.get().is_open()
    }

    pub fn toggle_menu(&self) -> MenuState {
        let next = self.state.get().toggled();
        self.state.set(next);

        let open = next.is_open();
        self.menu.toggle_class(ACTIVE_CLASS, open);
        self.hamburger.toggle_class(ACTIVE_CLASS, open);

        let bars = self.hamburger.query_all("span");
        if open {
            for (index, property, value) in OPEN_BAR_STYLES {
                if let Some(bar) = bars.get(index) {
                    bar.set_style(property, value);
                }
            }
        } else {
            for bar in &bars {
                bar.set_style("transform", "");
                bar.set_style("opacity", "");
            }
        }

        next
    }

    pub fn close_menu(&self) {
        if self.is_menu_open() {
            self.toggle_menu();
        }
    }

    pub fn handle_scroll(&self) {
        let scroll_top = self.viewport.scroll_y();
        self.navbar
            .toggle_class(SCROLLED_CLASS, scroll_top > self.settings.scrolled_threshold);
        self.update_active_link();
    }

    /// Marks the link of the section under the scroll position and clears the rest.
    pub fn update_active_link(&self) -> Option<String> {
        let position = self.viewport.scroll_y() + self.settings.active_link_offset;
        let bounds: Vec<SectionBounds> = self
            .sections
            .iter()
            .map(|section| SectionBounds {
                top: section.offset_top(),
                height: section.offset_height(),
            })
            .collect();

        let active_id = active_section(&bounds, position)
            .and_then(|index| self.sections[index].attribute("id"));
        let active_href = active_id.as_ref().map(|id| format!("#{id}"));

        for link in &self.links {
            let is_active =
                active_href.is_some() && link.attribute("href") == active_href;
            link.toggle_class(ACTIVE_CLASS, is_active);
        }

        active_id
    }

    /// Returns whether the click was an in-page anchor whose default navigation
    /// must be suppressed.
    pub fn follow_anchor(&self, href: &str) -> bool {
        if !href.starts_with('#') {
            return false;
        }

        if href.len() > 1 {
            if let Some(target) = self.document.query(href) {
                let top = target.offset_top() - self.settings.header_offset;
                self.viewport.smooth_scroll_to(top);
            }
        }

        true
    }
}
