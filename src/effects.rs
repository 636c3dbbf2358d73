use std::rc::Rc;
use std::time::Duration;

use crate::config::EffectSettings;
use crate::dom::{Document, Element};
use crate::platform::{Scheduler, Viewport};
use crate::utils::{throttle, Breakpoints, Throttled};

pub const CARD_SELECTOR: &str = ".skill-card, .project-card, .achievement-card, .stat-card";
const GRID_SELECTOR: &str = ".skills-grid, .projects-grid, .achievements-grid";
const HERO_SELECTOR: &str = ".hero";

const CARD_LIFT: &str = "translateY(-12px) scale(1.05)";
const PROJECT_CARD_LIFT: &str = "translateY(-12px) scale(1.05) rotate(1deg)";
const CARD_TRANSITION: &str = "all 0.3s cubic-bezier(0.4, 0, 0.2, 1)";

pub fn card_entered<E: Element>(card: &E) {
    let lift = if card.has_class("project-card") {
        PROJECT_CARD_LIFT
    } else {
        CARD_LIFT
    };
    card.set_style("transform", lift);
    card.set_style("transition", CARD_TRANSITION);
}

pub fn card_left<E: Element>(card: &E) {
    card.set_style("transform", "");
}

pub fn stagger_grid_items<E: Element>(
    document: &dyn Document<Element = E>,
    stagger: Duration,
) -> usize {
    let mut staggered = 0;

    for container in document.query_all(GRID_SELECTOR) {
        for (index, item) in container.children().into_iter().enumerate() {
            let delay_ms = stagger.as_millis() * index as u128;
            item.set_style("animation-delay", &format!("{delay_ms}ms"));
            item.add_class("fade-in");
            staggered += 1;
        }
    }

    staggered
}

/// Hero drift on scroll. Only attached on wider viewports.
pub struct Parallax {
    throttled: Throttled<()>,
}

impl Parallax {
    pub fn attach<E: Element>(
        document: &dyn Document<Element = E>,
        viewport: Rc<dyn Viewport>,
        scheduler: Rc<dyn Scheduler>,
        breakpoints: Breakpoints,
        settings: &EffectSettings,
    ) -> Option<Self> {
        let hero = document.query(HERO_SELECTOR)?;
        if breakpoints.is_mobile(viewport.inner_width()) {
            return None;
        }

        let rate = settings.parallax_rate;
        let throttled = throttle(scheduler, settings.parallax_throttle, move |()| {
            let offset = viewport.scroll_y() * rate;
            hero.set_style("transform", &format!("translateY({offset}px)"));
        });

        Some(Self { throttled })
    }

    pub fn on_scroll(&self) {
        self.throttled.call(());
    }
}
