use std::rc::Rc;

use crate::config::RevealSettings;
use crate::dom::{Document, Element};
use crate::platform::{ObserverFactory, Scheduler, VisibilityObserver};

const VISIBLE_CLASS: &str = "visible";

/// Animation class and the elements it applies to, in setup order.
pub const REVEAL_GROUPS: [(&str, &str); 4] = [
    ("fade-in", ".section-header, .about-text, .contact-item"),
    ("slide-in-left", ".timeline-item:nth-child(odd)"),
    ("slide-in-right", ".timeline-item:nth-child(even)"),
    (
        "scale-in",
        ".skill-card, .project-card, .achievement-card, .stat-card",
    ),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealMode {
    Observed(usize),
    Fallback(usize),
}

pub struct ScrollAnimationManager<E: Element> {
    document: Rc<dyn Document<Element = E>>,
    scheduler: Rc<dyn Scheduler>,
    observer: Option<Rc<dyn VisibilityObserver<E>>>,
    settings: RevealSettings,
}

impl<E: Element> ScrollAnimationManager<E> {
    pub fn new(
        document: Rc<dyn Document<Element = E>>,
        observers: &dyn ObserverFactory<E>,
        scheduler: Rc<dyn Scheduler>,
        settings: RevealSettings,
    ) -> Self {
        let observer = observers.create(&settings.observer);
        Self {
            document,
            scheduler,
            observer,
            settings,
        }
    }

    pub fn init(&self) -> RevealMode {
        match &self.observer {
            Some(observer) => RevealMode::Observed(self.observe_elements(observer.as_ref())),
            None => RevealMode::Fallback(self.reveal_all()),
        }
    }

    fn observe_elements(&self, observer: &dyn VisibilityObserver<E>) -> usize {
        let mut observed = 0;

        for (animation, selector) in REVEAL_GROUPS {
            for (index, element) in self.document.query_all(selector).into_iter().enumerate() {
                element.add_class(animation);
                let delay_ms = self.settings.stagger.as_millis() * index as u128;
                element.set_style("animation-delay", &format!("{delay_ms}ms"));

                let scheduler = Rc::clone(&self.scheduler);
                let reveal_delay = self.settings.reveal_delay;
                observer.observe_once(
                    &element,
                    Box::new(move |target: E| {
                        scheduler.set_timeout(
                            reveal_delay,
                            Box::new(move || target.add_class(VISIBLE_CLASS)),
                        );
                    }),
                );
                observed += 1;
            }
        }

        observed
    }

    fn reveal_all(&self) -> usize {
        let mut revealed = 0;

        for (animation, selector) in REVEAL_GROUPS {
            for element in self.document.query_all(selector) {
                element.add_class(animation);
                element.add_class(VISIBLE_CLASS);
                revealed += 1;
            }
        }

        revealed
    }
}
