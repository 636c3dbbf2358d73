use std::cell::{Cell, OnceCell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::config::AppConfig;
use crate::dom::{Document, Element};
use crate::effects::{self, Parallax};
use crate::error::AppError;
use crate::form::{FormManager, SubmitOutcome};
use crate::navigation::NavigationManager;
use crate::particles::{ParticlesConfig, ParticlesManager};
use crate::performance::{LoadReport, PerformanceManager};
use crate::platform::{Platform, TimerId};
use crate::reveal::ScrollAnimationManager;
use crate::theme::{Theme, ThemeManager};
use crate::typing::{TypingAnimation, TypingTask};
use crate::utils::{debounce, Debounced};

const THEME_TOGGLE_ID: &str = "theme-toggle";
const NAVBAR_ID: &str = "navbar";
const NAV_MENU_ID: &str = "nav-menu";
const HAMBURGER_ID: &str = "hamburger";
const CONTACT_FORM_ID: &str = "contact-form";
const NAV_LINK_SELECTOR: &str = ".nav-link";
const SECTION_SELECTOR: &str = "section[id]";
const TAGLINE_SELECTOR: &str = ".hero-tagline";

/// Composition root. Owns every manager and the injected platform.
pub struct PortfolioApp<E: Element> {
    config: AppConfig,
    platform: Platform<E>,
    theme: OnceCell<ThemeManager<E>>,
    navigation: OnceCell<NavigationManager<E>>,
    reveal: OnceCell<ScrollAnimationManager<E>>,
    form: OnceCell<FormManager<E>>,
    performance: OnceCell<PerformanceManager<E>>,
    particles: OnceCell<ParticlesManager>,
    parallax: OnceCell<Parallax>,
    typing_start: Cell<Option<TimerId>>,
    typing: RefCell<Option<TypingTask>>,
    resize: Debounced<()>,
}

impl<E: Element> PortfolioApp<E> {
    /// Builds the app and initializes the managers in page order. The first
    /// failure is logged and stops the sequence; managers built before it stay live.
    pub fn start(config: AppConfig, platform: Platform<E>) -> Rc<Self> {
        let app = Rc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let resize = debounce(
                Rc::clone(&platform.scheduler),
                config.effects.resize_debounce,
                move |()| {
                    if let Some(app) = weak.upgrade() {
                        app.on_resize_settled();
                    }
                },
            );

            Self {
                config,
                platform,
                theme: OnceCell::new(),
                navigation: OnceCell::new(),
                reveal: OnceCell::new(),
                form: OnceCell::new(),
                performance: OnceCell::new(),
                particles: OnceCell::new(),
                parallax: OnceCell::new(),
                typing_start: Cell::new(None),
                typing: RefCell::new(None),
                resize,
            }
        });

        match app.initialize_components() {
            Ok(()) => log::info!("Portfolio app initialized successfully!"),
            Err(err) => log::error!("error initializing portfolio app: {err}"),
        }

        app
    }

    fn initialize_components(self: &Rc<Self>) -> Result<(), AppError> {
        let document = Rc::clone(&self.platform.document);

        let theme = ThemeManager::new(
            document.require_id(THEME_TOGGLE_ID)?,
            document.root().ok_or_else(|| AppError::missing("html"))?,
            Rc::clone(&self.platform.store),
            self.config.theme.clone(),
        );
        theme.init();
        let _ = self.theme.set(theme);

        let navigation = NavigationManager::new(
            document.require_id(NAVBAR_ID)?,
            document.require_id(NAV_MENU_ID)?,
            document.require_id(HAMBURGER_ID)?,
            document.query_all(NAV_LINK_SELECTOR),
            document.query_all(SECTION_SELECTOR),
            Rc::clone(&document),
            Rc::clone(&self.platform.viewport),
            self.config.navigation.clone(),
        );
        let _ = self.navigation.set(navigation);

        let reveal = ScrollAnimationManager::new(
            Rc::clone(&document),
            self.platform.observers.as_ref(),
            Rc::clone(&self.platform.scheduler),
            self.config.reveal.clone(),
        );
        reveal.init();
        let _ = self.reveal.set(reveal);

        if let Some(form) = document.by_id(CONTACT_FORM_ID) {
            let form = FormManager::new(
                form,
                Rc::clone(&document),
                Rc::clone(&self.platform.scheduler),
                Rc::clone(&self.platform.random),
                self.config.form.clone(),
            )?;
            let _ = self.form.set(form);
        }

        let performance = PerformanceManager::new(
            Rc::clone(&document),
            self.platform.observers.as_ref(),
            self.config.performance.clone(),
        );
        performance.init()?;
        let _ = self.performance.set(performance);

        let particles =
            ParticlesManager::new(Rc::clone(&self.platform.particles), ParticlesConfig::default());
        particles.init()?;
        let _ = self.particles.set(particles);

        if let Some(tagline) = document.query(TAGLINE_SELECTOR) {
            self.schedule_typing(tagline)?;
        }

        if let Some(parallax) = Parallax::attach(
            document.as_ref(),
            Rc::clone(&self.platform.viewport),
            Rc::clone(&self.platform.scheduler),
            self.config.breakpoints,
            &self.config.effects,
        ) {
            let _ = self.parallax.set(parallax);
        }
        effects::stagger_grid_items(document.as_ref(), self.config.reveal.stagger);

        Ok(())
    }

    fn schedule_typing(self: &Rc<Self>, tagline: E) -> Result<(), AppError> {
        let animation = TypingAnimation::new(&self.config.typing.texts, self.config.typing.timing)?;
        let weak = Rc::downgrade(self);

        let id = self.platform.scheduler.set_timeout(
            self.config.typing.start_delay,
            Box::new(move || {
                let Some(app) = weak.upgrade() else {
                    return;
                };
                app.typing_start.set(None);
                let task =
                    TypingTask::start(tagline, animation, Rc::clone(&app.platform.scheduler));
                *app.typing.borrow_mut() = Some(task);
            }),
        );
        self.typing_start.set(Some(id));

        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn theme(&self) -> Option<Theme> {
        self.theme.get().map(ThemeManager::current)
    }

    pub fn toggle_theme(&self) -> Option<Theme> {
        self.theme.get().map(ThemeManager::toggle_theme)
    }

    pub fn is_menu_open(&self) -> bool {
        self.navigation
            .get()
            .is_some_and(NavigationManager::is_menu_open)
    }

    pub fn toggle_menu(&self) {
        if let Some(navigation) = self.navigation.get() {
            navigation.toggle_menu();
        }
    }

    pub fn close_menu(&self) {
        if let Some(navigation) = self.navigation.get() {
            navigation.close_menu();
        }
    }

    /// Click on any in-page anchor. Returns whether default navigation must be prevented.
    pub fn follow_anchor(&self, href: &str) -> bool {
        self.navigation
            .get()
            .is_some_and(|navigation| navigation.follow_anchor(href))
    }

    pub fn nav_link_clicked(&self, href: &str) -> bool {
        self.close_menu();
        self.follow_anchor(href)
    }

    pub fn handle_scroll(&self) {
        if let Some(navigation) = self.navigation.get() {
            navigation.handle_scroll();
        }
        if let Some(parallax) = self.parallax.get() {
            parallax.on_scroll();
        }
    }

    pub fn handle_resize(&self) {
        self.resize.call(());
    }

    fn on_resize_settled(&self) {
        let width = self.platform.viewport.inner_width();
        if self.config.breakpoints.is_mobile(width) && self.is_menu_open() {
            self.close_menu();
        }
        if let Some(particles) = self.particles.get() {
            particles.refresh();
        }
    }

    pub fn card_entered(&self, card: &E) {
        effects::card_entered(card);
    }

    pub fn card_left(&self, card: &E) {
        effects::card_left(card);
    }

    pub async fn submit_contact_form(&self) -> Option<SubmitOutcome> {
        match self.form.get() {
            Some(form) => form.handle_submit().await,
            None => None,
        }
    }

    pub fn page_loaded(&self, load_time: Duration) -> Option<LoadReport> {
        self.performance
            .get()
            .map(|performance| performance.record_load_time(load_time))
    }

    pub fn typing_running(&self) -> bool {
        self.typing
            .borrow()
            .as_ref()
            .is_some_and(TypingTask::is_running)
    }

    pub fn shutdown(&self) {
        if let Some(id) = self.typing_start.take() {
            self.platform.scheduler.clear_timeout(id);
        }
        if let Some(task) = self.typing.borrow_mut().take() {
            task.cancel();
        }
        self.resize.cancel();
    }
}
