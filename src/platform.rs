//! Host services injected into the managers.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use crate::dom::{Document, Element};
use crate::error::AppError;
use crate::particles::ParticlesConfig;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

pub trait Scheduler {
    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId;
    fn clear_timeout(&self, id: TimerId);
}

/// Live timer handles keyed by id. Dropping a handle must cancel its timer,
/// so a cleared or fired timer releases everything its task captured.
pub struct TimerTable<H> {
    next_id: Cell<u64>,
    live: RefCell<HashMap<TimerId, H>>,
}

impl<H> Default for TimerTable<H> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(1),
            live: RefCell::new(HashMap::new()),
        }
    }
}

impl<H: 'static> TimerTable<H> {
    /// Hands `arm` the task wrapped so that firing releases its handle.
    /// When arming fails the task is dropped without running.
    pub fn schedule(
        self: &Rc<Self>,
        task: Box<dyn FnOnce()>,
        arm: impl FnOnce(Box<dyn FnOnce()>) -> Result<H, AppError>,
    ) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let table = Rc::downgrade(self);
        let fire: Box<dyn FnOnce()> = Box::new(move || {
            let handle = table
                .upgrade()
                .and_then(|table| table.live.borrow_mut().remove(&id));
            task();
            drop(handle);
        });

        match arm(fire) {
            Ok(handle) => {
                self.live.borrow_mut().insert(id, handle);
            }
            Err(err) => log::error!("could not schedule timer: {err}"),
        }

        id
    }

    /// Returns whether the timer was still pending.
    pub fn cancel(&self, id: TimerId) -> bool {
        let handle = self.live.borrow_mut().remove(&id);
        handle.is_some()
    }

    pub fn pending(&self) -> usize {
        self.live.borrow().len()
    }
}

pub trait Viewport {
    fn scroll_y(&self) -> f64;
    fn inner_width(&self) -> f64;
    fn smooth_scroll_to(&self, top: f64);
}

pub trait RandomSource {
    /// Uniform in `[0, 1)`.
    fn next_f64(&self) -> f64;
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: "0px".to_string(),
        }
    }
}

/// Watches elements until they first become visible, then forgets them.
pub trait VisibilityObserver<E: Element> {
    fn observe_once(&self, element: &E, on_visible: Box<dyn FnOnce(E)>);
}

pub trait ObserverFactory<E: Element> {
    /// `None` when the host has no viewport-intersection support.
    fn create(&self, options: &ObserverOptions) -> Option<Rc<dyn VisibilityObserver<E>>>;
}

pub trait ParticleRenderer {
    fn is_available(&self) -> bool;
    fn render(&self, container_id: &str, config: &ParticlesConfig) -> Result<(), AppError>;
    fn refresh(&self);
}

pub struct Platform<E: Element> {
    pub document: Rc<dyn Document<Element = E>>,
    pub viewport: Rc<dyn Viewport>,
    pub scheduler: Rc<dyn Scheduler>,
    pub store: Rc<dyn KeyValueStore>,
    pub random: Rc<dyn RandomSource>,
    pub observers: Rc<dyn ObserverFactory<E>>,
    pub particles: Rc<dyn ParticleRenderer>,
}

impl<E: Element> Clone for Platform<E> {
    fn clone(&self) -> Self {
        Self {
            document: Rc::clone(&self.document),
            viewport: Rc::clone(&self.viewport),
            scheduler: Rc::clone(&self.scheduler),
            store: Rc::clone(&self.store),
            random: Rc::clone(&self.random),
            observers: Rc::clone(&self.observers),
            particles: Rc::clone(&self.particles),
        }
    }
}
