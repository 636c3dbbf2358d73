//! Browser-backed ports.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use js_sys::{Array, Function, Reflect, JSON};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, ScrollBehavior,
    ScrollToOptions, Storage, Window,
};

use super::dom::{dom_error, WebDocument, WebElement};
use crate::error::AppError;
use crate::particles::ParticlesConfig;
use crate::platform::{
    KeyValueStore, ObserverFactory, ObserverOptions, ParticleRenderer, Platform, RandomSource,
    Scheduler, TimerId, TimerTable, Viewport, VisibilityObserver,
};

const FALLBACK_VIEWPORT_WIDTH: f64 = 1280.0;

pub fn browser_platform(window: &Window, document: web_sys::Document) -> Platform<WebElement> {
    Platform {
        document: Rc::new(WebDocument(document)),
        viewport: Rc::new(BrowserViewport(window.clone())),
        scheduler: Rc::new(BrowserScheduler::new(window.clone())),
        store: Rc::new(LocalStore(window.clone())),
        random: Rc::new(MathRandom),
        observers: Rc::new(BrowserObserverFactory(window.clone())),
        particles: Rc::new(ParticlesJs(window.clone())),
    }
}

/// Milliseconds since navigation start.
pub fn elapsed_since_navigation(window: &Window) -> Option<Duration> {
    let millis = window.performance()?.now();
    (millis.is_finite() && millis >= 0.0).then(|| Duration::from_secs_f64(millis / 1_000.0))
}

/// A scheduled `setTimeout`. Dropping it clears the timeout and frees the task.
struct PendingTimeout {
    window: Window,
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Drop for PendingTimeout {
    fn drop(&mut self) {
        self.window.clear_timeout_with_handle(self.handle);
    }
}

pub struct BrowserScheduler {
    window: Window,
    timers: Rc<TimerTable<PendingTimeout>>,
}

impl BrowserScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            timers: Rc::default(),
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId {
        let timeout = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        self.timers.schedule(task, |fire| {
            let callback = Closure::once(fire);
            let handle = self
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.as_ref().unchecked_ref(),
                    timeout,
                )
                .map_err(dom_error)?;

            Ok(PendingTimeout {
                window: self.window.clone(),
                handle,
                _callback: callback,
            })
        })
    }

    fn clear_timeout(&self, id: TimerId) {
        self.timers.cancel(id);
    }
}

pub struct LocalStore(Window);

impl LocalStore {
    fn storage(&self) -> Option<Storage> {
        self.0.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = self.storage() {
            let _ = storage.set_item(key, value);
        }
    }
}

pub struct BrowserViewport(Window);

impl Viewport for BrowserViewport {
    fn scroll_y(&self) -> f64 {
        self.0.scroll_y().unwrap_or_default()
    }

    fn inner_width(&self) -> f64 {
        self.0
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(FALLBACK_VIEWPORT_WIDTH)
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.0.scroll_to_with_scroll_to_options(&options);
    }
}

pub struct MathRandom;

impl RandomSource for MathRandom {
    fn next_f64(&self) -> f64 {
        js_sys::Math::random()
    }
}

type Watched = Rc<RefCell<Vec<(web_sys::Element, Box<dyn FnOnce(WebElement)>)>>>;

pub struct BrowserObserverFactory(Window);

impl ObserverFactory<WebElement> for BrowserObserverFactory {
    fn create(&self, options: &ObserverOptions) -> Option<Rc<dyn VisibilityObserver<WebElement>>> {
        let supported = Reflect::has(&self.0, &JsValue::from_str("IntersectionObserver"))
            .unwrap_or(false);
        if !supported {
            return None;
        }

        match BrowserObserver::new(options) {
            Ok(observer) => Some(Rc::new(observer)),
            Err(err) => {
                log::warn!("IntersectionObserver unavailable: {err}");
                None
            }
        }
    }
}

/// One `IntersectionObserver` that fires each watched element's callback once.
pub struct BrowserObserver {
    observer: IntersectionObserver,
    watched: Watched,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl BrowserObserver {
    fn new(options: &ObserverOptions) -> Result<Self, AppError> {
        let watched: Watched = Rc::default();

        let callback = {
            let watched = Rc::clone(&watched);
            Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
                move |entries: Array, observer: IntersectionObserver| {
                    for entry in entries.iter() {
                        let entry: IntersectionObserverEntry = entry.unchecked_into();
                        if !entry.is_intersecting() {
                            continue;
                        }

                        let target = entry.target();
                        observer.unobserve(&target);

                        let fired = {
                            let mut watched = watched.borrow_mut();
                            let position = watched.iter().position(|(element, _)| *element == target);
                            position.map(|index| watched.remove(index))
                        };
                        if let Some((element, on_visible)) = fired {
                            on_visible(WebElement(element));
                        }
                    }
                },
            )
        };

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(dom_error)?;

        Ok(Self {
            observer,
            watched,
            _callback: callback,
        })
    }
}

impl VisibilityObserver<WebElement> for BrowserObserver {
    fn observe_once(&self, element: &WebElement, on_visible: Box<dyn FnOnce(WebElement)>) {
        self.watched
            .borrow_mut()
            .push((element.0.clone(), on_visible));
        self.observer.observe(&element.0);
    }
}

impl Drop for BrowserObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Bridge to the global `particlesJS` library, when the page loaded it.
pub struct ParticlesJs(Window);

impl ParticlesJs {
    fn library(&self) -> Option<Function> {
        Reflect::get(&self.0, &JsValue::from_str("particlesJS"))
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }

    fn refresh_first_instance(&self) -> Result<(), JsValue> {
        let instances = Reflect::get(&self.0, &JsValue::from_str("pJSDom"))?;
        let first = Reflect::get(&instances, &JsValue::from_f64(0.0))?;
        let pjs = Reflect::get(&first, &JsValue::from_str("pJS"))?;
        let functions = Reflect::get(&pjs, &JsValue::from_str("fn"))?;
        let refresh = Reflect::get(&functions, &JsValue::from_str("particlesRefresh"))?
            .dyn_into::<Function>()?;
        refresh.call0(&functions)?;
        Ok(())
    }
}

impl ParticleRenderer for ParticlesJs {
    fn is_available(&self) -> bool {
        self.library().is_some()
    }

    fn render(&self, container_id: &str, config: &ParticlesConfig) -> Result<(), AppError> {
        let library = self
            .library()
            .ok_or_else(|| AppError::Particles("particlesJS is not loaded".to_string()))?;
        let params = JSON::parse(&config.to_json()?)
            .map_err(|err| AppError::Particles(format!("{err:?}")))?;

        library
            .call2(&JsValue::NULL, &JsValue::from_str(container_id), &params)
            .map(|_| ())
            .map_err(|err| AppError::Particles(format!("{err:?}")))
    }

    fn refresh(&self) {
        if let Err(err) = self.refresh_first_instance() {
            log::debug!("particles refresh skipped: {err:?}");
        }
    }
}
