//! In-memory stand-ins for the browser used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::dom::{Document, Element};
use crate::error::AppError;
use crate::particles::ParticlesConfig;
use crate::platform::{
    KeyValueStore, ObserverFactory, ObserverOptions, ParticleRenderer, Platform, RandomSource,
    Scheduler, TimerId, TimerTable, Viewport, VisibilityObserver,
};

#[derive(Default)]
struct FakeNode {
    tag: String,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    text: String,
    html: String,
    offset_top: f64,
    offset_height: f64,
    children: Vec<FakeElement>,
    scoped: HashMap<String, Vec<FakeElement>>,
    parent: Option<Weak<RefCell<FakeNode>>>,
    removed: bool,
    reset_count: usize,
}

#[derive(Clone)]
pub struct FakeElement(Rc<RefCell<FakeNode>>);

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(FakeNode {
            tag: tag.to_string(),
            ..FakeNode::default()
        })))
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_html(self, html: &str) -> Self {
        self.set_inner_html(html);
        self
    }

    pub fn with_bounds(self, top: f64, height: f64) -> Self {
        {
            let mut node = self.0.borrow_mut();
            node.offset_top = top;
            node.offset_height = height;
        }
        self
    }

    pub fn with_children(self, children: Vec<FakeElement>) -> Self {
        for child in &children {
            child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        }
        self.0.borrow_mut().children = children;
        self
    }

    /// Registers the answer to a scoped `query`/`query_all` call.
    pub fn with_scoped(self, selector: &str, elements: Vec<FakeElement>) -> Self {
        self.0
            .borrow_mut()
            .scoped
            .insert(selector.to_string(), elements);
        self
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    pub fn was_removed(&self) -> bool {
        self.0.borrow().removed
    }

    pub fn reset_count(&self) -> usize {
        self.0.borrow().reset_count
    }
}

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("FakeElement")
            .field("tag", &node.tag)
            .field("classes", &node.classes)
            .finish()
    }
}

impl Element for FakeElement {
    fn add_class(&self, class: &str) {
        let mut node = self.0.borrow_mut();
        if !node.classes.iter().any(|existing| existing == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|existing| existing != class);
    }

    fn toggle_class(&self, class: &str, force: bool) {
        if force {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|existing| existing == class)
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut node = self.0.borrow_mut();
        if value.is_empty() {
            node.styles.remove(property);
        } else {
            node.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn style(&self, property: &str) -> String {
        self.0
            .borrow()
            .styles
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            let node = self.0.borrow();
            return (!node.classes.is_empty()).then(|| node.classes.join(" "));
        }
        self.0.borrow().attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let mut node = self.0.borrow_mut();
        if name == "class" {
            node.classes = value.split_whitespace().map(ToString::to_string).collect();
        } else {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&self, name: &str) {
        self.0.borrow_mut().attributes.remove(name);
    }

    fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    fn inner_html(&self) -> String {
        self.0.borrow().html.clone()
    }

    fn set_inner_html(&self, html: &str) {
        self.0.borrow_mut().html = html.to_string();
    }

    fn offset_top(&self) -> f64 {
        self.0.borrow().offset_top
    }

    fn offset_height(&self) -> f64 {
        self.0.borrow().offset_height
    }

    fn children(&self) -> Vec<Self> {
        self.0.borrow().children.clone()
    }

    fn query(&self, selector: &str) -> Option<Self> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<Self> {
        self.0
            .borrow()
            .scoped
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }

    fn append_child(&self, child: &Self) -> Result<(), AppError> {
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(child.clone());
        Ok(())
    }

    fn remove(&self) {
        let parent = self.0.borrow_mut().parent.take();
        if let Some(parent) = parent.and_then(|parent| parent.upgrade()) {
            parent
                .borrow_mut()
                .children
                .retain(|child| !Rc::ptr_eq(&child.0, &self.0));
        }
        self.0.borrow_mut().removed = true;
    }

    fn reset(&self) {
        self.0.borrow_mut().reset_count += 1;
    }
}

pub struct FakeDocument {
    ids: RefCell<HashMap<String, FakeElement>>,
    selectors: RefCell<HashMap<String, Vec<FakeElement>>>,
    root: FakeElement,
    head: FakeElement,
    body: FakeElement,
    created: RefCell<Vec<FakeElement>>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self {
            ids: RefCell::new(HashMap::new()),
            selectors: RefCell::new(HashMap::new()),
            root: FakeElement::new("html"),
            head: FakeElement::new("head"),
            body: FakeElement::new("body"),
            created: RefCell::new(Vec::new()),
        }
    }

    pub fn add_id(&self, id: &str, element: FakeElement) -> FakeElement {
        element.set_attribute("id", id);
        self.ids.borrow_mut().insert(id.to_string(), element.clone());
        element
    }

    pub fn add_selector(&self, selector: &str, elements: Vec<FakeElement>) {
        self.selectors
            .borrow_mut()
            .insert(selector.to_string(), elements);
    }

    pub fn root_element(&self) -> FakeElement {
        self.root.clone()
    }

    pub fn head_element(&self) -> FakeElement {
        self.head.clone()
    }

    pub fn body_element(&self) -> FakeElement {
        self.body.clone()
    }

    pub fn created(&self) -> Vec<FakeElement> {
        self.created.borrow().clone()
    }
}

impl Document for FakeDocument {
    type Element = FakeElement;

    fn by_id(&self, id: &str) -> Option<FakeElement> {
        self.ids.borrow().get(id).cloned()
    }

    fn query(&self, selector: &str) -> Option<FakeElement> {
        if let Some(first) = self.query_all(selector).into_iter().next() {
            return Some(first);
        }
        selector.strip_prefix('#').and_then(|id| self.by_id(id))
    }

    fn query_all(&self, selector: &str) -> Vec<FakeElement> {
        self.selectors
            .borrow()
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }

    fn root(&self) -> Option<FakeElement> {
        Some(self.root.clone())
    }

    fn head(&self) -> Option<FakeElement> {
        Some(self.head.clone())
    }

    fn body(&self) -> Option<FakeElement> {
        Some(self.body.clone())
    }

    fn create_element(&self, tag: &str) -> Result<FakeElement, AppError> {
        let element = FakeElement::new(tag);
        self.created.borrow_mut().push(element.clone());
        Ok(element)
    }
}

struct PendingTimer {
    id: TimerId,
    due: Duration,
    task: Box<dyn FnOnce()>,
}

/// Virtual clock. Tasks only run inside `advance`.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    queue: RefCell<Vec<PendingTimer>>,
}

impl ManualScheduler {
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;

        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let position = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= target)
                    .min_by_key(|(_, timer)| (timer.due, timer.id.0))
                    .map(|(index, _)| index);
                position.map(|index| queue.remove(index))
            };

            let Some(timer) = next else {
                break;
            };
            self.now.set(timer.due);
            (timer.task)();
        }

        self.now.set(target);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.queue.borrow_mut().push(PendingTimer {
            id,
            due: self.now.get() + delay,
            task,
        });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.queue.borrow_mut().retain(|timer| timer.id != id);
    }
}

/// A host that cannot arm timers at all.
#[derive(Default)]
pub struct RefusingScheduler {
    timers: Rc<TimerTable<()>>,
}

impl Scheduler for RefusingScheduler {
    fn set_timeout(&self, _delay: Duration, task: Box<dyn FnOnce()>) -> TimerId {
        self.timers.schedule(task, |_fire| {
            Err(AppError::Dom("setTimeout unavailable".to_string()))
        })
    }

    fn clear_timeout(&self, id: TimerId) {
        self.timers.cancel(id);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

pub struct FakeViewport {
    scroll_y: Cell<f64>,
    width: Cell<f64>,
    scrolled_to: RefCell<Vec<f64>>,
}

impl FakeViewport {
    pub fn set_scroll_y(&self, value: f64) {
        self.scroll_y.set(value);
    }

    pub fn set_width(&self, value: f64) {
        self.width.set(value);
    }

    pub fn scrolled_to(&self) -> Vec<f64> {
        self.scrolled_to.borrow().clone()
    }
}

impl Default for FakeViewport {
    fn default() -> Self {
        Self {
            scroll_y: Cell::new(0.0),
            width: Cell::new(1280.0),
            scrolled_to: RefCell::new(Vec::new()),
        }
    }
}

impl Viewport for FakeViewport {
    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn inner_width(&self) -> f64 {
        self.width.get()
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.scrolled_to.borrow_mut().push(top);
    }
}

pub struct FixedRandom(Cell<f64>);

impl FixedRandom {
    pub fn new(value: f64) -> Self {
        Self(Cell::new(value))
    }

    pub fn set(&self, value: f64) {
        self.0.set(value);
    }
}

impl RandomSource for FixedRandom {
    fn next_f64(&self) -> f64 {
        self.0.get()
    }
}

type VisibleCallback = Box<dyn FnOnce(FakeElement)>;

pub struct FakeObserver {
    options: ObserverOptions,
    watched: RefCell<Vec<(FakeElement, VisibleCallback)>>,
}

impl FakeObserver {
    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    pub fn is_watching(&self, element: &FakeElement) -> bool {
        self.watched
            .borrow()
            .iter()
            .any(|(watched, _)| watched == element)
    }

    /// Simulates the element scrolling into view. Returns whether anything fired.
    pub fn enter(&self, element: &FakeElement) -> bool {
        let entry = {
            let mut watched = self.watched.borrow_mut();
            let position = watched.iter().position(|(watched, _)| watched == element);
            position.map(|index| watched.remove(index))
        };

        match entry {
            Some((element, on_visible)) => {
                on_visible(element);
                true
            }
            None => false,
        }
    }
}

impl VisibilityObserver<FakeElement> for FakeObserver {
    fn observe_once(&self, element: &FakeElement, on_visible: VisibleCallback) {
        self.watched
            .borrow_mut()
            .push((element.clone(), on_visible));
    }
}

pub struct FakeObserverFactory {
    supported: bool,
    created: RefCell<Vec<Rc<FakeObserver>>>,
}

impl FakeObserverFactory {
    pub fn new(supported: bool) -> Self {
        Self {
            supported,
            created: RefCell::new(Vec::new()),
        }
    }

    pub fn observers(&self) -> Vec<Rc<FakeObserver>> {
        self.created.borrow().clone()
    }

    pub fn enter(&self, element: &FakeElement) -> bool {
        self.observers()
            .iter()
            .any(|observer| observer.enter(element))
    }
}

impl ObserverFactory<FakeElement> for FakeObserverFactory {
    fn create(
        &self,
        options: &ObserverOptions,
    ) -> Option<Rc<dyn VisibilityObserver<FakeElement>>> {
        if !self.supported {
            return None;
        }
        let observer = Rc::new(FakeObserver {
            options: options.clone(),
            watched: RefCell::new(Vec::new()),
        });
        self.created.borrow_mut().push(Rc::clone(&observer));
        Some(observer)
    }
}

pub struct FakeParticles {
    available: bool,
    rendered: RefCell<Vec<(String, ParticlesConfig)>>,
    refreshes: Cell<usize>,
}

impl FakeParticles {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            rendered: RefCell::new(Vec::new()),
            refreshes: Cell::new(0),
        }
    }

    pub fn rendered(&self) -> Vec<(String, ParticlesConfig)> {
        self.rendered.borrow().clone()
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.get()
    }
}

impl ParticleRenderer for FakeParticles {
    fn is_available(&self) -> bool {
        self.available
    }

    fn render(&self, container_id: &str, config: &ParticlesConfig) -> Result<(), AppError> {
        self.rendered
            .borrow_mut()
            .push((container_id.to_string(), config.clone()));
        Ok(())
    }

    fn refresh(&self) {
        self.refreshes.set(self.refreshes.get() + 1);
    }
}

pub struct Harness {
    pub document: Rc<FakeDocument>,
    pub viewport: Rc<FakeViewport>,
    pub scheduler: Rc<ManualScheduler>,
    pub store: Rc<MemoryStore>,
    pub random: Rc<FixedRandom>,
    pub observers: Rc<FakeObserverFactory>,
    pub particles: Rc<FakeParticles>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_intersection(true)
    }

    pub fn with_intersection(supported: bool) -> Self {
        Self {
            document: Rc::new(FakeDocument::new()),
            viewport: Rc::new(FakeViewport::default()),
            scheduler: Rc::new(ManualScheduler::default()),
            store: Rc::new(MemoryStore::default()),
            random: Rc::new(FixedRandom::new(0.5)),
            observers: Rc::new(FakeObserverFactory::new(supported)),
            particles: Rc::new(FakeParticles::new(true)),
        }
    }

    pub fn platform(&self) -> Platform<FakeElement> {
        Platform {
            document: self.document.clone(),
            viewport: self.viewport.clone(),
            scheduler: self.scheduler.clone(),
            store: self.store.clone(),
            random: self.random.clone(),
            observers: self.observers.clone(),
            particles: self.particles.clone(),
        }
    }
}
