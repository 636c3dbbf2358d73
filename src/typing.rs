//! Typewriter effect for the hero tagline.
//!
//! `TypingAnimation` is the pure cursor state machine; `TypingTask` drives it on
//! a scheduler until it is cancelled or dropped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::dom::Element;
use crate::error::AppError;
use crate::platform::{Scheduler, TimerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypingTiming {
    pub speed: Duration,
    pub full_pause: Duration,
    pub empty_pause: Duration,
}

impl Default for TypingTiming {
    fn default() -> Self {
        Self {
            speed: Duration::from_millis(100),
            full_pause: Duration::from_millis(2_000),
            empty_pause: Duration::from_millis(500),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypingPhase {
    Typing,
    PausingFull,
    Deleting,
    PausingEmpty,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypingStep {
    pub text: String,
    pub delay: Duration,
}

#[derive(Clone, Debug)]
pub struct TypingAnimation {
    texts: Vec<Vec<char>>,
    timing: TypingTiming,
    text_index: usize,
    char_index: usize,
    deleting: bool,
    phase: TypingPhase,
}

impl TypingAnimation {
    pub fn new<S: AsRef<str>>(texts: &[S], timing: TypingTiming) -> Result<Self, AppError> {
        if texts.is_empty() {
            return Err(AppError::EmptyTypingTexts);
        }

        Ok(Self {
            texts: texts
                .iter()
                .map(|text| text.as_ref().chars().collect())
                .collect(),
            timing,
            text_index: 0,
            char_index: 0,
            deleting: false,
            phase: TypingPhase::Typing,
        })
    }

    pub fn text_index(&self) -> usize {
        self.text_index
    }

    pub fn char_index(&self) -> usize {
        self.char_index
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    pub fn tick(&mut self) -> TypingStep {
        let current = &self.texts[self.text_index];
        let len = current.len();

        if self.deleting {
            self.char_index = self.char_index.saturating_sub(1);
        } else {
            self.char_index = (self.char_index + 1).min(len);
        }
        let text: String = current[..self.char_index].iter().collect();

        let mut delay = if self.deleting {
            self.timing.speed / 2
        } else {
            self.timing.speed
        };
        self.phase = if self.deleting {
            TypingPhase::Deleting
        } else {
            TypingPhase::Typing
        };

        if !self.deleting && self.char_index == len {
            delay = self.timing.full_pause;
            self.deleting = true;
            self.phase = TypingPhase::PausingFull;
        } else if self.deleting && self.char_index == 0 {
            delay = self.timing.empty_pause;
            self.deleting = false;
            self.text_index = (self.text_index + 1) % self.texts.len();
            self.phase = TypingPhase::PausingEmpty;
        }

        TypingStep { text, delay }
    }
}

struct TypingLoop<E: Element> {
    element: E,
    animation: RefCell<TypingAnimation>,
    scheduler: Rc<dyn Scheduler>,
    cancelled: Cell<bool>,
    pending: Cell<Option<TimerId>>,
}

trait LoopControl {
    fn cancel(&self);
    fn is_running(&self) -> bool;
}

impl<E: Element> LoopControl for TypingLoop<E> {
    fn cancel(&self) {
        self.cancelled.set(true);
        if let Some(id) = self.pending.take() {
            self.scheduler.clear_timeout(id);
        }
    }

    fn is_running(&self) -> bool {
        !self.cancelled.get()
    }
}

fn step<E: Element>(state: Rc<TypingLoop<E>>) {
    if state.cancelled.get() {
        return;
    }

    let next = state.animation.borrow_mut().tick();
    state.element.set_text(&next.text);

    let again = Rc::clone(&state);
    let id = state
        .scheduler
        .set_timeout(next.delay, Box::new(move || step(again)));
    state.pending.set(Some(id));
}

/// Repeating driver for a `TypingAnimation`. Dropping it stops the loop.
pub struct TypingTask {
    control: Rc<dyn LoopControl>,
}

impl TypingTask {
    /// Renders the first frame immediately, then keeps ticking on `scheduler`.
    pub fn start<E: Element>(
        element: E,
        animation: TypingAnimation,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let state = Rc::new(TypingLoop {
            element,
            animation: RefCell::new(animation),
            scheduler,
            cancelled: Cell::new(false),
            pending: Cell::new(None),
        });

        step(Rc::clone(&state));

        Self { control: state }
    }

    pub fn cancel(&self) {
        self.control.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }
}

impl Drop for TypingTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
