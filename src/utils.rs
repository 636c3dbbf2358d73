use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::platform::{Scheduler, TimerId};

/// Runs `func` once `wait` has passed since the most recent `call`.
pub struct Debounced<A: 'static> {
    scheduler: Rc<dyn Scheduler>,
    wait: Duration,
    pending: Rc<Cell<Option<TimerId>>>,
    func: Rc<dyn Fn(A)>,
}

impl<A: 'static> Debounced<A> {
    pub fn call(&self, arg: A) {
        if let Some(id) = self.pending.take() {
            self.scheduler.clear_timeout(id);
        }

        let func = Rc::clone(&self.func);
        let pending = Rc::clone(&self.pending);
        let id = self.scheduler.set_timeout(
            self.wait,
            Box::new(move || {
                pending.set(None);
                func(arg);
            }),
        );
        self.pending.set(Some(id));
    }

    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.clear_timeout(id);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

pub fn debounce<A: 'static>(
    scheduler: Rc<dyn Scheduler>,
    wait: Duration,
    func: impl Fn(A) + 'static,
) -> Debounced<A> {
    Debounced {
        scheduler,
        wait,
        pending: Rc::new(Cell::new(None)),
        func: Rc::new(func),
    }
}

/// Runs `func` on the leading call, then drops calls until `limit` has passed.
pub struct Throttled<A: 'static> {
    scheduler: Rc<dyn Scheduler>,
    limit: Duration,
    blocked: Rc<Cell<bool>>,
    func: Rc<dyn Fn(A)>,
}

impl<A: 'static> Throttled<A> {
    pub fn call(&self, arg: A) {
        if self.blocked.get() {
            return;
        }

        (self.func)(arg);
        self.blocked.set(true);

        let blocked = Rc::clone(&self.blocked);
        self.scheduler
            .set_timeout(self.limit, Box::new(move || blocked.set(false)));
    }
}

pub fn throttle<A: 'static>(
    scheduler: Rc<dyn Scheduler>,
    limit: Duration,
    func: impl Fn(A) + 'static,
) -> Throttled<A> {
    Throttled {
        scheduler,
        limit,
        blocked: Rc::new(Cell::new(false)),
        func: Rc::new(func),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breakpoints {
    pub mobile_max: f64,
    pub tablet_max: f64,
}

impl Breakpoints {
    pub fn is_mobile(&self, width: f64) -> bool {
        width <= self.mobile_max
    }

    pub fn is_tablet(&self, width: f64) -> bool {
        width > self.mobile_max && width <= self.tablet_max
    }

    pub fn is_desktop(&self, width: f64) -> bool {
        width > self.tablet_max
    }

    pub fn classify(&self, width: f64) -> Breakpoint {
        if self.is_mobile(width) {
            Breakpoint::Mobile
        } else if self.is_tablet(width) {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }
}
