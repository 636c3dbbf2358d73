//! Contact form with a simulated send and toast feedback.

use std::rc::Rc;
use std::time::Duration;

use futures::channel::oneshot;

use crate::config::FormSettings;
use crate::dom::{Document, Element};
use crate::error::{AppError, SubmitError};
use crate::platform::{RandomSource, Scheduler};

/// Label given to a submit button rendered without one.
pub const SUBMIT_LABEL: &str = r#"<i class="fas fa-paper-plane"></i> Send Message"#;
const LOADING_LABEL: &str = r#"<span class="loading"></span> Sending..."#;
const SUCCESS_MESSAGE: &str = "Message sent successfully!";
const FAILURE_MESSAGE: &str = "Failed to send message. Please try again.";

const TOAST_BASE_STYLE: &str = "position: fixed; top: 20px; right: 20px; \
padding: 1rem 2rem; border-radius: 10px; color: white; font-weight: 500; \
z-index: 10000; transform: translateX(100%); transition: transform 0.3s ease;";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastTiming {
    pub enter_delay: Duration,
    pub visible_for: Duration,
    pub exit: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    fn background(self) -> &'static str {
        match self {
            Self::Success => "#48bb78",
            Self::Error => "#f56565",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Failed,
}

/// Appends a toast to the body, slides it in, and removes it after `timing`.
pub fn show_toast<E: Element>(
    document: &dyn Document<Element = E>,
    scheduler: &Rc<dyn Scheduler>,
    timing: ToastTiming,
    message: &str,
    kind: ToastKind,
) -> Result<E, AppError> {
    let body = document.body().ok_or_else(|| AppError::missing("body"))?;
    let toast = document.create_element("div")?;
    toast.set_attribute("class", &format!("form-message {}", kind.as_str()));
    toast.set_text(message);
    toast.set_attribute(
        "style",
        &format!("{TOAST_BASE_STYLE} background: {};", kind.background()),
    );
    body.append_child(&toast)?;

    let entering = toast.clone();
    scheduler.set_timeout(
        timing.enter_delay,
        Box::new(move || entering.set_style("transform", "translateX(0)")),
    );

    let leaving = toast.clone();
    let exit_scheduler = Rc::clone(scheduler);
    scheduler.set_timeout(
        timing.visible_for,
        Box::new(move || {
            leaving.set_style("transform", "translateX(100%)");
            exit_scheduler.set_timeout(timing.exit, Box::new(move || leaving.remove()));
        }),
    );

    Ok(toast)
}

/// Resolves after `delay`; the outcome is drawn when the timer fires.
pub async fn simulate_submission(
    scheduler: Rc<dyn Scheduler>,
    random: Rc<dyn RandomSource>,
    delay: Duration,
    failure_rate: f64,
) -> Result<(), SubmitError> {
    let (sender, receiver) = oneshot::channel();

    scheduler.set_timeout(
        delay,
        Box::new(move || {
            let outcome = if random.next_f64() > failure_rate {
                Ok(())
            } else {
                Err(SubmitError::Rejected)
            };
            let _ = sender.send(outcome);
        }),
    );

    receiver.await.unwrap_or(Err(SubmitError::Interrupted))
}

/// Puts the submit button back the way it was, however the submission ends.
struct ButtonRestore<E: Element> {
    button: E,
    label: String,
}

impl<E: Element> Drop for ButtonRestore<E> {
    fn drop(&mut self) {
        self.button.set_inner_html(&self.label);
        self.button.set_disabled(false);
    }
}

pub struct FormManager<E: Element> {
    form: E,
    submit: E,
    document: Rc<dyn Document<Element = E>>,
    scheduler: Rc<dyn Scheduler>,
    random: Rc<dyn RandomSource>,
    settings: FormSettings,
}

impl<E: Element> FormManager<E> {
    pub fn new(
        form: E,
        document: Rc<dyn Document<Element = E>>,
        scheduler: Rc<dyn Scheduler>,
        random: Rc<dyn RandomSource>,
        settings: FormSettings,
    ) -> Result<Self, AppError> {
        let submit = form
            .query(r#"button[type="submit"]"#)
            .ok_or_else(|| AppError::missing(r#"#contact-form button[type="submit"]"#))?;
        if submit.inner_html().trim().is_empty() {
            submit.set_inner_html(SUBMIT_LABEL);
        }

        Ok(Self {
            form,
            submit,
            document,
            scheduler,
            random,
            settings,
        })
    }

    pub fn is_submitting(&self) -> bool {
        self.submit.is_disabled()
    }

    /// `None` when a submission is already in flight.
    pub async fn handle_submit(&self) -> Option<SubmitOutcome> {
        if self.is_submitting() {
            return None;
        }

        let _restore = ButtonRestore {
            button: self.submit.clone(),
            label: self.submit.inner_html(),
        };
        self.submit.set_inner_html(LOADING_LABEL);
        self.submit.set_disabled(true);

        let result = simulate_submission(
            Rc::clone(&self.scheduler),
            Rc::clone(&self.random),
            self.settings.submit_delay,
            self.settings.failure_rate,
        )
        .await;

        let outcome = match result {
            Ok(()) => {
                log::info!("contact form submitted");
                self.notify(SUCCESS_MESSAGE, ToastKind::Success);
                self.form.reset();
                SubmitOutcome::Sent
            }
            Err(err) => {
                log::warn!("contact form submission failed: {err}");
                self.notify(FAILURE_MESSAGE, ToastKind::Error);
                SubmitOutcome::Failed
            }
        };

        Some(outcome)
    }

    fn notify(&self, message: &str, kind: ToastKind) {
        if let Err(err) = show_toast(
            self.document.as_ref(),
            &self.scheduler,
            self.settings.toast,
            message,
            kind,
        ) {
            log::error!("could not show {} toast: {err}", kind.as_str());
        }
    }
}
