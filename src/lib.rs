//! Interactive behavior for a single-page engineering portfolio.
//!
//! The page logic lives in target-independent managers that reach the
//! browser only through the seams in [`dom`] and [`platform`]. The
//! `web` module (wasm32 only) renders the page with Yew and supplies the
//! `web_sys` implementations of those seams.

pub mod app;
pub mod config;
pub mod dom;
pub mod effects;
pub mod error;
pub mod form;
pub mod navigation;
pub mod particles;
pub mod performance;
pub mod platform;
pub mod reveal;
pub mod theme;
pub mod typing;
pub mod utils;

#[cfg(test)]
mod testing;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::PortfolioApp;
pub use config::AppConfig;
pub use error::{AppError, SubmitError};
