//! Browser entry point: ports backed by `web_sys` and the Yew page.

mod dom;
mod page;
mod platform;

use web_sys::window;

use crate::config::AppConfig;
use crate::error::AppError;

pub use dom::{WebDocument, WebElement};
pub use page::{App, AppProps, PortfolioHandle};
pub use platform::browser_platform;

const CONFIG_SCRIPT_ID: &str = "portfolio-config";
const MOUNT_ID: &str = "app";

/// Reads the optional `<script type="application/json" id="portfolio-config">` block.
fn read_config(document: &web_sys::Document) -> Result<AppConfig, AppError> {
    match document.get_element_by_id(CONFIG_SCRIPT_ID) {
        Some(script) => AppConfig::from_json(&script.text_content().unwrap_or_default()),
        None => Ok(AppConfig::default()),
    }
}

pub fn run() {
    console_error_panic_hook::set_once();

    let Some(document) = window().and_then(|w| w.document()) else {
        return;
    };

    let (config, config_error) = match read_config(&document) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    if let Some(level) = config.log_level.to_level() {
        let _ = console_log::init_with_level(level);
    }
    if let Some(err) = config_error {
        log::warn!("ignoring page config: {err}");
    }

    let props = AppProps { config };
    match document.get_element_by_id(MOUNT_ID) {
        Some(root) => yew::Renderer::<App>::with_root_and_props(root, props).render(),
        None => {
            log::warn!("missing #{MOUNT_ID} mount point, rendering into body");
            yew::Renderer::<App>::with_props(props).render()
        }
    };
}
