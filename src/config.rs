use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use crate::error::AppError;
use crate::form::ToastTiming;
use crate::platform::ObserverOptions;
use crate::theme::Theme;
use crate::typing::TypingTiming;
use crate::utils::Breakpoints;

const DEFAULT_THEME_STORAGE_KEY: &str = "theme";
const DEFAULT_THEME: Theme = Theme::Light;
const DEFAULT_SCROLLED_THRESHOLD_PX: f64 = 100.0;
const DEFAULT_ACTIVE_LINK_OFFSET_PX: f64 = 100.0;
const DEFAULT_HEADER_OFFSET_PX: f64 = 70.0;
const DEFAULT_REVEAL_THRESHOLD: f64 = 0.15;
const DEFAULT_REVEAL_ROOT_MARGIN: &str = "0px 0px -80px 0px";
const DEFAULT_REVEAL_STAGGER_MS: u64 = 100;
const DEFAULT_REVEAL_DELAY_MS: u64 = 100;
const DEFAULT_TYPING_SPEED_MS: u64 = 80;
const DEFAULT_TYPING_FULL_PAUSE_MS: u64 = 2_000;
const DEFAULT_TYPING_EMPTY_PAUSE_MS: u64 = 500;
const DEFAULT_TYPING_START_DELAY_MS: u64 = 2_000;
const DEFAULT_SUBMIT_DELAY_MS: u64 = 2_000;
const DEFAULT_SUBMIT_FAILURE_RATE: f64 = 0.2;
const DEFAULT_TOAST_ENTER_DELAY_MS: u64 = 100;
const DEFAULT_TOAST_VISIBLE_MS: u64 = 5_000;
const DEFAULT_TOAST_EXIT_MS: u64 = 300;
const DEFAULT_SLOW_LOAD_THRESHOLD_MS: u64 = 3_000;
const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 250;
const DEFAULT_PARALLAX_THROTTLE_MS: u64 = 10;
const DEFAULT_PARALLAX_RATE: f64 = -0.5;
const DEFAULT_MOBILE_MAX_WIDTH: f64 = 768.0;
const DEFAULT_TABLET_MAX_WIDTH: f64 = 1024.0;
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

const DEFAULT_TAGLINES: [&str; 6] = [
    "Electronics & Communication Engineer",
    "Data Analytics Specialist",
    "Embedded Systems Developer",
    "FPGA/Verilog Expert",
    "IoT Solutions Architect",
    "Optical Communication Engineer",
];

const DEFAULT_PRELOAD_URLS: [&str; 2] = [
    "https://fonts.googleapis.com/css2?family=Poppins:wght@300;400;500;600;700&display=swap",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css",
];

const PIXEL_OFFSET_BOUNDS: (f64, f64) = (0.0, 2_000.0);
const REVEAL_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 1.0);
const ANIMATION_STEP_MS_BOUNDS: (u64, u64) = (0, 5_000);
const TYPING_SPEED_MS_BOUNDS: (u64, u64) = (10, 2_000);
const PAUSE_MS_BOUNDS: (u64, u64) = (0, 60_000);
const SUBMIT_DELAY_MS_BOUNDS: (u64, u64) = (0, 60_000);
const FAILURE_RATE_BOUNDS: (f64, f64) = (0.0, 1.0);
const TOAST_MS_BOUNDS: (u64, u64) = (0, 60_000);
const SLOW_LOAD_THRESHOLD_MS_BOUNDS: (u64, u64) = (100, 120_000);
const RATE_LIMIT_MS_BOUNDS: (u64, u64) = (1, 5_000);
const PARALLAX_RATE_BOUNDS: (f64, f64) = (-2.0, 2.0);
const BREAKPOINT_WIDTH_BOUNDS: (f64, f64) = (240.0, 4_096.0);

#[derive(Clone, Debug, PartialEq)]
pub struct ThemeSettings {
    pub storage_key: String,
    pub default_theme: Theme,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NavigationSettings {
    pub scrolled_threshold: f64,
    pub active_link_offset: f64,
    pub header_offset: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RevealSettings {
    pub observer: ObserverOptions,
    pub stagger: Duration,
    pub reveal_delay: Duration,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypingSettings {
    pub timing: TypingTiming,
    pub start_delay: Duration,
    pub texts: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormSettings {
    pub submit_delay: Duration,
    pub failure_rate: f64,
    pub toast: ToastTiming,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PerformanceSettings {
    pub slow_load_threshold: Duration,
    pub preload_urls: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EffectSettings {
    pub resize_debounce: Duration,
    pub parallax_throttle: Duration,
    pub parallax_rate: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub theme: ThemeSettings,
    pub navigation: NavigationSettings,
    pub reveal: RevealSettings,
    pub typing: TypingSettings,
    pub form: FormSettings,
    pub performance: PerformanceSettings,
    pub effects: EffectSettings,
    pub breakpoints: Breakpoints,
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_overrides(ConfigOverrides::default())
    }
}

/// Raw page-supplied values. Anything missing or out of bounds keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConfigOverrides {
    theme_storage_key: Option<String>,
    default_theme: Option<String>,
    scrolled_threshold_px: Option<f64>,
    active_link_offset_px: Option<f64>,
    header_offset_px: Option<f64>,
    reveal_threshold: Option<f64>,
    reveal_root_margin: Option<String>,
    reveal_stagger_ms: Option<u64>,
    reveal_delay_ms: Option<u64>,
    typing_speed_ms: Option<u64>,
    typing_full_pause_ms: Option<u64>,
    typing_empty_pause_ms: Option<u64>,
    typing_start_delay_ms: Option<u64>,
    taglines: Option<Vec<String>>,
    submit_delay_ms: Option<u64>,
    submit_failure_rate: Option<f64>,
    toast_enter_delay_ms: Option<u64>,
    toast_visible_ms: Option<u64>,
    toast_exit_ms: Option<u64>,
    slow_load_threshold_ms: Option<u64>,
    preload_urls: Option<Vec<String>>,
    resize_debounce_ms: Option<u64>,
    parallax_throttle_ms: Option<u64>,
    parallax_rate: Option<f64>,
    mobile_max_width: Option<f64>,
    tablet_max_width: Option<f64>,
    log_level: Option<String>,
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let overrides: ConfigOverrides = serde_json::from_str(raw)?;
        Ok(Self::from_overrides(overrides))
    }

    fn from_overrides(raw: ConfigOverrides) -> Self {
        let theme = ThemeSettings {
            storage_key: non_empty_string(raw.theme_storage_key)
                .unwrap_or_else(|| DEFAULT_THEME_STORAGE_KEY.to_string()),
            default_theme: raw
                .default_theme
                .as_deref()
                .and_then(Theme::parse)
                .unwrap_or(DEFAULT_THEME),
        };

        let navigation = NavigationSettings {
            scrolled_threshold: f64_with_bounds(
                raw.scrolled_threshold_px,
                DEFAULT_SCROLLED_THRESHOLD_PX,
                PIXEL_OFFSET_BOUNDS,
            ),
            active_link_offset: f64_with_bounds(
                raw.active_link_offset_px,
                DEFAULT_ACTIVE_LINK_OFFSET_PX,
                PIXEL_OFFSET_BOUNDS,
            ),
            header_offset: f64_with_bounds(
                raw.header_offset_px,
                DEFAULT_HEADER_OFFSET_PX,
                PIXEL_OFFSET_BOUNDS,
            ),
        };

        let reveal = RevealSettings {
            observer: ObserverOptions {
                threshold: f64_with_bounds(
                    raw.reveal_threshold,
                    DEFAULT_REVEAL_THRESHOLD,
                    REVEAL_THRESHOLD_BOUNDS,
                ),
                root_margin: non_empty_string(raw.reveal_root_margin)
                    .unwrap_or_else(|| DEFAULT_REVEAL_ROOT_MARGIN.to_string()),
            },
            stagger: ms_with_bounds(
                raw.reveal_stagger_ms,
                DEFAULT_REVEAL_STAGGER_MS,
                ANIMATION_STEP_MS_BOUNDS,
            ),
            reveal_delay: ms_with_bounds(
                raw.reveal_delay_ms,
                DEFAULT_REVEAL_DELAY_MS,
                ANIMATION_STEP_MS_BOUNDS,
            ),
        };

        let texts = raw
            .taglines
            .map(|texts| {
                texts
                    .into_iter()
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|texts| !texts.is_empty())
            .unwrap_or_else(|| DEFAULT_TAGLINES.iter().map(ToString::to_string).collect());

        let typing = TypingSettings {
            timing: TypingTiming {
                speed: ms_with_bounds(
                    raw.typing_speed_ms,
                    DEFAULT_TYPING_SPEED_MS,
                    TYPING_SPEED_MS_BOUNDS,
                ),
                full_pause: ms_with_bounds(
                    raw.typing_full_pause_ms,
                    DEFAULT_TYPING_FULL_PAUSE_MS,
                    PAUSE_MS_BOUNDS,
                ),
                empty_pause: ms_with_bounds(
                    raw.typing_empty_pause_ms,
                    DEFAULT_TYPING_EMPTY_PAUSE_MS,
                    PAUSE_MS_BOUNDS,
                ),
            },
            start_delay: ms_with_bounds(
                raw.typing_start_delay_ms,
                DEFAULT_TYPING_START_DELAY_MS,
                PAUSE_MS_BOUNDS,
            ),
            texts,
        };

        let form = FormSettings {
            submit_delay: ms_with_bounds(
                raw.submit_delay_ms,
                DEFAULT_SUBMIT_DELAY_MS,
                SUBMIT_DELAY_MS_BOUNDS,
            ),
            failure_rate: f64_with_bounds(
                raw.submit_failure_rate,
                DEFAULT_SUBMIT_FAILURE_RATE,
                FAILURE_RATE_BOUNDS,
            ),
            toast: ToastTiming {
                enter_delay: ms_with_bounds(
                    raw.toast_enter_delay_ms,
                    DEFAULT_TOAST_ENTER_DELAY_MS,
                    TOAST_MS_BOUNDS,
                ),
                visible_for: ms_with_bounds(
                    raw.toast_visible_ms,
                    DEFAULT_TOAST_VISIBLE_MS,
                    TOAST_MS_BOUNDS,
                ),
                exit: ms_with_bounds(raw.toast_exit_ms, DEFAULT_TOAST_EXIT_MS, TOAST_MS_BOUNDS),
            },
        };

        let performance = PerformanceSettings {
            slow_load_threshold: ms_with_bounds(
                raw.slow_load_threshold_ms,
                DEFAULT_SLOW_LOAD_THRESHOLD_MS,
                SLOW_LOAD_THRESHOLD_MS_BOUNDS,
            ),
            preload_urls: raw.preload_urls.unwrap_or_else(|| {
                DEFAULT_PRELOAD_URLS.iter().map(ToString::to_string).collect()
            }),
        };

        let effects = EffectSettings {
            resize_debounce: ms_with_bounds(
                raw.resize_debounce_ms,
                DEFAULT_RESIZE_DEBOUNCE_MS,
                RATE_LIMIT_MS_BOUNDS,
            ),
            parallax_throttle: ms_with_bounds(
                raw.parallax_throttle_ms,
                DEFAULT_PARALLAX_THROTTLE_MS,
                RATE_LIMIT_MS_BOUNDS,
            ),
            parallax_rate: f64_with_bounds(
                raw.parallax_rate,
                DEFAULT_PARALLAX_RATE,
                PARALLAX_RATE_BOUNDS,
            ),
        };

        let mobile_max = f64_with_bounds(
            raw.mobile_max_width,
            DEFAULT_MOBILE_MAX_WIDTH,
            BREAKPOINT_WIDTH_BOUNDS,
        );
        let tablet_max = f64_with_bounds(
            raw.tablet_max_width,
            DEFAULT_TABLET_MAX_WIDTH,
            BREAKPOINT_WIDTH_BOUNDS,
        )
        .max(mobile_max);

        Self {
            theme,
            navigation,
            reveal,
            typing,
            form,
            performance,
            effects,
            breakpoints: Breakpoints {
                mobile_max,
                tablet_max,
            },
            log_level: parse_log_level(raw.log_level.as_deref(), DEFAULT_LOG_LEVEL),
        }
    }
}

fn ms_with_bounds(value: Option<u64>, default: u64, bounds: (u64, u64)) -> Duration {
    Duration::from_millis(
        value
            .filter(|value| (bounds.0..=bounds.1).contains(value))
            .unwrap_or(default),
    )
}

fn f64_with_bounds(value: Option<f64>, default: f64, bounds: (f64, f64)) -> f64 {
    value
        .filter(|value| value.is_finite() && (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn non_empty_string(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_log_level(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    match value
        .map(|value| value.trim().to_ascii_lowercase())
        .as_deref()
    {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => default,
    }
}
