use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Reflect;
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, Event, MouseEvent, Window};
use yew::prelude::*;

use super::dom::WebElement;
use super::platform::{browser_platform, elapsed_since_navigation};
use crate::app::PortfolioApp;
use crate::config::AppConfig;
use crate::particles::PARTICLES_CONTAINER_ID;

const HANDLE_PROPERTY: &str = "PortfolioApp";
const OWNER_NAME: &str = "Alex Rivera";

const NAV_SECTIONS: [(&str, &str); 7] = [
    ("#home", "Home"),
    ("#about", "About"),
    ("#experience", "Experience"),
    ("#skills", "Skills"),
    ("#projects", "Projects"),
    ("#achievements", "Achievements"),
    ("#contact", "Contact"),
];

const STATS: [(&str, &str); 3] = [
    ("12+", "Hardware builds"),
    ("3", "Publications"),
    ("5", "Internships"),
];

struct TimelineEntry {
    period: &'static str,
    role: &'static str,
    organization: &'static str,
    summary: &'static str,
}

const EXPERIENCE: [TimelineEntry; 4] = [
    TimelineEntry {
        period: "2024 - Present",
        role: "Embedded Firmware Engineer",
        organization: "Signal Labs",
        summary: "Low-power sensor firmware on ARM Cortex-M with OTA updates.",
    },
    TimelineEntry {
        period: "2023",
        role: "FPGA Design Intern",
        organization: "Photon Systems",
        summary: "Verilog DSP blocks for an optical link test bench.",
    },
    TimelineEntry {
        period: "2022",
        role: "Data Analytics Intern",
        organization: "GridWorks",
        summary: "Dashboards and anomaly detection over substation telemetry.",
    },
    TimelineEntry {
        period: "2021",
        role: "Research Assistant",
        organization: "Optical Communications Lab",
        summary: "Simulated free-space optical channels under turbulence.",
    },
];

const SKILLS: [(&str, &str); 8] = [
    ("fas fa-microchip", "Embedded C"),
    ("fas fa-memory", "Verilog / FPGA"),
    ("fas fa-wifi", "IoT Protocols"),
    ("fas fa-wave-square", "Signal Processing"),
    ("fas fa-chart-line", "Data Analytics"),
    ("fab fa-python", "Python"),
    ("fas fa-satellite-dish", "Optical Links"),
    ("fas fa-tools", "PCB Design"),
];

struct Project {
    title: &'static str,
    image: &'static str,
    summary: &'static str,
    tags: &'static [&'static str],
}

const PROJECTS: [Project; 4] = [
    Project {
        title: "Smart Grid Monitor",
        image: "images/grid-monitor.svg",
        summary: "LoRa sensor mesh streaming power quality metrics to a cloud dashboard.",
        tags: &["IoT", "LoRa", "ESP32"],
    },
    Project {
        title: "FPGA Audio Equalizer",
        image: "images/fpga-equalizer.svg",
        summary: "Ten-band real-time equalizer written in Verilog on an Artix-7.",
        tags: &["Verilog", "DSP", "FPGA"],
    },
    Project {
        title: "Visible Light Link",
        image: "images/vlc-link.svg",
        summary: "LED-based data link reaching 2 Mbps with on-off keying.",
        tags: &["Optics", "Modulation"],
    },
    Project {
        title: "Fleet Telemetry Insights",
        image: "images/fleet-insights.svg",
        summary: "Batch analytics over vehicle CAN logs to predict maintenance.",
        tags: &["Python", "Pandas", "SQL"],
    },
];

const ACHIEVEMENTS: [(&str, &str, &str); 3] = [
    ("fas fa-trophy", "National Hardware Hackathon", "First place, embedded track."),
    ("fas fa-file-alt", "IEEE Conference Paper", "Turbulence mitigation for FSO links."),
    ("fas fa-certificate", "Certified LabVIEW Developer", "NI certification, 2023."),
];

const CONTACT_ITEMS: [(&str, &str, &str); 3] = [
    ("fas fa-envelope", "Email", "alex.rivera@example.com"),
    ("fas fa-map-marker-alt", "Location", "Austin, TX"),
    ("fab fa-linkedin", "LinkedIn", "linkedin.com/in/alexrivera"),
];

struct Mounted {
    app: Rc<PortfolioApp<WebElement>>,
    _listeners: WindowListeners,
}

type AppSlot = Rc<RefCell<Option<Mounted>>>;

fn current(slot: &AppSlot) -> Option<Rc<PortfolioApp<WebElement>>> {
    slot.borrow().as_ref().map(|mounted| Rc::clone(&mounted.app))
}

/// Window listeners for the lifetime of the page. Dropping removes them.
struct WindowListeners {
    window: Window,
    listeners: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

impl WindowListeners {
    fn attach(window: &Window, app: &Rc<PortfolioApp<WebElement>>) -> Self {
        let mut guard = Self {
            window: window.clone(),
            listeners: Vec::new(),
        };

        guard.listen("scroll", app, |app| app.handle_scroll());
        guard.listen("resize", app, |app| app.handle_resize());
        let load_window = window.clone();
        guard.listen("load", app, move |app| record_load_time(&load_window, app));

        let loaded = window
            .document()
            .is_some_and(|document| document.ready_state() == "complete");
        if loaded {
            record_load_time(window, app);
        }

        guard
    }

    fn listen(
        &mut self,
        event: &'static str,
        app: &Rc<PortfolioApp<WebElement>>,
        handler: impl Fn(&PortfolioApp<WebElement>) + 'static,
    ) {
        let app = Rc::downgrade(app);
        let closure = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            if let Some(app) = app.upgrade() {
                handler(&app);
            }
        });

        match self
            .window
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            Ok(()) => self.listeners.push((event, closure)),
            Err(err) => log::warn!("could not listen for {event}: {err:?}"),
        }
    }
}

impl Drop for WindowListeners {
    fn drop(&mut self) {
        for (event, closure) in &self.listeners {
            let _ = self
                .window
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

fn record_load_time(window: &Window, app: &PortfolioApp<WebElement>) {
    if let Some(load_time) = elapsed_since_navigation(window) {
        app.page_loaded(load_time);
    }
}

/// Script-facing handle on the running app, published as `window.PortfolioApp`.
#[wasm_bindgen]
pub struct PortfolioHandle {
    app: Weak<PortfolioApp<WebElement>>,
}

#[wasm_bindgen]
impl PortfolioHandle {
    pub fn theme(&self) -> Option<String> {
        let theme = self.app.upgrade()?.theme()?;
        Some(theme.as_str().to_string())
    }

    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) -> Option<String> {
        let theme = self.app.upgrade()?.toggle_theme()?;
        Some(theme.as_str().to_string())
    }

    #[wasm_bindgen(js_name = isMenuOpen)]
    pub fn is_menu_open(&self) -> bool {
        self.app.upgrade().is_some_and(|app| app.is_menu_open())
    }

    #[wasm_bindgen(js_name = toggleMenu)]
    pub fn toggle_menu(&self) {
        if let Some(app) = self.app.upgrade() {
            app.toggle_menu();
        }
    }

    #[wasm_bindgen(js_name = isTyping)]
    pub fn is_typing(&self) -> bool {
        self.app.upgrade().is_some_and(|app| app.typing_running())
    }
}

fn publish_handle(window: &Window, app: &Rc<PortfolioApp<WebElement>>) {
    let handle = PortfolioHandle {
        app: Rc::downgrade(app),
    };
    if let Err(err) = Reflect::set(
        window,
        &JsValue::from_str(HANDLE_PROPERTY),
        &JsValue::from(handle),
    ) {
        log::warn!("could not publish window.{HANDLE_PROPERTY}: {err:?}");
    }
}

fn withdraw_handle(window: &Window) {
    let _ = Reflect::delete_property(window.as_ref(), &JsValue::from_str(HANDLE_PROPERTY));
}

fn boot(config: AppConfig) -> Option<Mounted> {
    let window = window()?;
    let document = window.document()?;

    let app = PortfolioApp::start(config, browser_platform(&window, document));
    let listeners = WindowListeners::attach(&window, &app);
    publish_handle(&window, &app);

    Some(Mounted {
        app,
        _listeners: listeners,
    })
}

#[derive(Properties, PartialEq)]
struct CardProps {
    class: AttrValue,
    on_hover: Callback<(web_sys::Element, bool)>,
    #[prop_or_default]
    children: Html,
}

#[function_component(Card)]
fn card(props: &CardProps) -> Html {
    let node = use_node_ref();

    let hover = |entered: bool| {
        let node = node.clone();
        let on_hover = props.on_hover.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(card) = node.cast::<web_sys::Element>() {
                on_hover.emit((card, entered));
            }
        })
    };

    html! {
        <div
            ref={node.clone()}
            class={props.class.clone()}
            onmouseenter={hover(true)}
            onmouseleave={hover(false)}
        >
            {props.children.clone()}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: AppConfig,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let slot: AppSlot = use_mut_ref(|| None);

    {
        let slot = slot.clone();
        let config = props.config.clone();
        use_effect_with((), move |_| {
            *slot.borrow_mut() = boot(config);
            move || {
                let mounted = slot.borrow_mut().take();
                if let Some(mounted) = mounted {
                    mounted.app.shutdown();
                }
                if let Some(window) = window() {
                    withdraw_handle(&window);
                }
            }
        });
    }

    let on_theme = {
        let slot = slot.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(app) = current(&slot) {
                app.toggle_theme();
            }
        })
    };

    let on_hamburger = {
        let slot = slot.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(app) = current(&slot) {
                app.toggle_menu();
            }
        })
    };

    let anchor = |href: &'static str, from_nav: bool| {
        let slot = slot.clone();
        Callback::from(move |event: MouseEvent| {
            let Some(app) = current(&slot) else {
                return;
            };
            let handled = if from_nav {
                app.nav_link_clicked(href)
            } else {
                app.follow_anchor(href)
            };
            if handled {
                event.prevent_default();
            }
        })
    };

    let on_submit = {
        let slot = slot.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if let Some(app) = current(&slot) {
                spawn_local(async move {
                    if let Some(outcome) = app.submit_contact_form().await {
                        log::debug!("contact form finished: {outcome:?}");
                    }
                });
            }
        })
    };

    let on_card_hover = {
        let slot = slot.clone();
        Callback::from(move |(card, entered): (web_sys::Element, bool)| {
            let Some(app) = current(&slot) else {
                return;
            };
            let card = WebElement(card);
            if entered {
                app.card_entered(&card);
            } else {
                app.card_left(&card);
            }
        })
    };

    html! {
        <>
            <nav id="navbar" class="navbar">
                <div class="nav-container">
                    <a href="#home" class="nav-logo" onclick={anchor("#home", false)}>{OWNER_NAME}</a>
                    <ul id="nav-menu" class="nav-menu">
                        { for NAV_SECTIONS.iter().map(|(href, label)| html! {
                            <li class="nav-item">
                                <a href={*href} class="nav-link" onclick={anchor(*href, true)}>{*label}</a>
                            </li>
                        }) }
                    </ul>
                    <button id="theme-toggle" class="theme-toggle" type="button" aria-label="Toggle theme" onclick={on_theme}>
                        <i class="fas fa-moon"></i>
                    </button>
                    <div id="hamburger" class="hamburger" onclick={on_hamburger}>
                        <span class="bar"></span>
                        <span class="bar"></span>
                        <span class="bar"></span>
                    </div>
                </div>
            </nav>

            <section id="home" class="hero">
                <div id={PARTICLES_CONTAINER_ID}></div>
                <div class="hero-content">
                    <h1 class="hero-title">{"Hi, I'm "}<span class="highlight">{OWNER_NAME}</span></h1>
                    <p class="hero-tagline"></p>
                    <div class="hero-buttons">
                        <a href="#projects" class="btn btn-primary" onclick={anchor("#projects", false)}>{"View My Work"}</a>
                        <a href="#contact" class="btn btn-secondary" onclick={anchor("#contact", false)}>{"Get In Touch"}</a>
                    </div>
                </div>
            </section>

            <section id="about" class="about">
                <div class="container">
                    <div class="section-header"><h2>{"About Me"}</h2></div>
                    <div class="about-content">
                        <div class="about-text">
                            <p>{"Electronics and communication engineer working where firmware, programmable logic and data meet."}</p>
                            <p>{"I build connected devices end to end, from the schematic to the dashboard that reads their telemetry."}</p>
                        </div>
                        <div class="about-stats">
                            { for STATS.iter().map(|(value, label)| html! {
                                <Card class="stat-card" on_hover={on_card_hover.clone()}>
                                    <h3>{*value}</h3>
                                    <p>{*label}</p>
                                </Card>
                            }) }
                        </div>
                    </div>
                </div>
            </section>

            <section id="experience" class="experience">
                <div class="container">
                    <div class="section-header"><h2>{"Experience"}</h2></div>
                    <div class="timeline">
                        { for EXPERIENCE.iter().map(|entry| html! {
                            <div class="timeline-item">
                                <div class="timeline-content">
                                    <span class="timeline-date">{entry.period}</span>
                                    <h3>{entry.role}</h3>
                                    <h4>{entry.organization}</h4>
                                    <p>{entry.summary}</p>
                                </div>
                            </div>
                        }) }
                    </div>
                </div>
            </section>

            <section id="skills" class="skills">
                <div class="container">
                    <div class="section-header"><h2>{"Skills"}</h2></div>
                    <div class="skills-grid">
                        { for SKILLS.iter().map(|(icon, name)| html! {
                            <Card class="skill-card" on_hover={on_card_hover.clone()}>
                                <i class={*icon}></i>
                                <h3>{*name}</h3>
                            </Card>
                        }) }
                    </div>
                </div>
            </section>

            <section id="projects" class="projects">
                <div class="container">
                    <div class="section-header"><h2>{"Projects"}</h2></div>
                    <div class="projects-grid">
                        { for PROJECTS.iter().map(|project| html! {
                            <Card class="project-card" on_hover={on_card_hover.clone()}>
                                <img class="project-image" data-src={project.image} alt={project.title} />
                                <div class="project-content">
                                    <h3>{project.title}</h3>
                                    <p>{project.summary}</p>
                                    <div class="project-tags">
                                        { for project.tags.iter().map(|tag| html! { <span class="tag">{*tag}</span> }) }
                                    </div>
                                </div>
                            </Card>
                        }) }
                    </div>
                </div>
            </section>

            <section id="achievements" class="achievements">
                <div class="container">
                    <div class="section-header"><h2>{"Achievements"}</h2></div>
                    <div class="achievements-grid">
                        { for ACHIEVEMENTS.iter().map(|(icon, title, detail)| html! {
                            <Card class="achievement-card" on_hover={on_card_hover.clone()}>
                                <i class={*icon}></i>
                                <h3>{*title}</h3>
                                <p>{*detail}</p>
                            </Card>
                        }) }
                    </div>
                </div>
            </section>

            <section id="contact" class="contact">
                <div class="container">
                    <div class="section-header"><h2>{"Get In Touch"}</h2></div>
                    <div class="contact-content">
                        <div class="contact-info">
                            { for CONTACT_ITEMS.iter().map(|(icon, label, value)| html! {
                                <div class="contact-item">
                                    <i class={*icon}></i>
                                    <div>
                                        <h4>{*label}</h4>
                                        <p>{*value}</p>
                                    </div>
                                </div>
                            }) }
                        </div>
                        <form id="contact-form" class="contact-form" onsubmit={on_submit}>
                            <div class="form-group">
                                <input type="text" name="name" placeholder="Your Name" required={true} />
                            </div>
                            <div class="form-group">
                                <input type="email" name="email" placeholder="Your Email" required={true} />
                            </div>
                            <div class="form-group">
                                <input type="text" name="subject" placeholder="Subject" required={true} />
                            </div>
                            <div class="form-group">
                                <textarea name="message" rows="5" placeholder="Your Message" required={true} />
                            </div>
                            // Label is owned by the form manager, which swaps it while sending.
                            <button type="submit" class="btn btn-primary"></button>
                        </form>
                    </div>
                </div>
            </section>

            <footer class="footer">
                <p>{format!("© 2025 {OWNER_NAME}. Built with Rust and Yew.")}</p>
            </footer>
        </>
    }
}
