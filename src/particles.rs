use std::rc::Rc;

use serde::Serialize;

use crate::error::AppError;
use crate::platform::ParticleRenderer;

pub const PARTICLES_CONTAINER_ID: &str = "particles-js";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParticlesConfig {
    pub particles: ParticleSettings,
    pub interactivity: Interactivity,
    pub retina_detect: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParticleSettings {
    pub number: ParticleNumber,
    pub color: ColorList,
    pub shape: Shape,
    pub opacity: OpacitySettings,
    pub size: SizeSettings,
    pub line_linked: LineLinked,
    #[serde(rename = "move")]
    pub movement: Movement,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParticleNumber {
    pub value: u32,
    pub density: Density,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Density {
    pub enable: bool,
    pub value_area: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorList {
    pub value: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: String,
    pub stroke: Stroke,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stroke {
    pub width: f64,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OpacitySettings {
    pub value: f64,
    pub random: bool,
    pub anim: OpacityAnim,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OpacityAnim {
    pub enable: bool,
    pub speed: f64,
    pub opacity_min: f64,
    pub sync: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SizeSettings {
    pub value: f64,
    pub random: bool,
    pub anim: SizeAnim,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SizeAnim {
    pub enable: bool,
    pub speed: f64,
    pub size_min: f64,
    pub sync: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineLinked {
    pub enable: bool,
    pub distance: f64,
    pub color: String,
    pub opacity: f64,
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Movement {
    pub enable: bool,
    pub speed: f64,
    pub direction: String,
    pub random: bool,
    pub straight: bool,
    pub out_mode: String,
    pub bounce: bool,
    pub attract: Attract,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attract {
    pub enable: bool,
    pub rotate_x: f64,
    pub rotate_y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Interactivity {
    pub detect_on: String,
    pub events: InteractivityEvents,
    pub modes: InteractivityModes,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InteractivityEvents {
    pub onhover: ModeToggle,
    pub onclick: ModeToggle,
    pub resize: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModeToggle {
    pub enable: bool,
    pub mode: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InteractivityModes {
    pub grab: GrabMode,
    pub bubble: BubbleMode,
    pub repulse: RepulseMode,
    pub push: ParticleCount,
    pub remove: ParticleCount,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GrabMode {
    pub distance: f64,
    pub line_linked: GrabLine,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GrabLine {
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BubbleMode {
    pub distance: f64,
    pub size: f64,
    pub duration: f64,
    pub opacity: f64,
    pub speed: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RepulseMode {
    pub distance: f64,
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParticleCount {
    pub particles_nb: u32,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            particles: ParticleSettings {
                number: ParticleNumber {
                    value: 100,
                    density: Density {
                        enable: true,
                        value_area: 1_000,
                    },
                },
                color: ColorList {
                    value: vec![
                        "#ffffff".to_string(),
                        "#FFD700".to_string(),
                        "#C0C0C0".to_string(),
                    ],
                },
                shape: Shape {
                    kind: "circle".to_string(),
                    stroke: Stroke {
                        width: 0.0,
                        color: "#000000".to_string(),
                    },
                },
                opacity: OpacitySettings {
                    value: 0.6,
                    random: true,
                    anim: OpacityAnim {
                        enable: true,
                        speed: 1.0,
                        opacity_min: 0.1,
                        sync: false,
                    },
                },
                size: SizeSettings {
                    value: 3.0,
                    random: true,
                    anim: SizeAnim {
                        enable: true,
                        speed: 2.0,
                        size_min: 0.1,
                        sync: false,
                    },
                },
                line_linked: LineLinked {
                    enable: true,
                    distance: 150.0,
                    color: "#ffffff".to_string(),
                    opacity: 0.4,
                    width: 1.0,
                },
                movement: Movement {
                    enable: true,
                    speed: 4.0,
                    direction: "none".to_string(),
                    random: true,
                    straight: false,
                    out_mode: "out".to_string(),
                    bounce: false,
                    attract: Attract {
                        enable: true,
                        rotate_x: 600.0,
                        rotate_y: 1_200.0,
                    },
                },
            },
            interactivity: Interactivity {
                detect_on: "canvas".to_string(),
                events: InteractivityEvents {
                    onhover: ModeToggle {
                        enable: true,
                        mode: "repulse".to_string(),
                    },
                    onclick: ModeToggle {
                        enable: true,
                        mode: "push".to_string(),
                    },
                    resize: true,
                },
                modes: InteractivityModes {
                    grab: GrabMode {
                        distance: 200.0,
                        line_linked: GrabLine { opacity: 1.0 },
                    },
                    bubble: BubbleMode {
                        distance: 300.0,
                        size: 6.0,
                        duration: 2.0,
                        opacity: 8.0,
                        speed: 3.0,
                    },
                    repulse: RepulseMode {
                        distance: 100.0,
                        duration: 0.4,
                    },
                    push: ParticleCount { particles_nb: 4 },
                    remove: ParticleCount { particles_nb: 2 },
                },
            },
            retina_detect: true,
        }
    }
}

impl ParticlesConfig {
    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string(self).map_err(AppError::from)
    }
}

pub struct ParticlesManager {
    renderer: Rc<dyn ParticleRenderer>,
    config: ParticlesConfig,
}

impl ParticlesManager {
    pub fn new(renderer: Rc<dyn ParticleRenderer>, config: ParticlesConfig) -> Self {
        Self { renderer, config }
    }

    /// Returns whether the background was rendered. A missing library is not an error.
    pub fn init(&self) -> Result<bool, AppError> {
        if !self.renderer.is_available() {
            log::debug!("particle library not loaded, skipping background");
            return Ok(false);
        }

        self.renderer.render(PARTICLES_CONTAINER_ID, &self.config)?;
        Ok(true)
    }

    pub fn refresh(&self) {
        if self.renderer.is_available() {
            self.renderer.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeParticles;

    #[test]
    fn config_serializes_to_library_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&ParticlesConfig::default().to_json().expect("serializes"))
                .expect("valid json");

        assert_eq!(json["particles"]["number"]["value"], 100);
        assert_eq!(json["particles"]["line_linked"]["distance"], 150.0);
        assert_eq!(json["particles"]["move"]["speed"], 4.0);
        assert_eq!(json["particles"]["move"]["attract"]["rotateX"], 600.0);
        assert_eq!(json["particles"]["shape"]["type"], "circle");
        assert_eq!(json["particles"]["color"]["value"][1], "#FFD700");
        assert_eq!(json["interactivity"]["events"]["onhover"]["mode"], "repulse");
        assert_eq!(json["interactivity"]["events"]["onclick"]["mode"], "push");
        assert_eq!(json["interactivity"]["modes"]["push"]["particles_nb"], 4);
        assert_eq!(json["retina_detect"], true);
    }

    #[test]
    fn init_renders_into_container_when_library_present() {
        let renderer = Rc::new(FakeParticles::new(true));
        let manager = ParticlesManager::new(renderer.clone(), ParticlesConfig::default());

        assert!(manager.init().expect("renders"));
        manager.refresh();

        let rendered = renderer.rendered();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].0, "particles-js");
        assert_eq!(renderer.refreshes(), 1);
    }

    #[test]
    fn init_is_skipped_without_library() {
        let renderer = Rc::new(FakeParticles::new(false));
        let manager = ParticlesManager::new(renderer.clone(), ParticlesConfig::default());

        assert!(!manager.init().expect("no error"));
        manager.refresh();

        assert!(renderer.rendered().is_empty());
        assert_eq!(renderer.refreshes(), 0);
    }
}
