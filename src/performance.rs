use std::rc::Rc;
use std::time::Duration;

use crate::config::PerformanceSettings;
use crate::dom::{Document, Element};
use crate::error::AppError;
use crate::platform::{ObserverFactory, ObserverOptions, VisibilityObserver};

const LAZY_IMAGE_SELECTOR: &str = "img[data-src]";
const DEFERRED_SOURCE_ATTRIBUTE: &str = "data-src";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadReport {
    Normal(Duration),
    Slow(Duration),
}

fn load_image<E: Element>(image: &E) {
    if let Some(source) = image.attribute(DEFERRED_SOURCE_ATTRIBUTE) {
        image.set_attribute("src", &source);
        image.remove_attribute(DEFERRED_SOURCE_ATTRIBUTE);
    }
}

pub struct PerformanceManager<E: Element> {
    document: Rc<dyn Document<Element = E>>,
    observer: Option<Rc<dyn VisibilityObserver<E>>>,
    settings: PerformanceSettings,
}

impl<E: Element> PerformanceManager<E> {
    pub fn new(
        document: Rc<dyn Document<Element = E>>,
        observers: &dyn ObserverFactory<E>,
        settings: PerformanceSettings,
    ) -> Self {
        let observer = observers.create(&ObserverOptions::default());
        Self {
            document,
            observer,
            settings,
        }
    }

    pub fn init(&self) -> Result<(), AppError> {
        self.lazy_load_images();
        self.preload_resources()?;
        Ok(())
    }

    /// Returns how many images were deferred or loaded.
    pub fn lazy_load_images(&self) -> usize {
        let images = self.document.query_all(LAZY_IMAGE_SELECTOR);

        for image in &images {
            match &self.observer {
                Some(observer) => {
                    observer.observe_once(image, Box::new(|image: E| load_image(&image)));
                }
                None => load_image(image),
            }
        }

        images.len()
    }

    pub fn preload_resources(&self) -> Result<usize, AppError> {
        let head = self
            .document
            .head()
            .ok_or_else(|| AppError::missing("head"))?;

        for url in &self.settings.preload_urls {
            let link = self.document.create_element("link")?;
            link.set_attribute("rel", "preload");
            link.set_attribute("as", "style");
            link.set_attribute("href", url);
            head.append_child(&link)?;
        }

        Ok(self.settings.preload_urls.len())
    }

    pub fn record_load_time(&self, load_time: Duration) -> LoadReport {
        log::info!("page load time: {}ms", load_time.as_millis());

        if load_time > self.settings.slow_load_threshold {
            log::warn!("page load time is high, consider optimizing resources");
            LoadReport::Slow(load_time)
        } else {
            LoadReport::Normal(load_time)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::testing::{FakeElement, Harness};

    fn manager(harness: &Harness) -> PerformanceManager<FakeElement> {
        PerformanceManager::new(
            harness.document.clone(),
            harness.observers.as_ref(),
            AppConfig::default().performance,
        )
    }

    fn lazy_image(source: &str) -> FakeElement {
        FakeElement::new("img").with_attr("data-src", source)
    }

    #[test]
    fn images_load_when_they_become_visible() {
        let harness = Harness::new();
        let images = vec![lazy_image("/a.png"), lazy_image("/b.png")];
        harness.document.add_selector("img[data-src]", images.clone());

        assert_eq!(manager(&harness).lazy_load_images(), 2);
        assert_eq!(images[0].attribute("src"), None);

        assert!(harness.observers.enter(&images[0]));

        assert_eq!(images[0].attribute("src").as_deref(), Some("/a.png"));
        assert_eq!(images[0].attribute("data-src"), None);
        assert_eq!(images[1].attribute("src"), None);
        assert!(!harness.observers.enter(&images[0]));
    }

    #[test]
    fn images_load_immediately_without_intersection_support() {
        let harness = Harness::with_intersection(false);
        let images = vec![lazy_image("/a.png")];
        harness.document.add_selector("img[data-src]", images.clone());

        manager(&harness).lazy_load_images();

        assert_eq!(images[0].attribute("src").as_deref(), Some("/a.png"));
        assert_eq!(images[0].attribute("data-src"), None);
    }

    #[test]
    fn preload_links_are_appended_to_head() {
        let harness = Harness::new();

        assert_eq!(manager(&harness).preload_resources().expect("head present"), 2);

        let links = harness.document.head_element().children();
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|link| link.tag() == "link"
            && link.attribute("rel").as_deref() == Some("preload")
            && link.attribute("as").as_deref() == Some("style")));
        assert!(links[1]
            .attribute("href")
            .expect("href")
            .contains("font-awesome/6.0.0"));
    }

    #[test]
    fn slow_load_is_reported_past_threshold() {
        let harness = Harness::new();
        let manager = manager(&harness);

        assert_eq!(
            manager.record_load_time(Duration::from_millis(3_000)),
            LoadReport::Normal(Duration::from_millis(3_000))
        );
        assert_eq!(
            manager.record_load_time(Duration::from_millis(3_001)),
            LoadReport::Slow(Duration::from_millis(3_001))
        );
    }
}
