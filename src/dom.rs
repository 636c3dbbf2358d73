//! Element and document seams.
//!
//! Every manager talks to the page through these two traits so the same
//! behavior runs against `web_sys` in the browser and against in-memory
//! fakes under `cargo test`.

use crate::error::AppError;

pub trait Element: Clone + PartialEq + 'static {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn toggle_class(&self, class: &str, force: bool);
    fn has_class(&self, class: &str) -> bool;

    /// Sets one inline style property. An empty value clears it.
    fn set_style(&self, property: &str, value: &str);
    fn style(&self, property: &str) -> String;

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);

    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    fn inner_html(&self) -> String;
    fn set_inner_html(&self, html: &str);

    fn offset_top(&self) -> f64;
    fn offset_height(&self) -> f64;

    fn children(&self) -> Vec<Self>;
    fn query(&self, selector: &str) -> Option<Self>;
    fn query_all(&self, selector: &str) -> Vec<Self>;
    fn append_child(&self, child: &Self) -> Result<(), AppError>;
    fn remove(&self);

    /// Resets form controls. Non-form elements ignore it.
    fn reset(&self);

    fn set_disabled(&self, disabled: bool) {
        if disabled {
            self.set_attribute("disabled", "");
        } else {
            self.remove_attribute("disabled");
        }
    }

    fn is_disabled(&self) -> bool {
        self.attribute("disabled").is_some()
    }
}

pub trait Document {
    type Element: Element;

    fn by_id(&self, id: &str) -> Option<Self::Element>;
    fn query(&self, selector: &str) -> Option<Self::Element>;
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;
    fn root(&self) -> Option<Self::Element>;
    fn head(&self) -> Option<Self::Element>;
    fn body(&self) -> Option<Self::Element>;
    fn create_element(&self, tag: &str) -> Result<Self::Element, AppError>;

    fn require_id(&self, id: &str) -> Result<Self::Element, AppError> {
        self.by_id(id)
            .ok_or_else(|| AppError::missing(&format!("#{id}")))
    }
}
