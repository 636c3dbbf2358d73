//! `web_sys` implementations of the element and document seams.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, HtmlFormElement, NodeList};

use crate::dom::{Document, Element};
use crate::error::AppError;

pub(crate) fn dom_error(err: JsValue) -> AppError {
    AppError::Dom(format!("{err:?}"))
}

fn collect_elements(nodes: NodeList) -> Vec<WebElement> {
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(WebElement)
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct WebElement(pub web_sys::Element);

impl WebElement {
    fn html(&self) -> Option<&HtmlElement> {
        self.0.dyn_ref::<HtmlElement>()
    }
}

impl Element for WebElement {
    fn add_class(&self, class: &str) {
        let _ = self.0.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.0.class_list().remove_1(class);
    }

    fn toggle_class(&self, class: &str, force: bool) {
        let _ = self.0.class_list().toggle_with_force(class, force);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn set_style(&self, property: &str, value: &str) {
        let Some(html) = self.html() else {
            return;
        };
        let style = html.style();
        if value.is_empty() {
            let _ = style.remove_property(property);
        } else {
            let _ = style.set_property(property, value);
        }
    }

    fn style(&self, property: &str) -> String {
        self.html()
            .and_then(|html| html.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let _ = self.0.set_attribute(name, value);
    }

    fn remove_attribute(&self, name: &str) {
        let _ = self.0.remove_attribute(name);
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    fn set_inner_html(&self, html: &str) {
        self.0.set_inner_html(html);
    }

    fn offset_top(&self) -> f64 {
        self.html()
            .map(|html| f64::from(html.offset_top()))
            .unwrap_or_default()
    }

    fn offset_height(&self) -> f64 {
        self.html()
            .map(|html| f64::from(html.offset_height()))
            .unwrap_or_default()
    }

    fn children(&self) -> Vec<Self> {
        let children = self.0.children();
        (0..children.length())
            .filter_map(|index| children.item(index))
            .map(WebElement)
            .collect()
    }

    fn query(&self, selector: &str) -> Option<Self> {
        self.0.query_selector(selector).ok().flatten().map(WebElement)
    }

    fn query_all(&self, selector: &str) -> Vec<Self> {
        self.0
            .query_selector_all(selector)
            .map(collect_elements)
            .unwrap_or_default()
    }

    fn append_child(&self, child: &Self) -> Result<(), AppError> {
        self.0
            .append_child(&child.0)
            .map(|_| ())
            .map_err(dom_error)
    }

    fn remove(&self) {
        self.0.remove();
    }

    fn reset(&self) {
        if let Some(form) = self.0.dyn_ref::<HtmlFormElement>() {
            form.reset();
        }
    }
}

pub struct WebDocument(pub web_sys::Document);

impl Document for WebDocument {
    type Element = WebElement;

    fn by_id(&self, id: &str) -> Option<WebElement> {
        self.0.get_element_by_id(id).map(WebElement)
    }

    fn query(&self, selector: &str) -> Option<WebElement> {
        self.0.query_selector(selector).ok().flatten().map(WebElement)
    }

    fn query_all(&self, selector: &str) -> Vec<WebElement> {
        self.0
            .query_selector_all(selector)
            .map(collect_elements)
            .unwrap_or_default()
    }

    fn root(&self) -> Option<WebElement> {
        self.0.document_element().map(WebElement)
    }

    fn head(&self) -> Option<WebElement> {
        self.0.head().map(|head| WebElement(head.into()))
    }

    fn body(&self) -> Option<WebElement> {
        self.0.body().map(|body| WebElement(body.into()))
    }

    fn create_element(&self, tag: &str) -> Result<WebElement, AppError> {
        self.0
            .create_element(tag)
            .map(WebElement)
            .map_err(dom_error)
    }
}
