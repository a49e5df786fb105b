use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

use initmusic_core::{AttributeSource, FieldSink};

pub(crate) fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub(crate) fn element_by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub(crate) fn query(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub(crate) fn meta_content(name: &str) -> Option<String> {
    let selector = format!("meta[name=\"{name}\"]");
    let meta = document()?.query_selector(&selector).ok().flatten()?;
    meta.get_attribute("content")
}

/// Nearest element (self included) from the event target matching `selector`.
pub(crate) fn closest_from_event(event: &Event, selector: &str) -> Option<Element> {
    let target = event.target()?;
    let element = match target.dyn_into::<Element>() {
        Ok(element) => element,
        Err(target) => target.dyn_into::<web_sys::Node>().ok()?.parent_element()?,
    };
    element.closest(selector).ok().flatten()
}

pub(crate) fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub(crate) fn set_text(element: &Element, text: &str) {
    element.set_text_content(Some(text));
}

pub(crate) fn input_value(id: &str) -> Option<String> {
    let element = element_by_id(id)?;
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    element
        .dyn_ref::<HtmlTextAreaElement>()
        .map(|area| area.value())
}

pub(crate) fn set_input_value(element: &Element, value: &str) -> bool {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
        return true;
    }
    if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.set_value(value);
        return true;
    }
    element.set_attribute("value", value).is_ok()
}

pub(crate) fn focus(element: &Element) {
    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        if let Err(err) = element.focus() {
            gloo::console::warn!("dom: focus failed", js_err(err));
        }
    }
}

pub(crate) fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        if let Some(message) = error.message().as_string() {
            return message;
        }
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    "js error".to_string()
}

pub(crate) struct ElementAttributes<'a>(pub(crate) &'a Element);

impl AttributeSource for ElementAttributes<'_> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }
}

/// Writes form fields by element id in the current document.
pub(crate) struct DocumentFields {
    document: Option<Document>,
}

impl DocumentFields {
    pub(crate) fn new() -> Self {
        Self {
            document: document(),
        }
    }
}

impl FieldSink for DocumentFields {
    fn set_field(&mut self, id: &str, value: &str) -> bool {
        let Some(element) = self
            .document
            .as_ref()
            .and_then(|document| document.get_element_by_id(id))
        else {
            return false;
        };
        set_input_value(&element, value)
    }
}
