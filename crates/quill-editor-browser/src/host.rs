//! `contenteditable` host backed by the document's native command execution.

use quill_editor_core::{FormatCommand, RichTextHost, ToggleFormat};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, HtmlElement};

/// Failures talking to the DOM.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("no global window")]
    NoWindow,

    #[error("no document attached to the window")]
    NoDocument,

    #[error("element #{0} not found")]
    ElementNotFound(String),

    #[error("element #{0} is not an HTML element")]
    NotHtmlElement(String),

    #[error("document does not support editing commands")]
    NotHtmlDocument,

    #[error("DOM call failed: {0}")]
    Js(String),
}

impl From<JsValue> for HostError {
    fn from(value: JsValue) -> Self {
        HostError::Js(format!("{value:?}"))
    }
}

/// Drives a `contenteditable` element through `execCommand`.
#[derive(Clone)]
pub struct BrowserHost {
    element: HtmlElement,
    document: HtmlDocument,
}

impl BrowserHost {
    /// Wrap `element` and make it editable.
    pub fn new(element: HtmlElement) -> Result<Self, HostError> {
        let document = element
            .owner_document()
            .ok_or(HostError::NoDocument)?
            .dyn_into::<HtmlDocument>()
            .map_err(|_| HostError::NotHtmlDocument)?;
        element.set_content_editable("true");
        Ok(Self { element, document })
    }

    /// Look up the editable region by element id.
    pub fn from_id(id: &str) -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| HostError::ElementNotFound(id.to_owned()))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| HostError::NotHtmlElement(id.to_owned()))?;
        Self::new(element)
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    fn exec(&self, name: &str, value: &str) -> bool {
        match self
            .document
            .exec_command_with_show_ui_and_value(name, false, value)
        {
            Ok(true) => true,
            Ok(false) => {
                debug!(command = name, "command unsupported by host");
                false
            }
            Err(err) => {
                debug!(command = name, error = ?err, "command threw");
                false
            }
        }
    }

    fn dom_selection(&self) -> Option<web_sys::Selection> {
        web_sys::window()?.get_selection().ok().flatten()
    }

    /// First selection range, if it lies inside the editable region.
    fn owned_range(&self) -> Option<web_sys::Range> {
        let selection = self.dom_selection()?;
        if selection.range_count() == 0 {
            return None;
        }
        let range = selection.get_range_at(0).ok()?;
        let ancestor = range.common_ancestor_container().ok()?;
        self.element.contains(Some(&ancestor)).then_some(range)
    }

    fn serialize_range(&self, range: &web_sys::Range) -> Result<String, HostError> {
        let fragment = range.clone_contents()?;
        let holder = self.document.create_element("div")?;
        holder.append_child(&fragment)?;
        Ok(holder.inner_html())
    }
}

impl RichTextHost for BrowserHost {
    type Bookmark = web_sys::Range;

    fn execute(&mut self, command: &FormatCommand) -> bool {
        let native = command.native();
        self.exec(native.name, native.value.unwrap_or_default())
    }

    fn insert_html(&mut self, html: &str) -> bool {
        self.exec("insertHTML", html)
    }

    fn query_state(&self, format: ToggleFormat) -> bool {
        self.document
            .query_command_state(format.command_name())
            .unwrap_or(false)
    }

    fn markup(&self) -> String {
        self.element.inner_html()
    }

    fn set_markup(&mut self, markup: &str) {
        self.element.set_inner_html(markup);
    }

    fn selected_markup(&self) -> Option<String> {
        let range = self.owned_range()?;
        if range.collapsed() {
            return None;
        }
        match self.serialize_range(&range) {
            Ok(html) => Some(html),
            Err(err) => {
                warn!(error = %err, "could not serialize selection");
                None
            }
        }
    }

    fn selection(&self) -> Option<web_sys::Range> {
        self.owned_range()
    }

    fn restore_selection(&mut self, bookmark: &web_sys::Range) {
        let Some(selection) = self.dom_selection() else {
            return;
        };
        let restored = selection
            .remove_all_ranges()
            .and_then(|_| selection.add_range(bookmark));
        if let Err(err) = restored {
            warn!(error = %HostError::from(err), "could not restore selection");
        }
    }

    fn focus(&mut self) {
        if let Err(err) = self.element.focus() {
            debug!(error = ?err, "focus failed");
        }
    }
}
