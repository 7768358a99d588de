//! DOM event wiring for a mounted editor.
//!
//! Listeners forward browser events into the shared `ContentEditor`. Native
//! commands fire `input` synchronously, so listeners skip events that arrive
//! while the editor is already borrowed; the outer call emits the change.
//! After every handled event the toolbar highlighting and the URL dialog are
//! redrawn from the editor's state.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use quill_editor_core::{
    ActiveFormats, ContentEditor, Key, KeyCombo, KeydownResult, Modifiers, TOOLBAR, ToolbarItem,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, KeyboardEvent};

use crate::host::{BrowserHost, HostError};

pub type SharedEditor = Rc<RefCell<ContentEditor<BrowserHost>>>;

/// Convert a DOM keyboard event into a platform-neutral key combination.
pub fn key_combo(event: &KeyboardEvent) -> KeyCombo {
    KeyCombo::with_modifiers(
        Key::from_dom(&event.key()),
        Modifiers {
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            shift: event.shift_key(),
            meta: event.meta_key(),
        },
    )
}

/// Keeps the editable region's listeners alive; dropping detaches them.
pub struct EditorListeners {
    _listeners: Vec<EventListener>,
}

/// Attach input, key and mouse listeners to the editor's region.
///
/// With a `toolbar`, its highlighting follows the cursor.
pub fn attach(editor: &SharedEditor, toolbar: Option<&MountedToolbar>) -> EditorListeners {
    let element = editor.borrow().host().element().clone();
    let view = toolbar.map(|t| t.view.clone());
    let mut listeners = Vec::with_capacity(4);

    let ed = editor.clone();
    listeners.push(EventListener::new(&element, "input", move |_| {
        if let Ok(mut editor) = ed.try_borrow_mut() {
            editor.handle_input();
        }
    }));

    let (ed, v) = (editor.clone(), view.clone());
    listeners.push(EventListener::new(&element, "keyup", move |_| {
        if let Ok(mut editor) = ed.try_borrow_mut() {
            editor.handle_key_up();
            redraw(v.as_deref(), &editor);
        }
    }));

    let (ed, v) = (editor.clone(), view.clone());
    listeners.push(EventListener::new(&element, "mouseup", move |_| {
        if let Ok(mut editor) = ed.try_borrow_mut() {
            editor.handle_mouse_up();
            redraw(v.as_deref(), &editor);
        }
    }));

    let (ed, v) = (editor.clone(), view);
    listeners.push(EventListener::new_with_options(
        &element,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let Ok(mut editor) = ed.try_borrow_mut() else {
                return;
            };
            if editor.handle_keydown(&key_combo(keyboard)) == KeydownResult::Handled {
                event.prevent_default();
                redraw(v.as_deref(), &editor);
            }
        },
    ));

    EditorListeners {
        _listeners: listeners,
    }
}

fn redraw(view: Option<&ToolbarView>, editor: &ContentEditor<BrowserHost>) {
    if let Some(view) = view {
        view.render(editor);
    }
}

/// The URL dialog's elements. Hidden while no dialog is open.
struct PromptDialog {
    root: HtmlElement,
    title: Element,
    input: HtmlInputElement,
    ok: Element,
    cancel: Element,
}

impl PromptDialog {
    fn create(document: &Document) -> Result<Self, HostError> {
        let root = document
            .create_element("div")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| HostError::Js("dialog root is not an HTML element".into()))?;
        root.set_class_name("prompt-dialog");
        root.set_attribute("role", "dialog")?;
        root.set_hidden(true);

        let title = document.create_element("label")?;
        title.set_class_name("prompt-title");

        let input = document
            .create_element("input")?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| HostError::Js("dialog input is not an input element".into()))?;
        input.set_type("url");
        input.set_class_name("prompt-input");

        let ok = dialog_button(document, "OK", "prompt-ok")?;
        let cancel = dialog_button(document, "Cancel", "prompt-cancel")?;

        let children: [&Element; 4] = [&title, input.as_ref(), &ok, &cancel];
        for child in children {
            root.append_child(child)?;
        }
        Ok(Self {
            root,
            title,
            input,
            ok,
            cancel,
        })
    }

    fn render(&self, editor: &ContentEditor<BrowserHost>) {
        match editor.prompt() {
            Some(prompt) => {
                let opening = self.root.hidden();
                self.title.set_text_content(Some(prompt.kind.title()));
                if self.input.value() != prompt.input {
                    self.input.set_value(&prompt.input);
                }
                self.root.set_hidden(false);
                if opening {
                    if let Err(err) = self.input.focus() {
                        tracing::debug!(error = ?err, "dialog focus failed");
                    }
                }
            }
            None => self.root.set_hidden(true),
        }
    }
}

fn dialog_button(document: &Document, label: &str, class: &str) -> Result<Element, HostError> {
    let button = document.create_element("button")?;
    button.set_attribute("type", "button")?;
    button.set_class_name(class);
    button.set_text_content(Some(label));
    Ok(button)
}

/// Toolbar buttons and the dialog, redrawn from editor state.
pub struct ToolbarView {
    buttons: Vec<(Element, ToolbarItem)>,
    dialog: PromptDialog,
}

impl ToolbarView {
    /// Toggle the `active` class to match the editor's toolbar state.
    pub fn sync(&self, active: &ActiveFormats) {
        for (button, item) in &self.buttons {
            let result = if item.is_active(active) {
                button.class_list().add_1("active")
            } else {
                button.class_list().remove_1("active")
            };
            if let Err(err) = result {
                tracing::debug!(error = ?err, "class update failed");
            }
        }
    }

    pub fn render(&self, editor: &ContentEditor<BrowserHost>) {
        self.sync(&editor.toolbar_state());
        self.dialog.render(editor);
    }

    /// Button rendered for `item`, if it is one.
    pub fn button(&self, item: &ToolbarItem) -> Option<&Element> {
        self.buttons
            .iter()
            .find(|(_, candidate)| candidate == item)
            .map(|(button, _)| button)
    }

    pub fn dialog_root(&self) -> &HtmlElement {
        &self.dialog.root
    }

    pub fn dialog_input(&self) -> &HtmlInputElement {
        &self.dialog.input
    }
}

/// A rendered toolbar and its listeners.
pub struct MountedToolbar {
    view: Rc<ToolbarView>,
    _listeners: Vec<EventListener>,
}

impl MountedToolbar {
    pub fn view(&self) -> &ToolbarView {
        &self.view
    }

    pub fn sync(&self, active: &ActiveFormats) {
        self.view.sync(active);
    }

    pub fn render(&self, editor: &ContentEditor<BrowserHost>) {
        self.view.render(editor);
    }
}

/// Render the toolbar buttons and the URL dialog into `container`.
///
/// Buttons act on `mousedown` so the editable region keeps its selection.
pub fn mount_toolbar(container: &Element, editor: &SharedEditor) -> Result<MountedToolbar, HostError> {
    let document = container.owner_document().ok_or(HostError::NoDocument)?;
    let mut buttons = Vec::new();

    for item in TOOLBAR {
        match *item {
            ToolbarItem::Separator => {
                let separator = document.create_element("span")?;
                separator.set_class_name("toolbar-separator");
                container.append_child(&separator)?;
            }
            ToolbarItem::Button { label, title, .. } => {
                let button = document.create_element("button")?;
                button.set_class_name("toolbar-button");
                button.set_attribute("type", "button")?;
                button.set_attribute("title", title)?;
                button.set_text_content(Some(label));
                container.append_child(&button)?;
                buttons.push((button, *item));
            }
        }
    }

    let dialog = PromptDialog::create(&document)?;
    container.append_child(&dialog.root)?;

    let view = Rc::new(ToolbarView { buttons, dialog });
    let mut listeners = Vec::new();

    for (button, item) in &view.buttons {
        let Some(action) = item.action() else {
            continue;
        };
        let (ed, v) = (editor.clone(), view.clone());
        listeners.push(EventListener::new_with_options(
            button,
            "mousedown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                if let Ok(mut editor) = ed.try_borrow_mut() {
                    editor.press(action);
                    v.render(&editor);
                }
            },
        ));
    }

    let (ed, v) = (editor.clone(), view.clone());
    listeners.push(EventListener::new(&view.dialog.input, "input", move |_| {
        if let Ok(mut editor) = ed.try_borrow_mut() {
            editor.set_prompt_input(v.dialog.input.value());
        }
    }));

    let (ed, v) = (editor.clone(), view.clone());
    listeners.push(EventListener::new_with_options(
        &view.dialog.input,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let Ok(mut editor) = ed.try_borrow_mut() else {
                return;
            };
            match Key::from_dom(&keyboard.key()) {
                Key::Enter => {
                    editor.set_prompt_input(v.dialog.input.value());
                    editor.resolve_prompt();
                }
                Key::Escape => {
                    editor.cancel_prompt();
                }
                _ => return,
            }
            event.prevent_default();
            v.render(&editor);
        },
    ));

    let (ed, v) = (editor.clone(), view.clone());
    listeners.push(EventListener::new(&view.dialog.ok, "click", move |_| {
        if let Ok(mut editor) = ed.try_borrow_mut() {
            editor.set_prompt_input(v.dialog.input.value());
            editor.resolve_prompt();
            v.render(&editor);
        }
    }));

    let (ed, v) = (editor.clone(), view.clone());
    listeners.push(EventListener::new(&view.dialog.cancel, "click", move |_| {
        if let Ok(mut editor) = ed.try_borrow_mut() {
            editor.cancel_prompt();
            v.render(&editor);
        }
    }));

    view.render(&editor.borrow());

    Ok(MountedToolbar {
        view,
        _listeners: listeners,
    })
}
