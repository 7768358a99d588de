//! Browser DOM layer for the quill editor widget.
//!
//! Provides a `RichTextHost` over a `contenteditable` element and the DOM
//! listeners that feed browser events into a `ContentEditor`. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! - `host`: native command execution, selection bookmarks, markup access
//! - `events`: input/key/mouse listeners, toolbar mounting and the URL dialog
//!
//! This crate re-exports `quill-editor-core`, so consumers only need to
//! depend on `quill-editor-browser`.

pub use quill_editor_core;
pub use quill_editor_core::*;

pub mod events;
pub mod host;

pub use events::{
    EditorListeners, MountedToolbar, SharedEditor, ToolbarView, attach, key_combo, mount_toolbar,
};
pub use host::{BrowserHost, HostError};
