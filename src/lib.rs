//! # Bevy Particle Editor
//!
//! An in-game editor for particle effects: each emitter is edited through ten
//! property modules, curve channels get a keyframe editor, and the whole
//! effect is saved as a `*.pfx.ron` document.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_particle_editor::ParticleEditorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ParticleEditorPlugin)
//!         .run();
//! }
//! ```
//!
//! ## Feeding a simulation
//!
//! The editor never owns particles. Read [`RespawnRequested`] to rebuild
//! every emitter and [`EmitterDataChanged`] to update them in place; both
//! carry plain [`EmitterRecord`] copies. [`EditorInputCapture`] is set while a
//! text field has focus.

pub mod browser;
pub mod curve_editor;
pub mod egui_surface;
pub mod emitter_window;
pub mod error;
pub mod file_picker;
pub mod modules;
pub mod particle_editor;
pub mod persistence;
pub mod plugin;
pub mod settings;
pub mod surface;
pub mod theme;

pub use bevy_emitter_data::{DualCurve, EmitterRecord};

pub use emitter_window::EmitterWindow;
pub use error::EditorError;
pub use particle_editor::ParticleEditor;
pub use plugin::{
    CreateEffect, EditorInputCapture, EditorServices, EmitterDataChanged, OpenEffect, ParticleEditorPlugin,
    RespawnRequested,
};
pub use settings::EditorSettings;
