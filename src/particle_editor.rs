//! The particle system editor: an ordered list of emitter windows bound to
//! one effect document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy::prelude::*;
use bevy_emitter_data::{DocElement, EmitterRecord, records_from_document, tags};

use crate::emitter_window::EmitterWindow;
use crate::error::Result;
use crate::modules::ModuleContext;
use crate::persistence::{DocumentStore, effect_name};
use crate::surface::UiSurface;
use crate::theme::colors;

#[derive(Resource)]
pub struct ParticleEditor {
    path: PathBuf,
    store: Arc<dyn DocumentStore>,
    context: ModuleContext,
    windows: Vec<EmitterWindow>,
    next_window_id: u32,
    /// World position the effect is previewed at.
    pub spawn_position: Vec3,
    respawn: bool,
    input_captured: bool,
    last_error: Option<String>,
}

impl ParticleEditor {
    /// Editor with one window per record. Nothing is written.
    pub fn from_records(
        path: impl Into<PathBuf>,
        records: &[EmitterRecord],
        store: Arc<dyn DocumentStore>,
        context: ModuleContext,
    ) -> Self {
        let mut editor = Self {
            path: path.into(),
            store,
            context,
            windows: Vec::new(),
            next_window_id: 0,
            spawn_position: Vec3::ZERO,
            respawn: false,
            input_captured: false,
            last_error: None,
        };
        for record in records {
            editor.push_window(record);
        }
        editor
    }

    /// Load an existing effect document.
    pub fn open(path: impl Into<PathBuf>, store: Arc<dyn DocumentStore>, context: ModuleContext) -> Result<Self> {
        let path = path.into();
        let root = store.read(&path)?;
        let records = records_from_document(&root)?;
        info!("Opened effect {:?} with {} emitter(s)", path, records.len());
        Ok(Self::from_records(path, &records, store, context))
    }

    /// Start a new effect with a single default emitter and write it out.
    pub fn create(path: impl Into<PathBuf>, store: Arc<dyn DocumentStore>, context: ModuleContext) -> Result<Self> {
        let path = path.into();
        let mut editor = Self::from_records(path, &[EmitterRecord::default()], store, context);
        editor.save()?;
        info!("Created effect {:?}", editor.path);
        Ok(editor)
    }

    fn push_window(&mut self, record: &EmitterRecord) {
        self.windows
            .push(EmitterWindow::new(self.next_window_id, record, &self.context));
        self.next_window_id += 1;
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn effect_name(&self) -> String {
        effect_name(&self.path)
    }

    pub fn windows(&self) -> &[EmitterWindow] {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut [EmitterWindow] {
        &mut self.windows
    }

    /// Append a default emitter, save, and ask for a respawn.
    pub fn add_emitter(&mut self) -> Result<()> {
        self.push_window(&EmitterRecord::default());
        self.respawn = true;
        self.save()
    }

    /// Remove the first window marked for deletion, then save and ask for a
    /// respawn. At most one window goes per call. Returns whether one was
    /// removed.
    pub fn remove_marked_emitters(&mut self) -> Result<bool> {
        let Some(index) = self.windows.iter().position(EmitterWindow::is_marked_for_deletion) else {
            return Ok(false);
        };
        self.windows.remove(index);
        self.respawn = true;
        self.save()?;
        Ok(true)
    }

    /// Pull every window and write the whole document.
    pub fn save(&mut self) -> Result<()> {
        for window in &mut self.windows {
            window.pull_from_modules();
        }
        self.store.write(&self.path, &self.document())?;
        self.last_error = None;
        info!("Saved effect {:?}", self.path);
        Ok(())
    }

    /// Document root for the current windows, in order.
    pub fn document(&self) -> DocElement {
        let mut root = DocElement::new(tags::PARTICLE_SYSTEM);
        for window in &self.windows {
            root.push_child(window.save_element());
        }
        root
    }

    pub fn is_editor_data_dirty(&self) -> bool {
        self.windows.iter().any(EmitterWindow::is_any_module_dirty)
    }

    pub fn set_editor_data_dirty(&mut self, dirty: bool) {
        for window in &mut self.windows {
            window.set_all_modules_dirty(dirty);
        }
    }

    /// Pull every window and return copies of the fresh records.
    pub fn latest_emitter_data(&mut self) -> Vec<EmitterRecord> {
        self.windows
            .iter_mut()
            .map(|window| {
                window.pull_from_modules();
                window.latest_record().clone()
            })
            .collect()
    }

    pub fn request_respawn(&mut self) {
        self.respawn = true;
    }

    /// Whether the emitter set changed shape since the last call.
    pub fn take_respawn_request(&mut self) -> bool {
        std::mem::take(&mut self.respawn)
    }

    /// A text field held keyboard focus during the last render.
    pub fn input_captured(&self) -> bool {
        self.input_captured
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn record_error(&mut self, context: &str, error: &crate::error::EditorError) {
        error!("{}: {}", context, error);
        self.last_error = Some(format!("{context}: {error}"));
    }

    pub fn render(&mut self, ui: &mut dyn UiSurface) {
        ui.drag_vec3("Position", &mut self.spawn_position, 0.05);

        for window in &mut self.windows {
            window.render(ui);
        }

        ui.separator();
        let mut save = false;
        let mut add = false;
        ui.horizontal(&mut |ui| {
            save = ui.button("Save", true);
            add = ui.button("Add Emitter", true);
        });
        if save && let Err(e) = self.save() {
            self.record_error("Failed to save effect", &e);
        }
        if add && let Err(e) = self.add_emitter() {
            self.record_error("Failed to save effect", &e);
        }

        if let Some(message) = &self.last_error {
            ui.colored_label(message, colors::STATUS_ERROR);
        }

        self.input_captured = ui.text_focused();
    }
}
