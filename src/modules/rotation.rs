use bevy_egui::egui::Vec2;
use bevy_emitter_data::{DocElement, DualCurve, EmitterRecord, write_channel};

use super::{ModuleRole, PropertyModule, channel_row, module_panel, resolve_closed_editor};
use crate::curve_editor::CurveEditor;
use crate::surface::UiSurface;

/// Spin over the particle's life, in degrees per second scaled by the curve.
pub struct RotationOverLifetimeModule {
    pub modifier: f32,
    pub rotation: DualCurve<f32>,
    curve_editor: Option<CurveEditor<()>>,
    canvas_size: Vec2,
    dirty: bool,
}

impl RotationOverLifetimeModule {
    pub fn new(canvas_size: Vec2) -> Self {
        let record = EmitterRecord::default();
        Self {
            modifier: record.rotation_modifier,
            rotation: record.rotation,
            curve_editor: None,
            canvas_size,
            dirty: false,
        }
    }
}

impl PropertyModule for RotationOverLifetimeModule {
    fn role(&self) -> ModuleRole {
        ModuleRole::RotationOverLifetime
    }

    fn load_from_record(&mut self, record: &EmitterRecord) {
        self.modifier = record.rotation_modifier;
        self.rotation = record.rotation.clone();
    }

    fn store_into_record(&self, record: &mut EmitterRecord) {
        record.rotation_modifier = self.modifier;
        record.rotation = self.rotation.clone();
    }

    fn render_panel(&mut self, ui: &mut dyn UiSurface) {
        resolve_closed_editor(&mut self.curve_editor);

        let mut open = false;
        let mut touch = module_panel(ui, ModuleRole::RotationOverLifetime, |ui| {
            let touch = ui.drag_float("Rotation Modifier", &mut self.modifier, 1.0);
            open = channel_row(ui, "Rotation");
            touch
        });
        if open {
            self.curve_editor = Some(CurveEditor::new((), "Rotation", true).with_canvas_size(self.canvas_size));
        }

        if let Some(editor) = &mut self.curve_editor {
            touch |= editor.show(ui, &mut self.rotation);
        }

        if touch.touched() {
            self.dirty = true;
        }
    }

    fn save_element(&self) -> DocElement {
        let mut element = DocElement::new(self.role().tag()).with_attr("modifier", &self.modifier);
        write_channel(&mut element, &self.rotation);
        element
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}
