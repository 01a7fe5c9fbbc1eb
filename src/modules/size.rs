use bevy_egui::egui::Vec2;
use bevy_emitter_data::{DocElement, DualCurve, EmitterRecord, tags};

use super::{ModuleRole, PropertyModule, channel_element, channel_row, module_panel, resolve_closed_editor};
use crate::curve_editor::CurveEditor;
use crate::surface::UiSurface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeChannel {
    X,
    Y,
}

/// Per-axis size multiplier over the particle's life. Curves are unipolar.
pub struct SizeOverLifetimeModule {
    pub x_modifier: f32,
    pub x: DualCurve<f32>,
    pub y_modifier: f32,
    pub y: DualCurve<f32>,
    curve_editor: Option<CurveEditor<SizeChannel>>,
    canvas_size: Vec2,
    dirty: bool,
}

impl SizeOverLifetimeModule {
    pub fn new(canvas_size: Vec2) -> Self {
        let record = EmitterRecord::default();
        Self {
            x_modifier: record.size_x_modifier,
            x: record.size_x,
            y_modifier: record.size_y_modifier,
            y: record.size_y,
            curve_editor: None,
            canvas_size,
            dirty: false,
        }
    }

    pub fn open_curve_editor(&mut self, channel: SizeChannel) {
        let name = match channel {
            SizeChannel::X => "Size X",
            SizeChannel::Y => "Size Y",
        };
        self.curve_editor = Some(CurveEditor::new(channel, name, false).with_canvas_size(self.canvas_size));
    }

    pub fn curve_editor(&self) -> Option<&CurveEditor<SizeChannel>> {
        self.curve_editor.as_ref()
    }
}

impl PropertyModule for SizeOverLifetimeModule {
    fn role(&self) -> ModuleRole {
        ModuleRole::SizeOverLifetime
    }

    fn load_from_record(&mut self, record: &EmitterRecord) {
        self.x_modifier = record.size_x_modifier;
        self.x = record.size_x.clone();
        self.y_modifier = record.size_y_modifier;
        self.y = record.size_y.clone();
    }

    fn store_into_record(&self, record: &mut EmitterRecord) {
        record.size_x_modifier = self.x_modifier;
        record.size_x = self.x.clone();
        record.size_y_modifier = self.y_modifier;
        record.size_y = self.y.clone();
    }

    fn render_panel(&mut self, ui: &mut dyn UiSurface) {
        resolve_closed_editor(&mut self.curve_editor);

        let mut open = None;
        let mut touch = module_panel(ui, ModuleRole::SizeOverLifetime, |ui| {
            let mut touch = ui.drag_float("Size X Modifier", &mut self.x_modifier, 0.05);
            if channel_row(ui, "X") {
                open = Some(SizeChannel::X);
            }
            touch |= ui.drag_float("Size Y Modifier", &mut self.y_modifier, 0.05);
            if channel_row(ui, "Y") {
                open = Some(SizeChannel::Y);
            }
            touch
        });
        if let Some(channel) = open {
            self.open_curve_editor(channel);
        }

        if let Some(editor) = &mut self.curve_editor {
            let curve = match editor.channel() {
                SizeChannel::X => &mut self.x,
                SizeChannel::Y => &mut self.y,
            };
            touch |= editor.show(ui, curve);
        }

        if touch.touched() {
            self.dirty = true;
        }
    }

    fn save_element(&self) -> DocElement {
        DocElement::new(self.role().tag())
            .with_child(channel_element(tags::SIZE_X, Some(self.x_modifier), &self.x))
            .with_child(channel_element(tags::SIZE_Y, Some(self.y_modifier), &self.y))
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}

#[cfg(test)]
mod tests {
    use bevy_emitter_data::{Curve, CurveMode, read_channel};

    use super::*;
    use crate::curve_editor::DEFAULT_CANVAS_SIZE;
    use crate::surface::testing::ScriptedSurface;

    #[test]
    fn opening_another_channel_replaces_the_editor() {
        let mut module = SizeOverLifetimeModule::new(DEFAULT_CANVAS_SIZE);
        let mut ui = ScriptedSurface::new();
        ui.press("Edit X Curve");
        module.render_panel(&mut ui);
        assert_eq!(module.curve_editor().map(|e| e.channel()), Some(SizeChannel::X));

        let mut ui = ScriptedSurface::new();
        ui.press("Edit Y Curve");
        module.render_panel(&mut ui);
        assert_eq!(module.curve_editor().map(|e| e.channel()), Some(SizeChannel::Y));
        assert!(!module.is_dirty());
    }

    #[test]
    fn closed_editor_is_dropped_on_next_render() {
        let mut module = SizeOverLifetimeModule::new(DEFAULT_CANVAS_SIZE);
        module.open_curve_editor(SizeChannel::X);

        let mut ui = ScriptedSurface::new();
        ui.close_window("Curve Editor - Size X");
        module.render_panel(&mut ui);
        assert!(module.curve_editor().is_some_and(|e| !e.is_open()));

        module.render_panel(&mut ScriptedSurface::new());
        assert!(module.curve_editor().is_none());
    }

    #[test]
    fn curve_edits_mark_dirty() {
        let mut module = SizeOverLifetimeModule::new(DEFAULT_CANVAS_SIZE);
        module.open_curve_editor(SizeChannel::Y);
        let mut ui = ScriptedSurface::new();
        ui.select("Curve Mode", 1);
        module.render_panel(&mut ui);

        assert!(module.is_dirty());
        assert_eq!(module.y.mode(), CurveMode::RandomBetweenTwo);
        assert_eq!(module.x.mode(), CurveMode::Single);
    }

    #[test]
    fn channels_save_with_modifiers() {
        let mut module = SizeOverLifetimeModule::new(DEFAULT_CANVAS_SIZE);
        module.x_modifier = 2.0;
        module.x = DualCurve::single(Curve::linear(0.0, 1.0));
        let element = module.save_element();
        let x = element.child(tags::SIZE_X).unwrap();
        assert_eq!(x.attr::<f32>("modifier"), Some(2.0));
        assert_eq!(read_channel::<f32>(x), module.x);
        assert!(element.child(tags::SIZE_Y).is_some());
    }
}
