use bevy_egui::egui::Vec2;
use bevy_emitter_data::{DocElement, DualCurve, EmitterRecord, tags};

use super::{ModuleRole, PropertyModule, channel_element, channel_row, module_panel, resolve_closed_editor};
use crate::curve_editor::CurveEditor;
use crate::surface::UiSurface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VelocityChannel {
    X,
    Y,
    Z,
    Drag,
}

impl VelocityChannel {
    fn name(&self) -> &'static str {
        match self {
            Self::X => "Velocity X",
            Self::Y => "Velocity Y",
            Self::Z => "Velocity Z",
            Self::Drag => "Drag",
        }
    }
}

/// Per-axis velocity and drag over the particle's life. Curves are bipolar.
pub struct VelocityOverLifetimeModule {
    pub speed_modifier: f32,
    pub x: DualCurve<f32>,
    pub y: DualCurve<f32>,
    pub z: DualCurve<f32>,
    pub drag_modifier: f32,
    pub drag: DualCurve<f32>,
    curve_editor: Option<CurveEditor<VelocityChannel>>,
    canvas_size: Vec2,
    dirty: bool,
}

impl VelocityOverLifetimeModule {
    pub fn new(canvas_size: Vec2) -> Self {
        let record = EmitterRecord::default();
        Self {
            speed_modifier: record.velocity_modifier,
            x: record.velocity_x,
            y: record.velocity_y,
            z: record.velocity_z,
            drag_modifier: record.drag_modifier,
            drag: record.drag,
            curve_editor: None,
            canvas_size,
            dirty: false,
        }
    }

    pub fn open_curve_editor(&mut self, channel: VelocityChannel) {
        self.curve_editor = Some(CurveEditor::new(channel, channel.name(), true).with_canvas_size(self.canvas_size));
    }
}

impl PropertyModule for VelocityOverLifetimeModule {
    fn role(&self) -> ModuleRole {
        ModuleRole::VelocityOverLifetime
    }

    fn load_from_record(&mut self, record: &EmitterRecord) {
        self.speed_modifier = record.velocity_modifier;
        self.x = record.velocity_x.clone();
        self.y = record.velocity_y.clone();
        self.z = record.velocity_z.clone();
        self.drag_modifier = record.drag_modifier;
        self.drag = record.drag.clone();
    }

    fn store_into_record(&self, record: &mut EmitterRecord) {
        record.velocity_modifier = self.speed_modifier;
        record.velocity_x = self.x.clone();
        record.velocity_y = self.y.clone();
        record.velocity_z = self.z.clone();
        record.drag_modifier = self.drag_modifier;
        record.drag = self.drag.clone();
    }

    fn render_panel(&mut self, ui: &mut dyn UiSurface) {
        resolve_closed_editor(&mut self.curve_editor);

        let mut open = None;
        let mut touch = module_panel(ui, ModuleRole::VelocityOverLifetime, |ui| {
            let mut touch = ui.drag_float("Speed Modifier", &mut self.speed_modifier, 0.5);
            for (channel, name) in [
                (VelocityChannel::X, "X"),
                (VelocityChannel::Y, "Y"),
                (VelocityChannel::Z, "Z"),
            ] {
                if channel_row(ui, name) {
                    open = Some(channel);
                }
            }
            ui.separator();
            touch |= ui.drag_float("Drag Modifier", &mut self.drag_modifier, 0.05);
            if channel_row(ui, "Drag") {
                open = Some(VelocityChannel::Drag);
            }
            touch
        });
        if let Some(channel) = open {
            self.open_curve_editor(channel);
        }

        if let Some(editor) = &mut self.curve_editor {
            let curve = match editor.channel() {
                VelocityChannel::X => &mut self.x,
                VelocityChannel::Y => &mut self.y,
                VelocityChannel::Z => &mut self.z,
                VelocityChannel::Drag => &mut self.drag,
            };
            touch |= editor.show(ui, curve);
        }

        if touch.touched() {
            self.dirty = true;
        }
    }

    fn save_element(&self) -> DocElement {
        DocElement::new(self.role().tag())
            .with_attr("modifier", &self.speed_modifier)
            .with_child(channel_element(tags::VELOCITY_X, None, &self.x))
            .with_child(channel_element(tags::VELOCITY_Y, None, &self.y))
            .with_child(channel_element(tags::VELOCITY_Z, None, &self.z))
            .with_child(channel_element(tags::DRAG, Some(self.drag_modifier), &self.drag))
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
    use bevy_egui::egui::pos2;
    use bevy_emitter_data::{Curve, Keyframe};

    use super::*;
    use crate::curve_editor::DEFAULT_CANVAS_SIZE;
    use crate::surface::testing::ScriptedSurface;

    #[test]
    fn drag_channel_edits_bipolar_values() {
        let mut module = VelocityOverLifetimeModule::new(DEFAULT_CANVAS_SIZE);
        module.drag = DualCurve::single(Curve::linear(-1.0, 1.0));

        let mut ui = ScriptedSurface::new();
        ui.press("Edit Drag Curve");
        module.render_panel(&mut ui);

        // Bottom edge of the canvas is -1 for bipolar curves.
        let mut ui = ScriptedSurface::new();
        ui.open_menu(pos2(200.0, 200.0), Some("Add Key"));
        module.render_panel(&mut ui);

        assert!(module.is_dirty());
        assert_eq!(module.drag.primary().keys()[1], Keyframe::new(0.5, -1.0));
        assert_eq!(module.x, DualCurve::default());
    }

    #[test]
    fn save_layout_matches_channel_tags() {
        let module = VelocityOverLifetimeModule::new(DEFAULT_CANVAS_SIZE);
        let element = module.save_element();
        let tags: Vec<&str> = element.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["VelocityX", "VelocityY", "VelocityZ", "Drag"]);
        assert!(element.has_attr("modifier"));
        assert!(element.child("Drag").is_some_and(|d| d.has_attr("modifier")));
        assert!(element.child("VelocityX").is_some_and(|d| !d.has_attr("modifier")));
    }
}
