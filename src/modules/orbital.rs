use bevy::prelude::*;
use bevy_egui::egui::Vec2;
use bevy_emitter_data::{DocElement, DualCurve, EmitterRecord, tags};

use super::{ModuleRole, PropertyModule, channel_element, channel_row, module_panel, resolve_closed_editor};
use crate::curve_editor::CurveEditor;
use crate::surface::UiSurface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrbitalChannel {
    Velocity,
    Radius,
}

/// Rotation of particles around the emitter axis over their life.
pub struct OrbitalVelocityModule {
    pub axis: Vec3,
    pub velocity_modifier: f32,
    pub velocity: DualCurve<f32>,
    pub radius_modifier: f32,
    pub radius: DualCurve<f32>,
    curve_editor: Option<CurveEditor<OrbitalChannel>>,
    canvas_size: Vec2,
    dirty: bool,
}

impl OrbitalVelocityModule {
    pub fn new(canvas_size: Vec2) -> Self {
        let record = EmitterRecord::default();
        Self {
            axis: record.orbital_axis,
            velocity_modifier: record.orbital_velocity_modifier,
            velocity: record.orbital_velocity,
            radius_modifier: record.orbital_radius_modifier,
            radius: record.orbital_radius,
            curve_editor: None,
            canvas_size,
            dirty: false,
        }
    }
}

impl PropertyModule for OrbitalVelocityModule {
    fn role(&self) -> ModuleRole {
        ModuleRole::OrbitalVelocityOverLifetime
    }

    fn load_from_record(&mut self, record: &EmitterRecord) {
        self.axis = record.orbital_axis;
        self.velocity_modifier = record.orbital_velocity_modifier;
        self.velocity = record.orbital_velocity.clone();
        self.radius_modifier = record.orbital_radius_modifier;
        self.radius = record.orbital_radius.clone();
    }

    fn store_into_record(&self, record: &mut EmitterRecord) {
        record.orbital_axis = self.axis;
        record.orbital_velocity_modifier = self.velocity_modifier;
        record.orbital_velocity = self.velocity.clone();
        record.orbital_radius_modifier = self.radius_modifier;
        record.orbital_radius = self.radius.clone();
    }

    fn render_panel(&mut self, ui: &mut dyn UiSurface) {
        resolve_closed_editor(&mut self.curve_editor);

        let mut open = None;
        let mut touch = module_panel(ui, ModuleRole::OrbitalVelocityOverLifetime, |ui| {
            let mut touch = ui.drag_vec3("Orbit Axis", &mut self.axis, 0.05);
            touch |= ui.drag_float("Orbital Velocity Modifier", &mut self.velocity_modifier, 0.5);
            if channel_row(ui, "Orbital Velocity") {
                open = Some(OrbitalChannel::Velocity);
            }
            touch |= ui.drag_float("Radius Modifier", &mut self.radius_modifier, 0.05);
            if channel_row(ui, "Radius") {
                open = Some(OrbitalChannel::Radius);
            }
            touch
        });
        if let Some(channel) = open {
            let name = match channel {
                OrbitalChannel::Velocity => "Orbital Velocity",
                OrbitalChannel::Radius => "Orbital Radius",
            };
            self.curve_editor = Some(CurveEditor::new(channel, name, true).with_canvas_size(self.canvas_size));
        }

        if let Some(editor) = &mut self.curve_editor {
            let curve = match editor.channel() {
                OrbitalChannel::Velocity => &mut self.velocity,
                OrbitalChannel::Radius => &mut self.radius,
            };
            touch |= editor.show(ui, curve);
        }

        if touch.touched() {
            self.dirty = true;
        }
    }

    fn save_element(&self) -> DocElement {
        DocElement::new(self.role().tag())
            .with_attr("forward", &self.axis)
            .with_child(channel_element(
                tags::ORBITAL_VELOCITY,
                Some(self.velocity_modifier),
                &self.velocity,
            ))
            .with_child(channel_element(tags::ORBITAL_RADIUS, Some(self.radius_modifier), &self.radius))
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}
