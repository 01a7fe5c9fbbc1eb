use bevy::prelude::*;
use bevy_emitter_data::{DocElement, EmitterRecord, FloatRange, SimSpace};

use super::{ModuleRole, PropertyModule, enum_combo, module_panel};
use crate::surface::UiSurface;

/// Spawn-time parameters shared by every particle of the emitter.
pub struct BaseModule {
    pub max_particles: i32,
    pub lifetime: FloatRange,
    pub speed: FloatRange,
    pub size: FloatRange,
    pub rotation: FloatRange,
    pub start_color: LinearRgba,
    pub gravity_scale: i32,
    pub draw_order: i32,
    pub offset: Vec3,
    pub simulation_space: SimSpace,
    dirty: bool,
}

impl Default for BaseModule {
    fn default() -> Self {
        let mut module = Self {
            max_particles: 0,
            lifetime: FloatRange::default(),
            speed: FloatRange::default(),
            size: FloatRange::default(),
            rotation: FloatRange::default(),
            start_color: LinearRgba::WHITE,
            gravity_scale: 0,
            draw_order: 0,
            offset: Vec3::ZERO,
            simulation_space: SimSpace::Local,
            dirty: false,
        };
        module.load_from_record(&EmitterRecord::default());
        module
    }
}

impl PropertyModule for BaseModule {
    fn role(&self) -> ModuleRole {
        ModuleRole::Base
    }

    fn load_from_record(&mut self, record: &EmitterRecord) {
        self.max_particles = record.max_particles;
        self.lifetime = record.lifetime;
        self.speed = record.start_speed;
        self.size = record.start_size;
        self.rotation = record.start_rotation_degrees;
        self.start_color = record.start_color;
        self.gravity_scale = record.gravity_scale;
        self.draw_order = record.draw_order;
        self.offset = record.offset;
        self.simulation_space = record.simulation_space;
    }

    fn store_into_record(&self, record: &mut EmitterRecord) {
        record.max_particles = self.max_particles;
        record.lifetime = self.lifetime;
        record.start_speed = self.speed;
        record.start_size = self.size;
        record.start_rotation_degrees = self.rotation;
        record.start_color = self.start_color;
        record.gravity_scale = self.gravity_scale;
        record.draw_order = self.draw_order;
        record.offset = self.offset;
        record.simulation_space = self.simulation_space;
    }

    fn render_panel(&mut self, ui: &mut dyn UiSurface) {
        let touch = module_panel(ui, ModuleRole::Base, |ui| {
            let mut touch = ui.drag_int("Max Particles", &mut self.max_particles);
            self.max_particles = self.max_particles.max(0);
            touch |= ui.drag_float_range("Lifetime", &mut self.lifetime.min, &mut self.lifetime.max, 0.05);
            touch |= ui.drag_float_range("Speed", &mut self.speed.min, &mut self.speed.max, 0.05);
            touch |= ui.drag_float_range("Size", &mut self.size.min, &mut self.size.max, 0.01);
            touch |= ui.drag_float_range("Rotation", &mut self.rotation.min, &mut self.rotation.max, 1.0);
            touch |= ui.color_rgba("Start Color", &mut self.start_color);
            touch |= ui.drag_int("Gravity Scale", &mut self.gravity_scale);
            touch |= ui.drag_vec3("Offset From Base Position", &mut self.offset, 0.05);
            touch |= ui.drag_int("Draw Order", &mut self.draw_order);
            touch |= enum_combo(
                ui,
                "Simulation Space",
                &mut self.simulation_space,
                &SimSpace::ALL,
                SimSpace::label,
            );
            touch
        });
        if touch.touched() {
            self.dirty = true;
        }
    }

    fn save_element(&self) -> DocElement {
        DocElement::new(self.role().tag())
            .with_attr("order", &self.draw_order)
            .with_attr("offset", &self.offset)
            .with_attr("maxParticles", &self.max_particles)
            .with_attr("lifetime", &self.lifetime)
            .with_attr("speed", &self.speed)
            .with_attr("size", &self.size)
            .with_attr("rotation", &self.rotation)
            .with_attr("startColor", &self.start_color)
            .with_attr("gravity", &self.gravity_scale)
            .with_attr("simspace", &self.simulation_space)
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}
