use bevy_emitter_data::{DocElement, EmissionMode, EmitterRecord};

use super::{ModuleRole, PropertyModule, enum_combo, module_panel};
use crate::surface::UiSurface;

/// How particles are spawned over time. Only the group for the active mode is
/// shown, but both are kept and saved.
pub struct EmissionModule {
    pub mode: EmissionMode,
    pub rate: f32,
    pub burst_count: i32,
    pub burst_interval: f32,
    dirty: bool,
}

impl Default for EmissionModule {
    fn default() -> Self {
        let record = EmitterRecord::default();
        Self {
            mode: record.emission_mode,
            rate: record.emission_rate,
            burst_count: record.burst_count,
            burst_interval: record.burst_interval,
            dirty: false,
        }
    }
}

impl PropertyModule for EmissionModule {
    fn role(&self) -> ModuleRole {
        ModuleRole::Emission
    }

    fn load_from_record(&mut self, record: &EmitterRecord) {
        self.mode = record.emission_mode;
        self.rate = record.emission_rate;
        self.burst_count = record.burst_count;
        self.burst_interval = record.burst_interval;
    }

    fn store_into_record(&self, record: &mut EmitterRecord) {
        record.emission_mode = self.mode;
        record.emission_rate = self.rate;
        record.burst_count = self.burst_count;
        record.burst_interval = self.burst_interval;
    }

    fn render_panel(&mut self, ui: &mut dyn UiSurface) {
        let touch = module_panel(ui, ModuleRole::Emission, |ui| {
            let mut touch = enum_combo(ui, "Emission Mode", &mut self.mode, &EmissionMode::ALL, EmissionMode::label);
            match self.mode {
                EmissionMode::Constant => {
                    touch |= ui.drag_float("Emission Rate", &mut self.rate, 0.1);
                    self.rate = self.rate.max(0.0);
                }
                EmissionMode::Burst => {
                    touch |= ui.drag_int("Burst Particles", &mut self.burst_count);
                    touch |= ui.drag_float("Burst Interval", &mut self.burst_interval, 0.05);
                    self.burst_count = self.burst_count.max(0);
                    self.burst_interval = self.burst_interval.max(0.0);
                }
            }
            touch
        });
        if touch.touched() {
            self.dirty = true;
        }
    }

    fn save_element(&self) -> DocElement {
        DocElement::new(self.role().tag())
            .with_attr("mode", &self.mode)
            .with_attr("emissionRate", &self.rate)
            .with_attr("numBurstParticles", &self.burst_count)
            .with_attr("burstInterval", &self.burst_interval)
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}
