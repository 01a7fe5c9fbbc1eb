use bevy_emitter_data::{DocElement, EmitterRecord, MAX_ATTRACTORS, PointAttractor, tags};

use super::{ModuleRole, PropertyModule, module_panel};
use crate::surface::{Touch, UiSurface};

/// Point attractors acting on live particles.
#[derive(Default)]
pub struct PhysicsModule {
    pub attractors: Vec<PointAttractor>,
    dirty: bool,
}

impl PhysicsModule {
    pub fn add_attractor(&mut self) -> bool {
        if self.attractors.len() >= MAX_ATTRACTORS {
            return false;
        }
        self.attractors.push(PointAttractor::default());
        true
    }

    pub fn remove_attractor(&mut self, index: usize) -> bool {
        if index >= self.attractors.len() {
            return false;
        }
        self.attractors.remove(index);
        true
    }
}

impl PropertyModule for PhysicsModule {
    fn role(&self) -> ModuleRole {
        ModuleRole::Physics
    }

    fn load_from_record(&mut self, record: &EmitterRecord) {
        self.attractors = record.point_attractors.clone();
    }

    fn store_into_record(&self, record: &mut EmitterRecord) {
        record.point_attractors = self.attractors.clone();
    }

    fn render_panel(&mut self, ui: &mut dyn UiSurface) {
        let touch = module_panel(ui, ModuleRole::Physics, |ui| {
            let mut touch = Touch::NONE;
            let can_add = self.attractors.len() < MAX_ATTRACTORS;
            if ui.button("Add Attractor", can_add) && self.add_attractor() {
                touch |= Touch::CHANGED;
            }

            let mut remove = None;
            for (i, attractor) in self.attractors.iter_mut().enumerate() {
                ui.separator();
                touch |= ui.drag_vec3(&format!("Attractor {i} Offset"), &mut attractor.offset, 0.05);
                touch |= ui.drag_float(&format!("Attractor {i} Strength"), &mut attractor.strength, 0.05);
                if ui.button(&format!("Remove Attractor {i}"), true) {
                    remove = Some(i);
                }
            }
            if let Some(index) = remove
                && self.remove_attractor(index)
            {
                touch |= Touch::CHANGED;
            }
            touch
        });
        if touch.touched() {
            self.dirty = true;
        }
    }

    fn save_element(&self) -> DocElement {
        let mut element = DocElement::new(self.role().tag());
        for attractor in &self.attractors {
            element.push_child(
                DocElement::new(tags::POINT)
                    .with_attr("offset", &attractor.offset)
                    .with_attr("strength", &attractor.strength),
            );
        }
        element
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
    use bevy::prelude::*;

    use super::*;
    use crate::surface::testing::ScriptedSurface;

    #[test]
    fn add_is_capped() {
        let mut module = PhysicsModule::default();
        for _ in 0..MAX_ATTRACTORS {
            let mut ui = ScriptedSurface::new();
            ui.press("Add Attractor");
            module.render_panel(&mut ui);
        }
        assert_eq!(module.attractors.len(), MAX_ATTRACTORS);
        assert!(!module.add_attractor());

        let mut ui = ScriptedSurface::new();
        module.render_panel(&mut ui);
        assert_eq!(ui.disabled, vec!["Add Attractor".to_string()]);
    }

    #[test]
    fn removal_is_applied_after_the_list() {
        let mut module = PhysicsModule::default();
        module.add_attractor();
        module.add_attractor();
        module.attractors[1].strength = 4.0;

        let mut ui = ScriptedSurface::new();
        ui.press("Remove Attractor 0");
        module.render_panel(&mut ui);

        assert!(module.is_dirty());
        assert_eq!(module.attractors.len(), 1);
        assert_eq!(module.attractors[0].strength, 4.0);
    }

    #[test]
    fn attractors_save_as_points() {
        let mut module = PhysicsModule::default();
        module.attractors.push(PointAttractor {
            offset: Vec3::new(1.0, 2.0, 3.0),
            strength: -0.5,
        });
        let element = module.save_element();
        let point = element.child(tags::POINT).unwrap();
        assert_eq!(point.attr_text("offset"), Some("1,2,3"));
        assert_eq!(point.attr::<f32>("strength"), Some(-0.5));
    }
}
