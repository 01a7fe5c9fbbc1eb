//! One emitter's editing window: identity fields plus the ten property
//! modules, and the record last pulled from them.

use bevy_emitter_data::{DocElement, EmitterRecord, tags};

use crate::modules::{ModuleContext, ModuleSet, PropertyModule};
use crate::surface::UiSurface;

pub struct EmitterWindow {
    id: u32,
    pub name: String,
    pub stop_render: bool,
    marked_for_deletion: bool,
    modules: ModuleSet,
    latest: EmitterRecord,
}

impl EmitterWindow {
    /// Window populated from `record`, with its record already pulled.
    pub fn new(id: u32, record: &EmitterRecord, context: &ModuleContext) -> Self {
        let mut window = Self {
            id,
            name: String::new(),
            stop_render: false,
            marked_for_deletion: false,
            modules: ModuleSet::new(context),
            latest: record.clone(),
        };
        window.load_record(record);
        window.pull_from_modules();
        window
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn modules(&self) -> &ModuleSet {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut ModuleSet {
        &mut self.modules
    }

    /// Overwrite identity and every module from `record`.
    pub fn load_record(&mut self, record: &EmitterRecord) {
        self.name = record.name.clone();
        self.stop_render = record.stop_render;
        self.modules.load_from_record(record);
    }

    /// Rebuild the record from the modules in role order. Only the Base
    /// module's dirty flag is cleared.
    pub fn pull_from_modules(&mut self) {
        let mut record = EmitterRecord::named(self.name.clone());
        record.stop_render = self.stop_render;
        self.modules.store_into_record(&mut record);
        self.latest = record;
        self.modules.base.set_dirty(false);
    }

    /// Record as of the last pull.
    pub fn latest_record(&self) -> &EmitterRecord {
        &self.latest
    }

    pub fn is_any_module_dirty(&self) -> bool {
        self.modules.is_any_dirty()
    }

    pub fn set_all_modules_dirty(&mut self, dirty: bool) {
        self.modules.set_all_dirty(dirty);
    }

    pub fn mark_for_deletion(&mut self) {
        self.marked_for_deletion = true;
    }

    pub fn is_marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }

    pub fn save_element(&self) -> DocElement {
        let mut element = DocElement::new(tags::EMITTER_DATA)
            .with_attr("name", &self.name)
            .with_attr("stopRender", &self.stop_render);
        for child in self.modules.save_elements() {
            element.push_child(child);
        }
        element
    }

    pub fn render(&mut self, ui: &mut dyn UiSurface) {
        let title = format!("Emitter Properties - {}", self.name);
        let mut delete = false;
        ui.push_id(&format!("emitter_{}", self.id), &mut |ui| {
            ui.collapsing("emitter_properties", &title, &mut |ui| {
                let identity = ui.text_field("Emitter Name", &mut self.name)
                    | ui.checkbox("Stop Render", &mut self.stop_render);
                if identity.touched() {
                    self.modules.base.set_dirty(true);
                }

                self.modules.render(ui);

                ui.separator();
                delete |= ui.button("Delete Emitter", true);
            });
        });
        if delete {
            self.mark_for_deletion();
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use bevy_emitter_data::{EmitterShape, record_from_element};

    use super::*;
    use crate::modules::{ModuleRole, test_support};
    use crate::surface::testing::ScriptedSurface;

    fn window(record: &EmitterRecord) -> EmitterWindow {
        EmitterWindow::new(0, record, &test_support::context())
    }

    #[test]
    fn new_window_is_clean_and_pulled() {
        let mut record = EmitterRecord::named("Smoke");
        record.emission_rate = 25.0;
        let window = window(&record);
        assert!(!window.is_any_module_dirty());
        assert_eq!(window.latest_record(), &record);
    }

    #[test]
    fn pull_clears_only_base() {
        let mut window = window(&EmitterRecord::default());
        window.set_all_modules_dirty(true);
        window.pull_from_modules();

        let modules = window.modules();
        assert!(!modules.get(ModuleRole::Base).is_dirty());
        for role in &ModuleRole::ALL[1..] {
            assert!(modules.get(*role).is_dirty(), "{role:?} should stay dirty");
        }
        assert!(window.is_any_module_dirty());
    }

    #[test]
    fn pull_picks_up_module_edits() {
        let mut window = window(&EmitterRecord::default());
        window.modules_mut().emission.rate = 60.0;
        window.modules_mut().shape.shape = EmitterShape::Sphere {
            radius: 2.0,
            from_surface: true,
        };
        assert_eq!(window.latest_record().emission_rate, 10.0);

        window.pull_from_modules();
        assert_eq!(window.latest_record().emission_rate, 60.0);
        assert!(matches!(window.latest_record().shape, EmitterShape::Sphere { .. }));
    }

    #[test]
    fn identity_edits_mark_base_dirty() {
        let mut window = window(&EmitterRecord::named("A"));
        let mut ui = ScriptedSurface::new();
        ui.set_text("Emitter Name", "Embers");
        window.render(&mut ui);

        assert!(ui.drawn.contains(&"Emitter Properties - A".to_string()));
        assert!(window.modules().get(ModuleRole::Base).is_dirty());
        window.pull_from_modules();
        assert_eq!(window.latest_record().name, "Embers");
    }

    #[test]
    fn delete_button_only_marks() {
        let mut window = window(&EmitterRecord::default());
        let mut ui = ScriptedSurface::new();
        ui.press("Delete Emitter");
        window.render(&mut ui);
        assert!(window.is_marked_for_deletion());
    }

    #[test]
    fn saved_element_decodes_to_latest_record() {
        let mut record = EmitterRecord::named("Sparks");
        record.stop_render = true;
        record.max_particles = 12;
        record.lifetime.max = 4.5;
        record.offset = Vec3::new(0.0, 1.5, 0.0);
        let window = window(&record);

        let element = window.save_element();
        assert_eq!(element.children.len(), ModuleRole::ALL.len());
        assert_eq!(record_from_element(&element), record);
    }
}
