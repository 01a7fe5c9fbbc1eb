use std::path::PathBuf;
use std::sync::Arc;

use bevy::prelude::*;
use bevy_emitter_data::{BlendMode, DEFAULT_TEXTURE, DocElement, EmitterRecord, RenderMode};

use super::{ModuleRole, PropertyModule, enum_combo, module_panel};
use crate::file_picker::{FilePicker, TEXTURE_EXTENSIONS};
use crate::surface::{Touch, UiSurface};

/// How particles are drawn: facing, texture, sprite sheet and blending.
pub struct RendererModule {
    pub render_mode: RenderMode,
    pub texture: String,
    pub sprite_sheet: bool,
    pub sprite_grid: IVec2,
    pub blend_mode: BlendMode,
    pub sort_particles: bool,
    picker: Arc<dyn FilePicker>,
    texture_dir: PathBuf,
    dirty: bool,
}

impl RendererModule {
    pub fn new(picker: Arc<dyn FilePicker>, texture_dir: PathBuf) -> Self {
        let record = EmitterRecord::default();
        Self {
            render_mode: record.render_mode,
            texture: record.texture,
            sprite_sheet: record.sprite_sheet,
            sprite_grid: record.sprite_grid,
            blend_mode: record.blend_mode,
            sort_particles: record.sort_particles,
            picker,
            texture_dir,
            dirty: false,
        }
    }

    /// Ask the picker for a texture. A cancelled dialog resets to the default
    /// texture.
    pub fn select_texture(&mut self) {
        self.texture = self
            .picker
            .pick_file("Select Texture", &self.texture_dir, TEXTURE_EXTENSIONS)
            .map(|path| path.to_string_lossy().into_owned())
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| DEFAULT_TEXTURE.to_string());
    }

    pub fn clear_texture(&mut self) {
        self.texture = DEFAULT_TEXTURE.to_string();
    }
}

impl PropertyModule for RendererModule {
    fn role(&self) -> ModuleRole {
        ModuleRole::Renderer
    }

    fn load_from_record(&mut self, record: &EmitterRecord) {
        self.render_mode = record.render_mode;
        self.texture = record.texture.clone();
        self.sprite_sheet = record.sprite_sheet;
        self.sprite_grid = record.sprite_grid;
        self.blend_mode = record.blend_mode;
        self.sort_particles = record.sort_particles;
    }

    fn store_into_record(&self, record: &mut EmitterRecord) {
        record.render_mode = self.render_mode;
        record.texture = self.texture.clone();
        record.sprite_sheet = self.sprite_sheet;
        record.sprite_grid = self.sprite_grid;
        record.blend_mode = self.blend_mode;
        record.sort_particles = self.sort_particles;
    }

    fn render_panel(&mut self, ui: &mut dyn UiSurface) {
        let touch = module_panel(ui, ModuleRole::Renderer, |ui| {
            let mut touch = enum_combo(ui, "Render Mode", &mut self.render_mode, &RenderMode::ALL, RenderMode::label);
            ui.label(&format!("Texture - \"{}\"", self.texture));

            let mut select = false;
            let mut clear = false;
            ui.horizontal(&mut |ui| {
                select = ui.button("Select Texture", true);
                clear = ui.button("Clear Texture", true);
            });
            if select {
                self.select_texture();
                touch |= Touch::CHANGED;
            } else if clear {
                self.clear_texture();
                touch |= Touch::CHANGED;
            }

            touch |= ui.checkbox("Is Sprite Sheet", &mut self.sprite_sheet);
            if self.sprite_sheet {
                touch |= ui.drag_int2("Sprite Dimensions", &mut self.sprite_grid);
                self.sprite_grid = self.sprite_grid.max(IVec2::ONE);
            }
            touch |= enum_combo(ui, "Blend Mode", &mut self.blend_mode, &BlendMode::ALL, BlendMode::label);
            touch |= ui.checkbox("Sort Particles", &mut self.sort_particles);
            touch
        });
        if touch.touched() {
            self.dirty = true;
        }
    }

    fn save_element(&self) -> DocElement {
        DocElement::new(self.role().tag())
            .with_attr("mode", &self.render_mode)
            .with_attr("texture", &self.texture)
            .with_attr("isSpriteSheet", &self.sprite_sheet)
            .with_attr("dimensions", &self.sprite_grid)
            .with_attr("blend", &self.blend_mode)
            .with_attr("sortParticles", &self.sort_particles)
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
    use super::*;
    use crate::modules::test_support::QueuedPicker;
    use crate::surface::testing::ScriptedSurface;

    fn module(answers: Vec<Option<PathBuf>>) -> RendererModule {
        RendererModule::new(QueuedPicker::with(answers), PathBuf::from("assets/textures"))
    }

    #[test]
    fn picked_texture_is_stored() {
        let mut module = module(vec![Some(PathBuf::from("assets/textures/smoke.png"))]);
        let mut ui = ScriptedSurface::new();
        ui.press("Select Texture");
        module.render_panel(&mut ui);
        assert!(module.is_dirty());
        assert_eq!(module.texture, "assets/textures/smoke.png");

        let mut ui = ScriptedSurface::new();
        module.render_panel(&mut ui);
        assert!(ui.drawn.contains(&"Texture - \"assets/textures/smoke.png\"".to_string()));
    }

    #[test]
    fn cancel_and_clear_reset_to_default() {
        let mut module = module(vec![None]);
        module.texture = "fire.png".into();
        module.select_texture();
        assert_eq!(module.texture, DEFAULT_TEXTURE);

        module.texture = "fire.png".into();
        let mut ui = ScriptedSurface::new();
        ui.press("Clear Texture");
        module.render_panel(&mut ui);
        assert_eq!(module.texture, DEFAULT_TEXTURE);
    }

    #[test]
    fn sprite_dimensions_only_when_sheet() {
        let mut module = module(Vec::new());
        let mut ui = ScriptedSurface::new();
        ui.set_int2("Sprite Dimensions", IVec2::new(4, 4));
        module.render_panel(&mut ui);
        assert_eq!(module.sprite_grid, IVec2::ONE);

        let mut ui = ScriptedSurface::new();
        ui.set_bool("Is Sprite Sheet", true).set_int2("Sprite Dimensions", IVec2::new(4, 0));
        module.render_panel(&mut ui);
        assert_eq!(module.sprite_grid, IVec2::new(4, 1));
    }

    #[test]
    fn save_uses_labels() {
        let mut module = module(Vec::new());
        module.blend_mode = BlendMode::Additive;
        module.render_mode = RenderMode::HorizontalBillboard;
        let element = module.save_element();
        assert_eq!(element.attr_text("blend"), Some("Additive"));
        assert_eq!(element.attr_text("mode"), Some("HorizontalBillboard"));
        assert_eq!(element.attr_text("dimensions"), Some("1,1"));
        assert_eq!(element.attr_text("texture"), Some(DEFAULT_TEXTURE));
    }
}
