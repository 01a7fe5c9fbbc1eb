use bevy::prelude::*;
use bevy_egui::egui::{Color32, Rect, pos2, vec2};
use bevy_emitter_data::{CurveMode, CurveSelector, DocElement, DualCurve, EmitterRecord, write_channel};

use super::{ModuleRole, PropertyModule, enum_combo, module_panel};
use crate::surface::{Touch, UiSurface};

const GRADIENT_SIZE: bevy_egui::egui::Vec2 = vec2(300.0, 16.0);
const GRADIENT_STEPS: usize = 32;
/// Time offset of a key appended after the last one.
const APPEND_STEP: f32 = 0.01;

pub(crate) fn to_color32(color: LinearRgba) -> Color32 {
    let [r, g, b, a] = Srgba::from(color).to_u8_array();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Tint over the particle's life, edited as a list of color keys.
pub struct ColorOverLifetimeModule {
    pub color: DualCurve<LinearRgba>,
    dirty: bool,
}

impl Default for ColorOverLifetimeModule {
    fn default() -> Self {
        Self {
            color: EmitterRecord::default().color,
            dirty: false,
        }
    }
}

impl ColorOverLifetimeModule {
    /// Append a copy of the selected curve's last key just after it.
    pub fn append_key(&mut self, selector: CurveSelector) -> bool {
        let Some(last) = self.color.curve(selector).keys().last().copied() else {
            return false;
        };
        self.color.add_key(selector, last.time + APPEND_STEP, last.value)
    }

    fn draw_gradient(&self, ui: &mut dyn UiSurface) {
        let rect = ui.canvas(GRADIENT_SIZE);
        let step = rect.width() / GRADIENT_STEPS as f32;
        for i in 0..GRADIENT_STEPS {
            let t = (i as f32 + 0.5) / GRADIENT_STEPS as f32;
            let x = rect.min.x + step * i as f32;
            let segment = Rect::from_min_max(pos2(x, rect.min.y), pos2(x + step, rect.max.y));
            ui.paint_rect(segment, to_color32(self.color.primary().sample(t)));
        }
    }

    fn key_rows(&mut self, ui: &mut dyn UiSurface, selector: CurveSelector) -> Touch {
        let suffix = match selector {
            CurveSelector::Primary => "",
            CurveSelector::Secondary => " (Curve Two)",
        };
        let mut touch = Touch::NONE;
        let mut delete = None;

        let keys = self.color.curve(selector).keys().to_vec();
        for (i, key) in keys.iter().enumerate() {
            let mut value = key.value;
            let mut time = key.time;
            let mut row = ui.color_rgba(&format!("Key {i} Color{suffix}"), &mut value);
            row |= ui.slider(&format!("Key {i} Time{suffix}"), &mut time, 0.0, 1.0);
            if row.changed {
                self.color.move_key(selector, i, time, value);
            }
            let can_delete = self.color.can_delete(selector);
            if ui.button(&format!("Delete Key {i}{suffix}"), can_delete) {
                delete = Some(i);
            }
            touch |= row;
        }

        if ui.button(&format!("Add Key{suffix}"), self.color.can_add(selector)) && self.append_key(selector) {
            touch |= Touch::CHANGED;
        }
        if let Some(index) = delete
            && self.color.delete_key(selector, index)
        {
            touch |= Touch::CHANGED;
        }
        touch
    }
}

impl PropertyModule for ColorOverLifetimeModule {
    fn role(&self) -> ModuleRole {
        ModuleRole::ColorOverLifetime
    }

    fn load_from_record(&mut self, record: &EmitterRecord) {
        self.color = record.color.clone();
    }

    fn store_into_record(&self, record: &mut EmitterRecord) {
        record.color = self.color.clone();
    }

    fn render_panel(&mut self, ui: &mut dyn UiSurface) {
        let touch = module_panel(ui, ModuleRole::ColorOverLifetime, |ui| {
            let mut mode = self.color.mode();
            let mut touch = enum_combo(ui, "Color Mode", &mut mode, &CurveMode::ALL, CurveMode::label);
            if touch.changed {
                self.color.set_mode(mode);
            }

            self.draw_gradient(ui);
            for selector in self.color.active_selectors() {
                ui.separator();
                touch |= self.key_rows(ui, *selector);
            }

            // Keys are re-sorted once no time slider is held.
            if !touch.active {
                self.color.sort_keys();
            }
            touch
        });
        if touch.touched() {
            self.dirty = true;
        }
    }

    fn save_element(&self) -> DocElement {
        let mut element = DocElement::new(self.role().tag());
        write_channel(&mut element, &self.color);
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
    use bevy_emitter_data::{Curve, Keyframe, MAX_KEYS, read_channel};

    use super::*;
    use crate::surface::testing::ScriptedSurface;

    fn rgb_module() -> ColorOverLifetimeModule {
        ColorOverLifetimeModule {
            color: DualCurve::single(Curve::from_keys([
                Keyframe::new(0.0, LinearRgba::RED),
                Keyframe::new(0.5, LinearRgba::GREEN),
                Keyframe::new(1.0, LinearRgba::BLUE),
            ])),
            dirty: false,
        }
    }

    #[test]
    fn add_key_copies_last_key() {
        let mut module = ColorOverLifetimeModule::default();
        let mut ui = ScriptedSurface::new();
        ui.press("Add Key");
        module.render_panel(&mut ui);

        assert!(module.is_dirty());
        let keys = module.color.primary().keys();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[2], Keyframe::new(1.0, LinearRgba::WHITE));
    }

    #[test]
    fn buttons_respect_key_bounds() {
        let mut module = ColorOverLifetimeModule::default();
        let mut ui = ScriptedSurface::new();
        module.render_panel(&mut ui);
        assert!(ui.disabled.contains(&"Delete Key 0".to_string()));
        assert!(!ui.disabled.contains(&"Add Key".to_string()));

        module.color = DualCurve::single(Curve::from_keys(
            (0..MAX_KEYS).map(|i| Keyframe::new(i as f32 / 8.0, LinearRgba::BLACK)),
        ));
        let mut ui = ScriptedSurface::new();
        module.render_panel(&mut ui);
        assert!(ui.disabled.contains(&"Add Key".to_string()));
        assert!(!ui.disabled.contains(&"Delete Key 0".to_string()));
    }

    #[test]
    fn delete_removes_key() {
        let mut module = rgb_module();
        let mut ui = ScriptedSurface::new();
        ui.press("Delete Key 1");
        module.render_panel(&mut ui);
        let values: Vec<LinearRgba> = module.color.primary().keys().iter().map(|k| k.value).collect();
        assert_eq!(values, vec![LinearRgba::RED, LinearRgba::BLUE]);
    }

    #[test]
    fn time_edits_sort_after_release() {
        let mut module = rgb_module();
        let mut ui = ScriptedSurface::new();
        ui.set_float("Key 0 Time", 0.8).hold("Key 0 Time");
        module.render_panel(&mut ui);
        assert!(!module.color.primary().is_sorted());

        module.render_panel(&mut ScriptedSurface::new());
        let keys = module.color.primary().keys();
        assert!(module.color.primary().is_sorted());
        assert_eq!(keys[1], Keyframe::new(0.8, LinearRgba::RED));
    }

    #[test]
    fn dual_mode_shows_second_key_list() {
        let mut module = ColorOverLifetimeModule::default();
        let mut ui = ScriptedSurface::new();
        ui.select("Color Mode", 1);
        module.render_panel(&mut ui);
        assert!(module.color.is_random_between_two());
        assert_eq!(module.color.secondary().len(), 2);

        let mut ui = ScriptedSurface::new();
        module.render_panel(&mut ui);
        assert!(ui.drawn.contains(&"Add Key (Curve Two)".to_string()));
    }

    #[test]
    fn gradient_and_save() {
        let module = rgb_module();
        let mut ui = ScriptedSurface::new();
        let mut module_copy = ColorOverLifetimeModule {
            color: module.color.clone(),
            dirty: false,
        };
        module_copy.render_panel(&mut ui);
        assert_eq!(ui.painted.len(), GRADIENT_STEPS);
        assert!(!module_copy.is_dirty());

        let element = module.save_element();
        assert_eq!(element.tag, "ColorOverLifetime");
        assert_eq!(read_channel::<LinearRgba>(&element), module.color);
    }
}
