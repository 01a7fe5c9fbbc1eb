use bevy_emitter_data::{DocElement, EmitterRecord, EmitterShape, ShapeKind};

use super::{ModuleRole, PropertyModule, enum_combo, module_panel};
use crate::surface::UiSurface;

/// Spawn volume. Holds exactly one shape variant; picking another kind
/// replaces it with that kind's defaults.
#[derive(Default)]
pub struct ShapeModule {
    pub shape: EmitterShape,
    dirty: bool,
}

impl ShapeModule {
    pub fn set_kind(&mut self, kind: ShapeKind) {
        if self.shape.kind() != kind {
            self.shape = kind.default_shape();
        }
    }
}

impl PropertyModule for ShapeModule {
    fn role(&self) -> ModuleRole {
        ModuleRole::Shape
    }

    fn load_from_record(&mut self, record: &EmitterRecord) {
        self.shape = record.shape;
    }

    fn store_into_record(&self, record: &mut EmitterRecord) {
        record.shape = self.shape;
    }

    fn render_panel(&mut self, ui: &mut dyn UiSurface) {
        let touch = module_panel(ui, ModuleRole::Shape, |ui| {
            let mut kind = self.shape.kind();
            let mut touch = enum_combo(ui, "Shape", &mut kind, &ShapeKind::ALL, ShapeKind::label);
            self.set_kind(kind);

            match &mut self.shape {
                EmitterShape::Cone { half_angle, forward } => {
                    touch |= ui.drag_float("Cone Half Angle", half_angle, 0.5);
                    touch |= ui.drag_vec3("Cone Forward", forward, 0.05);
                    *half_angle = half_angle.clamp(0.0, 90.0);
                }
                EmitterShape::Sphere { radius, from_surface } => {
                    touch |= ui.drag_float("Sphere Radius", radius, 0.05);
                    touch |= ui.checkbox("From Surface", from_surface);
                    *radius = radius.max(0.0);
                }
                EmitterShape::Box { dimensions, forward } => {
                    touch |= ui.drag_vec3("Box Dimensions", dimensions, 0.05);
                    touch |= ui.drag_vec3("Box Forward", forward, 0.05);
                }
            }
            touch
        });
        if touch.touched() {
            self.dirty = true;
        }
    }

    fn save_element(&self) -> DocElement {
        let element = DocElement::new(self.role().tag()).with_attr("shape", &self.shape.kind());
        match &self.shape {
            EmitterShape::Cone { half_angle, forward } => element
                .with_attr("coneHalfAngle", half_angle)
                .with_attr("coneForward", forward),
            EmitterShape::Sphere { radius, from_surface } => element
                .with_attr("sphereRadius", radius)
                .with_attr("fromSurface", from_surface),
            EmitterShape::Box { dimensions, forward } => element
                .with_attr("boxDimensions", dimensions)
                .with_attr("boxForward", forward),
        }
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
    fn cone_to_box_saves_only_box_fields() {
        let mut module = ShapeModule {
            shape: EmitterShape::Cone {
                half_angle: 30.0,
                forward: Vec3::new(0.0, 0.0, 1.0),
            },
            dirty: false,
        };
        let mut ui = ScriptedSurface::new();
        ui.select("Shape", 2);
        module.render_panel(&mut ui);

        assert!(module.is_dirty());
        let element = module.save_element();
        let names: Vec<&str> = element.attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["shape", "boxDimensions", "boxForward"]);
        assert_eq!(element.attr_text("shape"), Some("Box"));
        assert_eq!(element.attr::<Vec3>("boxDimensions"), Some(Vec3::new(5.0, 5.0, 2.0)));
    }

    #[test]
    fn switching_discards_previous_variant() {
        let mut module = ShapeModule::default();
        module.shape = EmitterShape::Sphere {
            radius: 9.0,
            from_surface: true,
        };
        module.set_kind(ShapeKind::Cone);
        module.set_kind(ShapeKind::Sphere);
        assert_eq!(module.shape, ShapeKind::Sphere.default_shape());
    }

    #[test]
    fn variant_fields_are_editable() {
        let mut module = ShapeModule::default();
        module.set_kind(ShapeKind::Sphere);
        let mut ui = ScriptedSurface::new();
        ui.set_float("Sphere Radius", 2.0).set_bool("From Surface", true);
        module.render_panel(&mut ui);
        assert_eq!(
            module.shape,
            EmitterShape::Sphere {
                radius: 2.0,
                from_surface: true
            }
        );
    }
}
