//! Property modules: the ten independently editable slices of an emitter.
//!
//! Each module loads its slice from an [`EmitterRecord`], draws its panel,
//! tracks its own dirty flag, and writes its slice back to a record or to a
//! document element. [`ModuleSet`] owns one module per [`ModuleRole`] and
//! visits them in role order.

mod base;
mod color;
mod emission;
mod orbital;
mod physics;
mod renderer;
mod rotation;
mod shape;
mod size;
mod velocity;

use std::path::PathBuf;
use std::sync::Arc;

use bevy_egui::egui::Vec2;
use bevy_emitter_data::{DocElement, DualCurve, EmitterRecord, tags};

pub use base::BaseModule;
pub use color::ColorOverLifetimeModule;
pub use emission::EmissionModule;
pub use orbital::{OrbitalChannel, OrbitalVelocityModule};
pub use physics::PhysicsModule;
pub use renderer::RendererModule;
pub use rotation::RotationOverLifetimeModule;
pub use shape::ShapeModule;
pub use size::{SizeChannel, SizeOverLifetimeModule};
pub use velocity::{VelocityChannel, VelocityOverLifetimeModule};

use crate::curve_editor::{CurveEditor, DEFAULT_CANVAS_SIZE};
use crate::file_picker::FilePicker;
use crate::surface::{Touch, UiSurface};

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModuleRole {
    Base,
    Emission,
    Shape,
    SizeOverLifetime,
    VelocityOverLifetime,
    OrbitalVelocityOverLifetime,
    RotationOverLifetime,
    ColorOverLifetime,
    Physics,
    Renderer,
}

impl ModuleRole {
    /// Every role, in document and pull order.
    pub const ALL: [Self; 10] = [
        Self::Base,
        Self::Emission,
        Self::Shape,
        Self::SizeOverLifetime,
        Self::VelocityOverLifetime,
        Self::OrbitalVelocityOverLifetime,
        Self::RotationOverLifetime,
        Self::ColorOverLifetime,
        Self::Physics,
        Self::Renderer,
    ];

    /// Document element tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Base => tags::BASE,
            Self::Emission => tags::EMISSION,
            Self::Shape => tags::SHAPE,
            Self::SizeOverLifetime => tags::SIZE_OVER_LIFETIME,
            Self::VelocityOverLifetime => tags::VELOCITY_OVER_LIFETIME,
            Self::OrbitalVelocityOverLifetime => tags::ORBITAL_VELOCITY_OVER_LIFETIME,
            Self::RotationOverLifetime => tags::ROTATION_OVER_LIFETIME,
            Self::ColorOverLifetime => tags::COLOR_OVER_LIFETIME,
            Self::Physics => tags::PHYSICS,
            Self::Renderer => tags::RENDERER,
        }
    }

    /// Panel header text.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Base => "Base Module",
            Self::Emission => "Emission Module",
            Self::Shape => "Shape Module",
            Self::SizeOverLifetime => "Size Over Lifetime",
            Self::VelocityOverLifetime => "Velocity Over Lifetime",
            Self::OrbitalVelocityOverLifetime => "Orbital Velocity Over Lifetime",
            Self::RotationOverLifetime => "Rotation Over Lifetime",
            Self::ColorOverLifetime => "Color Over Lifetime",
            Self::Physics => "Physics",
            Self::Renderer => "Renderer",
        }
    }
}

// ---------------------------------------------------------------------------
// Module contract
// ---------------------------------------------------------------------------

pub trait PropertyModule {
    fn role(&self) -> ModuleRole;

    /// Overwrite this module's state from `record`.
    fn load_from_record(&mut self, record: &EmitterRecord);

    /// Write this module's slice into `record`.
    fn store_into_record(&self, record: &mut EmitterRecord);

    /// Draw the module panel; touching any control marks the module dirty.
    fn render_panel(&mut self, ui: &mut dyn UiSurface);

    /// Element for this module, independent of the other modules.
    fn save_element(&self) -> DocElement;

    fn is_dirty(&self) -> bool;

    fn set_dirty(&mut self, dirty: bool);
}

/// Construction-time dependencies shared by all modules of an emitter.
#[derive(Clone)]
pub struct ModuleContext {
    pub picker: Arc<dyn FilePicker>,
    pub canvas_size: Vec2,
    pub texture_dir: PathBuf,
}

impl ModuleContext {
    pub fn new(picker: Arc<dyn FilePicker>) -> Self {
        Self {
            picker,
            canvas_size: DEFAULT_CANVAS_SIZE,
            texture_dir: PathBuf::from("assets/textures"),
        }
    }
}

// ---------------------------------------------------------------------------
// Module set
// ---------------------------------------------------------------------------

/// One concrete module per role.
pub struct ModuleSet {
    pub base: BaseModule,
    pub emission: EmissionModule,
    pub shape: ShapeModule,
    pub size: SizeOverLifetimeModule,
    pub velocity: VelocityOverLifetimeModule,
    pub orbital: OrbitalVelocityModule,
    pub rotation: RotationOverLifetimeModule,
    pub color: ColorOverLifetimeModule,
    pub physics: PhysicsModule,
    pub renderer: RendererModule,
}

impl ModuleSet {
    pub fn new(context: &ModuleContext) -> Self {
        Self {
            base: BaseModule::default(),
            emission: EmissionModule::default(),
            shape: ShapeModule::default(),
            size: SizeOverLifetimeModule::new(context.canvas_size),
            velocity: VelocityOverLifetimeModule::new(context.canvas_size),
            orbital: OrbitalVelocityModule::new(context.canvas_size),
            rotation: RotationOverLifetimeModule::new(context.canvas_size),
            color: ColorOverLifetimeModule::default(),
            physics: PhysicsModule::default(),
            renderer: RendererModule::new(context.picker.clone(), context.texture_dir.clone()),
        }
    }

    pub fn get(&self, role: ModuleRole) -> &dyn PropertyModule {
        match role {
            ModuleRole::Base => &self.base,
            ModuleRole::Emission => &self.emission,
            ModuleRole::Shape => &self.shape,
            ModuleRole::SizeOverLifetime => &self.size,
            ModuleRole::VelocityOverLifetime => &self.velocity,
            ModuleRole::OrbitalVelocityOverLifetime => &self.orbital,
            ModuleRole::RotationOverLifetime => &self.rotation,
            ModuleRole::ColorOverLifetime => &self.color,
            ModuleRole::Physics => &self.physics,
            ModuleRole::Renderer => &self.renderer,
        }
    }

    pub fn get_mut(&mut self, role: ModuleRole) -> &mut dyn PropertyModule {
        match role {
            ModuleRole::Base => &mut self.base,
            ModuleRole::Emission => &mut self.emission,
            ModuleRole::Shape => &mut self.shape,
            ModuleRole::SizeOverLifetime => &mut self.size,
            ModuleRole::VelocityOverLifetime => &mut self.velocity,
            ModuleRole::OrbitalVelocityOverLifetime => &mut self.orbital,
            ModuleRole::RotationOverLifetime => &mut self.rotation,
            ModuleRole::ColorOverLifetime => &mut self.color,
            ModuleRole::Physics => &mut self.physics,
            ModuleRole::Renderer => &mut self.renderer,
        }
    }

    pub fn load_from_record(&mut self, record: &EmitterRecord) {
        for role in ModuleRole::ALL {
            self.get_mut(role).load_from_record(record);
        }
    }

    pub fn store_into_record(&self, record: &mut EmitterRecord) {
        for role in ModuleRole::ALL {
            self.get(role).store_into_record(record);
        }
    }

    pub fn render(&mut self, ui: &mut dyn UiSurface) {
        for role in ModuleRole::ALL {
            self.get_mut(role).render_panel(ui);
        }
    }

    pub fn save_elements(&self) -> Vec<DocElement> {
        ModuleRole::ALL.iter().map(|role| self.get(*role).save_element()).collect()
    }

    pub fn is_any_dirty(&self) -> bool {
        ModuleRole::ALL.iter().any(|role| self.get(*role).is_dirty())
    }

    pub fn set_all_dirty(&mut self, dirty: bool) {
        for role in ModuleRole::ALL {
            self.get_mut(role).set_dirty(dirty);
        }
    }
}

// ---------------------------------------------------------------------------
// Panel helpers
// ---------------------------------------------------------------------------

/// Collapsible module panel; returns the combined touch of its controls.
pub(crate) fn module_panel(
    ui: &mut dyn UiSurface,
    role: ModuleRole,
    mut body: impl FnMut(&mut dyn UiSurface) -> Touch,
) -> Touch {
    let mut touch = Touch::NONE;
    ui.collapsing(role.tag(), role.title(), &mut |ui| touch |= body(ui));
    touch
}

/// Combo over a label enum.
pub(crate) fn enum_combo<T: Copy + PartialEq>(
    ui: &mut dyn UiSurface,
    label: &str,
    value: &mut T,
    all: &[T],
    label_of: fn(&T) -> &'static str,
) -> Touch {
    let labels: Vec<&str> = all.iter().map(label_of).collect();
    let mut index = all.iter().position(|v| v == value).unwrap_or_default();
    let touch = ui.combo(label, &mut index, &labels);
    if touch.changed
        && let Some(selected) = all.get(index)
    {
        *value = *selected;
    }
    touch
}

/// Channel row with its "Edit Curve" button. Returns true when clicked.
pub(crate) fn channel_row(ui: &mut dyn UiSurface, name: &str) -> bool {
    let mut clicked = false;
    ui.horizontal(&mut |ui| {
        ui.label(name);
        clicked = ui.button(&format!("Edit {name} Curve"), true);
    });
    clicked
}

/// Drop a curve editor whose window was closed on an earlier frame.
pub(crate) fn resolve_closed_editor<C: Copy>(editor: &mut Option<CurveEditor<C>>) {
    if editor.as_ref().is_some_and(|e| !e.is_open()) {
        *editor = None;
    }
}

/// Element holding one curve channel, with an optional `modifier`.
pub(crate) fn channel_element(tag: &str, modifier: Option<f32>, channel: &DualCurve<f32>) -> DocElement {
    let mut element = DocElement::new(tag);
    if let Some(modifier) = modifier {
        element.set_attr("modifier", &modifier);
    }
    bevy_emitter_data::write_channel(&mut element, channel);
    element
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Picker returning queued answers, then `None`.
    #[derive(Default)]
    pub struct QueuedPicker {
        pub answers: Mutex<Vec<Option<PathBuf>>>,
    }

    impl QueuedPicker {
        pub fn with(answers: Vec<Option<PathBuf>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers),
            })
        }
    }

    impl FilePicker for QueuedPicker {
        fn pick_file(&self, _title: &str, _start_dir: &Path, _extensions: &[&str]) -> Option<PathBuf> {
            let mut answers = self.answers.lock().ok()?;
            if answers.is_empty() {
                None
            } else {
                answers.remove(0)
            }
        }
    }

    pub fn context() -> ModuleContext {
        ModuleContext::new(Arc::new(QueuedPicker::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_map_to_distinct_tags() {
        let mut tags: Vec<&str> = ModuleRole::ALL.iter().map(ModuleRole::tag).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), ModuleRole::ALL.len());
    }

    #[test]
    fn module_lookup_matches_role() {
        let mut set = ModuleSet::new(&test_support::context());
        for role in ModuleRole::ALL {
            assert_eq!(set.get(role).role(), role);
            assert_eq!(set.get_mut(role).role(), role);
            assert_eq!(set.get(role).save_element().tag, role.tag());
        }
    }

    #[test]
    fn set_all_dirty_reaches_every_module() {
        let mut set = ModuleSet::new(&test_support::context());
        assert!(!set.is_any_dirty());
        set.set_all_dirty(true);
        assert!(ModuleRole::ALL.iter().all(|r| set.get(*r).is_dirty()));
        set.set_all_dirty(false);
        assert!(!set.is_any_dirty());
    }

    #[test]
    fn record_survives_load_and_store() {
        let mut record = EmitterRecord::named("Sparks");
        record.max_particles = 42;
        record.emission_rate = 3.5;
        record.rotation_modifier = 90.0;
        record.texture = "textures/spark.png".into();

        let mut set = ModuleSet::new(&test_support::context());
        set.load_from_record(&record);
        let mut out = EmitterRecord::named("Sparks");
        set.store_into_record(&mut out);
        assert_eq!(out, record);
    }
}
