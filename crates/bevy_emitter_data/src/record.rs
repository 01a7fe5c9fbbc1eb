//! The canonical, flat description of one emitter.
//!
//! [`EmitterRecord`] is the only value exchanged between the editor, the
//! persisted effect document and the simulation. Records are plain owned
//! values; handing one to the simulation is always a copy.

use bevy::prelude::*;

use crate::curve::{Curve, DualCurve};

/// Most point attractors one emitter may carry.
pub const MAX_ATTRACTORS: usize = 8;

// ---------------------------------------------------------------------------
// Emitter record
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct EmitterRecord {
    // Identity
    pub name: String,
    /// Emitter is kept in the document but not drawn.
    pub stop_render: bool,

    // Base
    pub max_particles: i32,
    /// Seconds.
    pub lifetime: FloatRange,
    pub start_speed: FloatRange,
    pub start_size: FloatRange,
    pub start_rotation_degrees: FloatRange,
    pub start_color: LinearRgba,
    pub gravity_scale: i32,
    pub draw_order: i32,
    /// Offset from the effect's spawn position.
    pub offset: Vec3,
    pub simulation_space: SimSpace,

    // Emission
    pub emission_mode: EmissionMode,
    /// Particles per second in constant mode.
    pub emission_rate: f32,
    pub burst_count: i32,
    /// Seconds between bursts.
    pub burst_interval: f32,

    // Shape
    pub shape: EmitterShape,

    // Size over lifetime (unipolar curves)
    pub size_x_modifier: f32,
    pub size_x: DualCurve<f32>,
    pub size_y_modifier: f32,
    pub size_y: DualCurve<f32>,

    // Velocity over lifetime (bipolar curves)
    pub velocity_modifier: f32,
    pub velocity_x: DualCurve<f32>,
    pub velocity_y: DualCurve<f32>,
    pub velocity_z: DualCurve<f32>,
    pub drag_modifier: f32,
    pub drag: DualCurve<f32>,

    // Orbital velocity over lifetime (bipolar curves)
    pub orbital_velocity_modifier: f32,
    pub orbital_velocity: DualCurve<f32>,
    pub orbital_radius_modifier: f32,
    pub orbital_radius: DualCurve<f32>,
    pub orbital_axis: Vec3,

    // Rotation over lifetime (bipolar curve)
    pub rotation_modifier: f32,
    pub rotation: DualCurve<f32>,

    // Color over lifetime
    pub color: DualCurve<LinearRgba>,

    // Physics
    pub point_attractors: Vec<PointAttractor>,

    // Renderer
    pub render_mode: RenderMode,
    /// Texture path, or [`DEFAULT_TEXTURE`].
    pub texture: String,
    pub sprite_sheet: bool,
    /// Columns x rows of the sprite sheet.
    pub sprite_grid: IVec2,
    pub blend_mode: BlendMode,
    pub sort_particles: bool,
}

/// Texture name meaning "use the built-in particle sprite".
pub const DEFAULT_TEXTURE: &str = "Default";

impl Default for EmitterRecord {
    fn default() -> Self {
        Self {
            name: "Emitter".to_string(),
            stop_render: false,

            max_particles: 100,
            lifetime: FloatRange::new(1.0, 2.0),
            start_speed: FloatRange::new(1.0, 2.0),
            start_size: FloatRange::new(0.1, 0.2),
            start_rotation_degrees: FloatRange::constant(0.0),
            start_color: LinearRgba::WHITE,
            gravity_scale: 0,
            draw_order: 0,
            offset: Vec3::ZERO,
            simulation_space: SimSpace::Local,

            emission_mode: EmissionMode::Constant,
            emission_rate: 10.0,
            burst_count: 10,
            burst_interval: 1.0,

            shape: EmitterShape::default(),

            size_x_modifier: 1.0,
            size_x: DualCurve::default(),
            size_y_modifier: 1.0,
            size_y: DualCurve::default(),

            velocity_modifier: 0.0,
            velocity_x: DualCurve::default(),
            velocity_y: DualCurve::default(),
            velocity_z: DualCurve::default(),
            drag_modifier: 0.0,
            drag: DualCurve::default(),

            orbital_velocity_modifier: 0.0,
            orbital_velocity: DualCurve::default(),
            orbital_radius_modifier: 0.0,
            orbital_radius: DualCurve::default(),
            orbital_axis: Vec3::Z,

            rotation_modifier: 0.0,
            rotation: DualCurve::default(),

            color: DualCurve::single(Curve::constant(LinearRgba::WHITE)),

            point_attractors: Vec::new(),

            render_mode: RenderMode::Billboard,
            texture: DEFAULT_TEXTURE.to_string(),
            sprite_sheet: false,
            sprite_grid: IVec2::ONE,
            blend_mode: BlendMode::Alpha,
            sort_particles: false,
        }
    }
}

impl EmitterRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Float range
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` range a particle draws its start value from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn constant(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Draw a uniform value in `[min, max]` for a newly spawned particle.
    ///
    /// Unused by the editor itself; simulation consumers call it.
    pub fn sample(&self) -> f32 {
        self.min + (self.max - self.min) * fastrand::f32()
    }
}

// ---------------------------------------------------------------------------
// Simulation space
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimSpace {
    /// Particles follow the emitter.
    #[default]
    Local,
    /// Particles stay where they were born.
    World,
}

impl SimSpace {
    pub const ALL: [Self; 2] = [Self::Local, Self::World];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::World => "World",
        }
    }
}

// ---------------------------------------------------------------------------
// Emission
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmissionMode {
    #[default]
    Constant,
    Burst,
}

impl EmissionMode {
    pub const ALL: [Self; 2] = [Self::Constant, Self::Burst];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Constant => "Constant",
            Self::Burst => "Burst",
        }
    }
}

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// Volume particles are born in. Exactly one variant is live at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EmitterShape {
    Cone {
        /// Degrees.
        half_angle: f32,
        forward: Vec3,
    },
    Sphere {
        radius: f32,
        /// Spawn on the surface instead of inside the volume.
        from_surface: bool,
    },
    Box {
        dimensions: Vec3,
        forward: Vec3,
    },
}

impl Default for EmitterShape {
    fn default() -> Self {
        ShapeKind::Cone.default_shape()
    }
}

impl EmitterShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Cone { .. } => ShapeKind::Cone,
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Box { .. } => ShapeKind::Box,
        }
    }
}

/// Discriminant of [`EmitterShape`], used by the shape picker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShapeKind {
    #[default]
    Cone,
    Sphere,
    Box,
}

impl ShapeKind {
    pub const ALL: [Self; 3] = [Self::Cone, Self::Sphere, Self::Box];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cone => "Cone",
            Self::Sphere => "Sphere",
            Self::Box => "Box",
        }
    }

    /// Fresh shape of this kind with its default parameters.
    pub fn default_shape(&self) -> EmitterShape {
        match self {
            Self::Cone => EmitterShape::Cone {
                half_angle: 30.0,
                forward: Vec3::Z,
            },
            Self::Sphere => EmitterShape::Sphere {
                radius: 5.0,
                from_surface: false,
            },
            Self::Box => EmitterShape::Box {
                dimensions: Vec3::new(5.0, 5.0, 2.0),
                forward: Vec3::Z,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Physics
// ---------------------------------------------------------------------------

/// Point that pulls (positive strength) or pushes particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointAttractor {
    pub offset: Vec3,
    pub strength: f32,
}

impl Default for PointAttractor {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            strength: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Faces the camera.
    #[default]
    Billboard,
    /// Lies flat, facing up.
    HorizontalBillboard,
}

impl RenderMode {
    pub const ALL: [Self; 2] = [Self::Billboard, Self::HorizontalBillboard];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Billboard => "Billboard",
            Self::HorizontalBillboard => "HorizontalBillboard",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    Alpha,
    Additive,
    Opaque,
}

impl BlendMode {
    pub const ALL: [Self; 3] = [Self::Alpha, Self::Additive, Self::Opaque];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Alpha => "Alpha",
            Self::Additive => "Additive",
            Self::Opaque => "Opaque",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_defaults_match_kind() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.default_shape().kind(), kind);
        }
        assert_eq!(
            EmitterShape::default(),
            EmitterShape::Cone {
                half_angle: 30.0,
                forward: Vec3::new(0.0, 0.0, 1.0)
            }
        );
    }

    #[test]
    fn float_range_sample_stays_in_range() {
        let range = FloatRange::new(2.0, 3.0);
        for _ in 0..64 {
            let v = range.sample();
            assert!((2.0..=3.0).contains(&v));
        }
    }

    #[test]
    fn default_record_curves_are_editable() {
        let record = EmitterRecord::default();
        for channel in [&record.size_x, &record.velocity_x, &record.drag, &record.rotation] {
            assert!(channel.primary().len() >= crate::curve::MIN_KEYS);
        }
        assert_eq!(record.texture, DEFAULT_TEXTURE);
    }
}
