//! Generic element tree used to persist effect documents.
//!
//! An effect is a `ParticleSystem` root with one `EmitterData` child per
//! emitter, and one child per property module below that. Scalars live in
//! string attributes, curve channels are nested `key` elements. The tree is
//! format-agnostic; [`to_ron`] / [`from_ron`] give it a text form.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::curve::{Curve, CurveMode, DualCurve, KeyValue, Keyframe, MIN_KEYS};
use crate::record::{BlendMode, EmissionMode, FloatRange, RenderMode, ShapeKind, SimSpace};

// ---------------------------------------------------------------------------
// Element tags
// ---------------------------------------------------------------------------

pub mod tags {
    pub const PARTICLE_SYSTEM: &str = "ParticleSystem";
    pub const EMITTER_DATA: &str = "EmitterData";

    pub const BASE: &str = "Base";
    pub const EMISSION: &str = "Emission";
    pub const SHAPE: &str = "Shape";
    pub const SIZE_OVER_LIFETIME: &str = "SizeOverLifetime";
    pub const VELOCITY_OVER_LIFETIME: &str = "VelocityOverLifetime";
    pub const ORBITAL_VELOCITY_OVER_LIFETIME: &str = "OrbitalVelocityOverLifetime";
    pub const ROTATION_OVER_LIFETIME: &str = "RotationOverLifetime";
    pub const COLOR_OVER_LIFETIME: &str = "ColorOverLifetime";
    pub const PHYSICS: &str = "Physics";
    pub const RENDERER: &str = "Renderer";

    pub const SIZE_X: &str = "X";
    pub const SIZE_Y: &str = "Y";
    pub const VELOCITY_X: &str = "VelocityX";
    pub const VELOCITY_Y: &str = "VelocityY";
    pub const VELOCITY_Z: &str = "VelocityZ";
    pub const DRAG: &str = "Drag";
    pub const ORBITAL_VELOCITY: &str = "Velocity";
    pub const ORBITAL_RADIUS: &str = "Radius";
    pub const POINT: &str = "Point";

    pub const KEY: &str = "key";
    pub const CURVE_ONE: &str = "CurveOne";
    pub const CURVE_TWO: &str = "CurveTwo";
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("expected a `{expected}` root element, found `{found}`")]
    UnexpectedRoot { expected: &'static str, found: String },
    #[error("failed to parse effect document: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize effect document: {0}")]
    Serialize(#[from] ron::Error),
}

// ---------------------------------------------------------------------------
// DocElement
// ---------------------------------------------------------------------------

/// One node of the document tree. Attribute order is preserved.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DocElement {
    pub tag: String,
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
    #[serde(default)]
    pub children: Vec<DocElement>,
}

impl DocElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder form of [`Self::set_attr`].
    pub fn with_attr<T: ToAttr + ?Sized>(mut self, name: &str, value: &T) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: DocElement) -> Self {
        self.children.push(child);
        self
    }

    /// Set an attribute, replacing any previous value under the same name.
    pub fn set_attr<T: ToAttr + ?Sized>(&mut self, name: &str, value: &T) {
        let text = value.to_attr();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = text,
            None => self.attributes.push((name.to_string(), text)),
        }
    }

    pub fn attr_text(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr_text(name).is_some()
    }

    /// Parsed attribute, `None` when missing or malformed.
    pub fn attr<T: FromAttr>(&self, name: &str) -> Option<T> {
        self.attr_text(name).and_then(T::from_attr)
    }

    pub fn attr_or<T: FromAttr>(&self, name: &str, default: T) -> T {
        self.attr(name).unwrap_or(default)
    }

    pub fn push_child(&mut self, child: DocElement) {
        self.children.push(child);
    }

    /// First child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&DocElement> {
        self.children.iter().find(|c| c.tag == tag)
    }

    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a DocElement> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }
}

pub fn to_ron(root: &DocElement) -> Result<String, DocumentError> {
    Ok(ron::ser::to_string_pretty(root, ron::ser::PrettyConfig::default())?)
}

pub fn from_ron(text: &str) -> Result<DocElement, DocumentError> {
    Ok(ron::from_str(text)?)
}

// ---------------------------------------------------------------------------
// Attribute encoding
// ---------------------------------------------------------------------------

/// Value that can be written as attribute text.
pub trait ToAttr {
    fn to_attr(&self) -> String;
}

/// Value that can be parsed back from attribute text.
pub trait FromAttr: Sized {
    fn from_attr(text: &str) -> Option<Self>;
}

fn parse_floats<const N: usize>(text: &str, separator: char) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    let mut parts = text.split(separator);
    for slot in &mut out {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    parts.next().is_none().then_some(out)
}

impl ToAttr for str {
    fn to_attr(&self) -> String {
        self.to_string()
    }
}

impl ToAttr for String {
    fn to_attr(&self) -> String {
        self.clone()
    }
}

impl FromAttr for String {
    fn from_attr(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

macro_rules! display_attr {
    ($($ty:ty),* $(,)?) => {$(
        impl ToAttr for $ty {
            fn to_attr(&self) -> String {
                self.to_string()
            }
        }

        impl FromAttr for $ty {
            fn from_attr(text: &str) -> Option<Self> {
                text.trim().parse().ok()
            }
        }
    )*};
}

display_attr!(f32, i32, bool);

impl ToAttr for Vec3 {
    fn to_attr(&self) -> String {
        format!("{},{},{}", self.x, self.y, self.z)
    }
}

impl FromAttr for Vec3 {
    fn from_attr(text: &str) -> Option<Self> {
        parse_floats::<3>(text, ',').map(Vec3::from_array)
    }
}

impl ToAttr for IVec2 {
    fn to_attr(&self) -> String {
        format!("{},{}", self.x, self.y)
    }
}

impl FromAttr for IVec2 {
    fn from_attr(text: &str) -> Option<Self> {
        let (x, y) = text.split_once(',')?;
        Some(IVec2::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

impl ToAttr for LinearRgba {
    fn to_attr(&self) -> String {
        format!("{},{},{},{}", self.red, self.green, self.blue, self.alpha)
    }
}

impl FromAttr for LinearRgba {
    fn from_attr(text: &str) -> Option<Self> {
        parse_floats::<4>(text, ',').map(|[r, g, b, a]| LinearRgba::new(r, g, b, a))
    }
}

impl ToAttr for FloatRange {
    fn to_attr(&self) -> String {
        format!("{}~{}", self.min, self.max)
    }
}

impl FromAttr for FloatRange {
    fn from_attr(text: &str) -> Option<Self> {
        parse_floats::<2>(text, '~').map(|[min, max]| FloatRange::new(min, max))
    }
}

macro_rules! label_attr {
    ($($ty:ty),* $(,)?) => {$(
        impl ToAttr for $ty {
            fn to_attr(&self) -> String {
                self.label().to_string()
            }
        }

        impl FromAttr for $ty {
            fn from_attr(text: &str) -> Option<Self> {
                let text = text.trim();
                Self::ALL.into_iter().find(|v| v.label() == text)
            }
        }
    )*};
}

label_attr!(SimSpace, EmissionMode, ShapeKind, RenderMode, BlendMode, CurveMode);

// ---------------------------------------------------------------------------
// Curve channels
// ---------------------------------------------------------------------------

fn key_elements<V: KeyValue + ToAttr + FromAttr>(curve: &Curve<V>) -> impl Iterator<Item = DocElement> {
    curve.sorted_keys().into_iter().map(|key| {
        DocElement::new(tags::KEY)
            .with_attr("time", &key.time)
            .with_attr("value", &key.value)
    })
}

/// Append a channel's keys to `parent`: direct `key` children in single
/// mode, `CurveOne` / `CurveTwo` groups in random-between-two mode.
pub fn write_channel<V: KeyValue + ToAttr + FromAttr>(parent: &mut DocElement, channel: &DualCurve<V>) {
    match channel.mode() {
        CurveMode::Single => parent.children.extend(key_elements(channel.primary())),
        CurveMode::RandomBetweenTwo => {
            let mut one = DocElement::new(tags::CURVE_ONE);
            one.children.extend(key_elements(channel.primary()));
            let mut two = DocElement::new(tags::CURVE_TWO);
            two.children.extend(key_elements(channel.secondary()));
            parent.push_child(one);
            parent.push_child(two);
        }
    }
}

fn read_keys<V: KeyValue + ToAttr + FromAttr>(element: &DocElement) -> Curve<V> {
    Curve::from_keys(element.children_named(tags::KEY).filter_map(|key| {
        Some(Keyframe::new(key.attr::<f32>("time")?, key.attr::<V>("value")?))
    }))
}

/// Decode the channel stored under `parent`. Missing or short channels fall
/// back to the default channel. Loaded dual-mode curves keep up to
/// `MAX_KEYS` keys each; they are not cut down to the per-curve dual-mode
/// limit, so further adds are simply refused.
pub fn read_channel<V: KeyValue + ToAttr + FromAttr>(parent: &DocElement) -> DualCurve<V> {
    let channel = match parent.child(tags::CURVE_ONE) {
        Some(one) => {
            let secondary = parent.child(tags::CURVE_TWO).map(read_keys).unwrap_or_else(Curve::empty);
            DualCurve::random_between(read_keys(one), secondary)
        }
        None => DualCurve::single(read_keys(parent)),
    };

    if channel.primary().len() < MIN_KEYS {
        return DualCurve::default();
    }
    channel
}
