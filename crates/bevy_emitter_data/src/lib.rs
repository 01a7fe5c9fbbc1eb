//! Data side of the particle effect editor: keyframe curves, the flat
//! [`EmitterRecord`](record::EmitterRecord) handed to the simulation, and the
//! element tree effects are persisted as.
//!
//! Nothing here touches the disk or the UI.

pub mod curve;
pub mod decode;
pub mod document;
pub mod record;

pub use curve::{Curve, CurveMode, CurveSelector, DualCurve, KeyValue, Keyframe, MAX_KEYS, MIN_KEYS};
pub use decode::{record_from_element, records_from_document};
pub use document::{DocElement, DocumentError, FromAttr, ToAttr, from_ron, read_channel, tags, to_ron, write_channel};
pub use record::{
    BlendMode, DEFAULT_TEXTURE, EmissionMode, EmitterRecord, EmitterShape, FloatRange, MAX_ATTRACTORS,
    PointAttractor, RenderMode, ShapeKind, SimSpace,
};
