//! Keyframed curves over normalized particle lifetime.
//!
//! A [`Curve`] is a short, bounded list of [`Keyframe`]s. A [`DualCurve`] wraps
//! two of them and a [`CurveMode`]: in `Single` mode only the primary curve is
//! used, in `RandomBetweenTwo` mode the simulation picks a random blend between
//! both curves for every particle.
//!
//! Keys are re-sorted at mutation boundaries (add, delete, mode switch, end of
//! a drag) and never while a key is being dragged. Anything that reads keys for
//! evaluation or serialization goes through [`Curve::sorted_keys`].

use std::cmp::Ordering;

use bevy::prelude::*;

/// Fewest keys a user-edited curve may hold.
pub const MIN_KEYS: usize = 2;
/// Most keys a single curve may hold. In dual mode each curve gets half.
pub const MAX_KEYS: usize = 8;

// ---------------------------------------------------------------------------
// Key values
// ---------------------------------------------------------------------------

/// Value types a keyframe can carry.
pub trait KeyValue: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// The "1" used by default curves (opaque white for colors).
    const ONE: Self;
    /// The "0" used by flat zero curves (transparent black for colors).
    const ZERO: Self;

    /// Linear interpolation between `a` and `b`.
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl KeyValue for f32 {
    const ONE: Self = 1.0;
    const ZERO: Self = 0.0;

    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl KeyValue for LinearRgba {
    const ONE: Self = LinearRgba::WHITE;
    const ZERO: Self = LinearRgba::new(0.0, 0.0, 0.0, 0.0);

    fn lerp(a: Self, b: Self, t: f32) -> Self {
        LinearRgba::new(
            a.red + (b.red - a.red) * t,
            a.green + (b.green - a.green) * t,
            a.blue + (b.blue - a.blue) * t,
            a.alpha + (b.alpha - a.alpha) * t,
        )
    }
}

// ---------------------------------------------------------------------------
// Keyframe
// ---------------------------------------------------------------------------

/// Single control point of a curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe<V> {
    /// Normalized time (0.0 - 1.0).
    pub time: f32,
    /// Value at this key.
    pub value: V,
}

impl<V> Keyframe<V> {
    pub const fn new(time: f32, value: V) -> Self {
        Self { time, value }
    }
}

fn by_time<V>(a: &Keyframe<V>, b: &Keyframe<V>) -> Ordering {
    a.time.total_cmp(&b.time)
}

// ---------------------------------------------------------------------------
// Curve<V>
// ---------------------------------------------------------------------------

/// Ordered, bounded list of keyframes for one animated channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve<V> {
    keys: Vec<Keyframe<V>>,
}

impl<V: KeyValue> Default for Curve<V> {
    fn default() -> Self {
        Self::constant(V::ONE)
    }
}

impl<V: KeyValue> Curve<V> {
    /// Curve with no keys. Only used for a secondary curve that has never been
    /// populated; every editing path refills it before use.
    pub fn empty() -> Self {
        Self { keys: Vec::new() }
    }

    /// Build a curve from arbitrary keys: sorted by time and truncated to
    /// [`MAX_KEYS`]. The minimum is not enforced here.
    pub fn from_keys(keys: impl IntoIterator<Item = Keyframe<V>>) -> Self {
        let mut keys: Vec<_> = keys.into_iter().collect();
        keys.sort_by(by_time);
        keys.truncate(MAX_KEYS);
        Self { keys }
    }

    /// Flat curve holding `value` from start to end of life.
    pub fn constant(value: V) -> Self {
        Self::linear(value, value)
    }

    /// Linear ramp from `start` to `end`.
    pub fn linear(start: V, end: V) -> Self {
        Self {
            keys: vec![Keyframe::new(0.0, start), Keyframe::new(1.0, end)],
        }
    }

    pub fn keys(&self) -> &[Keyframe<V>] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.keys.windows(2).all(|w| w[0].time <= w[1].time)
    }

    /// Keys in time order, whether or not a drag is in progress.
    pub fn sorted_keys(&self) -> Vec<Keyframe<V>> {
        let mut keys = self.keys.clone();
        keys.sort_by(by_time);
        keys
    }

    pub fn sort_keys(&mut self) {
        self.keys.sort_by(by_time);
    }

    /// Insert a key and re-sort. Refused at [`MAX_KEYS`].
    pub fn add_key(&mut self, time: f32, value: V) -> bool {
        self.add_key_bounded(time, value, MAX_KEYS)
    }

    pub(crate) fn add_key_bounded(&mut self, time: f32, value: V, limit: usize) -> bool {
        if self.keys.len() >= limit.min(MAX_KEYS) {
            return false;
        }
        self.keys.push(Keyframe::new(time.clamp(0.0, 1.0), value));
        self.sort_keys();
        true
    }

    /// Remove the key at `index` and re-sort. Refused at [`MIN_KEYS`] or for
    /// an out-of-range index.
    pub fn delete_key(&mut self, index: usize) -> bool {
        if self.keys.len() <= MIN_KEYS || index >= self.keys.len() {
            return false;
        }
        self.keys.remove(index);
        self.sort_keys();
        true
    }

    /// Overwrite a key in place without re-sorting (drag in progress).
    pub fn move_key(&mut self, index: usize, time: f32, value: V) -> bool {
        let Some(key) = self.keys.get_mut(index) else {
            return false;
        };
        key.time = time.clamp(0.0, 1.0);
        key.value = value;
        true
    }

    /// Sample the curve at normalized time `t` (clamped to [0..1]).
    pub fn sample(&self, t: f32) -> V {
        let t = t.clamp(0.0, 1.0);
        let keys = self.sorted_keys();

        let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
            return V::ZERO;
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        for window in keys.windows(2) {
            let (a, b) = (&window[0], &window[1]);
            if t >= a.time && t <= b.time {
                let span = b.time - a.time;
                if span.abs() < 1e-6 {
                    return a.value;
                }
                return V::lerp(a.value, b.value, (t - a.time) / span);
            }
        }

        last.value
    }
}

// ---------------------------------------------------------------------------
// DualCurve<V>
// ---------------------------------------------------------------------------

/// How a [`DualCurve`] is sampled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CurveMode {
    #[default]
    Single,
    RandomBetweenTwo,
}

impl CurveMode {
    pub const ALL: [Self; 2] = [Self::Single, Self::RandomBetweenTwo];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::RandomBetweenTwo => "RandomBetweenTwo",
        }
    }
}

/// Which of the two curves an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveSelector {
    Primary,
    Secondary,
}

impl CurveSelector {
    pub const ALL: [Self; 2] = [Self::Primary, Self::Secondary];
}

/// One animated channel: a primary curve, plus a secondary curve that only
/// matters in [`CurveMode::RandomBetweenTwo`].
#[derive(Clone, Debug, PartialEq)]
pub struct DualCurve<V> {
    mode: CurveMode,
    primary: Curve<V>,
    secondary: Curve<V>,
}

impl<V: KeyValue> Default for DualCurve<V> {
    fn default() -> Self {
        Self::single(Curve::default())
    }
}

impl<V: KeyValue> DualCurve<V> {
    /// Secondary curve adopted when switching to dual mode without one.
    pub fn default_secondary() -> Curve<V> {
        Curve::constant(V::ONE)
    }

    pub fn single(primary: Curve<V>) -> Self {
        Self {
            mode: CurveMode::Single,
            primary,
            secondary: Curve::empty(),
        }
    }

    /// Channel in random-between-two mode. A secondary curve with too few keys
    /// is replaced by [`Self::default_secondary`].
    pub fn random_between(primary: Curve<V>, secondary: Curve<V>) -> Self {
        let mut curve = Self {
            mode: CurveMode::Single,
            primary,
            secondary,
        };
        curve.set_mode(CurveMode::RandomBetweenTwo);
        curve
    }

    /// Single-mode channel that keeps a stashed secondary curve for later.
    pub fn with_inert_secondary(primary: Curve<V>, secondary: Curve<V>) -> Self {
        Self {
            mode: CurveMode::Single,
            primary,
            secondary,
        }
    }

    pub fn mode(&self) -> CurveMode {
        self.mode
    }

    pub fn is_random_between_two(&self) -> bool {
        self.mode == CurveMode::RandomBetweenTwo
    }

    pub fn primary(&self) -> &Curve<V> {
        &self.primary
    }

    pub fn secondary(&self) -> &Curve<V> {
        &self.secondary
    }

    pub fn curve(&self, selector: CurveSelector) -> &Curve<V> {
        match selector {
            CurveSelector::Primary => &self.primary,
            CurveSelector::Secondary => &self.secondary,
        }
    }

    /// Curves that are live in the current mode.
    pub fn active_selectors(&self) -> &'static [CurveSelector] {
        match self.mode {
            CurveMode::Single => &CurveSelector::ALL[..1],
            CurveMode::RandomBetweenTwo => &CurveSelector::ALL,
        }
    }

    fn active_curve_mut(&mut self, selector: CurveSelector) -> Option<&mut Curve<V>> {
        match (selector, self.mode) {
            (CurveSelector::Primary, _) => Some(&mut self.primary),
            (CurveSelector::Secondary, CurveMode::RandomBetweenTwo) => Some(&mut self.secondary),
            (CurveSelector::Secondary, CurveMode::Single) => None,
        }
    }

    /// Per-curve key budget: the whole budget in single mode, half of it per
    /// curve in dual mode.
    pub fn key_limit(&self) -> usize {
        match self.mode {
            CurveMode::Single => MAX_KEYS,
            CurveMode::RandomBetweenTwo => MAX_KEYS / 2,
        }
    }

    pub fn can_add(&self, selector: CurveSelector) -> bool {
        self.active_selectors().contains(&selector) && self.curve(selector).len() < self.key_limit()
    }

    pub fn can_delete(&self, selector: CurveSelector) -> bool {
        self.active_selectors().contains(&selector) && self.curve(selector).len() > MIN_KEYS
    }

    pub fn add_key(&mut self, selector: CurveSelector, time: f32, value: V) -> bool {
        let limit = self.key_limit();
        self.active_curve_mut(selector)
            .is_some_and(|curve| curve.add_key_bounded(time, value, limit))
    }

    pub fn delete_key(&mut self, selector: CurveSelector, index: usize) -> bool {
        self.active_curve_mut(selector)
            .is_some_and(|curve| curve.delete_key(index))
    }

    pub fn move_key(&mut self, selector: CurveSelector, index: usize, time: f32, value: V) -> bool {
        self.active_curve_mut(selector)
            .is_some_and(|curve| curve.move_key(index, time, value))
    }

    /// Re-sort both curves. Called when a drag ends.
    pub fn sort_keys(&mut self) {
        self.primary.sort_keys();
        self.secondary.sort_keys();
    }

    pub fn set_mode(&mut self, mode: CurveMode) {
        self.mode = mode;
        if mode == CurveMode::RandomBetweenTwo && self.secondary.len() < MIN_KEYS {
            self.secondary = Self::default_secondary();
        }
        self.sort_keys();
    }

    /// Sample with an explicit blend between the primary (0.0) and secondary
    /// (1.0) curve. Single mode ignores `blend`.
    pub fn sample(&self, t: f32, blend: f32) -> V {
        let a = self.primary.sample(t);
        match self.mode {
            CurveMode::Single => a,
            CurveMode::RandomBetweenTwo => V::lerp(a, self.secondary.sample(t), blend.clamp(0.0, 1.0)),
        }
    }

    /// Sample with a random blend, as the simulation does per particle.
    ///
    /// The editor never calls this; it is the entry point for whatever
    /// consumes `EmitterRecord` copies to drive particles.
    pub fn sample_random(&self, t: f32) -> V {
        self.sample(t, fastrand::f32())
    }
}
