//! Immediate-mode UI surface the editor draws through.
//!
//! Property modules, the curve editor and the emitter windows only talk to
//! [`UiSurface`]; [`crate::egui_surface::EguiSurface`] is the real backend and
//! `testing::ScriptedSurface` drives them from tests.

use std::ops::{BitOr, BitOrAssign};

use bevy::prelude::*;
use bevy_egui::egui::{Color32, Pos2, Rect, Vec2};

/// Result of drawing one interactive control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Touch {
    /// The value was modified this frame.
    pub changed: bool,
    /// The control is focused or being dragged.
    pub active: bool,
}

impl Touch {
    pub const NONE: Self = Self {
        changed: false,
        active: false,
    };

    pub const CHANGED: Self = Self {
        changed: true,
        active: false,
    };

    /// Whether the edit should mark the owning module dirty.
    pub fn touched(&self) -> bool {
        self.changed || self.active
    }
}

impl BitOr for Touch {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            changed: self.changed || rhs.changed,
            active: self.active || rhs.active,
        }
    }
}

impl BitOrAssign for Touch {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

/// Pointer state over an invisible hit region.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerResponse {
    pub hovered: bool,
    pub dragging: bool,
    /// Pointer movement since last frame while dragging.
    pub drag_delta: Vec2,
    pub drag_stopped: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuItem<'a> {
    pub label: &'a str,
    pub enabled: bool,
}

/// What happened with a context menu this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MenuOutcome {
    /// Pointer position on the frame the menu was opened.
    pub opened_at: Option<Pos2>,
    /// Index of the item picked this frame.
    pub chosen: Option<usize>,
}

pub type SurfaceBody<'b> = &'b mut dyn FnMut(&mut dyn UiSurface);

pub trait UiSurface {
    // Text and buttons
    fn label(&mut self, text: &str);
    fn colored_label(&mut self, text: &str, color: Color32);
    fn button(&mut self, label: &str, enabled: bool) -> bool;
    fn separator(&mut self);

    // Value widgets
    fn checkbox(&mut self, label: &str, value: &mut bool) -> Touch;
    fn drag_float(&mut self, label: &str, value: &mut f32, speed: f32) -> Touch;
    fn drag_float_range(&mut self, label: &str, min: &mut f32, max: &mut f32, speed: f32) -> Touch;
    fn slider(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> Touch;
    fn drag_int(&mut self, label: &str, value: &mut i32) -> Touch;
    fn drag_int2(&mut self, label: &str, value: &mut IVec2) -> Touch;
    fn drag_vec3(&mut self, label: &str, value: &mut Vec3, speed: f32) -> Touch;
    fn color_rgba(&mut self, label: &str, value: &mut LinearRgba) -> Touch;
    fn text_field(&mut self, label: &str, value: &mut String) -> Touch;
    fn combo(&mut self, label: &str, selected: &mut usize, options: &[&str]) -> Touch;

    // Layout
    fn horizontal(&mut self, body: SurfaceBody<'_>);
    /// Scope child widget ids under `id`.
    fn push_id(&mut self, id: &str, body: SurfaceBody<'_>);
    fn collapsing(&mut self, id: &str, label: &str, body: SurfaceBody<'_>);
    /// Floating window; the close button clears `open`.
    fn window(&mut self, id: &str, title: &str, open: &mut bool, body: SurfaceBody<'_>);

    // Custom drawing
    /// Reserve a drawing area and return its screen rectangle.
    fn canvas(&mut self, size: Vec2) -> Rect;
    fn hit_region(&mut self, id: &str, rect: Rect) -> PointerResponse;
    fn context_menu(&mut self, id: &str, rect: Rect, items: &[MenuItem<'_>]) -> MenuOutcome;
    fn paint_rect(&mut self, rect: Rect, fill: Color32);
    fn paint_rect_outline(&mut self, rect: Rect, color: Color32);
    fn paint_line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32);
    fn paint_circle(&mut self, center: Pos2, radius: f32, color: Color32);
    fn paint_text(&mut self, pos: Pos2, text: &str, color: Color32);

    /// A text field currently holds keyboard focus.
    fn text_focused(&self) -> bool;
}

#[cfg(test)]
pub mod testing {
    //! Scripted [`UiSurface`] for driving panels without a window.
    //!
    //! Inputs are keyed by widget label (or region id) and consumed the first
    //! time the matching widget is drawn, so one script entry is one frame of
    //! user input.

    use std::collections::{HashMap, HashSet};

    use bevy::prelude::{IVec2, LinearRgba, Vec3};
    use bevy_egui::egui::{Color32, Pos2, Rect, Vec2};

    use super::{MenuItem, MenuOutcome, PointerResponse, SurfaceBody, Touch, UiSurface};

    #[derive(Clone, Debug, PartialEq)]
    pub enum Painted {
        Rect(Rect),
        Line(Pos2, Pos2, Color32),
        Circle(Pos2, Color32),
        Text(Pos2, String),
    }

    #[derive(Default)]
    pub struct ScriptedSurface {
        presses: HashSet<String>,
        floats: HashMap<String, f32>,
        ranges: HashMap<String, (f32, f32)>,
        ints: HashMap<String, i32>,
        int_pairs: HashMap<String, IVec2>,
        vec3s: HashMap<String, Vec3>,
        colors: HashMap<String, LinearRgba>,
        bools: HashMap<String, bool>,
        texts: HashMap<String, String>,
        selections: HashMap<String, usize>,
        active: HashSet<String>,
        hovers: HashSet<String>,
        drags: HashMap<String, Vec2>,
        releases: HashSet<String>,
        menu: Option<(Option<Pos2>, Option<String>)>,
        closes: HashSet<String>,
        pub focused: bool,
        pub canvas_origin: Pos2,

        /// Labels and buttons drawn, in order.
        pub drawn: Vec<String>,
        /// Buttons drawn disabled.
        pub disabled: Vec<String>,
        /// Items offered by the last context menu.
        pub menu_items: Vec<(String, bool)>,
        pub painted: Vec<Painted>,
        pub windows: Vec<String>,
    }

    impl ScriptedSurface {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn press(&mut self, label: &str) -> &mut Self {
            self.presses.insert(label.to_string());
            self
        }

        pub fn set_float(&mut self, label: &str, value: f32) -> &mut Self {
            self.floats.insert(label.to_string(), value);
            self
        }

        pub fn set_range(&mut self, label: &str, min: f32, max: f32) -> &mut Self {
            self.ranges.insert(label.to_string(), (min, max));
            self
        }

        pub fn set_int(&mut self, label: &str, value: i32) -> &mut Self {
            self.ints.insert(label.to_string(), value);
            self
        }

        pub fn set_int2(&mut self, label: &str, value: IVec2) -> &mut Self {
            self.int_pairs.insert(label.to_string(), value);
            self
        }

        pub fn set_vec3(&mut self, label: &str, value: Vec3) -> &mut Self {
            self.vec3s.insert(label.to_string(), value);
            self
        }

        pub fn set_color(&mut self, label: &str, value: LinearRgba) -> &mut Self {
            self.colors.insert(label.to_string(), value);
            self
        }

        pub fn set_bool(&mut self, label: &str, value: bool) -> &mut Self {
            self.bools.insert(label.to_string(), value);
            self
        }

        pub fn set_text(&mut self, label: &str, value: &str) -> &mut Self {
            self.texts.insert(label.to_string(), value.to_string());
            self
        }

        pub fn select(&mut self, label: &str, index: usize) -> &mut Self {
            self.selections.insert(label.to_string(), index);
            self
        }

        /// Report the widget as focused or dragged without changing it.
        pub fn hold(&mut self, label: &str) -> &mut Self {
            self.active.insert(label.to_string());
            self
        }

        pub fn hover(&mut self, region: &str) -> &mut Self {
            self.hovers.insert(region.to_string());
            self
        }

        pub fn drag(&mut self, region: &str, delta: Vec2) -> &mut Self {
            self.drags.insert(region.to_string(), delta);
            self
        }

        pub fn release(&mut self, region: &str) -> &mut Self {
            self.releases.insert(region.to_string());
            self
        }

        /// Open the next context menu at `at` and optionally pick an item.
        pub fn open_menu(&mut self, at: Pos2, choose: Option<&str>) -> &mut Self {
            self.menu = Some((Some(at), choose.map(str::to_string)));
            self
        }

        /// Pick an item from a menu opened on an earlier frame.
        pub fn choose_menu(&mut self, label: &str) -> &mut Self {
            self.menu = Some((None, Some(label.to_string())));
            self
        }

        pub fn close_window(&mut self, title: &str) -> &mut Self {
            self.closes.insert(title.to_string());
            self
        }

        pub fn circles(&self) -> Vec<(Pos2, Color32)> {
            self.painted
                .iter()
                .filter_map(|p| match p {
                    Painted::Circle(center, color) => Some((*center, *color)),
                    _ => None,
                })
                .collect()
        }

        pub fn texts(&self) -> Vec<String> {
            self.painted
                .iter()
                .filter_map(|p| match p {
                    Painted::Text(_, text) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }

        fn touch(&mut self, label: &str, changed: bool) -> Touch {
            Touch {
                changed,
                active: self.active.remove(label),
            }
        }

        fn apply<T>(
            map: &mut HashMap<String, T>,
            label: &str,
            value: &mut T,
        ) -> bool {
            match map.remove(label) {
                Some(new) => {
                    *value = new;
                    true
                }
                None => false,
            }
        }
    }

    impl UiSurface for ScriptedSurface {
        fn label(&mut self, text: &str) {
            self.drawn.push(text.to_string());
        }

        fn colored_label(&mut self, text: &str, _color: Color32) {
            self.drawn.push(text.to_string());
        }

        fn button(&mut self, label: &str, enabled: bool) -> bool {
            self.drawn.push(label.to_string());
            if !enabled {
                self.disabled.push(label.to_string());
                return false;
            }
            self.presses.remove(label)
        }

        fn separator(&mut self) {}

        fn checkbox(&mut self, label: &str, value: &mut bool) -> Touch {
            let changed = Self::apply(&mut self.bools, label, value);
            self.touch(label, changed)
        }

        fn drag_float(&mut self, label: &str, value: &mut f32, _speed: f32) -> Touch {
            let changed = Self::apply(&mut self.floats, label, value);
            self.touch(label, changed)
        }

        fn drag_float_range(&mut self, label: &str, min: &mut f32, max: &mut f32, _speed: f32) -> Touch {
            let changed = match self.ranges.remove(label) {
                Some((lo, hi)) => {
                    *min = lo;
                    *max = hi;
                    true
                }
                None => false,
            };
            self.touch(label, changed)
        }

        fn slider(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> Touch {
            let changed = Self::apply(&mut self.floats, label, value);
            *value = value.clamp(min, max);
            self.touch(label, changed)
        }

        fn drag_int(&mut self, label: &str, value: &mut i32) -> Touch {
            let changed = Self::apply(&mut self.ints, label, value);
            self.touch(label, changed)
        }

        fn drag_int2(&mut self, label: &str, value: &mut IVec2) -> Touch {
            let changed = Self::apply(&mut self.int_pairs, label, value);
            self.touch(label, changed)
        }

        fn drag_vec3(&mut self, label: &str, value: &mut Vec3, _speed: f32) -> Touch {
            let changed = Self::apply(&mut self.vec3s, label, value);
            self.touch(label, changed)
        }

        fn color_rgba(&mut self, label: &str, value: &mut LinearRgba) -> Touch {
            let changed = Self::apply(&mut self.colors, label, value);
            self.touch(label, changed)
        }

        fn text_field(&mut self, label: &str, value: &mut String) -> Touch {
            let changed = Self::apply(&mut self.texts, label, value);
            self.touch(label, changed)
        }

        fn combo(&mut self, label: &str, selected: &mut usize, options: &[&str]) -> Touch {
            let changed = match self.selections.remove(label) {
                Some(index) if index < options.len() && index != *selected => {
                    *selected = index;
                    true
                }
                _ => false,
            };
            self.touch(label, changed)
        }

        fn horizontal(&mut self, body: SurfaceBody<'_>) {
            body(self);
        }

        fn push_id(&mut self, _id: &str, body: SurfaceBody<'_>) {
            body(self);
        }

        fn collapsing(&mut self, _id: &str, label: &str, body: SurfaceBody<'_>) {
            self.drawn.push(label.to_string());
            body(self);
        }

        fn window(&mut self, _id: &str, title: &str, open: &mut bool, body: SurfaceBody<'_>) {
            if !*open {
                return;
            }
            self.windows.push(title.to_string());
            body(self);
            if self.closes.remove(title) {
                *open = false;
            }
        }

        fn canvas(&mut self, size: Vec2) -> Rect {
            Rect::from_min_size(self.canvas_origin, size)
        }

        fn hit_region(&mut self, id: &str, _rect: Rect) -> PointerResponse {
            let drag = self.drags.remove(id);
            PointerResponse {
                hovered: self.hovers.remove(id),
                dragging: drag.is_some(),
                drag_delta: drag.unwrap_or_default(),
                drag_stopped: self.releases.remove(id),
            }
        }

        fn context_menu(&mut self, _id: &str, _rect: Rect, items: &[MenuItem<'_>]) -> MenuOutcome {
            self.menu_items = items.iter().map(|i| (i.label.to_string(), i.enabled)).collect();
            let Some((at, choice)) = self.menu.take() else {
                return MenuOutcome::default();
            };
            let chosen = choice.and_then(|label| {
                items
                    .iter()
                    .position(|item| item.enabled && item.label == label)
            });
            MenuOutcome {
                opened_at: at,
                chosen,
            }
        }

        fn paint_rect(&mut self, rect: Rect, _fill: Color32) {
            self.painted.push(Painted::Rect(rect));
        }

        fn paint_rect_outline(&mut self, rect: Rect, _color: Color32) {
            self.painted.push(Painted::Rect(rect));
        }

        fn paint_line(&mut self, from: Pos2, to: Pos2, _width: f32, color: Color32) {
            self.painted.push(Painted::Line(from, to, color));
        }

        fn paint_circle(&mut self, center: Pos2, _radius: f32, color: Color32) {
            self.painted.push(Painted::Circle(center, color));
        }

        fn paint_text(&mut self, pos: Pos2, text: &str, _color: Color32) {
            self.painted.push(Painted::Text(pos, text.to_string()));
        }

        fn text_focused(&self) -> bool {
            self.focused
        }
    }
}
