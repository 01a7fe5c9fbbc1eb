//! Interactive editor for one [`DualCurve<f32>`] channel.
//!
//! The editor never owns the curve. The owning module stores which channel is
//! being edited and lends the curve for the duration of [`CurveEditor::show`].

use bevy_egui::egui::{Pos2, Rect, Vec2, pos2, vec2};
use bevy_emitter_data::{CurveMode, CurveSelector, DualCurve};

use crate::surface::{MenuItem, Touch, UiSurface};
use crate::theme::colors;

/// Radius of a key handle in pixels.
pub const KEY_RADIUS: f32 = 5.0;
/// Canvas size used when no setting overrides it.
pub const DEFAULT_CANVAS_SIZE: Vec2 = vec2(400.0, 200.0);

const GRID_COLUMNS: usize = 10;
const GRID_ROWS: usize = 4;
const LABEL_WIDTH: f32 = 20.0;
const CURVE_LINE_WIDTH: f32 = 3.0;

const ADD_KEY: &str = "Add Key";
const ADD_KEY_PRIMARY: &str = "Add Key (Red Curve)";
const ADD_KEY_SECONDARY: &str = "Add Key (Green Curve)";
const DELETE_KEY: &str = "Delete Key";

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Maps curve space to canvas pixels. Time runs left to right, values bottom
/// to top. Unipolar curves span `[0, 1]`, bipolar curves `[-1, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveMapping {
    pub rect: Rect,
    pub bipolar: bool,
}

impl CurveMapping {
    pub fn to_screen(&self, time: f32, value: f32) -> Pos2 {
        let unit = if self.bipolar { (value + 1.0) / 2.0 } else { value };
        pos2(
            self.rect.min.x + time * self.rect.width(),
            self.rect.min.y + (1.0 - unit) * self.rect.height(),
        )
    }

    /// Inverse of [`Self::to_screen`]; points outside the canvas are clamped
    /// to its edge first.
    pub fn to_curve(&self, pos: Pos2) -> (f32, f32) {
        let pos = self.rect.clamp(pos);
        let time = (pos.x - self.rect.min.x) / self.rect.width();
        let unit = 1.0 - (pos.y - self.rect.min.y) / self.rect.height();
        let value = if self.bipolar { 2.0 * unit - 1.0 } else { unit };
        (time, value)
    }
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// A key of either curve, by index into that curve's key list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyRef {
    pub curve: CurveSelector,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuAction {
    Add(CurveSelector),
    Delete,
}

pub(crate) fn key_region_id(key: KeyRef) -> String {
    let curve = match key.curve {
        CurveSelector::Primary => 0,
        CurveSelector::Secondary => 1,
    };
    format!("key_{curve}_{}", key.index)
}

pub struct CurveEditor<C> {
    channel: C,
    title: String,
    bipolar: bool,
    canvas_size: Vec2,
    open: bool,
    /// Key under the pointer on the previous frame.
    hovered: Option<KeyRef>,
    menu_anchor: Option<Pos2>,
    menu_target: Option<KeyRef>,
    pending_delete: Option<KeyRef>,
}

impl<C: Copy> CurveEditor<C> {
    pub fn new(channel: C, title: impl Into<String>, bipolar: bool) -> Self {
        Self {
            channel,
            title: title.into(),
            bipolar,
            canvas_size: DEFAULT_CANVAS_SIZE,
            open: true,
            hovered: None,
            menu_anchor: None,
            menu_target: None,
            pending_delete: None,
        }
    }

    pub fn with_canvas_size(mut self, size: Vec2) -> Self {
        self.canvas_size = size;
        self
    }

    /// Channel the owning module should lend to [`Self::show`].
    pub fn channel(&self) -> C {
        self.channel
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// False once the user closed the window; the owner drops the editor on
    /// its next render.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Draw the editor window for `curve` and apply this frame's edits.
    pub fn show(&mut self, ui: &mut dyn UiSurface, curve: &mut DualCurve<f32>) -> Touch {
        let mut open = self.open;
        let mut result = Touch::NONE;
        let title = format!("Curve Editor - {}", self.title);
        ui.window("curve_editor", &title, &mut open, &mut |ui| {
            result = self.draw(ui, curve);
        });
        self.open = open;
        result
    }

    fn draw(&mut self, ui: &mut dyn UiSurface, curve: &mut DualCurve<f32>) -> Touch {
        let mut result = Touch::NONE;

        let labels: Vec<&str> = CurveMode::ALL.iter().map(CurveMode::label).collect();
        let mut mode_index = CurveMode::ALL
            .iter()
            .position(|m| *m == curve.mode())
            .unwrap_or_default();
        let mode_touch = ui.combo("Curve Mode", &mut mode_index, &labels);
        if mode_touch.changed {
            curve.set_mode(CurveMode::ALL[mode_index]);
            self.hovered = None;
            self.menu_target = None;
        }
        result |= mode_touch;

        let rect = ui.canvas(self.canvas_size);
        let mapping = CurveMapping {
            rect,
            bipolar: self.bipolar,
        };

        self.draw_grid(ui, rect);
        self.draw_axis_labels(ui, rect);
        result |= self.update_context_menu(ui, curve, mapping);
        result |= self.update_keys(ui, curve, mapping);

        if let Some(target) = self.pending_delete.take()
            && curve.delete_key(target.curve, target.index)
        {
            result.changed = true;
        }

        result
    }

    fn draw_grid(&self, ui: &mut dyn UiSurface, rect: Rect) {
        ui.paint_rect(rect, colors::CURVE_BG);
        for column in 1..GRID_COLUMNS {
            let x = rect.min.x + rect.width() * column as f32 / GRID_COLUMNS as f32;
            ui.paint_line(pos2(x, rect.min.y), pos2(x, rect.max.y), 1.0, colors::CURVE_GRID);
        }
        for row in 1..GRID_ROWS {
            let y = rect.min.y + rect.height() * row as f32 / GRID_ROWS as f32;
            ui.paint_line(pos2(rect.min.x, y), pos2(rect.max.x, y), 1.0, colors::CURVE_GRID);
        }
        ui.paint_rect_outline(rect, colors::WIDGET_BORDER);
    }

    fn draw_axis_labels(&self, ui: &mut dyn UiSurface, rect: Rect) {
        let (middle, bottom) = if self.bipolar { ("0.0", "-1.0") } else { ("0.5", "0.0") };
        let (width, height) = (rect.width(), rect.height());

        ui.paint_text(rect.min, "1.0", colors::CURVE_LABEL);
        ui.paint_text(pos2(rect.min.x, rect.min.y + height * 0.5), middle, colors::CURVE_LABEL);
        ui.paint_text(pos2(rect.min.x, rect.max.y - LABEL_WIDTH * 0.5), bottom, colors::CURVE_LABEL);

        ui.paint_text(pos2(rect.min.x + width * 0.5, rect.max.y - LABEL_WIDTH * 0.5), "0.5", colors::CURVE_LABEL);
        ui.paint_text(pos2(rect.max.x - LABEL_WIDTH, rect.max.y - LABEL_WIDTH * 0.5), "1.0", colors::CURVE_LABEL);
    }

    fn update_context_menu(
        &mut self,
        ui: &mut dyn UiSurface,
        curve: &mut DualCurve<f32>,
        mapping: CurveMapping,
    ) -> Touch {
        let mut entries: Vec<(&str, MenuAction, bool)> = match curve.mode() {
            CurveMode::Single => vec![(
                ADD_KEY,
                MenuAction::Add(CurveSelector::Primary),
                curve.can_add(CurveSelector::Primary),
            )],
            CurveMode::RandomBetweenTwo => vec![
                (
                    ADD_KEY_PRIMARY,
                    MenuAction::Add(CurveSelector::Primary),
                    curve.can_add(CurveSelector::Primary),
                ),
                (
                    ADD_KEY_SECONDARY,
                    MenuAction::Add(CurveSelector::Secondary),
                    curve.can_add(CurveSelector::Secondary),
                ),
            ],
        };
        let delete_target = self.menu_target.or(self.hovered);
        let can_delete = delete_target.is_some_and(|key| {
            curve.can_delete(key.curve) && key.index < curve.curve(key.curve).len()
        });
        entries.push((DELETE_KEY, MenuAction::Delete, can_delete));

        let items: Vec<MenuItem<'_>> = entries
            .iter()
            .map(|(label, _, enabled)| MenuItem {
                label,
                enabled: *enabled,
            })
            .collect();
        let outcome = ui.context_menu("curve_canvas", mapping.rect, &items);

        if let Some(at) = outcome.opened_at {
            self.menu_anchor = Some(at);
            self.menu_target = self.hovered;
        }

        let Some((_, action, _)) = outcome.chosen.and_then(|i| entries.get(i)) else {
            return Touch::NONE;
        };
        let touch = match *action {
            MenuAction::Add(selector) => {
                let anchor = self.menu_anchor.unwrap_or_else(|| mapping.rect.center());
                let (time, value) = mapping.to_curve(anchor);
                Touch {
                    changed: curve.add_key(selector, time, value),
                    active: false,
                }
            }
            MenuAction::Delete => {
                self.pending_delete = self.menu_target;
                Touch::NONE
            }
        };
        self.menu_anchor = None;
        self.menu_target = None;
        touch
    }

    fn update_keys(&mut self, ui: &mut dyn UiSurface, curve: &mut DualCurve<f32>, mapping: CurveMapping) -> Touch {
        let mut result = Touch::NONE;
        let mut hovered = None;
        let mut drag_stopped = false;

        for &selector in curve.active_selectors() {
            let color = match selector {
                CurveSelector::Primary => colors::CURVE_PRIMARY,
                CurveSelector::Secondary => colors::CURVE_SECONDARY,
            };

            for index in 0..curve.curve(selector).len() {
                let key = curve.curve(selector).keys()[index];
                let key_ref = KeyRef { curve: selector, index };
                let mut center = mapping.to_screen(key.time, key.value);

                let handle = Rect::from_center_size(center, Vec2::splat(2.0 * KEY_RADIUS));
                let pointer = ui.hit_region(&key_region_id(key_ref), handle);
                if pointer.hovered {
                    hovered = Some(key_ref);
                }
                if pointer.dragging {
                    center = mapping.rect.clamp(center + pointer.drag_delta);
                    let (time, value) = mapping.to_curve(center);
                    curve.move_key(selector, index, time, value);
                    result |= Touch {
                        changed: pointer.drag_delta != Vec2::ZERO,
                        active: true,
                    };
                }
                drag_stopped |= pointer.drag_stopped;

                ui.paint_circle(center, KEY_RADIUS, color);
            }

            let keys = curve.curve(selector).keys();
            for pair in keys.windows(2) {
                ui.paint_line(
                    mapping.to_screen(pair[0].time, pair[0].value),
                    mapping.to_screen(pair[1].time, pair[1].value),
                    CURVE_LINE_WIDTH,
                    color,
                );
            }
        }

        if drag_stopped {
            curve.sort_keys();
            // Indices captured before the sort no longer name the same key.
            self.menu_target = None;
            result.changed = true;
        }
        self.hovered = hovered;
        result
    }
}
