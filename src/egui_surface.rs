use bevy::prelude::*;
use bevy_egui::egui::{self, Color32, Pos2, Rect, Vec2};

use crate::surface::{MenuItem, MenuOutcome, PointerResponse, SurfaceBody, Touch, UiSurface};
use crate::theme::colors;

/// [`UiSurface`] backed by an `egui::Ui`.
pub struct EguiSurface<'a> {
    ui: &'a mut egui::Ui,
}

impl<'a> EguiSurface<'a> {
    pub fn new(ui: &'a mut egui::Ui) -> Self {
        Self { ui }
    }
}

fn touch(response: &egui::Response) -> Touch {
    Touch {
        changed: response.changed(),
        active: response.has_focus() || response.dragged(),
    }
}

fn field_label(ui: &mut egui::Ui, label: &str) {
    ui.label(egui::RichText::new(label).color(colors::TEXT_SECONDARY));
}

fn to_rgba(color: LinearRgba) -> [f32; 4] {
    [color.red, color.green, color.blue, color.alpha]
}

impl UiSurface for EguiSurface<'_> {
    fn label(&mut self, text: &str) {
        self.ui.label(text);
    }

    fn colored_label(&mut self, text: &str, color: Color32) {
        self.ui.label(egui::RichText::new(text).color(color));
    }

    fn button(&mut self, label: &str, enabled: bool) -> bool {
        self.ui.add_enabled(enabled, egui::Button::new(label)).clicked()
    }

    fn separator(&mut self) {
        self.ui.separator();
    }

    fn checkbox(&mut self, label: &str, value: &mut bool) -> Touch {
        touch(&self.ui.checkbox(value, label))
    }

    fn drag_float(&mut self, label: &str, value: &mut f32, speed: f32) -> Touch {
        self.ui
            .horizontal(|ui| {
                field_label(ui, label);
                touch(&ui.add(egui::DragValue::new(value).speed(speed).max_decimals(3)))
            })
            .inner
    }

    fn drag_float_range(&mut self, label: &str, min: &mut f32, max: &mut f32, speed: f32) -> Touch {
        self.ui
            .horizontal(|ui| {
                field_label(ui, label);
                ui.label(egui::RichText::new("min").color(colors::TEXT_MUTED));
                let lo = ui.add(egui::DragValue::new(min).speed(speed).max_decimals(2));
                ui.label(egui::RichText::new("max").color(colors::TEXT_MUTED));
                let hi = ui.add(egui::DragValue::new(max).speed(speed).max_decimals(2));
                touch(&lo) | touch(&hi)
            })
            .inner
    }

    fn slider(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> Touch {
        touch(&self.ui.add(egui::Slider::new(value, min..=max).text(label)))
    }

    fn drag_int(&mut self, label: &str, value: &mut i32) -> Touch {
        self.ui
            .horizontal(|ui| {
                field_label(ui, label);
                touch(&ui.add(egui::DragValue::new(value)))
            })
            .inner
    }

    fn drag_int2(&mut self, label: &str, value: &mut IVec2) -> Touch {
        self.ui
            .horizontal(|ui| {
                field_label(ui, label);
                let x = ui.add(egui::DragValue::new(&mut value.x).prefix("x:").range(1..=64));
                let y = ui.add(egui::DragValue::new(&mut value.y).prefix("y:").range(1..=64));
                touch(&x) | touch(&y)
            })
            .inner
    }

    fn drag_vec3(&mut self, label: &str, value: &mut Vec3, speed: f32) -> Touch {
        self.ui
            .horizontal(|ui| {
                field_label(ui, label);
                let mut result = Touch::NONE;
                for (axis, prefix) in [(&mut value.x, "x:"), (&mut value.y, "y:"), (&mut value.z, "z:")] {
                    let response = ui.add(egui::DragValue::new(axis).speed(speed).prefix(prefix).max_decimals(3));
                    result |= touch(&response);
                }
                result
            })
            .inner
    }

    fn color_rgba(&mut self, label: &str, value: &mut LinearRgba) -> Touch {
        self.ui
            .horizontal(|ui| {
                field_label(ui, label);
                let mut rgba = to_rgba(*value);
                let response = ui.color_edit_button_rgba_unmultiplied(&mut rgba);
                if response.changed() {
                    *value = LinearRgba::new(rgba[0], rgba[1], rgba[2], rgba[3]);
                }
                touch(&response)
            })
            .inner
    }

    fn text_field(&mut self, label: &str, value: &mut String) -> Touch {
        self.ui
            .horizontal(|ui| {
                field_label(ui, label);
                touch(&ui.text_edit_singleline(value))
            })
            .inner
    }

    fn combo(&mut self, label: &str, selected: &mut usize, options: &[&str]) -> Touch {
        let current = options.get(*selected).copied().unwrap_or_default();
        let mut changed = false;
        self.ui.horizontal(|ui| {
            field_label(ui, label);
            egui::ComboBox::from_id_salt(label)
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for (index, option) in options.iter().enumerate() {
                        changed |= ui.selectable_value(selected, index, *option).changed();
                    }
                });
        });
        Touch {
            changed,
            active: false,
        }
    }

    fn horizontal(&mut self, body: SurfaceBody<'_>) {
        self.ui.horizontal(|ui| body(&mut EguiSurface::new(ui)));
    }

    fn push_id(&mut self, id: &str, body: SurfaceBody<'_>) {
        self.ui.push_id(id, |ui| body(&mut EguiSurface::new(ui)));
    }

    fn collapsing(&mut self, id: &str, label: &str, body: SurfaceBody<'_>) {
        egui::CollapsingHeader::new(label)
            .id_salt(id)
            .show(self.ui, |ui| body(&mut EguiSurface::new(ui)));
    }

    fn window(&mut self, id: &str, title: &str, open: &mut bool, body: SurfaceBody<'_>) {
        let ctx = self.ui.ctx().clone();
        egui::Window::new(title)
            .id(self.ui.id().with(id))
            .open(open)
            .resizable(false)
            .show(&ctx, |ui| body(&mut EguiSurface::new(ui)));
    }

    fn canvas(&mut self, size: Vec2) -> Rect {
        let (rect, _) = self.ui.allocate_exact_size(size, egui::Sense::hover());
        rect
    }

    fn hit_region(&mut self, id: &str, rect: Rect) -> PointerResponse {
        let response = self.ui.interact(rect, self.ui.id().with(id), egui::Sense::drag());
        PointerResponse {
            hovered: response.hovered(),
            dragging: response.dragged(),
            drag_delta: response.drag_delta(),
            drag_stopped: response.drag_stopped(),
        }
    }

    fn context_menu(&mut self, id: &str, rect: Rect, items: &[MenuItem<'_>]) -> MenuOutcome {
        let response = self.ui.interact(rect, self.ui.id().with(id), egui::Sense::click());
        let mut outcome = MenuOutcome {
            opened_at: response
                .secondary_clicked()
                .then(|| response.interact_pointer_pos())
                .flatten(),
            chosen: None,
        };
        response.context_menu(|ui| {
            for (index, item) in items.iter().enumerate() {
                if ui.add_enabled(item.enabled, egui::Button::new(item.label)).clicked() {
                    outcome.chosen = Some(index);
                    ui.close();
                }
            }
        });
        outcome
    }

    fn paint_rect(&mut self, rect: Rect, fill: Color32) {
        self.ui.painter().rect_filled(rect, 0.0, fill);
    }

    fn paint_rect_outline(&mut self, rect: Rect, color: Color32) {
        self.ui.painter().rect_stroke(
            rect,
            egui::CornerRadius::same(2),
            egui::Stroke::new(1.0, color),
            egui::StrokeKind::Inside,
        );
    }

    fn paint_line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        self.ui.painter().line_segment([from, to], egui::Stroke::new(width, color));
    }

    fn paint_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.ui.painter().circle_filled(center, radius, color);
    }

    fn paint_text(&mut self, pos: Pos2, text: &str, color: Color32) {
        self.ui.painter().text(
            pos,
            egui::Align2::LEFT_TOP,
            text,
            egui::FontId::proportional(11.0),
            color,
        );
    }

    fn text_focused(&self) -> bool {
        self.ui.ctx().wants_keyboard_input()
    }
}
