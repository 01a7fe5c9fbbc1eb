use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

/// Resource to track if theme has been applied
#[derive(Resource, Default)]
pub struct ThemeApplied(pub bool);

/// Editor color palette
pub mod colors {
    use bevy_egui::egui::Color32;

    // Backgrounds
    pub const BG_DARKEST: Color32 = Color32::from_rgb(20, 20, 22);
    pub const BG_DARK: Color32 = Color32::from_rgba_premultiplied(25, 25, 28, 250);
    pub const BG_MEDIUM: Color32 = Color32::from_rgb(40, 40, 43);
    pub const BG_LIGHT: Color32 = Color32::from_rgb(50, 50, 53);

    // Text colors
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(220, 220, 220);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 160, 160);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);

    // Accent colors
    pub const ACCENT_BLUE: Color32 = Color32::from_rgb(86, 156, 214);

    pub const SELECTION_BG: Color32 = Color32::from_rgb(38, 79, 120);

    // Curve canvas
    pub const CURVE_BG: Color32 = Color32::from_rgb(30, 30, 34);
    pub const CURVE_GRID: Color32 = Color32::from_rgb(58, 58, 64);
    pub const CURVE_PRIMARY: Color32 = Color32::from_rgb(230, 90, 90);
    pub const CURVE_SECONDARY: Color32 = Color32::from_rgb(90, 200, 90);
    pub const CURVE_LABEL: Color32 = Color32::from_rgb(220, 220, 220);

    // Widget colors
    pub const WIDGET_BG: Color32 = Color32::from_rgb(50, 50, 53);
    pub const WIDGET_BG_HOVER: Color32 = Color32::from_rgb(60, 60, 65);
    pub const WIDGET_BG_ACTIVE: Color32 = Color32::from_rgb(70, 70, 75);
    pub const WIDGET_BORDER: Color32 = Color32::from_rgb(70, 70, 75);

    // Status colors
    pub const STATUS_WARNING: Color32 = Color32::from_rgb(230, 180, 80);
    pub const STATUS_ERROR: Color32 = Color32::from_rgb(230, 90, 90);
}

/// Apply the dark theme to egui once the primary context exists
pub fn apply_editor_theme(mut contexts: EguiContexts, mut theme_applied: ResMut<ThemeApplied>) {
    if theme_applied.0 {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.window_margin = egui::Margin::same(8);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);

    style.visuals.window_corner_radius = egui::CornerRadius::same(6);
    style.visuals.window_fill = colors::BG_DARK;
    style.visuals.window_stroke = egui::Stroke::new(1.0, colors::WIDGET_BORDER);

    style.visuals.widgets.inactive.bg_fill = colors::WIDGET_BG;
    style.visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, colors::WIDGET_BORDER);
    style.visuals.widgets.hovered.bg_fill = colors::WIDGET_BG_HOVER;
    style.visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, colors::ACCENT_BLUE);
    style.visuals.widgets.active.bg_fill = colors::WIDGET_BG_ACTIVE;
    style.visuals.widgets.active.bg_stroke = egui::Stroke::new(1.0, colors::ACCENT_BLUE);

    style.visuals.selection.bg_fill = colors::SELECTION_BG;
    style.visuals.selection.stroke = egui::Stroke::new(1.0, colors::ACCENT_BLUE);
    style.visuals.extreme_bg_color = colors::BG_DARKEST;
    style.visuals.faint_bg_color = colors::BG_MEDIUM;
    style.visuals.override_text_color = Some(colors::TEXT_PRIMARY);
    style.visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, colors::BG_LIGHT);

    ctx.set_style(style);
    theme_applied.0 = true;

    info!("Applied particle editor theme");
}
