use egui::{Color32, FontId};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(34, 37, 48);
pub const BG_LEFT_MENU: Color32 = Color32::from_rgb(28, 30, 39);
pub const BG_WEEKEND: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 5);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);
pub const BORDER_PROJECT: Color32 = Color32::from_rgb(70, 74, 92);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(90, 140, 220);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(255, 255, 255);

pub const TODAY_LINE: Color32 = Color32::from_rgb(240, 75, 75);
pub const TODAY_COLUMN: Color32 = Color32::from_rgba_premultiplied(240, 75, 75, 18);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 46, 58);
pub const GRID_LINE_THICK: Color32 = Color32::from_rgb(60, 63, 78);
pub const HANDLE_COLOR: Color32 = Color32::from_rgb(255, 255, 255);

pub const BAR_FILL: Color32 = Color32::from_rgb(70, 130, 180);
pub const BAR_GROUP_FILL: Color32 = Color32::from_rgb(106, 90, 205);
pub const BAR_INVALID: Color32 = Color32::from_rgb(72, 76, 92);
pub const BAR_PROJECTION: Color32 = Color32::from_rgb(200, 90, 90);
pub const PROGRESS_FILL: Color32 = Color32::from_rgb(45, 90, 130);
pub const ARROW_COLOR: Color32 = Color32::from_rgb(130, 135, 155);

pub const POPOVER_BG: Color32 = Color32::from_rgb(38, 40, 52);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const HANDLE_WIDTH: f32 = 7.0;
pub const BAR_ROUNDING: f32 = 4.0;
pub const ARROW_HEAD: f32 = 6.0;
pub const POPOVER_WIDTH: f32 = 240.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}
