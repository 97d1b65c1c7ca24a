//! Layout unit conversions used by WordprocessingML.

/// Twips per typographic point.
pub const TWIPS_PER_POINT: f32 = 20.0;

/// Line-spacing units per single line (`w:spacing/@w:line` with `auto` rule).
pub const LINE_UNITS_PER_LINE: f32 = 240.0;

/// Twips per character of first-line indent.
pub const TWIPS_PER_INDENT_CHAR: f32 = 180.0;

/// English Metric Units per pixel at 96 DPI.
pub const EMU_PER_PIXEL: u64 = 9525;

pub fn points_to_twips(points: f32) -> u32 {
    (points * TWIPS_PER_POINT).round().max(0.0) as u32
}

pub fn line_multiplier_to_units(multiplier: f32) -> u32 {
    (multiplier * LINE_UNITS_PER_LINE).round().max(0.0) as u32
}

pub fn indent_chars_to_twips(chars: f32) -> u32 {
    (chars * TWIPS_PER_INDENT_CHAR).round().max(0.0) as u32
}

/// Font sizes are stored in half-points (`w:sz`).
pub fn points_to_half_points(points: f32) -> u32 {
    (points * 2.0).round().max(0.0) as u32
}

pub fn pixels_to_emu(pixels: u32) -> u64 {
    u64::from(pixels) * EMU_PER_PIXEL
}
