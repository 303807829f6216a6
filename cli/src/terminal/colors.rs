use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 120, g: 200, b: 120 };
pub const ACCENT: Color = Color::TrueColor { r: 240, g: 190, b: 90 };
pub const SEPARATOR: Color = Color::TrueColor { r: 110, g: 110, b: 110 };
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 210, g: 210, b: 210 };
pub const SIZE: Color = Color::TrueColor { r: 130, g: 180, b: 240 };
pub const MISSING: Color = Color::TrueColor { r: 230, g: 90, b: 90 };
