use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 120, g: 220, b: 160 };
pub const ACCENT: Color = Color::TrueColor { r: 250, g: 200, b: 90 };
pub const SEPARATOR: Color = Color::TrueColor { r: 110, g: 110, b: 120 };
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 210, g: 210, b: 215 };
pub const IPV4_ADDR: Color = Color::TrueColor { r: 100, g: 180, b: 250 };
pub const IPV6_ADDR: Color = Color::TrueColor { r: 190, g: 140, b: 250 };
pub const PATH: Color = Color::TrueColor { r: 170, g: 200, b: 140 };
