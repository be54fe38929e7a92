use ratatui::style::Color;

use crate::config::Tui;

#[derive(Clone, Copy, Debug)]
pub struct GridTheme {
    pub header_fg: Color,
    pub header_scrolled_fg: Color,
    pub border_fg: Color,
    pub loaded_fg: Color,
    pub help_fg: Color,
}

impl Default for GridTheme {
    fn default() -> Self {
        Self {
            header_fg: Color::Gray,
            header_scrolled_fg: Color::Cyan,
            border_fg: Color::DarkGray,
            loaded_fg: Color::Green,
            help_fg: Color::Yellow,
        }
    }
}

impl GridTheme {
    pub fn from_settings(tui: Option<&Tui>) -> Self {
        let d = Self::default();
        let Some(t) = tui else { return d };
        let pick = |v: &Option<String>, fallback: Color| {
            v.as_deref().and_then(parse_color).unwrap_or(fallback)
        };
        Self {
            header_fg: pick(&t.header_fg, d.header_fg),
            header_scrolled_fg: pick(&t.header_scrolled_fg, d.header_scrolled_fg),
            border_fg: pick(&t.border_fg, d.border_fg),
            loaded_fg: pick(&t.loaded_fg, d.loaded_fg),
            help_fg: pick(&t.help_fg, d.help_fg),
        }
    }
}

pub fn parse_color(s: &str) -> Option<Color> {
    let k = s.trim().to_ascii_lowercase();
    match k.as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        _ => {
            if let Some(hex) = k.strip_prefix('#') { return parse_hex(hex); }
            if let Some(rest) = k.strip_prefix("rgb(") { return parse_rgb_tuple(rest); }
            None
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn parse_rgb_tuple(rest: &str) -> Option<Color> {
    let t = rest.strip_suffix(')')?;
    let parts: Vec<_> = t.split(',').map(|p| p.trim()).collect();
    if parts.len() != 3 { return None; }
    let r = parts[0].parse::<u8>().ok()?;
    let g = parts[1].parse::<u8>().ok()?;
    let b = parts[2].parse::<u8>().ok()?;
    Some(Color::Rgb(r, g, b))
}
