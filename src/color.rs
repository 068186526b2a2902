use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Default colour cycle
// ---------------------------------------------------------------------------

/// The ten-colour "tab10" cycle used for traces without an explicit colour.
const TAB10: [(&str, [u8; 3]); 10] = [
    ("blue", [0x1f, 0x77, 0xb4]),
    ("orange", [0xff, 0x7f, 0x0e]),
    ("green", [0x2c, 0xa0, 0x2c]),
    ("red", [0xd6, 0x27, 0x28]),
    ("purple", [0x94, 0x67, 0xbd]),
    ("brown", [0x8c, 0x56, 0x4b]),
    ("pink", [0xe3, 0x77, 0xc2]),
    ("gray", [0x7f, 0x7f, 0x7f]),
    ("olive", [0xbc, 0xbd, 0x22]),
    ("cyan", [0x17, 0xbe, 0xcf]),
];

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Colours for `n` traces with no colour of their own: tab10 first, then
/// evenly spaced hues once the cycle would repeat.
pub fn default_cycle(n: usize) -> Vec<Color32> {
    if n <= TAB10.len() {
        TAB10
            .iter()
            .take(n)
            .map(|(_, [r, g, b])| Color32::from_rgb(*r, *g, *b))
            .collect()
    } else {
        generate_palette(n)
    }
}

// ---------------------------------------------------------------------------
// Colour string parsing
// ---------------------------------------------------------------------------

/// Resolve a colour specification to a concrete colour.
///
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, the single-letter codes
/// `bgrcmykw`, cycle references `C0`..`C9`, `tab:<name>` and CSS colour
/// names. Matching ignores case and surrounding whitespace.
pub fn parse_color(spec: &str) -> Option<Color32> {
    let spec = spec.trim().to_ascii_lowercase();

    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(c) = short_code(&spec) {
        return Some(c);
    }
    if let Some(idx) = spec.strip_prefix('c').and_then(|n| n.parse::<usize>().ok()) {
        return TAB10
            .get(idx)
            .map(|(_, [r, g, b])| Color32::from_rgb(*r, *g, *b));
    }
    if let Some(name) = spec.strip_prefix("tab:") {
        let name = if name == "grey" { "gray" } else { name };
        return TAB10
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, [r, g, b])| Color32::from_rgb(*r, *g, *b));
    }

    palette::named::from_str(&spec).map(|c| Color32::from_rgb(c.red, c.green, c.blue))
}

fn short_code(spec: &str) -> Option<Color32> {
    let rgb = match spec {
        "b" => [0, 0, 255],
        "g" => [0, 128, 0],
        "r" => [255, 0, 0],
        "c" => [0, 191, 191],
        "m" => [191, 0, 191],
        "y" => [191, 191, 0],
        "k" => [0, 0, 0],
        "w" => [255, 255, 255],
        _ => return None,
    };
    Some(Color32::from_rgb(rgb[0], rgb[1], rgb[2]))
}

fn parse_hex(hex: &str) -> Option<Color32> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nib = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(Color32::from_rgb(nib(0)?, nib(1)?, nib(2)?))
        }
        6 => Some(Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)?,
        )),
        _ => None,
    }
}
