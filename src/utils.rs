//! Utility helpers used across the application (formatting, type colors, artwork).

use image::imageops::FilterType;

use crate::models::Artwork;

/// Format an API `name` into a human-friendly form.
///
/// Examples: `mr-mime` -> `Mr Mime`, `solar_power` -> `Solar Power`.
pub fn format_name(name: &str) -> String {
    let replaced = name.replace(['-', '_'], " ");
    let parts: Vec<String> = replaced
        .split_whitespace()
        .map(|w| {
            let mut chs = w.chars();
            match chs.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chs.as_str().to_lowercase()
                }
            }
        })
        .collect();
    parts.join(" ")
}

/// Badge color for a type name, as `(r, g, b)`.
pub fn type_color(name: &str) -> (u8, u8, u8) {
    match name.to_lowercase().as_str() {
        "normal" => (168, 168, 120),
        "fire" => (240, 128, 48),
        "water" => (104, 144, 240),
        "grass" => (120, 200, 80),
        "electric" => (248, 208, 48),
        "ice" => (152, 216, 216),
        "fighting" => (192, 48, 40),
        "poison" => (160, 64, 160),
        "ground" => (224, 192, 104),
        "flying" => (168, 144, 240),
        "psychic" => (248, 88, 136),
        "bug" => (168, 184, 32),
        "rock" => (184, 160, 56),
        "ghost" => (112, 88, 152),
        "dragon" => (112, 56, 248),
        "dark" => (112, 88, 72),
        "steel" => (184, 184, 208),
        "fairy" => (238, 153, 172),
        _ => (200, 200, 200),
    }
}

/// Whether black text reads better than white on `(r, g, b)`.
pub fn prefers_dark_text((r, g, b): (u8, u8, u8)) -> bool {
    let lum = 0.2126 * (r as f32) + 0.7152 * (g as f32) + 0.0722 * (b as f32);
    lum > 160.0
}

/// Decode PNG (or any format `image` knows) bytes and shrink them to `w` x `h` cells.
pub fn decode_artwork(bytes: &[u8], w: u32, h: u32) -> Result<Artwork, image::ImageError> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    let resized = image::imageops::resize(&img, w, h, FilterType::Lanczos3);
    let mut rows = Vec::with_capacity(resized.height() as usize);
    for y in 0..resized.height() {
        let mut row = Vec::with_capacity(resized.width() as usize);
        for x in 0..resized.width() {
            let p = resized.get_pixel(x, y);
            // mostly transparent pixels fall through to the terminal background
            if p[3] < 128 {
                row.push(None);
            } else {
                row.push(Some((p[0], p[1], p[2])));
            }
        }
        rows.push(row);
    }
    Ok(Artwork {
        w: resized.width(),
        h: resized.height(),
        rows,
    })
}
