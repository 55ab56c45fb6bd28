//! Packed ARGB8888 color helpers.
//!
//! Colors travel through the pipeline as plain `u32` values with alpha in
//! the top byte. Opaque colors always carry `0xFF` alpha; transparency is a
//! separate per-patch attribute applied by [`blend`].

pub const BLACK: u32 = 0xFF000000;
pub const WHITE: u32 = 0xFFFFFFFF;
pub const RED: u32 = 0xFFFF0000;
pub const GREEN: u32 = 0xFF00FF00;
pub const BLUE: u32 = 0xFF0000FF;
pub const CYAN: u32 = 0xFF00FFFF;
pub const MAGENTA: u32 = 0xFFFF00FF;
pub const YELLOW: u32 = 0xFFFFFF00;
pub const GRAY: u32 = 0xFF808080;

pub const SKY_HIGH: u32 = 0xFF0040C0;
pub const SKY_LOW: u32 = 0xFF80C0FF;
pub const GROUND_HIGH: u32 = 0xFF609060;
pub const GROUND_LOW: u32 = 0xFF204020;

const NAMED: [(&str, u32); 12] = [
    ("black", BLACK),
    ("white", WHITE),
    ("red", RED),
    ("green", GREEN),
    ("blue", BLUE),
    ("cyan", CYAN),
    ("magenta", MAGENTA),
    ("yellow", YELLOW),
    ("gray", GRAY),
    ("grey", GRAY),
    ("orange", 0xFFFF8000),
    ("purple", 0xFF800080),
];

/// Builds an opaque color from 8-bit channels.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF000000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Splits a color into its 8-bit red, green and blue channels.
#[inline]
pub const fn channels(color: u32) -> (u8, u8, u8) {
    ((color >> 16) as u8, (color >> 8) as u8, color as u8)
}

/// Unpacks a color into normalized `(r, g, b)` in `[0.0, 1.0]`.
#[inline]
pub fn unpack_color(color: u32) -> (f32, f32, f32) {
    let (r, g, b) = channels(color);
    (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

/// Packs normalized channels back into an opaque color, clamping each one.
#[inline]
pub fn pack_color(r: f32, g: f32, b: f32) -> u32 {
    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    rgb(to_byte(r), to_byte(g), to_byte(b))
}

#[inline]
pub fn lerp_color(a: u32, b: u32, t: f32) -> u32 {
    let (r0, g0, b0) = unpack_color(a);
    let (r1, g1, b1) = unpack_color(b);
    pack_color(
        r0 + (r1 - r0) * t,
        g0 + (g1 - g0) * t,
        b0 + (b1 - b0) * t,
    )
}

/// Scales every channel of `color` by `intensity`.
#[inline]
pub fn modulate(color: u32, intensity: f32) -> u32 {
    let (r, g, b) = unpack_color(color);
    pack_color(r * intensity, g * intensity, b * intensity)
}

/// Perceived brightness in `0..=255` (Rec. 601 weights).
#[inline]
pub fn luminance(color: u32) -> u8 {
    let (r, g, b) = channels(color);
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

#[inline]
pub fn grayscale(color: u32) -> u32 {
    let l = luminance(color);
    rgb(l, l, l)
}

/// Mixes `src` over `dst`. `transparency` 0 yields `src`, 255 yields `dst`.
#[inline]
pub fn blend(src: u32, dst: u32, transparency: u8) -> u32 {
    match transparency {
        0 => src,
        255 => dst,
        t => lerp_color(src, dst, t as f32 / 255.0),
    }
}

/// Reduces a color to black or white for monochrome canvases.
#[inline]
pub fn to_monochrome(color: u32) -> u32 {
    if luminance(color) >= 128 {
        WHITE
    } else {
        BLACK
    }
}

/// Looks up a color by its case-insensitive name.
pub fn from_name(name: &str) -> Option<u32> {
    NAMED
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, c)| c)
}

/// Parses a color token as used by the text geometry formats: either a
/// color name or `(r,g,b)` with 8-bit channels and no spaces.
pub fn parse(token: &str) -> Option<u32> {
    if let Some(inner) = token.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        let mut parts = inner.split(',').map(|p| p.trim().parse::<u8>());
        let (r, g, b) = (parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?);
        if parts.next().is_some() {
            return None;
        }
        return Some(rgb(r, g, b));
    }
    from_name(token)
}

/// Formats a color in the `(r,g,b)` token form accepted by [`parse`].
pub fn format(color: u32) -> String {
    let (r, g, b) = channels(color);
    format!("({},{},{})", r, g, b)
}

/// Formats a color as a CSS/SVG hex string, e.g. `#ff8000`.
pub fn to_hex(color: u32) -> String {
    let (r, g, b) = channels(color);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
