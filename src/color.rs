//! sRGB colors shared by the catalog, the scene and both backends.

use std::fmt;

/// 24-bit sRGB color stored as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xffffff);

    pub const fn from_hex(hex: u32) -> Self {
        Rgb(hex & 0x00ff_ffff)
    }

    pub fn channels(&self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        ]
    }

    /// Linear-light RGBA for an sRGB render target (the GPU re-encodes on write)
    pub fn to_linear_rgba(&self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.channels();
        [
            srgb_to_linear(r),
            srgb_to_linear(g),
            srgb_to_linear(b),
            alpha.clamp(0.0, 1.0),
        ]
    }

    /// Blend towards white, used for the tinted card backgrounds
    pub fn tint(&self, amount: f32) -> Rgb {
        let amount = amount.clamp(0.0, 1.0);
        let [r, g, b] = self.channels().map(|c| {
            let c = c as f32;
            (c + (255.0 - c) * (1.0 - amount)).round() as u32
        });
        Rgb((r << 16) | (g << 8) | b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
