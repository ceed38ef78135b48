/// A straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00, 0xff);
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff, 0xff);
    pub const RED: Self = Self::new(0xff, 0x00, 0x00, 0xff);
    pub const GREEN: Self = Self::new(0x00, 0xff, 0x00, 0xff);
    pub const BLUE: Self = Self::new(0x00, 0x00, 0xff, 0xff);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Bytes in the framebuffer's native order.
    #[must_use]
    pub const fn to_bgra(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgra_swaps_red_and_blue() {
        assert_eq!(Color::new(1, 2, 3, 4).to_bgra(), [3, 2, 1, 4]);
        assert_eq!(Color::RED.to_bgra(), [0, 0, 0xff, 0xff]);
    }
}
