//! Color values carried by border sides
//!
//! Colors reach the table engine already resolved by the cascade; the engine
//! only compares and forwards them. Channels, including alpha, are stored as
//! 8-bit integers so that resolved border values can be hashed when shared
//! edges are deduplicated for painting.

use serde::Serialize;
use std::fmt;

/// RGBA color representation
///
/// - R, G, B: 0-255
/// - A: 0-255, where 0 is fully transparent and 255 fully opaque
///
/// # Examples
///
/// ```
/// use tablegrid::style::Rgba;
///
/// let red = Rgba::rgb(255, 0, 0);
/// assert_eq!(red.a, 255);
/// assert!(Rgba::TRANSPARENT.is_transparent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0-255)
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }
}

impl Default for Rgba {
    /// CSS `currentColor` defaults to black when nothing else is known.
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}
