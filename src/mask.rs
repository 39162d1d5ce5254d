// Pixel-exact collision masks.
// A mask is a width*height grid of "solid" bits derived from a sprite.
// Two sprites collide when any solid pixel of one lands on a solid pixel of
// the other, so transparent corners of a sprite never cause a hit.

use crate::types::{alpha, rgb, PixelBuffer};

/// Decides which sprite pixels count as solid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransparencyRule {
    /// Solid when alpha is strictly above the threshold.
    AlphaThreshold(u8),
    /// Solid unless the color equals the key (0x00RRGGBB). Fully
    /// transparent pixels are never solid either.
    ColorKey(u32),
}

impl Default for TransparencyRule {
    fn default() -> Self {
        TransparencyRule::AlphaThreshold(127)
    }
}

impl TransparencyRule {
    #[inline]
    pub fn is_solid(self, px: u32) -> bool {
        match self {
            TransparencyRule::AlphaThreshold(t) => alpha(px) > t,
            TransparencyRule::ColorKey(key) => alpha(px) != 0 && rgb(px) != key,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollisionMask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl CollisionMask {
    pub fn from_pixels(src: &PixelBuffer, rule: TransparencyRule) -> Self {
        let bits = src.pixels.iter().map(|&px| rule.is_solid(px)).collect();
        Self { width: src.width, height: src.height, bits }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Solid bit at (x,y); anything outside the grid is empty.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.bits[y as usize * self.width + x as usize]
    }

    #[cfg(test)]
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True if any solid pixel of `self` sits on a solid pixel of `other`,
    /// with `other` placed at (dx,dy) in our local space.
    pub fn overlaps(&self, other: &CollisionMask, dx: i32, dy: i32) -> bool {
        // Only the intersection of the two rectangles can hold a hit.
        // Bounds in i64 so offsets near i32::MIN/MAX cannot overflow.
        let (dx, dy) = (dx as i64, dy as i64);
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (self.width as i64).min(dx + other.width as i64);
        let y1 = (self.height as i64).min(dy + other.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        // Inside the intersection every coordinate fits both grids.
        for y in y0..y1 {
            for x in x0..x1 {
                let (ox, oy) = ((x - dx) as usize, (y - dy) as usize);
                if self.bits[y as usize * self.width + x as usize] && other.bits[oy * other.width + ox] {
                    return true;
                }
            }
        }
        false
    }
}
