// Window + software drawing utilities.
// 1) A minifb window that shows the game and reports keys.
// 2) Sprite blits (alpha + color key), rotation and a background fill.
// 3) A tiny 5x7 bitmap font for the score and the prompts.

use std::time::Duration;

use minifb::{Key as WinKey, KeyRepeat, Window, WindowOptions};

use crate::error::Error;
use crate::frontend::{FrameClock, Frontend, InputEvent, Key};
use crate::mask::TransparencyRule;
use crate::types::{alpha, rgb, FrameBuffer, PixelBuffer};

pub struct Drawer {
    window: Window, // the on-screen window you see
    clock: FrameClock,
}

impl Drawer {
    /// Create a window sized to the playfield.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window, clock: FrameClock::new() })
    }
}

fn map_key(key: WinKey) -> Key {
    match key {
        WinKey::Space => Key::Space,
        WinKey::Escape => Key::Escape,
        WinKey::Up => Key::Up,
        _ => Key::Other,
    }
}

impl Frontend for Drawer {
    // minifb refreshes key state on every `update_with_buffer`, so this only
    // reads what the last present collected and never waits.
    fn poll_events(&mut self) -> impl Iterator<Item = InputEvent> {
        let mut events = Vec::new();
        if !self.window.is_open() || self.window.is_key_down(WinKey::Escape) {
            events.push(InputEvent::Quit);
        }
        events.extend(
            self.window
                .get_keys_pressed(KeyRepeat::No)
                .into_iter()
                .map(|k| InputEvent::KeyDown(map_key(k))),
        );
        events.into_iter()
    }

    fn key_pressed(&self, key: Key) -> bool {
        match key {
            Key::Space => self.window.is_key_down(WinKey::Space),
            Key::Escape => self.window.is_key_down(WinKey::Escape),
            Key::Up => self.window.is_key_down(WinKey::Up),
            Key::Other => false,
        }
    }

    /// Push the pixels for this frame to the screen.
    fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    fn tick(&mut self, target_fps: u32) -> Duration {
        self.clock.tick(target_fps)
    }
}

/* ---------- Software drawing: pixels, fills, sprites ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

pub fn fill(fb: &mut FrameBuffer, color: u32) {
    fb.pixels.fill(color);
}

/// Straight-alpha "source over" for one 0x00RRGGBB destination pixel.
#[inline]
fn blend(dst: u32, src: u32) -> u32 {
    let a = alpha(src) as u32;
    let inv = 255 - a;
    let mix = |shift: u32| {
        let s = (src >> shift) & 0xFF;
        let d = (dst >> shift) & 0xFF;
        ((s * a + d * inv + 127) / 255) << shift
    };
    mix(16) | mix(8) | mix(0)
}

/// Draw `src` with its top-left corner at (x,y), clipped to the frame.
/// Color-keyed and fully transparent pixels are skipped; the rest blend by alpha.
pub fn blit(fb: &mut FrameBuffer, src: &PixelBuffer, rule: TransparencyRule, x: i32, y: i32) {
    for sy in 0..src.height {
        let ty = y + sy as i32;
        if ty < 0 || ty as usize >= fb.height {
            continue;
        }
        for sx in 0..src.width {
            let tx = x + sx as i32;
            if tx < 0 || tx as usize >= fb.width {
                continue;
            }
            let px = src.pixel(sx, sy);
            if let TransparencyRule::ColorKey(key) = rule {
                if rgb(px) == key {
                    continue;
                }
            }
            let idx = ty as usize * fb.width + tx as usize;
            match alpha(px) {
                0 => {}
                255 => fb.pixels[idx] = rgb(px),
                _ => fb.pixels[idx] = blend(fb.pixels[idx], px),
            }
        }
    }
}

/// Rotate counter-clockwise by `degrees` around the image centre.
/// The result grows to hold the whole rotated image; new corners are transparent.
pub fn rotate(src: &PixelBuffer, degrees: f32) -> PixelBuffer {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (w, h) = (src.width as f32, src.height as f32);
    // the small bias stops float noise (cos 90° != 0) from adding a pixel
    let out_w = (w * cos.abs() + h * sin.abs() - 1e-3).ceil().max(0.0) as usize;
    let out_h = (w * sin.abs() + h * cos.abs() - 1e-3).ceil().max(0.0) as usize;
    let mut out = PixelBuffer::filled(out_w, out_h, 0);

    let (scx, scy) = (w / 2.0, h / 2.0);
    let (dcx, dcy) = (out_w as f32 / 2.0, out_h as f32 / 2.0);
    for y in 0..out_h {
        for x in 0..out_w {
            // Walk backwards from each output pixel to its source pixel.
            let dx = x as f32 + 0.5 - dcx;
            let dy = y as f32 + 0.5 - dcy;
            let sx = dx * cos - dy * sin + scx;
            let sy = dx * sin + dy * cos + scy;
            if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
                out.pixels[y * out_w + x] = src.pixel(sx as usize, sy as usize);
            }
        }
    }
    out
}

/* ---------- 5x7 bitmap font (uppercase subset for the HUD and prompts) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),

        // Punctuation: space, colon, dot, dash, bang
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y), each font pixel a `scale`x`scale` block.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, scale: i32) {
    if let Some(rows) = glyph5x7(ch) {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    for by in 0..scale {
                        for bx in 0..scale {
                            put_pixel(fb, x + (rx * scale + bx), y + (ry as i32 * scale + by), color);
                        }
                    }
                }
            }
        }
    }
}

/// Width in pixels that `draw_text_5x7` will cover.
pub fn text_width_5x7(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 6 * scale
}

/// Draw a text string using 5x7 glyphs with 1 font-pixel spacing.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, scale);
        x += 6 * scale;
    }
}

/// Draw text centred on the frame.
pub fn draw_text_centered(fb: &mut FrameBuffer, text: &str, color: u32, scale: i32) {
    let x = fb.width as i32 / 2 - text_width_5x7(text, scale) / 2;
    let y = fb.height as i32 / 2 - 7 * scale / 2;
    draw_text_5x7(fb, x, y, text, color, scale);
}
