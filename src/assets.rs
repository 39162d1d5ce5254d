// Decodes sprite files into PixelBuffers (0xAARRGGBB).
// Everything here runs once at startup; any failure is an InvalidAsset error
// and the game never starts.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::imageops::{self, FilterType};
use image::{AnimationDecoder, Rgba, RgbaImage};

use crate::error::Error;
use crate::types::{pack_rgba, PixelBuffer};

/// Decode a single image (PNG, GIF first frame, ...).
pub fn load_static_image(path: &Path) -> Result<PixelBuffer, Error> {
    let img = image::open(path)
        .map_err(|e| Error::invalid_asset(path, e))?
        .to_rgba8();
    let buf = to_pixel_buffer(&img);
    check_not_empty(path, &buf)?;
    log::info!("loaded {} ({}x{})", path.display(), buf.width, buf.height);
    Ok(buf)
}

/// Decode every frame of an animated GIF, in playback order.
/// Anything that is not a GIF loads as a one-frame animation.
pub fn load_animated_image(path: &Path) -> Result<Vec<PixelBuffer>, Error> {
    let is_gif = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
    if !is_gif {
        return Ok(vec![load_static_image(path)?]);
    }

    let file = File::open(path).map_err(|e| Error::invalid_asset(path, e))?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(|e| Error::invalid_asset(path, e))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| Error::invalid_asset(path, e))?;
    if frames.is_empty() {
        return Err(Error::invalid_asset(path, "animation has no frames"));
    }

    let mut out = Vec::with_capacity(frames.len());
    for frame in frames {
        let buf = to_pixel_buffer(frame.buffer());
        check_not_empty(path, &buf)?;
        out.push(buf);
    }
    log::info!(
        "loaded {} ({} frames, {}x{})",
        path.display(),
        out.len(),
        out[0].width,
        out[0].height
    );
    Ok(out)
}

/// Nearest-neighbour resize, so color keys survive scaling untouched.
pub fn scale(src: &PixelBuffer, width: usize, height: usize) -> PixelBuffer {
    if src.width == width && src.height == height {
        return src.clone();
    }
    let img = to_rgba_image(src);
    to_pixel_buffer(&imageops::resize(&img, width as u32, height as u32, FilterType::Nearest))
}

fn check_not_empty(path: &Path, buf: &PixelBuffer) -> Result<(), Error> {
    if buf.width == 0 || buf.height == 0 {
        return Err(Error::invalid_asset(path, "image has zero size"));
    }
    Ok(())
}

fn to_pixel_buffer(img: &RgbaImage) -> PixelBuffer {
    let (w, h) = img.dimensions();
    let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
    for (_x, _y, p) in img.enumerate_pixels() {
        pixels.push(pack_rgba(p[0], p[1], p[2], p[3]));
    }
    PixelBuffer { width: w as usize, height: h as usize, pixels }
}

fn to_rgba_image(buf: &PixelBuffer) -> RgbaImage {
    RgbaImage::from_fn(buf.width as u32, buf.height as u32, |x, y| {
        let px = buf.pixel(x as usize, y as usize);
        Rgba([(px >> 16) as u8, (px >> 8) as u8, px as u8, (px >> 24) as u8])
    })
}

/* ---------- Generated stand-ins (run without any files via --placeholder) ---------- */

/// Two green squares with a blinking eye, so the animation is visible.
pub fn placeholder_player_frames(width: usize, height: usize) -> Vec<PixelBuffer> {
    let body = pack_rgba(100, 200, 100, 255);
    let eye = pack_rgba(20, 40, 20, 255);
    (0..2)
        .map(|i| {
            let mut frame = PixelBuffer::filled(width, height, body);
            let size = (width / 8).max(1);
            let (ex, ey) = (width * 5 / 8, height / 5);
            let eye_h = if i == 0 { size } else { (size / 3).max(1) };
            for y in ey..(ey + eye_h).min(height) {
                for x in ex..(ex + size).min(width) {
                    frame.pixels[y * width + x] = eye;
                }
            }
            frame
        })
        .collect()
}

/// A cactus on an opaque white background (draw it with a white color key).
pub fn placeholder_obstacle(width: usize, height: usize) -> PixelBuffer {
    let white = pack_rgba(255, 255, 255, 255);
    let green = pack_rgba(30, 140, 40, 255);
    let mut buf = PixelBuffer::filled(width, height, white);
    let mut paint = |x0: usize, y0: usize, x1: usize, y1: usize| {
        for y in y0..y1.min(height) {
            for x in x0..x1.min(width) {
                buf.pixels[y * width + x] = green;
            }
        }
    };
    // trunk
    paint(width * 3 / 8, 0, width * 5 / 8, height);
    // arms
    paint(width / 8, height * 3 / 8, width * 3 / 8, height / 2);
    paint(width / 8, height / 8, width / 4, height / 2);
    paint(width * 5 / 8, height / 2, width * 7 / 8, height * 5 / 8);
    paint(width * 3 / 4, height / 4, width * 7 / 8, height * 5 / 8);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_invalid_asset() {
        let err = load_static_image(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, Error::InvalidAsset { .. }));
        let err = load_animated_image(Path::new("definitely/not/here.gif")).unwrap_err();
        assert!(matches!(err, Error::InvalidAsset { .. }));
    }

    #[test]
    fn scale_keeps_colors_exact() {
        let mut src = PixelBuffer::filled(2, 1, 0xFFFF_FFFF);
        src.pixels[1] = 0xFF00_FF00;
        let big = scale(&src, 4, 2);
        assert_eq!((big.width, big.height), (4, 2));
        assert_eq!(big.pixels, vec![
            0xFFFF_FFFF, 0xFFFF_FFFF, 0xFF00_FF00, 0xFF00_FF00,
            0xFFFF_FFFF, 0xFFFF_FFFF, 0xFF00_FF00, 0xFF00_FF00,
        ]);
    }

    #[test]
    fn placeholders_have_requested_size_and_distinct_frames() {
        let frames = placeholder_player_frames(100, 100);
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f.width == 100 && f.height == 100));
        assert_ne!(frames[0], frames[1]);

        let cactus = placeholder_obstacle(40, 40);
        assert_eq!(cactus.pixels.len(), 40 * 40);
        assert!(cactus.pixels.contains(&0xFFFF_FFFF));
        assert!(cactus.pixels.iter().any(|&p| p != 0xFFFF_FFFF));
    }
}
