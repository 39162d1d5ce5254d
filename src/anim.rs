// Frame-indexed sprite animation driven by the tick counter.

use std::path::Path;
use std::rc::Rc;

use crate::error::Error;
use crate::types::PixelBuffer;

/// Steps through a fixed list of frames, one step every `period` ticks.
#[derive(Clone)]
pub struct SpriteAnimator {
    frames: Rc<[PixelBuffer]>,
    frame_index: usize,
    tick_counter: u32,
    period: u32,
}

impl SpriteAnimator {
    /// Fails with `InvalidAsset` when there is nothing to animate.
    pub fn new(frames: Rc<[PixelBuffer]>, period: u32) -> Result<Self, Error> {
        if frames.is_empty() {
            return Err(Error::invalid_asset(Path::new("<animation>"), "no frames"));
        }
        Ok(Self { frames, frame_index: 0, tick_counter: 0, period: period.max(1) })
    }

    /// One tick. Returns true when the displayed frame changed.
    pub fn advance(&mut self) -> bool {
        self.tick_counter += 1;
        if self.tick_counter < self.period {
            return false;
        }
        self.tick_counter = 0;
        let previous = self.frame_index;
        self.frame_index = (self.frame_index + 1) % self.frames.len();
        // A single-frame animation wraps onto itself; nothing to regenerate.
        self.frame_index != previous
    }

    pub fn current_frame(&self) -> &PixelBuffer {
        &self.frames[self.frame_index]
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> Rc<[PixelBuffer]> {
        (0..n).map(|i| PixelBuffer::filled(2, 2, 0xFF00_0000 | i as u32)).collect()
    }

    #[test]
    fn empty_frames_are_rejected() {
        assert!(matches!(SpriteAnimator::new(frames(0), 30), Err(Error::InvalidAsset { .. })));
    }

    #[test]
    fn frame_changes_only_every_period() {
        let mut anim = SpriteAnimator::new(frames(3), 30).unwrap();
        for tick in 1..=29 {
            assert!(!anim.advance(), "tick {tick}");
            assert_eq!(anim.frame_index(), 0);
        }
        assert!(anim.advance());
        assert_eq!(anim.frame_index(), 1);
    }

    #[test]
    fn index_stays_in_range_forever() {
        let mut anim = SpriteAnimator::new(frames(4), 30).unwrap();
        let mut changes = 0;
        for _ in 0..10_000 {
            if anim.advance() {
                changes += 1;
            }
            assert!(anim.frame_index() < anim.frame_count());
        }
        assert_eq!(changes, 10_000 / 30);
        assert_eq!(anim.frame_index(), (10_000 / 30) % 4);
        assert_eq!(anim.current_frame().pixels[0], 0xFF00_0000 | anim.frame_index() as u32);
    }

    #[test]
    fn single_frame_never_signals_change() {
        let mut anim = SpriteAnimator::new(frames(1), 2).unwrap();
        for _ in 0..10 {
            assert!(!anim.advance());
        }
        assert_eq!(anim.frame_index(), 0);
    }
}
