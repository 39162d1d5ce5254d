// Scrolling obstacles and the fixed pool that recycles them forever.

use std::rc::Rc;

use crate::config::GameConfig;
use crate::draw;
use crate::mask::{CollisionMask, TransparencyRule};
use crate::types::{FrameBuffer, PixelBuffer};

/// Image + mask shared read-only by every obstacle of the pool.
pub struct ObstacleSprite {
    pub image: PixelBuffer,
    pub mask: CollisionMask,
    pub rule: TransparencyRule,
}

impl ObstacleSprite {
    pub fn new(image: PixelBuffer, rule: TransparencyRule) -> Self {
        let mask = CollisionMask::from_pixels(&image, rule);
        Self { image, mask, rule }
    }
}

pub struct Obstacle {
    /// Left edge.
    pub x: i32,
    /// Bottom edge, resting on the ground line.
    pub bottom: i32,
    sprite: Rc<ObstacleSprite>,
}

impl Obstacle {
    pub fn new(sprite: Rc<ObstacleSprite>, x: i32, bottom: i32) -> Self {
        Self { x, bottom, sprite }
    }

    pub fn width(&self) -> i32 {
        self.sprite.image.width as i32
    }

    pub fn top(&self) -> i32 {
        self.bottom - self.sprite.image.height as i32
    }

    pub fn right(&self) -> i32 {
        self.x + self.width()
    }

    pub fn mask(&self) -> &CollisionMask {
        &self.sprite.mask
    }

    #[cfg(test)]
    pub fn sprite(&self) -> &Rc<ObstacleSprite> {
        &self.sprite
    }

    /// Slide left by `speed`. Once fully off the left edge, jump back to the
    /// right edge of the screen. Returns true when that happened.
    pub fn scroll(&mut self, speed: i32, screen_width: usize) -> bool {
        self.x -= speed;
        if self.right() < 0 {
            self.x = screen_width as i32;
            return true;
        }
        false
    }

    pub fn draw(&self, fb: &mut FrameBuffer) {
        draw::blit(fb, &self.sprite.image, self.sprite.rule, self.x, self.top());
    }
}

/// Where obstacle `index` starts: evenly spaced, just past the right edge.
pub fn spawn_x(cfg: &GameConfig, index: usize) -> i32 {
    cfg.screen_width as i32 + index as i32 * cfg.obstacle_spacing
}

/// The whole pool, already placed at its starting positions.
pub fn spawn_pool(sprite: &Rc<ObstacleSprite>, cfg: &GameConfig) -> Vec<Obstacle> {
    (0..cfg.obstacle_count)
        .map(|i| Obstacle::new(Rc::clone(sprite), spawn_x(cfg, i), cfg.ground_line()))
        .collect()
}

/// Put an existing pool back to its starting positions, in place.
pub fn reset_pool(pool: &mut [Obstacle], cfg: &GameConfig) {
    for (i, o) in pool.iter_mut().enumerate() {
        o.x = spawn_x(cfg, i);
        o.bottom = cfg.ground_line();
    }
}
