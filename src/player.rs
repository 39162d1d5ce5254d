// The runner: gravity, jumping, animation and its collision mask.

use std::rc::Rc;

use crate::anim::SpriteAnimator;
use crate::config::GameConfig;
use crate::draw;
use crate::error::Error;
use crate::mask::{CollisionMask, TransparencyRule};
use crate::types::{FrameBuffer, PixelBuffer};

/// Decoded player frames plus their pre-rotated airborne versions.
/// Built once; every Player of the process shares them.
#[derive(Clone)]
pub struct PlayerSprites {
    frames: Rc<[PixelBuffer]>,
    tilted: Rc<[PixelBuffer]>,
    rule: TransparencyRule,
}

impl PlayerSprites {
    pub fn new(frames: Vec<PixelBuffer>, tilt_degrees: f32, rule: TransparencyRule) -> Self {
        let tilted = frames.iter().map(|f| draw::rotate(f, tilt_degrees)).collect();
        Self { frames: frames.into(), tilted, rule }
    }
}

#[derive(Clone)]
pub struct Player {
    /// Horizontal centre of the sprite.
    center_x: i32,
    /// Bottom edge; never below the ground line.
    bottom: i32,
    velocity_y: f32,
    on_ground: bool,
    animator: SpriteAnimator,
    mask: CollisionMask,
    sprites: PlayerSprites,
    gravity: f32,
    jump_velocity: f32,
    ground_line: i32,
}

impl Player {
    /// Standing on the ground at the spawn point, first frame showing.
    pub fn new(sprites: &PlayerSprites, cfg: &GameConfig) -> Result<Self, Error> {
        let animator = SpriteAnimator::new(sprites.frames.clone(), cfg.animation_period)?;
        let mask = CollisionMask::from_pixels(animator.current_frame(), sprites.rule);
        Ok(Self {
            center_x: cfg.player_spawn_x,
            bottom: cfg.ground_line(),
            velocity_y: 0.0,
            on_ground: true,
            animator,
            mask,
            sprites: sprites.clone(),
            gravity: cfg.gravity,
            jump_velocity: cfg.jump_velocity,
            ground_line: cfg.ground_line(),
        })
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    /// Resting on the ground line with no vertical speed.
    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn width(&self) -> i32 {
        self.animator.current_frame().width as i32
    }

    pub fn height(&self) -> i32 {
        self.animator.current_frame().height as i32
    }

    pub fn left(&self) -> i32 {
        self.center_x - self.width() / 2
    }

    pub fn top(&self) -> i32 {
        self.bottom - self.height()
    }

    pub fn mask(&self) -> &CollisionMask {
        &self.mask
    }

    pub fn frame_index(&self) -> usize {
        self.animator.frame_index()
    }

    /// Launch upwards. Ignored while already in the air.
    pub fn jump(&mut self) {
        if self.on_ground {
            self.velocity_y = self.jump_velocity;
            self.on_ground = false;
        }
    }

    /// One physics step: accelerate, move by whole pixels, land on the floor.
    pub fn apply_gravity(&mut self) {
        self.velocity_y += self.gravity;
        // `as` truncates toward zero, so small velocities do not move us.
        self.bottom += self.velocity_y as i32;
        if self.bottom >= self.ground_line {
            self.bottom = self.ground_line;
            self.velocity_y = 0.0;
            self.on_ground = true;
        }
    }

    /// Animation step. The mask only follows when the frame really changed.
    pub fn update(&mut self) {
        if self.animator.advance() {
            self.mask = CollisionMask::from_pixels(self.animator.current_frame(), self.sprites.rule);
        }
    }

    /// Tilted while airborne; the tilt is purely visual.
    pub fn draw(&self, fb: &mut FrameBuffer) {
        if self.on_ground {
            draw::blit(fb, self.animator.current_frame(), self.sprites.rule, self.left(), self.top());
        } else {
            let img = &self.sprites.tilted[self.animator.frame_index()];
            let cx = self.center_x;
            let cy = self.bottom - self.height() / 2;
            draw::blit(fb, img, self.sprites.rule, cx - img.width as i32 / 2, cy - img.height as i32 / 2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprites(frames: usize) -> PlayerSprites {
        let frames = (0..frames)
            .map(|i| {
                let mut f = PixelBuffer::filled(10, 10, 0xFF00_FF00);
                // each frame has a different transparent column
                for y in 0..10 {
                    f.pixels[y * 10 + i] = 0;
                }
                f
            })
            .collect();
        PlayerSprites::new(frames, 20.0, TransparencyRule::default())
    }

    fn player() -> Player {
        Player::new(&sprites(2), &GameConfig::default()).unwrap()
    }

    #[test]
    fn spawns_on_the_ground() {
        let p = player();
        assert_eq!(p.bottom(), 380);
        assert!(p.on_ground());
        assert_eq!(p.velocity_y(), 0.0);
        assert_eq!((p.left(), p.top()), (95, 370));
    }

    #[test]
    fn no_frames_is_an_asset_error() {
        let empty = PlayerSprites::new(Vec::new(), 20.0, TransparencyRule::default());
        assert!(matches!(Player::new(&empty, &GameConfig::default()), Err(Error::InvalidAsset { .. })));
    }

    #[test]
    fn standing_still_stays_grounded() {
        let mut p = player();
        for _ in 0..100 {
            p.apply_gravity();
            assert_eq!(p.bottom(), 380);
            assert!(p.on_ground());
            assert_eq!(p.velocity_y(), 0.0);
        }
    }

    #[test]
    fn jump_arc_lands_back_on_the_ground() {
        let mut p = player();
        p.jump();
        assert!(!p.on_ground());
        assert_eq!(p.velocity_y(), -12.0);

        p.apply_gravity();
        // -11.5 truncates to -11
        assert_eq!(p.bottom(), 369);

        let mut highest = p.bottom();
        let mut steps = 1;
        while !p.on_ground() {
            p.apply_gravity();
            assert!(p.bottom() <= 380);
            highest = highest.min(p.bottom());
            steps += 1;
            assert!(steps < 200, "never landed");
        }
        assert!(highest < 380 - 100);
        assert_eq!(p.bottom(), 380);
        assert_eq!(p.velocity_y(), 0.0);
    }

    #[test]
    fn jump_in_the_air_is_ignored() {
        let mut p = player();
        p.jump();
        p.apply_gravity();
        let v = p.velocity_y();
        p.jump();
        assert_eq!(p.velocity_y(), v);
        assert!(!p.on_ground());
    }

    #[test]
    fn mask_follows_the_animation_frame() {
        let mut p = player();
        let first = p.mask().clone();
        assert!(!first.get(0, 0));
        for _ in 0..29 {
            p.update();
        }
        assert_eq!(p.mask(), &first);
        p.update();
        assert_eq!(p.frame_index(), 1);
        assert!(p.mask().get(0, 0));
        assert!(!p.mask().get(1, 0));
    }

    #[test]
    fn tilt_does_not_touch_the_mask() {
        let mut p = player();
        let before = p.mask().clone();
        p.jump();
        p.apply_gravity();
        let mut fb = FrameBuffer::new(200, 400);
        p.draw(&mut fb);
        assert_eq!(p.mask(), &before);
        assert_eq!((p.mask().width(), p.mask().height()), (10, 10));
    }
}
