// One game of the runner: the player, the obstacle pool, the score and the
// Waiting -> Running -> GameOver -> Running state machine.
// `update` is one tick and never fails; every step checks the state first.

use std::rc::Rc;

use crate::config::GameConfig;
use crate::draw;
use crate::error::Error;
use crate::frontend::{InputEvent, Key};
use crate::obstacle::{self, Obstacle, ObstacleSprite};
use crate::player::{Player, PlayerSprites};
use crate::types::FrameBuffer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Waiting,
    Running,
    GameOver,
}

/// What the loop should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

const TEXT_SCALE: i32 = 3;

pub struct GameSession {
    cfg: GameConfig,
    /// The player as it spawns; every restart starts from a copy.
    fresh_player: Player,
    player: Player,
    obstacles: Vec<Obstacle>,
    score: u64,
    state: GameState,
}

impl GameSession {
    pub fn new(cfg: GameConfig, player_sprites: PlayerSprites, obstacle_sprite: ObstacleSprite) -> Result<Self, Error> {
        cfg.validate()?;
        let fresh_player = Player::new(&player_sprites, &cfg)?;
        let player = fresh_player.clone();
        let obstacles = obstacle::spawn_pool(&Rc::new(obstacle_sprite), &cfg);
        Ok(Self { cfg, fresh_player, player, obstacles, score: 0, state: GameState::Waiting })
    }

    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Ticks survived in this run.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// The slower counter shown on screen.
    pub fn displayed_score(&self) -> u64 {
        self.score / self.cfg.score_divisor
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// A slice, so the pool size cannot change from outside.
    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    /// One tick. SPACE starts the first run and restarts after a crash; the
    /// tick that does so only switches state, the simulation resumes next tick.
    pub fn update(&mut self, events: impl IntoIterator<Item = InputEvent>, jump_held: bool) -> Control {
        let mut confirm = false;
        for event in events {
            match event {
                InputEvent::Quit => return Control::Quit,
                InputEvent::KeyDown(Key::Space) => confirm = true,
                InputEvent::KeyDown(_) => {}
            }
        }

        match self.state {
            GameState::Waiting => {
                if confirm {
                    log::info!("run started");
                    self.state = GameState::Running;
                }
            }
            GameState::GameOver => {
                if confirm {
                    self.restart();
                }
            }
            GameState::Running => {
                if jump_held {
                    self.player.jump();
                }
                self.step();
            }
        }
        Control::Continue
    }

    fn step(&mut self) {
        self.player.apply_gravity();
        self.player.update();
        for (i, o) in self.obstacles.iter_mut().enumerate() {
            if o.scroll(self.cfg.scroll_speed, self.cfg.screen_width) {
                log::trace!("obstacle {i} recycled");
            }
        }

        if let Some(i) = self.first_hit() {
            log::info!("hit obstacle {i}: game over with score {}", self.displayed_score());
            self.state = GameState::GameOver;
            return;
        }
        self.score += 1;
    }

    /// Index of the first obstacle, in pool order, touching the player.
    fn first_hit(&self) -> Option<usize> {
        let p = &self.player;
        self.obstacles
            .iter()
            .position(|o| p.mask().overlaps(o.mask(), o.x - p.left(), o.top() - p.top()))
    }

    /// Fresh player, pool back at its spawn spacing, score zero.
    fn restart(&mut self) {
        self.player = self.fresh_player.clone();
        obstacle::reset_pool(&mut self.obstacles, &self.cfg);
        self.score = 0;
        self.state = GameState::Running;
        log::info!("run restarted");
    }

    /// Compose the whole frame for the current state.
    pub fn draw(&self, fb: &mut FrameBuffer) {
        draw::fill(fb, self.cfg.background);
        let color = self.cfg.text_color;

        if self.state == GameState::Waiting {
            draw::draw_text_centered(fb, "PRESS SPACE TO START", color, TEXT_SCALE);
            return;
        }

        self.player.draw(fb);
        for o in &self.obstacles {
            o.draw(fb);
        }
        let score = format!("SCORE: {}", self.displayed_score());
        draw::draw_text_5x7(fb, 10, 10, &score, color, TEXT_SCALE);

        if self.state == GameState::GameOver {
            draw::draw_text_centered(fb, "GAME OVER", color, TEXT_SCALE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::TransparencyRule;
    use crate::types::PixelBuffer;

    fn session() -> GameSession {
        let cfg = GameConfig::default();
        let player = PlayerSprites::new(vec![PixelBuffer::filled(20, 20, 0xFF00_FF00)], 20.0, TransparencyRule::default());
        let cactus = ObstacleSprite::new(PixelBuffer::filled(10, 10, 0xFF00_8000), TransparencyRule::default());
        GameSession::new(cfg, player, cactus).unwrap()
    }

    fn idle() -> [InputEvent; 0] {
        []
    }

    fn space() -> [InputEvent; 1] {
        [InputEvent::KeyDown(Key::Space)]
    }

    #[test]
    fn starts_waiting() {
        let s = session();
        assert_eq!(s.state(), GameState::Waiting);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn other_keys_do_not_start() {
        let mut s = session();
        s.update([InputEvent::KeyDown(Key::Up), InputEvent::KeyDown(Key::Other)], true);
        assert_eq!(s.state(), GameState::Waiting);
        assert!(s.player().on_ground());
    }

    #[test]
    fn quit_wins_over_everything() {
        let mut s = session();
        assert_eq!(s.update([InputEvent::KeyDown(Key::Space), InputEvent::Quit], false), Control::Quit);
        assert_eq!(s.state(), GameState::Waiting);
    }

    #[test]
    fn running_scores_and_scrolls() {
        let mut s = session();
        s.update(space(), false);
        assert_eq!(s.state(), GameState::Running);
        for _ in 0..25 {
            s.update(idle(), false);
        }
        assert_eq!(s.score(), 25);
        assert_eq!(s.displayed_score(), 2);
        assert_eq!(s.obstacles()[0].x, 800 - 25 * 5);
    }

    #[test]
    fn held_jump_lifts_the_player() {
        let mut s = session();
        s.update(space(), false);
        s.update(idle(), true);
        assert!(!s.player().on_ground());
        assert!(s.player().bottom() < 380);
    }

    #[test]
    fn only_first_hit_counts() {
        let mut s = session();
        s.update(space(), false);
        let (left, bottom) = (s.player().left(), s.player().bottom());
        for o in s.obstacles_mut() {
            o.x = left + 5;
            o.bottom = bottom;
        }
        s.update(idle(), false);
        assert_eq!(s.state(), GameState::GameOver);
        assert_eq!(s.first_hit(), Some(0));
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn restart_brings_back_the_spawned_player() {
        let cfg = GameConfig::default();
        let frames = vec![PixelBuffer::filled(20, 20, 0xFF00_FF00), PixelBuffer::filled(20, 20, 0)];
        let player = PlayerSprites::new(frames, 20.0, TransparencyRule::default());
        let cactus = ObstacleSprite::new(PixelBuffer::filled(10, 10, 0xFF00_8000), TransparencyRule::default());
        let mut s = GameSession::new(cfg, player, cactus).unwrap();
        let spawned = s.player().mask().clone();

        s.update(space(), false);
        // run until the animation shows the second (empty) frame, mid-jump
        for _ in 0..30 {
            s.update(idle(), true);
        }
        assert_eq!(s.player().frame_index(), 1);
        assert_ne!(s.player().mask(), &spawned);
        assert!(!s.player().on_ground());

        let left = s.player().left();
        let bottom = s.player().bottom();
        s.obstacles_mut()[0].x = left;
        s.obstacles_mut()[0].bottom = bottom;
        s.state = GameState::GameOver;

        s.update(space(), false);
        assert_eq!(s.state(), GameState::Running);
        let p = s.player();
        assert_eq!(p.frame_index(), 0);
        assert_eq!(p.mask(), &spawned);
        assert!(p.on_ground());
        assert_eq!((p.bottom(), p.velocity_y(), p.left()), (380, 0.0, 90));
    }

    #[test]
    fn waiting_frame_shows_only_the_prompt() {
        let s = session();
        let mut fb = FrameBuffer::new(800, 400);
        s.draw(&mut fb);
        // player pixels would be pure green
        assert!(!fb.pixels.contains(&0x0000_FF00));
        assert!(fb.pixels.contains(&0x0000_0000));
        assert_eq!(fb.get(0, 399), Some(0x0078_FFFF));
    }

    #[test]
    fn running_frame_shows_the_player() {
        let mut s = session();
        s.update(space(), false);
        let mut fb = FrameBuffer::new(800, 400);
        s.draw(&mut fb);
        assert_eq!(fb.get(100, 370), Some(0x0000_FF00));
    }
}
