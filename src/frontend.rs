// The boundary between the game and whatever shows it on screen.
// The session never touches a window; `run` drives it through this trait.

use std::thread;
use std::time::{Duration, Instant};

use crate::error::Error;
use crate::session::{Control, GameSession};
use crate::types::FrameBuffer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Space,
    Up,
    Escape,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
}

pub trait Frontend {
    /// Everything that happened since the last call. Must not block.
    fn poll_events(&mut self) -> impl Iterator<Item = InputEvent>;

    /// Is `key` held down right now?
    fn key_pressed(&self, key: Key) -> bool;

    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Error>;

    /// Wait out the rest of the frame; returns the time since the previous tick.
    fn tick(&mut self, target_fps: u32) -> Duration;
}

/// Fixed frame-rate pacing: sleeps whatever is left of the frame budget.
pub struct FrameClock {
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }

    pub fn tick(&mut self, target_fps: u32) -> Duration {
        let budget = Duration::from_secs(1) / target_fps.max(1);
        let spent = self.last.elapsed();
        if spent < budget {
            thread::sleep(budget - spent);
        }
        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;
        elapsed
    }
}

/// The game loop: input, one simulation tick, render, present, pace.
/// Returns when the frontend reports Quit.
pub fn run<F: Frontend>(frontend: &mut F, session: &mut GameSession) -> Result<(), Error> {
    let cfg = session.config().clone();
    let mut screen = FrameBuffer::new(cfg.screen_width, cfg.screen_height);

    let mut frames_this_second: u32 = 0;
    let mut second = Duration::ZERO;

    loop {
        let jump_held = frontend.key_pressed(Key::Space) || frontend.key_pressed(Key::Up);
        if session.update(frontend.poll_events(), jump_held) == Control::Quit {
            log::info!("quit requested");
            return Ok(());
        }

        session.draw(&mut screen);
        frontend.present(&screen)?;

        second += frontend.tick(cfg.fps);
        frames_this_second += 1;
        if second >= Duration::from_secs(1) {
            log::debug!("FPS: {:.1}", frames_this_second as f32 / second.as_secs_f32());
            frames_this_second = 0;
            second = Duration::ZERO;
        }
    }
}
