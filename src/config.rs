// Tunables for the runner plus the command line that overrides some of them.

use std::path::PathBuf;

use clap::Parser;

use crate::error::Error;
use crate::mask::TransparencyRule;

/// Everything the simulation and renderer need to know about the world.
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub screen_width: usize,
    pub screen_height: usize,
    pub fps: u32,
    /// Distance between the floor and the bottom of the screen.
    pub ground_margin: i32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub scroll_speed: i32,
    pub obstacle_count: usize,
    pub obstacle_spacing: i32,
    /// Ticks per animation frame.
    pub animation_period: u32,
    pub player_size: (usize, usize),
    pub player_spawn_x: i32,
    pub player_rule: TransparencyRule,
    pub obstacle_size: (usize, usize),
    pub obstacle_rule: TransparencyRule,
    /// Airborne tilt in degrees, counter-clockwise.
    pub tilt_degrees: f32,
    pub background: u32,
    pub text_color: u32,
    /// Ticks per visible score point.
    pub score_divisor: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 400,
            fps: 60,
            ground_margin: 20,
            gravity: 0.5,
            jump_velocity: -12.0,
            scroll_speed: 5,
            obstacle_count: 3,
            obstacle_spacing: 300,
            animation_period: 30,
            player_size: (100, 100),
            player_spawn_x: 100,
            player_rule: TransparencyRule::AlphaThreshold(127),
            obstacle_size: (40, 40),
            obstacle_rule: TransparencyRule::ColorKey(0x00FF_FFFF),
            tilt_degrees: 20.0,
            background: 0x0078_FFFF,
            text_color: 0x0000_0000,
            score_divisor: 10,
        }
    }
}

impl GameConfig {
    /// The y coordinate every bottom edge rests on.
    pub fn ground_line(&self) -> i32 {
        self.screen_height as i32 - self.ground_margin
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(Error::InvalidConfig("screen size must be non-zero".into()));
        }
        if self.fps == 0 {
            return Err(Error::InvalidConfig("fps must be non-zero".into()));
        }
        if self.obstacle_count == 0 {
            return Err(Error::InvalidConfig("need at least one obstacle".into()));
        }
        if self.animation_period == 0 {
            return Err(Error::InvalidConfig("animation period must be non-zero".into()));
        }
        if self.score_divisor == 0 {
            return Err(Error::InvalidConfig("score divisor must be non-zero".into()));
        }
        if self.ground_margin < 0 || self.ground_margin as usize >= self.screen_height {
            return Err(Error::InvalidConfig(format!(
                "ground margin {} does not fit a {} pixel tall screen",
                self.ground_margin, self.screen_height
            )));
        }
        Ok(())
    }
}

/// Side-scrolling runner: jump over the cacti with SPACE.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Directory holding the sprite files
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Animated player sprite (GIF), relative to --assets
    #[arg(long, default_value = "croco.gif")]
    pub player: PathBuf,

    /// Obstacle sprite, relative to --assets
    #[arg(long, default_value = "buk.png")]
    pub obstacle: PathBuf,

    #[arg(long, default_value_t = 800)]
    pub width: usize,

    #[arg(long, default_value_t = 400)]
    pub height: usize,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Use generated sprites instead of loading files
    #[arg(long)]
    pub placeholder: bool,
}

impl Args {
    pub fn game_config(&self) -> Result<GameConfig, Error> {
        let cfg = GameConfig {
            screen_width: self.width,
            screen_height: self.height,
            fps: self.fps,
            ..GameConfig::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn player_path(&self) -> PathBuf {
        self.assets.join(&self.player)
    }

    pub fn obstacle_path(&self) -> PathBuf {
        self.assets.join(&self.obstacle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = GameConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.ground_line(), 380);
    }

    #[test]
    fn rejects_empty_pool_and_zero_fps() {
        let cfg = GameConfig { obstacle_count: 0, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
        let cfg = GameConfig { fps: 0, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
        let cfg = GameConfig { score_divisor: 0, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
        let cfg = GameConfig { ground_margin: -1, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
        let cfg = GameConfig { ground_margin: 400, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
        let cfg = GameConfig { ground_margin: 399, ..GameConfig::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn args_override_screen_and_join_paths() {
        let args = Args::parse_from(["dino-runner", "--assets", "img", "--width", "640", "--fps", "30"]);
        let cfg = args.game_config().unwrap();
        assert_eq!((cfg.screen_width, cfg.screen_height, cfg.fps), (640, 400, 30));
        assert_eq!(args.player_path(), PathBuf::from("img").join("croco.gif"));
        assert_eq!(args.obstacle_path(), PathBuf::from("img").join("buk.png"));
        assert!(!args.placeholder);
    }
}
