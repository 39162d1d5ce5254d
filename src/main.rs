// What you SEE:
// • "PRESS SPACE TO START" until you press SPACE.
// • Hold SPACE (or UP) to jump over the cacti; the score counts up while you survive.
// • Touch a cactus and it is GAME OVER; SPACE starts a new run. ESC quits.

use clap::Parser;

use dino_runner::assets;
use dino_runner::config::Args;
use dino_runner::draw::Drawer;
use dino_runner::error::Error;
use dino_runner::frontend;
use dino_runner::obstacle::ObstacleSprite;
use dino_runner::player::PlayerSprites;
use dino_runner::session::GameSession;

fn main() {
    // info+ by default; RUST_LOG overrides (e.g. RUST_LOG=dino_runner=trace)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let args = Args::parse();
    let cfg = args.game_config()?;

    /* --- Sprites: decoded and scaled once, before any window opens --- */
    let (pw, ph) = cfg.player_size;
    let (ow, oh) = cfg.obstacle_size;
    let (player_frames, cactus) = if args.placeholder {
        log::info!("using generated sprites");
        (assets::placeholder_player_frames(pw, ph), assets::placeholder_obstacle(ow, oh))
    } else {
        let frames = assets::load_animated_image(&args.player_path())?
            .iter()
            .map(|f| assets::scale(f, pw, ph))
            .collect();
        let cactus = assets::scale(&assets::load_static_image(&args.obstacle_path())?, ow, oh);
        (frames, cactus)
    };

    let player = PlayerSprites::new(player_frames, cfg.tilt_degrees, cfg.player_rule);
    let obstacle = ObstacleSprite::new(cactus, cfg.obstacle_rule);
    let mut session = GameSession::new(cfg.clone(), player, obstacle)?;

    let mut drawer = Drawer::new("Dino Game", cfg.screen_width, cfg.screen_height)?;
    frontend::run(&mut drawer, &mut session)
}
