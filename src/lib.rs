//! Side-scrolling runner: a sprite that jumps over an endless stream of cacti,
//! with pixel-exact collisions and a fixed-rate software-rendered loop.
//!
//! `session::GameSession` is the game itself and knows nothing about windows;
//! `draw::Drawer` is the minifb frontend and `frontend::run` ties them together.

pub mod anim;
pub mod assets;
pub mod config;
pub mod draw;
pub mod error;
pub mod frontend;
pub mod mask;
pub mod obstacle;
pub mod player;
pub mod session;
pub mod types;
