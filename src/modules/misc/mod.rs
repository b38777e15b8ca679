pub mod afk;
pub mod commands;
pub mod handler;
pub mod snipe;

use commands::*;

/// 🧰 Various utilities
pub fn commands() -> Vec<crate::Command> {
    vec![help(), ping(), info(), hello(), members(), afk(), snipe()]
}
