pub mod commands;
pub mod status;

use commands::*;

/// ⛏️ Utilities for the Minecraft server
pub fn commands() -> Vec<crate::Command> {
    vec![
        ip(),
        server(),
        status(),
        wiki(),
        store(),
        forum(),
        dynmap(),
        vote(),
        staff_application(),
    ]
}
