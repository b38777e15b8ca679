pub mod minecraft;
pub mod misc;
pub mod system;
