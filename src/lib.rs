pub mod camera;
pub mod config;
pub mod gesture;
pub mod hand;
pub mod input;
pub mod recorder;
pub mod render;
pub mod session;
