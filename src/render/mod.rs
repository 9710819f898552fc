pub mod overlay;
pub mod skeleton;
pub mod window;

pub use overlay::{draw_landmarks, draw_overlay};
pub use skeleton::HAND_CONNECTIONS;
pub use window::MinifbRenderer;
