//! 手ランドマークからゲーム操作への変換
//!
//! 指の本数（グー判定）と手首の移動方向の2種類のみ。しきい値は固定。

pub mod classifier;
pub mod cooldown;
pub mod fingers;

use std::fmt;
use std::time::Duration;

pub use classifier::{GameAction, GestureClassifier, GestureLabel, GestureResult};
pub use cooldown::CooldownTimer;
pub use fingers::count_open_fingers;

/// グー（ホバーボード）の再発火間隔
pub const FIST_COOLDOWN: Duration = Duration::from_millis(2000);

/// 方向入力の再発火間隔
pub const MOVE_COOLDOWN: Duration = Duration::from_millis(400);

/// 方向入力とみなす手首の移動量（ピクセル、この値を超えたら発火）
pub const MOVE_THRESHOLD_PX: i32 = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    /// ランドマーク点数が足りない
    InvalidInput { expected: usize, actual: usize },
}

impl fmt::Display for GestureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureError::InvalidInput { expected, actual } => write!(
                f,
                "invalid landmark set: expected {} points, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for GestureError {}
