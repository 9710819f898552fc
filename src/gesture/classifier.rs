use std::time::Instant;

use tracing::debug;

use super::cooldown::CooldownTimer;
use super::fingers::count_open_fingers;
use super::{GestureError, FIST_COOLDOWN, MOVE_COOLDOWN, MOVE_THRESHOLD_PX};
use crate::hand::{HandLandmarkIndex, LandmarkSet};
use crate::input::GameKey;

/// ゲームへの操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    Hoverboard,
    Right,
    Left,
    Up,
    Down,
}

impl GameAction {
    pub fn key(&self) -> GameKey {
        match self {
            Self::Hoverboard => GameKey::Space,
            Self::Right => GameKey::Right,
            Self::Left => GameKey::Left,
            Self::Up => GameKey::Up,
            Self::Down => GameKey::Down,
        }
    }

    pub fn label(&self) -> GestureLabel {
        match self {
            Self::Hoverboard => GestureLabel::Fist,
            Self::Right => GestureLabel::MoveRight,
            Self::Left => GestureLabel::MoveLeft,
            Self::Up => GestureLabel::MoveUp,
            Self::Down => GestureLabel::MoveDown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureLabel {
    NoHand,
    Fist,
    MoveRight,
    MoveLeft,
    MoveUp,
    MoveDown,
    Idle,
}

impl GestureLabel {
    /// プレビューに表示する文字列
    pub fn display_text(&self) -> &'static str {
        match self {
            Self::NoHand => "No hand",
            Self::Fist => "HOVERBOARD!",
            Self::MoveRight => "RIGHT",
            Self::MoveLeft => "LEFT",
            Self::MoveUp => "UP (JUMP)",
            Self::MoveDown => "DOWN (SLIDE)",
            Self::Idle => "Idle",
        }
    }
}

/// 1フレーム分の判定結果
#[derive(Debug, Clone, PartialEq)]
pub struct GestureResult {
    pub label: GestureLabel,
    /// 発火した操作（グー → 方向 の順、最大2つ）
    pub actions: Vec<GameAction>,
    pub open_fingers: Option<u8>,
    /// 手首のピクセル座標
    pub wrist: Option<(i32, i32)>,
}

impl GestureResult {
    pub fn no_hand() -> Self {
        Self {
            label: GestureLabel::NoHand,
            actions: Vec::new(),
            open_fingers: None,
            wrist: None,
        }
    }
}

/// ジェスチャ判定器
///
/// 前フレームの手首位置と、グー/方向それぞれのクールダウンだけを保持する。
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    fist_cooldown: CooldownTimer,
    move_cooldown: CooldownTimer,
    reference: Option<(i32, i32)>,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self {
            fist_cooldown: CooldownTimer::new(FIST_COOLDOWN),
            move_cooldown: CooldownTimer::new(MOVE_COOLDOWN),
            reference: None,
        }
    }

    /// 最後に手を検出したフレームの手首位置
    pub fn reference(&self) -> Option<(i32, i32)> {
        self.reference
    }

    pub fn fist_cooldown(&self) -> &CooldownTimer {
        &self.fist_cooldown
    }

    pub fn move_cooldown(&self) -> &CooldownTimer {
        &self.move_cooldown
    }

    /// 1フレーム分を判定
    ///
    /// 手がなければ NoHand（状態は変えない）。点数不足ならエラーで、状態は変えない。
    pub fn classify(
        &mut self,
        hand: Option<&LandmarkSet>,
        frame_w: u32,
        frame_h: u32,
        now: Instant,
    ) -> Result<GestureResult, GestureError> {
        let Some(hand) = hand else {
            return Ok(GestureResult::no_hand());
        };

        let open_fingers = count_open_fingers(hand)?;
        let wrist = hand
            .get(HandLandmarkIndex::Wrist)
            .map(|lm| lm.to_pixel(frame_w, frame_h))
            .ok_or(GestureError::InvalidInput {
                expected: HandLandmarkIndex::COUNT,
                actual: hand.len(),
            })?;

        let mut actions = Vec::with_capacity(2);
        let mut label = GestureLabel::Idle;

        // グー: 方向判定はブロックしない（同フレームで両方発火しうる）
        if open_fingers == 0 && self.fist_cooldown.try_fire(now) {
            debug!("fist fired");
            actions.push(GameAction::Hoverboard);
            label = GestureLabel::Fist;
        }

        if let Some(prev) = self.reference {
            // 座標が非有限だと to_pixel が i32 の端に張り付くので飽和減算
            let dx = wrist.0.saturating_sub(prev.0);
            let dy = wrist.1.saturating_sub(prev.1);

            if self.move_cooldown.is_ready(now) {
                if let Some(action) = direction_for(dx, dy) {
                    self.move_cooldown.fire(now);
                    debug!("move fired: {:?} (dx={}, dy={})", action, dx, dy);
                    actions.push(action);
                    label = action.label();
                }
            }
        }

        self.reference = Some(wrist);

        Ok(GestureResult {
            label,
            actions,
            open_fingers: Some(open_fingers),
            wrist: Some(wrist),
        })
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// 右 → 左 → 上 → 下 の優先順で最初に閾値を超えた方向
pub fn direction_for(dx: i32, dy: i32) -> Option<GameAction> {
    if dx > MOVE_THRESHOLD_PX {
        Some(GameAction::Right)
    } else if dx < -MOVE_THRESHOLD_PX {
        Some(GameAction::Left)
    } else if dy < -MOVE_THRESHOLD_PX {
        Some(GameAction::Up)
    } else if dy > MOVE_THRESHOLD_PX {
        Some(GameAction::Down)
    } else {
        None
    }
}
