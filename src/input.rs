use anyhow::{anyhow, Result};
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use tracing::warn;

/// ゲーム操作に使うキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    Space,
    Left,
    Right,
    Up,
    Down,
}

impl GameKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    fn to_enigo(self) -> Key {
        match self {
            Self::Space => Key::Space,
            Self::Left => Key::LeftArrow,
            Self::Right => Key::RightArrow,
            Self::Up => Key::UpArrow,
            Self::Down => Key::DownArrow,
        }
    }
}

/// キー入力をOSに送る
pub trait ActionDispatcher {
    /// 押して離す（1回）
    fn press_key(&mut self, key: GameKey) -> Result<()>;
}

/// enigo によるキー入力シミュレーション
///
/// 入力デバイスを開けない環境（ディスプレイなし等）でも生成はでき、
/// その場合 press_key が毎回エラーを返す。
pub struct KeyboardDispatcher {
    enigo: Option<Enigo>,
}

impl KeyboardDispatcher {
    pub fn new() -> Self {
        let enigo = match Enigo::new(&Settings::default()) {
            Ok(enigo) => Some(enigo),
            Err(e) => {
                warn!("Input simulation unavailable: {}", e);
                None
            }
        };
        Self { enigo }
    }

    pub fn is_available(&self) -> bool {
        self.enigo.is_some()
    }
}

impl Default for KeyboardDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionDispatcher for KeyboardDispatcher {
    fn press_key(&mut self, key: GameKey) -> Result<()> {
        let enigo = self
            .enigo
            .as_mut()
            .ok_or_else(|| anyhow!("input simulation unavailable"))?;
        enigo.key(key.to_enigo(), Direction::Click)?;
        Ok(())
    }
}
