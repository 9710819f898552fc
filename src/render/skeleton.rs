use crate::hand::HandLandmarkIndex;

/// 手の骨格の接続定義 (開始ランドマーク, 終了ランドマーク)
pub const HAND_CONNECTIONS: [(HandLandmarkIndex, HandLandmarkIndex); 21] = [
    // 親指
    (HandLandmarkIndex::Wrist, HandLandmarkIndex::ThumbCmc),
    (HandLandmarkIndex::ThumbCmc, HandLandmarkIndex::ThumbMcp),
    (HandLandmarkIndex::ThumbMcp, HandLandmarkIndex::ThumbIp),
    (HandLandmarkIndex::ThumbIp, HandLandmarkIndex::ThumbTip),
    // 人差し指
    (HandLandmarkIndex::Wrist, HandLandmarkIndex::IndexMcp),
    (HandLandmarkIndex::IndexMcp, HandLandmarkIndex::IndexPip),
    (HandLandmarkIndex::IndexPip, HandLandmarkIndex::IndexDip),
    (HandLandmarkIndex::IndexDip, HandLandmarkIndex::IndexTip),
    // 中指
    (HandLandmarkIndex::MiddleMcp, HandLandmarkIndex::MiddlePip),
    (HandLandmarkIndex::MiddlePip, HandLandmarkIndex::MiddleDip),
    (HandLandmarkIndex::MiddleDip, HandLandmarkIndex::MiddleTip),
    // 薬指
    (HandLandmarkIndex::RingMcp, HandLandmarkIndex::RingPip),
    (HandLandmarkIndex::RingPip, HandLandmarkIndex::RingDip),
    (HandLandmarkIndex::RingDip, HandLandmarkIndex::RingTip),
    // 小指
    (HandLandmarkIndex::Wrist, HandLandmarkIndex::PinkyMcp),
    (HandLandmarkIndex::PinkyMcp, HandLandmarkIndex::PinkyPip),
    (HandLandmarkIndex::PinkyPip, HandLandmarkIndex::PinkyDip),
    (HandLandmarkIndex::PinkyDip, HandLandmarkIndex::PinkyTip),
    // 手のひら
    (HandLandmarkIndex::IndexMcp, HandLandmarkIndex::MiddleMcp),
    (HandLandmarkIndex::MiddleMcp, HandLandmarkIndex::RingMcp),
    (HandLandmarkIndex::RingMcp, HandLandmarkIndex::PinkyMcp),
];

// 色はすべて BGR

/// ランドマーク点
pub const LANDMARK_COLOR: [f64; 3] = [0.0, 0.0, 255.0]; // 赤

/// 骨格線
pub const CONNECTION_COLOR: [f64; 3] = [255.0, 255.0, 255.0]; // 白

/// 手首マーカー
pub const WRIST_COLOR: [f64; 3] = [0.0, 255.0, 0.0]; // 緑

/// 指の本数テキスト
pub const FINGERS_TEXT_COLOR: [f64; 3] = [255.0, 0.0, 0.0]; // 青

/// 操作テキスト
pub const ACTION_TEXT_COLOR: [f64; 3] = [0.0, 0.0, 255.0]; // 赤
