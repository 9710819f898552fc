use super::GestureError;
use crate::hand::{HandLandmarkIndex, LandmarkSet};

/// (指先, 付け根) の組。親指は向きで判定がぶれるので除外。
pub const FINGER_PAIRS: [(HandLandmarkIndex, HandLandmarkIndex); 4] = [
    (HandLandmarkIndex::IndexTip, HandLandmarkIndex::IndexMcp),
    (HandLandmarkIndex::MiddleTip, HandLandmarkIndex::MiddleMcp),
    (HandLandmarkIndex::RingTip, HandLandmarkIndex::RingMcp),
    (HandLandmarkIndex::PinkyTip, HandLandmarkIndex::PinkyMcp),
];

/// 伸びている指（親指以外）の本数 0〜4
///
/// 指先のyが付け根のyより小さい（画像上で上にある）とき伸びていると判定。
pub fn count_open_fingers(set: &LandmarkSet) -> Result<u8, GestureError> {
    if !set.is_complete() {
        return Err(GestureError::InvalidInput {
            expected: HandLandmarkIndex::COUNT,
            actual: set.len(),
        });
    }

    let points = set.points();
    let open = FINGER_PAIRS
        .iter()
        .filter(|(tip, base)| points[*tip as usize].y < points[*base as usize].y)
        .count();

    Ok(open as u8)
}
