pub mod crop;
pub mod detector;
pub mod landmark;
pub mod preprocess;

use anyhow::Result;
use opencv::core::Mat;

pub use crop::{bbox_from_landmarks, crop_frame, remap_landmarks, square_region, BBox, CropRegion};
pub use detector::{parse_landmarks, HandLandmarkDetector};
pub use landmark::{HandLandmarkIndex, Landmark, LandmarkSet};
pub use preprocess::preprocess_for_hand_landmark;

/// フレームから手ランドマークを推定する
pub trait LandmarkProvider {
    /// 手が見つからなければ Ok(None)
    fn infer(&mut self, frame: &Mat) -> Result<Option<LandmarkSet>>;
}
