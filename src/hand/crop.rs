use anyhow::Result;
use opencv::{
    core::{Mat, Rect},
    prelude::*,
};

use super::landmark::{Landmark, LandmarkSet};

/// 前フレームのBBoxに対する拡大率
pub const ROI_EXPAND: f32 = 1.5;

/// クロップ領域（正規化座標 0.0〜1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRegion {
    pub fn full() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

/// BBox（ピクセル座標）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// ランドマークのmin/maxからBBoxを返す。点が2個未満ならNone。
pub fn bbox_from_landmarks(set: &LandmarkSet, frame_w: u32, frame_h: u32) -> Option<BBox> {
    if set.len() < 2 {
        return None;
    }

    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;

    for lm in set.points() {
        let px = lm.x * frame_w as f32;
        let py = lm.y * frame_h as f32;
        min_x = min_x.min(px);
        min_y = min_y.min(py);
        max_x = max_x.max(px);
        max_y = max_y.max(py);
    }

    Some(BBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    })
}

/// BBoxから正方形のクロップ領域を計算
///
/// - 長辺を ROI_EXPAND 倍した正方形（中心を保持）
/// - フレーム境界にクリップ
pub fn square_region(bbox: &BBox, frame_w: u32, frame_h: u32) -> CropRegion {
    let cx = bbox.x + bbox.width / 2.0;
    let cy = bbox.y + bbox.height / 2.0;
    let side = bbox.width.max(bbox.height) * ROI_EXPAND;

    let fw = frame_w as f32;
    let fh = frame_h as f32;
    let x = (cx - side / 2.0).max(0.0);
    let y = (cy - side / 2.0).max(0.0);
    let w = side.min(fw - x).max(1.0);
    let h = side.min(fh - y).max(1.0);

    CropRegion {
        x: x / fw,
        y: y / fh,
        width: w / fw,
        height: h / fh,
    }
}

/// フレームから領域を切り出す
pub fn crop_frame(frame: &Mat, region: &CropRegion) -> Result<Mat> {
    let fw = frame.cols() as f32;
    let fh = frame.rows() as f32;

    let rx = ((region.x * fw) as i32).clamp(0, frame.cols() - 1);
    let ry = ((region.y * fh) as i32).clamp(0, frame.rows() - 1);
    let rw = ((region.width * fw) as i32).clamp(1, frame.cols() - rx);
    let rh = ((region.height * fh) as i32).clamp(1, frame.rows() - ry);

    let roi = Rect::new(rx, ry, rw, rh);
    let cropped = Mat::roi(frame, roi)?;
    Ok(cropped.try_clone()?)
}

/// クロップ内の正規化座標をフレーム全体の正規化座標に変換
pub fn remap_landmarks(set: &LandmarkSet, crop: &CropRegion) -> LandmarkSet {
    let points = set
        .points()
        .iter()
        .map(|lm| Landmark {
            x: crop.x + lm.x * crop.width,
            y: crop.y + lm.y * crop.height,
        })
        .collect();
    LandmarkSet::new(points)
}
