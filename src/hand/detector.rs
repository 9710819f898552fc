use anyhow::{Context, Result};
use opencv::{core::Mat, prelude::*};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use super::crop::{bbox_from_landmarks, crop_frame, remap_landmarks, square_region, CropRegion};
use super::landmark::{HandLandmarkIndex, Landmark, LandmarkSet};
use super::preprocess::preprocess_for_hand_landmark;
use super::LandmarkProvider;
use crate::config::ModelConfig;

/// 1ランドマークあたりの出力値 (x, y, z)
const VALUES_PER_LANDMARK: usize = 3;

/// 手ランドマークモデルを使用した検出器
///
/// 検出できたフレームの次は、そのランドマーク周辺だけを切り出して推論する。
/// 見失ったらフレーム全体に戻す。
pub struct HandLandmarkDetector {
    session: Session,
    input_size: i32,
    input_name: String,
    landmarks_output: String,
    presence_output: String,
    presence_threshold: f32,
    roi: Option<CropRegion>,
}

impl HandLandmarkDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&config.path)
            .with_context(|| format!("Failed to load hand landmark model {}", config.path))?;

        Ok(Self {
            session,
            input_size: config.input_size as i32,
            input_name: config.input_name.clone(),
            landmarks_output: config.landmarks_output.clone(),
            presence_output: config.presence_output.clone(),
            presence_threshold: config.presence_threshold,
            roi: None,
        })
    }

    /// 前処理済み画像から (ランドマーク生値, 存在スコア) を得る
    fn run(&mut self, image: &Mat) -> Result<(Vec<f32>, f32)> {
        let input = preprocess_for_hand_landmark(image, self.input_size)?;
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .context("Inference failed")?;

        let landmarks: ndarray::ArrayViewD<f32> = outputs[self.landmarks_output.as_str()]
            .try_extract_array()
            .context("Failed to extract landmark tensor")?;
        let raw: Vec<f32> = landmarks.iter().copied().collect();

        let presence: ndarray::ArrayViewD<f32> = outputs[self.presence_output.as_str()]
            .try_extract_array()
            .context("Failed to extract presence tensor")?;
        let score = presence.iter().next().copied().unwrap_or(0.0);

        Ok((raw, score))
    }
}

impl LandmarkProvider for HandLandmarkDetector {
    fn infer(&mut self, frame: &Mat) -> Result<Option<LandmarkSet>> {
        let frame_w = frame.cols() as u32;
        let frame_h = frame.rows() as u32;

        let cropped;
        let (image, region) = match self.roi {
            Some(region) => {
                cropped = crop_frame(frame, &region)?;
                (&cropped, region)
            }
            None => (frame, CropRegion::full()),
        };

        let (raw, score) = self.run(image)?;
        if score < self.presence_threshold {
            if self.roi.take().is_some() {
                debug!("hand lost (presence {:.2}), falling back to full frame", score);
            }
            return Ok(None);
        }

        let local = parse_landmarks(&raw, self.input_size as f32);
        let set = remap_landmarks(&local, &region);
        self.roi = bbox_from_landmarks(&set, frame_w, frame_h)
            .map(|bbox| square_region(&bbox, frame_w, frame_h));

        Ok(Some(set))
    }
}

/// モデル出力 [x0, y0, z0, x1, ...]（入力ピクセル座標）を正規化座標に変換
///
/// 値が足りなければ、揃っている分だけの LandmarkSet を返す。
pub fn parse_landmarks(raw: &[f32], input_size: f32) -> LandmarkSet {
    let points = raw
        .chunks_exact(VALUES_PER_LANDMARK)
        .take(HandLandmarkIndex::COUNT)
        .map(|v| Landmark::new(v[0] / input_size, v[1] / input_size))
        .collect();
    LandmarkSet::new(points)
}
