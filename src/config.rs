use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub recording: RecordingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// カメラindex
    #[serde(default = "default_camera_index")]
    pub index: i32,
    /// 要求する横解像度
    #[serde(default = "default_camera_width")]
    pub width: u32,
    /// 要求する縦解像度
    #[serde(default = "default_camera_height")]
    pub height: u32,
    /// 左右反転（鏡像プレビュー）
    #[serde(default = "default_mirror")]
    pub mirror: bool,
}

fn default_camera_index() -> i32 { 0 }
fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_mirror() -> bool { true }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: default_camera_index(),
            width: default_camera_width(),
            height: default_camera_height(),
            mirror: default_mirror(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// 手ランドマークONNXモデルのパス
    #[serde(default = "default_model_path")]
    pub path: String,
    /// 入力画像の一辺（正方形）
    #[serde(default = "default_input_size")]
    pub input_size: u32,
    #[serde(default = "default_input_name")]
    pub input_name: String,
    /// 21x3 ランドマーク出力
    #[serde(default = "default_landmarks_output")]
    pub landmarks_output: String,
    /// 手の存在スコア出力
    #[serde(default = "default_presence_output")]
    pub presence_output: String,
    /// この値未満は「手なし」
    #[serde(default = "default_presence_threshold")]
    pub presence_threshold: f32,
}

fn default_model_path() -> String { "models/hand_landmark.onnx".to_string() }
fn default_input_size() -> u32 { 224 }
fn default_input_name() -> String { "input_1".to_string() }
fn default_landmarks_output() -> String { "Identity".to_string() }
fn default_presence_output() -> String { "Identity_1".to_string() }
fn default_presence_threshold() -> f32 { 0.5 }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            input_size: default_input_size(),
            input_name: default_input_name(),
            landmarks_output: default_landmarks_output(),
            presence_output: default_presence_output(),
            presence_threshold: default_presence_threshold(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecordingConfig {
    /// 録画ファイルの保存先
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// 4文字のコーデックコード
    #[serde(default = "default_fourcc")]
    pub fourcc: String,
}

fn default_output_path() -> String { "gesture_recording.mp4".to_string() }
fn default_fourcc() -> String { "mp4v".to_string() }

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            fourcc: default_fourcc(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// ファイルがなければデフォルト設定。壊れていれば警告してデフォルト。
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }
}
