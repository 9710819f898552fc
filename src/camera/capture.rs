use anyhow::{Context, Result};
use opencv::{
    core::{self, Mat},
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs},
};
use tracing::info;

use super::FrameSource;
use crate::config::CameraConfig;

/// カメラがFPSを返さない（0や非数）ときの録画FPS
pub const DEFAULT_FPS: f64 = 30.0;

/// OpenCVを使用したカメラキャプチャ
pub struct OpenCvCamera {
    capture: VideoCapture,
    width: u32,
    height: u32,
    fps: f64,
    mirror: bool,
}

impl OpenCvCamera {
    /// 設定に従ってカメラを開く
    pub fn open(config: &CameraConfig) -> Result<Self> {
        let mut capture = VideoCapture::new(config.index, VideoCaptureAPIs::CAP_ANY as i32)
            .context("Failed to open camera")?;

        if !capture.is_opened()? {
            anyhow::bail!("Camera {} is not available", config.index);
        }

        capture.set(videoio::CAP_PROP_FRAME_WIDTH, config.width as f64)?;
        capture.set(videoio::CAP_PROP_FRAME_HEIGHT, config.height as f64)?;

        let actual_width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let actual_height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let actual_fps = capture.get(videoio::CAP_PROP_FPS)?;
        info!(
            "Camera {}: {}x{} @ {} fps",
            config.index, actual_width, actual_height, actual_fps
        );

        Ok(Self {
            capture,
            width: actual_width,
            height: actual_height,
            fps: actual_fps,
            mirror: config.mirror,
        })
    }

    /// カメラ報告値のFPS。0や不明なら DEFAULT_FPS。
    pub fn fps_or_default(&self) -> f64 {
        recording_fps(self.fps)
    }
}

impl FrameSource for OpenCvCamera {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// フレームを読み込む（BGR形式、mirror設定なら左右反転）
    fn read_frame(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        let ok = self
            .capture
            .read(&mut frame)
            .context("Failed to read frame")?;

        if !ok || frame.empty() {
            anyhow::bail!("Empty frame received");
        }

        if !self.mirror {
            return Ok(frame);
        }

        let mut flipped = Mat::default();
        core::flip(&frame, &mut flipped, 1)?;
        Ok(flipped)
    }
}

/// 録画に使うFPSを決める
pub fn recording_fps(reported: f64) -> f64 {
    if reported.is_finite() && reported > 0.0 {
        reported
    } else {
        DEFAULT_FPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_fps_passthrough() {
        assert_eq!(recording_fps(60.0), 60.0);
        assert_eq!(recording_fps(29.97), 29.97);
    }

    #[test]
    fn test_recording_fps_fallback() {
        assert_eq!(recording_fps(0.0), DEFAULT_FPS);
        assert_eq!(recording_fps(-1.0), DEFAULT_FPS);
        assert_eq!(recording_fps(f64::NAN), DEFAULT_FPS);
    }
}
