pub mod capture;

use anyhow::Result;
use opencv::core::Mat;

pub use capture::{recording_fps, OpenCvCamera, DEFAULT_FPS};

/// フレーム供給元
pub trait FrameSource {
    /// 次のフレーム（BGR）。取得できなければエラー。
    fn read_frame(&mut self) -> Result<Mat>;

    fn resolution(&self) -> (u32, u32);
}
