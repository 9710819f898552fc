use anyhow::{Context, Result};
use opencv::{
    core::{Mat, Size},
    prelude::*,
    videoio::VideoWriter,
};
use tracing::info;

use crate::gesture::GestureResult;
use crate::hand::LandmarkSet;
use crate::render::draw_overlay;

/// 注釈付きフレームの出力先
pub trait FrameSink {
    /// フレームに判定結果を描き込む
    fn annotate(
        &mut self,
        frame: &mut Mat,
        hand: Option<&LandmarkSet>,
        result: &GestureResult,
    ) -> Result<()>;

    /// フレームを1枚追記
    fn write_frame(&mut self, frame: &Mat) -> Result<()>;
}

/// OpenCV VideoWriter による録画
pub struct VideoRecorder {
    writer: VideoWriter,
    path: String,
    frames: u64,
}

impl VideoRecorder {
    /// 録画ファイルを開く。サイズとFPSは開いた時点で固定。
    pub fn create(path: &str, fourcc: &str, width: u32, height: u32, fps: f64) -> Result<Self> {
        let code = fourcc_code(fourcc)?;
        let writer = VideoWriter::new(
            path,
            code,
            fps,
            Size::new(width as i32, height as i32),
            true,
        )
        .with_context(|| format!("Failed to create video writer for {}", path))?;

        if !writer.is_opened()? {
            anyhow::bail!("Video writer for {} could not be opened", path);
        }

        info!("Recording to {} ({}x{} @ {} fps, {})", path, width, height, fps, fourcc);

        Ok(Self {
            writer,
            path: path.to_string(),
            frames: 0,
        })
    }

    /// ファイルを閉じる
    pub fn finish(mut self) -> Result<()> {
        self.writer.release()?;
        info!("Wrote {} frames to {}", self.frames, self.path);
        Ok(())
    }
}

impl FrameSink for VideoRecorder {
    fn annotate(
        &mut self,
        frame: &mut Mat,
        hand: Option<&LandmarkSet>,
        result: &GestureResult,
    ) -> Result<()> {
        draw_overlay(frame, hand, result)
    }

    fn write_frame(&mut self, frame: &Mat) -> Result<()> {
        self.writer.write(frame).context("Failed to write video frame")?;
        self.frames += 1;
        Ok(())
    }
}

/// "mp4v" のような4文字コードを VideoWriter 用の整数に変換
pub fn fourcc_code(fourcc: &str) -> Result<i32> {
    let chars: Vec<char> = fourcc.chars().collect();
    let [c1, c2, c3, c4] = chars[..] else {
        anyhow::bail!("fourcc must be exactly 4 characters: {:?}", fourcc);
    };
    Ok(VideoWriter::fourcc(c1, c2, c3, c4)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourcc_code_mp4v() {
        let code = fourcc_code("mp4v").unwrap();
        let expected = ('m' as i32) | ('p' as i32) << 8 | ('4' as i32) << 16 | ('v' as i32) << 24;
        assert_eq!(code, expected);
    }

    #[test]
    fn test_fourcc_code_wrong_length() {
        assert!(fourcc_code("mp4").is_err());
        assert!(fourcc_code("mp4vv").is_err());
    }
}
