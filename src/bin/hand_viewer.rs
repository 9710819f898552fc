use anyhow::Result;
use std::time::Instant;

use gesture_control::camera::{FrameSource, OpenCvCamera};
use gesture_control::config::Config;
use gesture_control::gesture::count_open_fingers;
use gesture_control::hand::{HandLandmarkDetector, LandmarkProvider};
use gesture_control::render::{draw_landmarks, MinifbRenderer};

const CONFIG_PATH: &str = "config.toml";

/// キー入力・録画なしでランドマーク推定だけを確認する
fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("Hand Viewer");
    println!("Press ESC to exit");

    println!("Opening camera...");
    let mut camera = OpenCvCamera::open(&config.camera)?;
    let (width, height) = camera.resolution();
    println!("Camera resolution: {}x{}", width, height);

    println!("Loading model from {}...", config.model.path);
    let mut detector = HandLandmarkDetector::new(&config.model)?;
    println!("Model loaded");

    let mut renderer = MinifbRenderer::new("Hand Viewer", width as usize, height as usize)?;

    // FPS計測用
    let mut frame_count = 0u32;
    let mut detected_count = 0u32;
    let mut fps_timer = Instant::now();
    let mut last_fingers: Option<u8> = None;

    while renderer.is_open() {
        let mut frame = match camera.read_frame() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Frame capture error: {}", e);
                continue;
            }
        };

        if let Some(hand) = detector.infer(&frame)? {
            draw_landmarks(&mut frame, &hand)?;
            last_fingers = count_open_fingers(&hand).ok();
            detected_count += 1;
        }

        renderer.draw_frame(&frame)?;
        renderer.update()?;

        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            println!(
                "FPS: {:.1}, detected: {}/{}, fingers: {}",
                frame_count as f32 / elapsed,
                detected_count,
                frame_count,
                last_fingers.map_or("-".to_string(), |n| n.to_string())
            );
            frame_count = 0;
            detected_count = 0;
            fps_timer = Instant::now();
        }
    }

    println!("Shutting down...");
    Ok(())
}
