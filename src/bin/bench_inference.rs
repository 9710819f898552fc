use anyhow::Result;
use std::time::{Duration, Instant};

use gesture_control::camera::{FrameSource, OpenCvCamera};
use gesture_control::config::Config;
use gesture_control::hand::{preprocess_for_hand_landmark, HandLandmarkDetector, LandmarkProvider};

const ITERATIONS: u32 = 100;

fn ms_per_frame(total: Duration) -> f64 {
    total.as_secs_f64() * 1000.0 / ITERATIONS as f64
}

fn main() -> Result<()> {
    let config = Config::load_or_default("config.toml");
    let mut camera = OpenCvCamera::open(&config.camera)?;
    let mut detector = HandLandmarkDetector::new(&config.model)?;

    let mut t_capture = Duration::ZERO;
    let mut t_preprocess = Duration::ZERO;
    let mut t_inference = Duration::ZERO;
    let mut hits = 0u32;

    for _ in 0..ITERATIONS {
        let t0 = Instant::now();
        let frame = camera.read_frame()?;
        let t1 = Instant::now();
        // 前処理単体の時間（推論内でも同じ処理が走る）
        let _ = preprocess_for_hand_landmark(&frame, config.model.input_size as i32)?;
        let t2 = Instant::now();
        if detector.infer(&frame)?.is_some() {
            hits += 1;
        }
        let t3 = Instant::now();

        t_capture += t1 - t0;
        t_preprocess += t2 - t1;
        t_inference += t3 - t2;
    }

    println!("Capture:    {:.2}ms/frame", ms_per_frame(t_capture));
    println!("Preprocess: {:.2}ms/frame", ms_per_frame(t_preprocess));
    println!("Inference:  {:.2}ms/frame (incl. preprocess)", ms_per_frame(t_inference));
    println!("Hand detected in {}/{} frames", hits, ITERATIONS);

    Ok(())
}
