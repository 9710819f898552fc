use anyhow::Result;
use std::time::Instant;
use tracing::{debug, error, info};

use gesture_control::camera::{FrameSource, OpenCvCamera};
use gesture_control::config::Config;
use gesture_control::hand::HandLandmarkDetector;
use gesture_control::input::KeyboardDispatcher;
use gesture_control::recorder::VideoRecorder;
use gesture_control::render::MinifbRenderer;
use gesture_control::session::GestureSession;

const CONFIG_PATH: &str = "config.toml";

type Session = GestureSession<OpenCvCamera, HandLandmarkDetector, KeyboardDispatcher, VideoRecorder>;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_control=info".into()),
        )
        .init();

    info!("gesture-control {} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_VERSION"));

    let config = Config::load_or_default(CONFIG_PATH);

    println!("Gesture Control");
    println!("Model: {}", config.model.path);
    println!("Output: {}", config.recording.output_path);
    println!("Press ESC to exit");
    println!();

    let camera = OpenCvCamera::open(&config.camera)?;
    let (width, height) = camera.resolution();
    let fps = camera.fps_or_default();
    println!("Recording FPS: {}", fps);

    let detector = HandLandmarkDetector::new(&config.model)?;
    info!("Model loaded");

    let dispatcher = KeyboardDispatcher::new();
    if !dispatcher.is_available() {
        println!("Key presses are disabled; detection and recording continue");
    }

    let recorder = VideoRecorder::create(
        &config.recording.output_path,
        &config.recording.fourcc,
        width,
        height,
        fps,
    )?;

    let mut renderer = MinifbRenderer::new("Gesture Control", width as usize, height as usize)?;
    let mut session = GestureSession::new(camera, detector, dispatcher, recorder);

    let outcome = run(&mut session, &mut renderer);
    if let Err(e) = &outcome {
        error!("{:#}", e);
    }

    // カメラを閉じてから録画を確定
    let (camera, _, _, recorder) = session.into_parts();
    drop(camera);
    recorder.finish()?;

    println!("Video saved as {}", config.recording.output_path);
    outcome
}

/// ウィンドウが閉じられるかEscが押されるまでフレームを処理
fn run(session: &mut Session, renderer: &mut MinifbRenderer) -> Result<()> {
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();

    while renderer.is_open() {
        let (frame, report) = session.step()?;

        renderer.draw_frame(&frame)?;
        renderer.update()?;

        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            debug!(
                "FPS: {:.1}, last gesture: {:?}",
                frame_count as f32 / elapsed,
                report.result.label
            );
            frame_count = 0;
            fps_timer = Instant::now();
        }
    }

    info!("Quit requested");
    Ok(())
}
