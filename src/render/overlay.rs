use anyhow::Result;
use opencv::{
    core::{Mat, Point, Scalar},
    imgproc,
    prelude::*,
};

use super::skeleton::{
    ACTION_TEXT_COLOR, CONNECTION_COLOR, FINGERS_TEXT_COLOR, HAND_CONNECTIONS, LANDMARK_COLOR,
    WRIST_COLOR,
};
use crate::gesture::GestureResult;
use crate::hand::LandmarkSet;

const WRIST_RADIUS: i32 = 10;
const LANDMARK_RADIUS: i32 = 4;

fn scalar(bgr: [f64; 3]) -> Scalar {
    Scalar::new(bgr[0], bgr[1], bgr[2], 0.0)
}

fn put_label(frame: &mut Mat, text: &str, org: Point, color: [f64; 3]) -> Result<()> {
    imgproc::put_text(
        frame,
        text,
        org,
        imgproc::FONT_HERSHEY_SIMPLEX,
        1.0,
        scalar(color),
        2,
        imgproc::LINE_8,
        false,
    )?;
    Ok(())
}

/// 手の骨格を描画
pub fn draw_landmarks(frame: &mut Mat, hand: &LandmarkSet) -> Result<()> {
    let w = frame.cols() as u32;
    let h = frame.rows() as u32;
    let points = hand.points();

    for (start, end) in HAND_CONNECTIONS.iter() {
        let (Some(a), Some(b)) = (points.get(*start as usize), points.get(*end as usize)) else {
            continue;
        };
        let (x1, y1) = a.to_pixel(w, h);
        let (x2, y2) = b.to_pixel(w, h);
        imgproc::line(
            frame,
            Point::new(x1, y1),
            Point::new(x2, y2),
            scalar(CONNECTION_COLOR),
            2,
            imgproc::LINE_8,
            0,
        )?;
    }

    for lm in points {
        let (px, py) = lm.to_pixel(w, h);
        imgproc::circle(
            frame,
            Point::new(px, py),
            LANDMARK_RADIUS,
            scalar(LANDMARK_COLOR),
            -1,
            imgproc::LINE_8,
            0,
        )?;
    }

    Ok(())
}

/// フレームに判定結果を重ねる
///
/// - 手の骨格と手首マーカー
/// - "Fingers: n"（手があるときのみ）
/// - "Action: ..."
pub fn draw_overlay(
    frame: &mut Mat,
    hand: Option<&LandmarkSet>,
    result: &GestureResult,
) -> Result<()> {
    if let Some(hand) = hand {
        draw_landmarks(frame, hand)?;
    }

    if let Some((cx, cy)) = result.wrist {
        imgproc::circle(
            frame,
            Point::new(cx, cy),
            WRIST_RADIUS,
            scalar(WRIST_COLOR),
            -1,
            imgproc::LINE_8,
            0,
        )?;
    }

    if let Some(fingers) = result.open_fingers {
        put_label(frame, &format!("Fingers: {}", fingers), Point::new(20, 80), FINGERS_TEXT_COLOR)?;
    }

    put_label(
        frame,
        &format!("Action: {}", result.label.display_text()),
        Point::new(20, 40),
        ACTION_TEXT_COLOR,
    )?;

    Ok(())
}
