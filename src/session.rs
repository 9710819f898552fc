//! 1フレーム単位の処理: 取得 → 推論 → 判定 → キー入力 → 注釈 → 録画
//!
//! カメラ取得と録画の失敗は致命的（Errを返す）。推論失敗・点数不足・キー入力失敗は
//! ログに残してそのフレームだけ扱いを変え、処理を続ける。

use anyhow::{Context, Result};
use opencv::{core::Mat, prelude::*};
use std::time::Instant;
use tracing::{info, warn};

use crate::camera::FrameSource;
use crate::gesture::{GameAction, GestureClassifier, GestureResult};
use crate::hand::LandmarkProvider;
use crate::input::ActionDispatcher;
use crate::recorder::FrameSink;

/// 1フレームの処理結果
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub result: GestureResult,
    /// 送信に失敗したキー入力の数
    pub dispatch_failures: usize,
}

pub struct GestureSession<C, L, D, S> {
    source: C,
    provider: L,
    dispatcher: D,
    sink: S,
    classifier: GestureClassifier,
}

impl<C, L, D, S> GestureSession<C, L, D, S>
where
    C: FrameSource,
    L: LandmarkProvider,
    D: ActionDispatcher,
    S: FrameSink,
{
    pub fn new(source: C, provider: L, dispatcher: D, sink: S) -> Self {
        Self {
            source,
            provider,
            dispatcher,
            sink,
            classifier: GestureClassifier::new(),
        }
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// 現在時刻で1フレーム処理し、注釈付きフレームを返す
    pub fn step(&mut self) -> Result<(Mat, FrameReport)> {
        let mut frame = self.source.read_frame().context("Camera not working")?;
        let now = Instant::now();
        self.process(&mut frame, now).map(|report| (frame, report))
    }

    /// 時刻を指定して1フレーム処理
    pub fn step_at(&mut self, now: Instant) -> Result<(Mat, FrameReport)> {
        let mut frame = self.source.read_frame().context("Camera not working")?;
        self.process(&mut frame, now).map(|report| (frame, report))
    }

    fn process(&mut self, frame: &mut Mat, now: Instant) -> Result<FrameReport> {
        let frame_w = frame.cols() as u32;
        let frame_h = frame.rows() as u32;

        let hand = match self.provider.infer(frame) {
            Ok(hand) => hand,
            Err(e) => {
                warn!("Landmark inference failed: {:#}", e);
                None
            }
        };

        let result = match self.classifier.classify(hand.as_ref(), frame_w, frame_h, now) {
            Ok(result) => result,
            Err(e) => {
                warn!("{}; treating frame as no hand", e);
                GestureResult::no_hand()
            }
        };

        let mut dispatch_failures = 0;
        for action in &result.actions {
            log_action(*action, result.open_fingers);
            if let Err(e) = self.dispatcher.press_key(action.key()) {
                warn!("Key press '{}' failed: {:#}", action.key().as_str(), e);
                dispatch_failures += 1;
            }
        }

        // 点数不足のランドマークは描かない
        let drawable = hand.as_ref().filter(|_| result.wrist.is_some());
        self.sink.annotate(frame, drawable, &result)?;
        self.sink.write_frame(frame)?;

        Ok(FrameReport {
            result,
            dispatch_failures,
        })
    }

    /// 後始末用に各コンポーネントを取り出す
    pub fn into_parts(self) -> (C, L, D, S) {
        (self.source, self.provider, self.dispatcher, self.sink)
    }
}

fn log_action(action: GameAction, open_fingers: Option<u8>) {
    match action {
        GameAction::Hoverboard => info!(
            "FIST ({} fingers) -> HOVERBOARD!",
            open_fingers.unwrap_or(0)
        ),
        other => info!("{:?} -> {}", other, other.key().as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureLabel;
    use crate::hand::{HandLandmarkIndex, Landmark, LandmarkSet};
    use crate::input::GameKey;
    use anyhow::anyhow;
    use opencv::core::{Scalar, CV_8UC3};
    use std::collections::VecDeque;
    use std::time::Duration;

    const W: u32 = 1024;
    const H: u32 = 512;

    /// W x H の黒フレームを返すカメラ。frames 回で枯れる。
    struct MockCamera {
        frames: usize,
    }

    impl FrameSource for MockCamera {
        fn read_frame(&mut self) -> Result<Mat> {
            if self.frames == 0 {
                return Err(anyhow!("device disconnected"));
            }
            self.frames -= 1;
            Ok(Mat::new_rows_cols_with_default(
                H as i32,
                W as i32,
                CV_8UC3,
                Scalar::all(0.0),
            )?)
        }

        fn resolution(&self) -> (u32, u32) {
            (W, H)
        }
    }

    enum Inference {
        Hand(LandmarkSet),
        NoHand,
        Fail,
    }

    struct ScriptedProvider {
        script: VecDeque<Inference>,
    }

    impl LandmarkProvider for ScriptedProvider {
        fn infer(&mut self, _frame: &Mat) -> Result<Option<LandmarkSet>> {
            match self.script.pop_front() {
                Some(Inference::Hand(set)) => Ok(Some(set)),
                Some(Inference::NoHand) | None => Ok(None),
                Some(Inference::Fail) => Err(anyhow!("onnx runtime error")),
            }
        }
    }

    #[derive(Default)]
    struct RecordingDispatcher {
        pressed: Vec<GameKey>,
        fail: bool,
    }

    impl ActionDispatcher for RecordingDispatcher {
        fn press_key(&mut self, key: GameKey) -> Result<()> {
            if self.fail {
                return Err(anyhow!("no display"));
            }
            self.pressed.push(key);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingSink {
        annotated: Vec<(bool, GestureLabel)>,
        written: usize,
    }

    impl FrameSink for CountingSink {
        fn annotate(
            &mut self,
            _frame: &mut Mat,
            hand: Option<&LandmarkSet>,
            result: &GestureResult,
        ) -> Result<()> {
            self.annotated.push((hand.is_some(), result.label));
            Ok(())
        }

        fn write_frame(&mut self, _frame: &Mat) -> Result<()> {
            self.written += 1;
            Ok(())
        }
    }

    /// open が false なら4本とも指先を付け根より下に置く（グー）
    fn hand_at(px: i32, py: i32, open: bool) -> LandmarkSet {
        let mut points = vec![Landmark::new(0.5, 0.5); HandLandmarkIndex::COUNT];
        points[HandLandmarkIndex::Wrist as usize] =
            Landmark::new(px as f32 / W as f32, py as f32 / H as f32);
        for tip in [
            HandLandmarkIndex::IndexTip,
            HandLandmarkIndex::MiddleTip,
            HandLandmarkIndex::RingTip,
            HandLandmarkIndex::PinkyTip,
        ] {
            points[tip as usize] = Landmark::new(0.5, if open { 0.25 } else { 0.75 });
        }
        LandmarkSet::new(points)
    }

    fn session(
        frames: usize,
        script: Vec<Inference>,
        fail_dispatch: bool,
    ) -> GestureSession<MockCamera, ScriptedProvider, RecordingDispatcher, CountingSink> {
        GestureSession::new(
            MockCamera { frames },
            ScriptedProvider { script: script.into() },
            RecordingDispatcher { fail: fail_dispatch, ..Default::default() },
            CountingSink::default(),
        )
    }

    #[test]
    fn test_fist_and_move_dispatch_in_order() {
        let t0 = Instant::now();
        let mut s = session(
            2,
            vec![Inference::Hand(hand_at(100, 200, false)), Inference::Hand(hand_at(150, 200, false))],
            false,
        );

        let (_, r1) = s.step_at(t0).unwrap();
        assert_eq!(r1.result.label, GestureLabel::Fist);

        let (_, r2) = s.step_at(t0 + Duration::from_millis(2500)).unwrap();
        assert_eq!(r2.result.label, GestureLabel::MoveRight);
        assert_eq!(r2.dispatch_failures, 0);

        assert_eq!(
            s.dispatcher().pressed,
            vec![GameKey::Space, GameKey::Space, GameKey::Right]
        );
        assert_eq!(s.sink().written, 2);
    }

    #[test]
    fn test_dispatch_failure_is_not_fatal() {
        let t0 = Instant::now();
        let mut s = session(2, vec![Inference::Hand(hand_at(100, 200, false)), Inference::NoHand], true);

        let (_, r1) = s.step_at(t0).unwrap();
        assert_eq!(r1.dispatch_failures, 1);
        assert_eq!(r1.result.label, GestureLabel::Fist);

        let (_, r2) = s.step_at(t0 + Duration::from_millis(100)).unwrap();
        assert_eq!(r2.result.label, GestureLabel::NoHand);
        assert_eq!(s.sink().written, 2);
        assert!(s.dispatcher().pressed.is_empty());
    }

    #[test]
    fn test_capture_failure_is_fatal() {
        let mut s = session(0, vec![], false);
        let err = s.step().unwrap_err();
        assert!(format!("{:#}", err).contains("Camera not working"));
        assert_eq!(s.sink().written, 0);
    }

    #[test]
    fn test_invalid_landmarks_treated_as_no_hand() {
        let t0 = Instant::now();
        let short = LandmarkSet::new(vec![Landmark::new(0.5, 0.5); 7]);
        let mut s = session(1, vec![Inference::Hand(short)], false);

        let (_, r) = s.step_at(t0).unwrap();
        assert_eq!(r.result.label, GestureLabel::NoHand);
        assert!(s.classifier().reference().is_none());
        // 不完全なランドマークは描かない
        assert_eq!(s.sink().annotated, vec![(false, GestureLabel::NoHand)]);
        assert_eq!(s.sink().written, 1);
    }

    #[test]
    fn test_inference_failure_treated_as_no_hand() {
        let t0 = Instant::now();
        let mut s = session(
            3,
            vec![
                Inference::Hand(hand_at(100, 200, true)),
                Inference::Fail,
                Inference::Hand(hand_at(100, 140, true)),
            ],
            false,
        );

        s.step_at(t0).unwrap();
        let (_, r) = s.step_at(t0 + Duration::from_millis(100)).unwrap();
        assert_eq!(r.result.label, GestureLabel::NoHand);
        assert_eq!(s.classifier().reference(), Some((100, 200)));

        let (_, r) = s.step_at(t0 + Duration::from_millis(200)).unwrap();
        assert_eq!(r.result.label, GestureLabel::MoveUp);
        assert_eq!(s.dispatcher().pressed, vec![GameKey::Up]);
    }

    #[test]
    fn test_wrist_pixels_use_frame_size() {
        let t0 = Instant::now();
        let mut s = session(1, vec![Inference::Hand(hand_at(512, 256, true))], false);
        let (_, r) = s.step_at(t0).unwrap();
        assert_eq!(r.result.wrist, Some((512, 256)));
    }
}
