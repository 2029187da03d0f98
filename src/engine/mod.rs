pub mod controller;

pub use controller::{FrameInput, Mode, ModeController};

use crate::config::Config;
use crate::cursor::{ActiveArea, CursorFilter};
use crate::gesture::{classify, Gesture, GestureWindow};
use crate::hand::{FingerState, HandLandmarks, LandmarkIndex};
use crate::intent::IntentEvent;

/// 1フレーム分の処理結果
#[derive(Debug)]
pub struct FrameOutput {
    /// デバウンス済みの安定ジェスチャーラベル（HUD表示用）
    pub gesture: Gesture,
    /// 平滑化済みカーソル座標。手なしフレームでは None。
    pub cursor: Option<(f32, f32)>,
    /// このフレームで送出するインテント列
    pub events: Vec<IntentEvent>,
}

/// 制御コア本体
///
/// 外部のキャプチャループからフレームごとに1回呼ばれる。
/// ランドマーク → 指状態 → 分類 → 安定化 → モード制御、
/// 人差し指先 → 座標変換 → 適応フィルタ、の2経路を束ねる。
pub struct HandEngine {
    thumb_threshold: f32,
    window: GestureWindow,
    filter: CursorFilter,
    area: ActiveArea,
    controller: ModeController,
}

impl HandEngine {
    /// t0: フィルタ状態を初期化する起点タイムスタンプ（秒、単調増加）
    pub fn new(config: &Config, t0: f64) -> Self {
        Self {
            thumb_threshold: config.gesture.thumb_out_threshold,
            window: GestureWindow::from_config(&config.stability),
            filter: CursorFilter::from_config(&config.filter, t0),
            area: ActiveArea::from_config(&config.screen, config.camera.mirror),
            controller: ModeController::new(&config.gesture, &config.controller),
        }
    }

    /// 現在の対話モード
    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    /// 1フレーム処理する
    ///
    /// 手が検出されなかったフレームは生ラベル Idle として履歴窓に積む。
    /// 検出欠落1フレームはモード変化と同じヒステリシスで抑制されるため、
    /// ドラッグ中の取りこぼしで即ボタンが離れることはない。フィルタは
    /// 入力がないので進めない。
    pub fn process(
        &mut self,
        t: f64,
        hand: Option<&HandLandmarks>,
        frame_width: f32,
        frame_height: f32,
    ) -> FrameOutput {
        match hand {
            Some(hand) => {
                let fingers = FingerState::from_landmarks(hand, self.thumb_threshold);
                let raw = classify(&fingers);
                let stable = self.window.push_and_resolve(raw);

                let tip = hand.get(LandmarkIndex::IndexTip);
                let mapped = self.area.map(tip.x, tip.y, frame_width, frame_height);
                let cursor = self.filter.filter(t, mapped);

                let input = FrameInput {
                    cursor: Some(cursor),
                    dist_index_thumb: Some(hand.pixel_distance(
                        LandmarkIndex::IndexTip,
                        LandmarkIndex::ThumbTip,
                        frame_width,
                    )),
                    dist_middle_thumb: Some(hand.pixel_distance(
                        LandmarkIndex::MiddleTip,
                        LandmarkIndex::ThumbTip,
                        frame_width,
                    )),
                };
                let events = self.controller.update(t, stable, &input);

                FrameOutput {
                    gesture: stable,
                    cursor: Some(cursor),
                    events,
                }
            }
            None => {
                let stable = self.window.push_and_resolve(Gesture::Idle);
                let events = self.controller.update(t, stable, &FrameInput::default());
                FrameOutput {
                    gesture: stable,
                    cursor: None,
                    events,
                }
            }
        }
    }

    /// 保持中のボタン・修飾キーをすべて解放する。
    /// ドライバは終了時に必ず呼び、結果をシンクへ流すこと。
    pub fn release_all(&mut self) -> Vec<IntentEvent> {
        self.controller.release_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::Landmark;
    use crate::intent::MouseButton;

    const FRAME_W: f32 = 640.0;
    const FRAME_H: f32 = 480.0;

    fn test_config() -> Config {
        let mut config = Config::default();
        // テストではミラーなしの素直な座標系を使う
        config.camera.mirror = false;
        config
    }

    /// 指の上下だけ指定した手を作る。人差し指先は (0.5, 0.5) 固定。
    fn make_hand(index: bool, middle: bool, ring: bool, pinky: bool, thumb_out: bool) -> HandLandmarks {
        use LandmarkIndex::*;
        let mut hand = HandLandmarks::default();
        let set = |hand: &mut HandLandmarks, tip: LandmarkIndex, pip: LandmarkIndex, up: bool| {
            let (tip_y, pip_y) = if up { (0.3, 0.5) } else { (0.6, 0.5) };
            hand.points[tip as usize] = Landmark::new(0.5, tip_y);
            hand.points[pip as usize] = Landmark::new(0.5, pip_y);
        };
        set(&mut hand, MiddleTip, MiddlePip, middle);
        set(&mut hand, RingTip, RingPip, ring);
        set(&mut hand, PinkyTip, PinkyPip, pinky);

        // 人差し指先はカーソル位置として (0.5, 0.5) に固定し、上下はPIP側で表現
        hand.points[IndexTip as usize] = Landmark::new(0.5, 0.5);
        hand.points[IndexPip as usize] = Landmark::new(0.5, if index { 0.7 } else { 0.3 });
        // 親指: MCP固定、開きは先端の水平位置で表現。どの指先からも遠ざけておく。
        hand.points[ThumbMcp as usize] = Landmark::new(0.2, 0.9);
        let thumb_x = if thumb_out { 0.35 } else { 0.21 };
        hand.points[ThumbTip as usize] = Landmark::new(thumb_x, 0.9);
        hand
    }

    fn move_hand() -> HandLandmarks {
        make_hand(true, false, false, false, false)
    }

    fn pause_hand() -> HandLandmarks {
        make_hand(false, false, false, false, false)
    }

    /// Move型の手で親指先を人差し指先に近づけたもの（ドラッグポーズ）
    fn pinch_hand() -> HandLandmarks {
        let mut hand = move_hand();
        // 人差し指先(0.5, 0.5)のすぐ隣。MCPとの水平差は閾値未満に保つ。
        hand.points[LandmarkIndex::ThumbMcp as usize] = Landmark::new(0.50, 0.9);
        hand.points[LandmarkIndex::ThumbTip as usize] = Landmark::new(0.52, 0.52);
        hand
    }

    #[test]
    fn test_flicker_suppression_end_to_end() {
        // Move 5フレーム → Pause 1フレーム → Move 4フレーム:
        // 単発のPauseはquorumに届かず、安定ラベルはMoveのまま
        let mut engine = HandEngine::new(&test_config(), 0.0);
        let mut t = 0.0;
        for _ in 0..5 {
            t += 0.033;
            let out = engine.process(t, Some(&move_hand()), FRAME_W, FRAME_H);
            assert_eq!(out.gesture, Gesture::Move);
        }
        t += 0.033;
        let out = engine.process(t, Some(&pause_hand()), FRAME_W, FRAME_H);
        assert_eq!(out.gesture, Gesture::Move, "single pause frame must not flip mode");
        for _ in 0..4 {
            t += 0.033;
            let out = engine.process(t, Some(&move_hand()), FRAME_W, FRAME_H);
            assert_eq!(out.gesture, Gesture::Move);
        }
    }

    #[test]
    fn test_drag_down_then_up() {
        // ピンチ接近 → 解放 で ButtonDown / ButtonUp がちょうど1回ずつ
        let mut engine = HandEngine::new(&test_config(), 0.0);
        let mut downs = 0;
        let mut ups = 0;
        let mut t = 0.0;
        for _ in 0..5 {
            t += 0.033;
            let out = engine.process(t, Some(&pinch_hand()), FRAME_W, FRAME_H);
            downs += out
                .events
                .iter()
                .filter(|e| **e == IntentEvent::ButtonDown(MouseButton::Left))
                .count();
        }
        for _ in 0..5 {
            t += 0.033;
            let out = engine.process(t, Some(&move_hand()), FRAME_W, FRAME_H);
            ups += out
                .events
                .iter()
                .filter(|e| **e == IntentEvent::ButtonUp(MouseButton::Left))
                .count();
        }
        assert_eq!(downs, 1);
        assert_eq!(ups, 1);
    }

    #[test]
    fn test_moving_emits_move_to() {
        let mut engine = HandEngine::new(&test_config(), 0.0);
        let out = engine.process(0.033, Some(&move_hand()), FRAME_W, FRAME_H);
        assert_eq!(out.gesture, Gesture::Move);
        assert!(out
            .events
            .iter()
            .any(|e| matches!(e, IntentEvent::MoveTo { .. })));
        assert!(out.cursor.is_some());
    }

    #[test]
    fn test_no_hand_frame_has_no_cursor() {
        let mut engine = HandEngine::new(&test_config(), 0.0);
        let out = engine.process(0.033, None, FRAME_W, FRAME_H);
        assert_eq!(out.gesture, Gesture::Idle);
        assert!(out.cursor.is_none());
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_lost_hand_eventually_releases_drag() {
        let mut engine = HandEngine::new(&test_config(), 0.0);
        let mut t = 0.0;
        for _ in 0..5 {
            t += 0.033;
            engine.process(t, Some(&pinch_hand()), FRAME_W, FRAME_H);
        }
        // 検出が完全に途切れると Idle がquorumに達した時点でドラッグ解放
        let mut ups = 0;
        for _ in 0..5 {
            t += 0.033;
            let out = engine.process(t, None, FRAME_W, FRAME_H);
            ups += out
                .events
                .iter()
                .filter(|e| **e == IntentEvent::ButtonUp(MouseButton::Left))
                .count();
        }
        assert_eq!(ups, 1, "drag must be released after sustained detection loss");
    }

    #[test]
    fn test_single_dropped_frame_keeps_drag() {
        let mut engine = HandEngine::new(&test_config(), 0.0);
        let mut t = 0.0;
        for _ in 0..5 {
            t += 0.033;
            engine.process(t, Some(&pinch_hand()), FRAME_W, FRAME_H);
        }
        // 1フレームだけ検出が落ちてもドラッグは維持される
        t += 0.033;
        let out = engine.process(t, None, FRAME_W, FRAME_H);
        assert!(
            !out.events.contains(&IntentEvent::ButtonUp(MouseButton::Left)),
            "single dropped frame must not break a drag"
        );
        t += 0.033;
        let out = engine.process(t, Some(&pinch_hand()), FRAME_W, FRAME_H);
        assert_eq!(out.gesture, Gesture::Move);
    }

    #[test]
    fn test_zoom_modifier_lifecycle_end_to_end() {
        let zoom = make_hand(true, false, false, false, true);
        let scroll = make_hand(true, true, false, false, false);
        let mut engine = HandEngine::new(&test_config(), 0.0);
        let mut t = 0.0;
        let mut holds = 0;
        let mut releases = 0;
        for _ in 0..5 {
            t += 0.033;
            let out = engine.process(t, Some(&zoom), FRAME_W, FRAME_H);
            holds += out
                .events
                .iter()
                .filter(|e| **e == IntentEvent::ModifierHold)
                .count();
        }
        for _ in 0..5 {
            t += 0.033;
            let out = engine.process(t, Some(&scroll), FRAME_W, FRAME_H);
            releases += out
                .events
                .iter()
                .filter(|e| **e == IntentEvent::ModifierRelease)
                .count();
        }
        assert_eq!(holds, 1);
        assert_eq!(releases, 1);
    }

    #[test]
    fn test_release_all_after_zoom() {
        let zoom = make_hand(true, false, false, false, true);
        let mut engine = HandEngine::new(&test_config(), 0.0);
        engine.process(0.033, Some(&zoom), FRAME_W, FRAME_H);
        let events = engine.release_all();
        assert!(events.contains(&IntentEvent::ModifierRelease));
        assert_eq!(engine.mode(), Mode::Idle);
    }
}
