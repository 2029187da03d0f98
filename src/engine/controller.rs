use crate::config::{ControllerConfig, GestureConfig};
use crate::gesture::Gesture;
use crate::intent::{IntentEvent, MouseButton};

/// 対話モード。安定ジェスチャーラベルと1対1対応。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Paused,
    Moving,
    Scrolling,
    Zooming,
}

impl From<Gesture> for Mode {
    fn from(gesture: Gesture) -> Self {
        match gesture {
            Gesture::Idle => Mode::Idle,
            Gesture::Pause => Mode::Paused,
            Gesture::Move => Mode::Moving,
            Gesture::Scroll => Mode::Scrolling,
            Gesture::Zoom => Mode::Zooming,
        }
    }
}

/// コントローラーに渡す1フレーム分の計測値
///
/// cursor は平滑化済み画面座標。手が検出されなかったフレームでは None。
/// 距離はフレーム幅でスケールしたピクセル距離。
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub cursor: Option<(f32, f32)>,
    pub dist_index_thumb: Option<f32>,
    pub dist_middle_thumb: Option<f32>,
}

/// モード状態機械とインテント生成
///
/// フレームをまたぐ状態（ドラッグ中・修飾キー保持・前フレームY）を一元所有し、
/// 安定ラベルの変化に応じて副作用のないインテント列を返す。
pub struct ModeController {
    click_threshold: f32,
    scroll_speed: f32,
    zoom_speed: f32,
    delta_threshold: f32,
    right_click_cooldown: f64,

    mode: Mode,
    dragging: bool,
    modifier_held: bool,
    prev_y: f32,
    last_right_click: Option<f64>,
}

impl ModeController {
    pub fn new(gesture: &GestureConfig, controller: &ControllerConfig) -> Self {
        Self {
            click_threshold: gesture.click_threshold,
            scroll_speed: gesture.scroll_speed,
            zoom_speed: gesture.zoom_speed,
            delta_threshold: controller.delta_threshold,
            right_click_cooldown: controller.right_click_cooldown,
            mode: Mode::Idle,
            dragging: false,
            modifier_held: false,
            prev_y: 0.0,
            last_right_click: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// 1フレーム分の更新。このフレームで送出すべきインテント列を返す。
    pub fn update(&mut self, t: f64, stable: Gesture, frame: &FrameInput) -> Vec<IntentEvent> {
        let next = Mode::from(stable);
        let mut events = Vec::new();

        // ズーム離脱はどの遷移経路でも必ず修飾キーを解放する
        if self.modifier_held && next != Mode::Zooming {
            events.push(IntentEvent::ModifierRelease);
            self.modifier_held = false;
        }

        match next {
            Mode::Zooming => {
                if !self.modifier_held {
                    events.push(IntentEvent::ModifierHold);
                    self.modifier_held = true;
                }
                if let Some((_, y)) = frame.cursor {
                    if let Some(amount) = self.wheel_delta(y, self.zoom_speed) {
                        events.push(IntentEvent::ScrollBy(amount));
                    }
                }
            }
            Mode::Scrolling => {
                if let Some((_, y)) = frame.cursor {
                    if let Some(amount) = self.wheel_delta(y, self.scroll_speed) {
                        events.push(IntentEvent::ScrollBy(amount));
                    }
                }
            }
            Mode::Moving => {
                if let Some((x, y)) = frame.cursor {
                    events.push(IntentEvent::MoveTo { x, y });
                }
                if let Some(dist) = frame.dist_index_thumb {
                    if dist < self.click_threshold && !self.dragging {
                        events.push(IntentEvent::ButtonDown(MouseButton::Left));
                        self.dragging = true;
                    } else if dist >= self.click_threshold && self.dragging {
                        events.push(IntentEvent::ButtonUp(MouseButton::Left));
                        self.dragging = false;
                    }
                }
                if let Some(dist) = frame.dist_middle_thumb {
                    if dist < self.click_threshold && self.right_click_ready(t) {
                        events.push(IntentEvent::Click(MouseButton::Right));
                        self.last_right_click = Some(t);
                    }
                }
            }
            Mode::Paused | Mode::Idle => {
                // ポインタ凍結。保持中のドラッグだけ解放する。
                if self.dragging {
                    events.push(IntentEvent::ButtonUp(MouseButton::Left));
                    self.dragging = false;
                }
            }
        }

        if let Some((_, y)) = frame.cursor {
            self.prev_y = y;
        }
        self.mode = next;
        events
    }

    /// 縦方向ハンド移動からホイール量を計算。不感帯未満なら None。
    fn wheel_delta(&self, y: f32, speed: f32) -> Option<f32> {
        let delta = (self.prev_y - y) / 5.0;
        if delta.abs() > self.delta_threshold {
            Some(delta * speed)
        } else {
            None
        }
    }

    fn right_click_ready(&self, t: f64) -> bool {
        match self.last_right_click {
            Some(last) => t - last >= self.right_click_cooldown,
            None => true,
        }
    }

    /// 保持中の状態をすべて解放する。シャットダウン時にドライバが呼ぶ。
    /// 修飾キーやマウスボタンが押しっぱなしで残るのを防ぐ。
    pub fn release_all(&mut self) -> Vec<IntentEvent> {
        let mut events = Vec::new();
        if self.dragging {
            events.push(IntentEvent::ButtonUp(MouseButton::Left));
            self.dragging = false;
        }
        if self.modifier_held {
            events.push(IntentEvent::ModifierRelease);
            self.modifier_held = false;
        }
        self.mode = Mode::Idle;
        events
    }
}
