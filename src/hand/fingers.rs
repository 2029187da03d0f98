use crate::hand::landmark::{HandLandmarks, LandmarkIndex};

/// 指先がPIP関節より上にあるか（画像座標は下方向が正）
pub fn is_up(hand: &HandLandmarks, tip: LandmarkIndex, pip: LandmarkIndex) -> bool {
    hand.get(tip).y < hand.get(pip).y
}

/// 親指が横に開いているか
/// 先端とMCPの水平距離で判定する粗い近似。他の4指の上下判定とは独立。
pub fn thumb_out(hand: &HandLandmarks, threshold: f32) -> bool {
    let tip = hand.get(LandmarkIndex::ThumbTip);
    let mcp = hand.get(LandmarkIndex::ThumbMcp);
    (tip.x - mcp.x).abs() > threshold
}

/// 1フレーム分の指状態ベクトル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerState {
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
    pub thumb_out: bool,
}

impl FingerState {
    /// 現在フレームのランドマークから再計算する。状態は持たない。
    pub fn from_landmarks(hand: &HandLandmarks, thumb_threshold: f32) -> Self {
        use LandmarkIndex::*;
        Self {
            index: is_up(hand, IndexTip, IndexPip),
            middle: is_up(hand, MiddleTip, MiddlePip),
            ring: is_up(hand, RingTip, RingPip),
            pinky: is_up(hand, PinkyTip, PinkyPip),
            thumb_out: thumb_out(hand, thumb_threshold),
        }
    }

    /// 4指すべて折りたたまれているか（グー）
    pub fn all_down(&self) -> bool {
        !self.index && !self.middle && !self.ring && !self.pinky
    }
}
