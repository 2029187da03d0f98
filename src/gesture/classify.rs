use crate::hand::FingerState;

/// 1フレームの生ジェスチャーラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// 認識なし（制御停止）
    Idle,
    /// グー: ポインタ凍結
    Pause,
    /// 人差し指のみ: カーソル移動
    Move,
    /// 人差し指+中指: スクロール
    Scroll,
    /// 人差し指+親指（L字）: ズーム
    Zoom,
}

impl Gesture {
    pub fn label(&self) -> &'static str {
        match self {
            Gesture::Idle => "IDLE",
            Gesture::Pause => "PAUSE",
            Gesture::Move => "MOVE",
            Gesture::Scroll => "SCROLL",
            Gesture::Zoom => "ZOOM",
        }
    }
}

/// 優先順位付き判定ルール。上から評価して最初にマッチしたものが勝つ。
///
/// 順序は意図的なタイブレーク:
/// - L字（人差し指+親指）は親指が開いているときだけピースサインに優先する
/// - どのルールにもマッチしない形は Idle に落ちて制御を止める
pub const RULES: &[(fn(&FingerState) -> bool, Gesture)] = &[
    (|s| s.all_down(), Gesture::Pause),
    (|s| s.index && s.thumb_out && !s.middle && !s.ring, Gesture::Zoom),
    (|s| s.index && s.middle && !s.ring, Gesture::Scroll),
    (|s| s.index && !s.middle, Gesture::Move),
];

/// 指状態から生ラベルを決める純関数
pub fn classify(state: &FingerState) -> Gesture {
    for (predicate, gesture) in RULES {
        if predicate(state) {
            return *gesture;
        }
    }
    Gesture::Idle
}
