use crate::config::StabilityConfig;
use crate::gesture::classify::Gesture;

/// 生ラベルの時間窓による多数決デバウンス
///
/// 直近N フレームのうち quorum 回以上観測されたラベルだけを「安定」とみなす。
/// 単発の誤分類によるモードばたつきを抑える代わりに、本物のモード変化には
/// 数フレームの遅延が乗る。
pub struct GestureWindow {
    buf: Vec<Gesture>,
    head: usize,
    len: usize,
    quorum: usize,
}

impl GestureWindow {
    pub fn new(capacity: usize, quorum: usize) -> Self {
        assert!(capacity > 0, "window capacity must be non-zero");
        Self {
            buf: vec![Gesture::Idle; capacity],
            head: 0,
            len: 0,
            quorum,
        }
    }

    pub fn from_config(config: &StabilityConfig) -> Self {
        Self::new(config.window, config.quorum)
    }

    /// 生ラベルを1つ追加し、安定ラベルを返す
    ///
    /// 窓内の最頻ラベルの出現数が quorum 以上ならそれを返す。
    /// quorum 未満なら直近の生ラベルを返す（確度より応答性を優先）。
    pub fn push_and_resolve(&mut self, raw: Gesture) -> Gesture {
        self.buf[self.head] = raw;
        self.head = (self.head + 1) % self.buf.len();
        if self.len < self.buf.len() {
            self.len += 1;
        }

        match self.majority() {
            Some((gesture, count)) if count >= self.quorum => gesture,
            _ => raw,
        }
    }

    /// 窓内の最頻ラベルとその出現数。窓が空なら None。
    fn majority(&self) -> Option<(Gesture, usize)> {
        let mut best: Option<(Gesture, usize)> = None;
        for i in 0..self.len {
            let g = self.buf[i];
            let count = self.buf[..self.len].iter().filter(|&&x| x == g).count();
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((g, count)),
            }
        }
        best
    }

    /// 現在の安定ラベル（pushなし）。窓が空なら Idle。
    pub fn current(&self) -> Gesture {
        match self.majority() {
            Some((gesture, count)) if count >= self.quorum => gesture,
            Some(_) => {
                // 直近のpush位置は head の1つ手前
                let last = (self.head + self.buf.len() - 1) % self.buf.len();
                self.buf[last]
            }
            None => Gesture::Idle,
        }
    }
}
