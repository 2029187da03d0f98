use crate::config::FilterConfig;

/// alpha = r/(r+1), r = 2*pi*fc*te
fn smoothing_factor(te: f32, cutoff: f32) -> f32 {
    let r = 2.0 * std::f32::consts::PI * cutoff * te;
    r / (r + 1.0)
}

/// One Euro Filter for a single scalar channel
///
/// Velocity-adaptive low-pass: cutoff = min_cutoff + beta * |dx_hat|.
/// Slow motion keeps the cutoff near min_cutoff (maximum smoothing),
/// fast motion raises it (minimum lag).
pub struct OneEuroFilter {
    min_cutoff: f32,
    beta: f32,
    d_cutoff: f32,
    x_raw_prev: f32,
    x_hat_prev: f32,
    dx_hat_prev: f32,
    t_prev: f64,
}

impl OneEuroFilter {
    /// Seed the filter with an initial sample. The first output is x0.
    pub fn new(t0: f64, x0: f32, min_cutoff: f32, beta: f32) -> Self {
        Self {
            min_cutoff,
            beta,
            d_cutoff: 1.0,
            x_raw_prev: x0,
            x_hat_prev: x0,
            dx_hat_prev: 0.0,
            t_prev: t0,
        }
    }

    pub fn with_d_cutoff(mut self, d_cutoff: f32) -> Self {
        self.d_cutoff = d_cutoff;
        self
    }

    /// Filter one sample. Timestamps must be monotonically increasing;
    /// a duplicate or out-of-order timestamp returns the previous output
    /// unchanged instead of dividing by a non-positive interval.
    pub fn filter(&mut self, t: f64, x: f32) -> f32 {
        let te = (t - self.t_prev) as f32;
        if te <= 0.0 {
            return self.x_hat_prev;
        }

        // Smoothed derivative of the raw signal
        let dx = (x - self.x_raw_prev) / te;
        let a_d = smoothing_factor(te, self.d_cutoff);
        let dx_hat = a_d * dx + (1.0 - a_d) * self.dx_hat_prev;

        // Adaptive cutoff
        let cutoff = self.min_cutoff + self.beta * dx_hat.abs();
        let a = smoothing_factor(te, cutoff);
        let x_hat = a * x + (1.0 - a) * self.x_hat_prev;

        self.x_raw_prev = x;
        self.x_hat_prev = x_hat;
        self.dx_hat_prev = dx_hat;
        self.t_prev = t;

        x_hat
    }

    /// 直近の出力値
    pub fn value(&self) -> f32 {
        self.x_hat_prev
    }
}

/// 画面X/Y用の独立した2チャネルフィルタ
pub struct CursorFilter {
    x: OneEuroFilter,
    y: OneEuroFilter,
}

impl CursorFilter {
    pub fn new(t0: f64, x0: f32, y0: f32, min_cutoff: f32, beta: f32) -> Self {
        Self {
            x: OneEuroFilter::new(t0, x0, min_cutoff, beta),
            y: OneEuroFilter::new(t0, y0, min_cutoff, beta),
        }
    }

    pub fn from_config(config: &FilterConfig, t0: f64) -> Self {
        Self {
            x: OneEuroFilter::new(t0, 0.0, config.min_cutoff, config.beta)
                .with_d_cutoff(config.d_cutoff),
            y: OneEuroFilter::new(t0, 0.0, config.min_cutoff, config.beta)
                .with_d_cutoff(config.d_cutoff),
        }
    }

    pub fn filter(&mut self, t: f64, pos: (f32, f32)) -> (f32, f32) {
        (self.x.filter(t, pos.0), self.y.filter(t, pos.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothing_factor_bounds() {
        // alpha should be between 0 and 1
        for &cutoff in &[0.1, 1.0, 10.0, 100.0] {
            for &te in &[1e-6, 0.001, 0.033, 0.3] {
                let alpha = smoothing_factor(te, cutoff);
                assert!(
                    alpha > 0.0 && alpha < 1.0,
                    "alpha={} for te={}, cutoff={}",
                    alpha,
                    te,
                    cutoff
                );
            }
        }
    }

    #[test]
    fn test_initial_value_returned_exactly() {
        let mut f = OneEuroFilter::new(0.0, 5.0, 1.0, 0.0);
        assert_eq!(f.value(), 5.0);
        // 同一タイムスタンプ（dt=0）は前回出力をそのまま返す
        assert_eq!(f.filter(0.0, 123.0), 5.0);
    }

    #[test]
    fn test_non_monotonic_timestamp_passthrough() {
        let mut f = OneEuroFilter::new(1.0, 0.0, 1.0, 0.0);
        let v1 = f.filter(1.033, 10.0);
        // 過去のタイムスタンプは状態を壊さず前回値を返す
        assert_eq!(f.filter(0.5, 100.0), v1);
        assert_eq!(f.value(), v1);
    }

    #[test]
    fn test_constant_input_converges() {
        // 定常入力では出力が入力値に収束する（定常ゲイン1）
        let mut f = OneEuroFilter::new(0.0, 0.0, 1.0, 0.0);
        let mut out = 0.0;
        for i in 1..=300 {
            out = f.filter(i as f64 * 0.033, 10.0);
        }
        assert!((out - 10.0).abs() < 1e-3, "expected convergence to 10, got {}", out);
    }

    #[test]
    fn test_step_smoother_with_lower_cutoff() {
        // min_cutoff が小さいほどステップ応答がなまる
        let mut f_low = OneEuroFilter::new(0.0, 0.0, 0.1, 0.0);
        let mut f_high = OneEuroFilter::new(0.0, 0.0, 5.0, 0.0);
        let r_low = f_low.filter(0.033, 10.0);
        let r_high = f_high.filter(0.033, 10.0);
        assert!(
            r_low < r_high,
            "lower cutoff should smooth more: low={}, high={}",
            r_low,
            r_high
        );
    }

    #[test]
    fn test_high_beta_responsive() {
        // beta が大きいほど速い動きに追従する
        let mut f_low_beta = OneEuroFilter::new(0.0, 0.0, 1.0, 0.0);
        let mut f_high_beta = OneEuroFilter::new(0.0, 0.0, 1.0, 1.0);

        let r_low = f_low_beta.filter(0.033, 10.0);
        let r_high = f_high_beta.filter(0.033, 10.0);
        assert!(
            r_high > r_low,
            "high beta ({}) should be more responsive than low beta ({})",
            r_high,
            r_low
        );
    }

    #[test]
    fn test_dt_range_stability() {
        // マイクロ秒〜数百ミリ秒の dt で有限値を返す
        let mut f = OneEuroFilter::new(0.0, 0.0, 0.1, 0.1);
        let mut t = 0.0;
        for &dt in &[1e-6, 0.001, 0.033, 0.3, 1e-6, 0.5] {
            t += dt;
            let out = f.filter(t, 100.0);
            assert!(out.is_finite(), "output not finite for dt={}", dt);
        }
    }

    #[test]
    fn test_cursor_filter_independent_channels() {
        let mut f = CursorFilter::new(0.0, 0.0, 0.0, 1.0, 0.0);
        let (x, y) = f.filter(0.033, (10.0, 0.0));
        assert!(x > 0.0);
        assert_eq!(y, 0.0);
    }
}
