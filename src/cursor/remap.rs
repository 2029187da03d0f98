use crate::config::ScreenConfig;

/// 値域の線形変換
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    if (in_max - in_min).abs() < f32::EPSILON {
        return out_min;
    }
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

/// カメラフレーム内の操作ボックスから画面座標への変換
///
/// フレーム端まで手を伸ばさなくても画面全域に届くよう、マージンで内側に
/// 縮めたボックスを画面全体へ引き伸ばす。出力は画面矩形にクランプされる。
pub struct ActiveArea {
    screen_width: f32,
    screen_height: f32,
    margin: f32,
    mirror: bool,
}

impl ActiveArea {
    pub fn new(screen_width: f32, screen_height: f32, margin: f32, mirror: bool) -> Self {
        Self {
            screen_width,
            screen_height,
            margin,
            mirror,
        }
    }

    pub fn from_config(config: &ScreenConfig, mirror: bool) -> Self {
        Self::new(
            config.width as f32,
            config.height as f32,
            config.active_area_margin as f32,
            mirror,
        )
    }

    /// 正規化ランドマーク座標 → 画面ピクセル座標
    pub fn map(&self, nx: f32, ny: f32, frame_width: f32, frame_height: f32) -> (f32, f32) {
        let nx = if self.mirror { 1.0 - nx } else { nx };

        // マージンで内側に縮めたボックスの正規化範囲
        let min_x = self.margin / frame_width;
        let max_x = 1.0 - min_x;
        let min_y = self.margin / frame_height;
        let max_y = 1.0 - min_y;

        let sx = map_range(nx, min_x, max_x, 0.0, self.screen_width);
        let sy = map_range(ny, min_y, max_y, 0.0, self.screen_height);

        (
            sx.clamp(0.0, self.screen_width),
            sy.clamp(0.0, self.screen_height),
        )
    }
}
