use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::intent::SINK_DEFAULT_ADDR;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub stability: StabilityConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// カメラデバイス番号
    #[serde(default = "default_camera_index")]
    pub index: u32,
    /// フレーム幅（ピクセル距離のスケール基準）
    #[serde(default = "default_camera_width")]
    pub width: u32,
    /// フレーム高さ
    #[serde(default = "default_camera_height")]
    pub height: u32,
    /// X軸反転（セルフィーカメラ用）
    #[serde(default = "default_mirror")]
    pub mirror: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScreenConfig {
    #[serde(default = "default_screen_width")]
    pub width: u32,
    #[serde(default = "default_screen_height")]
    pub height: u32,
    /// 操作ボックスのマージン（フレームピクセル）
    #[serde(default = "default_active_area_margin")]
    pub active_area_margin: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilterConfig {
    /// ベースカットオフ周波数。小さいほど滑らか（遅延増）
    #[serde(default = "default_min_cutoff")]
    pub min_cutoff: f32,
    /// 速度ゲイン。大きいほど速い動きに追従
    #[serde(default = "default_beta")]
    pub beta: f32,
    /// 速度推定自体の平滑化カットオフ
    #[serde(default = "default_d_cutoff")]
    pub d_cutoff: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GestureConfig {
    /// クリック判定距離（フレームピクセル）
    #[serde(default = "default_click_threshold")]
    pub click_threshold: f32,
    #[serde(default = "default_scroll_speed")]
    pub scroll_speed: f32,
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
    /// 親指開き判定の水平距離（正規化座標）
    #[serde(default = "default_thumb_out_threshold")]
    pub thumb_out_threshold: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StabilityConfig {
    /// 履歴窓のフレーム数
    #[serde(default = "default_window")]
    pub window: usize,
    /// 安定判定に必要な出現数
    #[serde(default = "default_quorum")]
    pub quorum: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    /// スクロール/ズームのデルタ不感帯
    #[serde(default = "default_delta_threshold")]
    pub delta_threshold: f32,
    /// 右クリックの再発火抑止時間（秒）
    #[serde(default = "default_right_click_cooldown")]
    pub right_click_cooldown: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SinkConfig {
    /// インジェクタープロセスのアドレス
    #[serde(default = "default_sink_addr")]
    pub addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

fn default_camera_index() -> u32 { 0 }
fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_mirror() -> bool { true }
fn default_screen_width() -> u32 { 1920 }
fn default_screen_height() -> u32 { 1080 }
fn default_active_area_margin() -> u32 { 150 }
fn default_min_cutoff() -> f32 { 0.1 }
fn default_beta() -> f32 { 0.1 }
fn default_d_cutoff() -> f32 { 1.0 }
fn default_click_threshold() -> f32 { 40.0 }
fn default_scroll_speed() -> f32 { 5.0 }
fn default_zoom_speed() -> f32 { 3.0 }
fn default_thumb_out_threshold() -> f32 { 0.04 }
fn default_window() -> usize { 5 }
fn default_quorum() -> usize { 3 }
fn default_delta_threshold() -> f32 { 0.2 }
fn default_right_click_cooldown() -> f64 { 0.3 }
fn default_sink_addr() -> String { SINK_DEFAULT_ADDR.to_string() }
fn default_target_fps() -> u32 { 30 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: default_camera_index(),
            width: default_camera_width(),
            height: default_camera_height(),
            mirror: default_mirror(),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: default_screen_width(),
            height: default_screen_height(),
            active_area_margin: default_active_area_margin(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_cutoff: default_min_cutoff(),
            beta: default_beta(),
            d_cutoff: default_d_cutoff(),
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            click_threshold: default_click_threshold(),
            scroll_speed: default_scroll_speed(),
            zoom_speed: default_zoom_speed(),
            thumb_out_threshold: default_thumb_out_threshold(),
        }
    }
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            quorum: default_quorum(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            delta_threshold: default_delta_threshold(),
            right_click_cooldown: default_right_click_cooldown(),
        }
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            addr: default_sink_addr(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 設定ファイルがなければデフォルトで起動
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "設定ファイル {} を読めませんでした ({}) - デフォルトを使用します",
                    path.as_ref().display(),
                    e
                );
                Config::default()
            }
        }
    }
}
