use anyhow::Result;
use std::time::{Duration, Instant};

use virt_mouse::config::Config;
use virt_mouse::engine::HandEngine;
use virt_mouse::hand::{HandLandmarks, Landmark, LandmarkIndex};
use virt_mouse::intent::{dispatch, OscIntentSink};

const CONFIG_PATH: &str = "config.toml";

/// シナリオの1区間: ポーズ種別と人差し指先の始点・終点
struct Segment {
    name: &'static str,
    frames: u32,
    pose: Pose,
    from: (f32, f32),
    to: (f32, f32),
}

#[derive(Clone, Copy)]
enum Pose {
    Move,
    Pinch,
    Scroll,
    Zoom,
    Fist,
    NoHand,
}

/// 合成ランドマーク生成。ポーズ種別と人差し指先位置から1フレーム分を作る。
fn synth_hand(pose: Pose, tip: (f32, f32)) -> Option<HandLandmarks> {
    use LandmarkIndex::*;
    let (index, middle, ring, pinky, thumb_out, pinch) = match pose {
        Pose::Move => (true, false, false, false, false, false),
        Pose::Pinch => (true, false, false, false, false, true),
        Pose::Scroll => (true, true, false, false, false, false),
        Pose::Zoom => (true, false, false, false, true, false),
        Pose::Fist => (false, false, false, false, false, false),
        Pose::NoHand => return None,
    };

    let (tip_x, tip_y) = tip;
    let mut hand = HandLandmarks::default();
    let set = |hand: &mut HandLandmarks, t: LandmarkIndex, p: LandmarkIndex, up: bool| {
        let (ty, py) = if up { (0.3, 0.5) } else { (0.6, 0.5) };
        hand.points[t as usize] = Landmark::new(tip_x, ty);
        hand.points[p as usize] = Landmark::new(tip_x, py);
    };
    set(&mut hand, MiddleTip, MiddlePip, middle);
    set(&mut hand, RingTip, RingPip, ring);
    set(&mut hand, PinkyTip, PinkyPip, pinky);
    hand.points[IndexTip as usize] = Landmark::new(tip_x, tip_y);
    hand.points[IndexPip as usize] =
        Landmark::new(tip_x, if index { tip_y + 0.2 } else { tip_y - 0.2 });

    if pinch {
        // ドラッグポーズ: 親指先を人差し指先へ寄せる（MCPとの水平差は閾値未満）
        hand.points[ThumbMcp as usize] = Landmark::new(tip_x, 0.9);
        hand.points[ThumbTip as usize] = Landmark::new(tip_x + 0.02, tip_y + 0.02);
    } else {
        hand.points[ThumbMcp as usize] = Landmark::new(0.2, 0.9);
        let thumb_x = if thumb_out { 0.35 } else { 0.21 };
        hand.points[ThumbTip as usize] = Landmark::new(thumb_x, 0.9);
    }
    Some(hand)
}

fn scenario() -> Vec<Segment> {
    vec![
        Segment { name: "カーソル移動", frames: 60, pose: Pose::Move, from: (0.3, 0.4), to: (0.7, 0.5) },
        Segment { name: "ドラッグ", frames: 45, pose: Pose::Pinch, from: (0.7, 0.5), to: (0.5, 0.6) },
        Segment { name: "ドラッグ解除", frames: 15, pose: Pose::Move, from: (0.5, 0.6), to: (0.5, 0.6) },
        Segment { name: "スクロール", frames: 60, pose: Pose::Scroll, from: (0.5, 0.6), to: (0.5, 0.3) },
        Segment { name: "ズーム", frames: 60, pose: Pose::Zoom, from: (0.5, 0.3), to: (0.5, 0.6) },
        Segment { name: "一時停止", frames: 30, pose: Pose::Fist, from: (0.5, 0.6), to: (0.5, 0.6) },
        Segment { name: "検出ロスト", frames: 15, pose: Pose::NoHand, from: (0.5, 0.6), to: (0.5, 0.6) },
    ]
}

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("Gesture Simulator");
    println!("Sink target: {}", config.sink.addr);
    println!("Target FPS: {}", config.app.target_fps);
    println!("Screen: {}x{} margin={}",
        config.screen.width, config.screen.height, config.screen.active_area_margin);
    println!("Filter: min_cutoff={}, beta={}", config.filter.min_cutoff, config.filter.beta);
    println!("Stability: window={}, quorum={}", config.stability.window, config.stability.quorum);
    println!();

    let mut sink = OscIntentSink::new(&config.sink.addr)?;
    let mut engine = HandEngine::new(&config, 0.0);
    let frame_w = config.camera.width as f32;
    let frame_h = config.camera.height as f32;
    let frame_duration = Duration::from_secs_f64(1.0 / config.app.target_fps as f64);

    let start = Instant::now();
    let mut frame_count = 0u32;
    let mut event_count = 0usize;
    let mut fps_timer = Instant::now();

    for segment in scenario() {
        println!("--- {} ({}フレーム) ---", segment.name, segment.frames);
        for i in 0..segment.frames {
            let loop_start = Instant::now();
            let progress = i as f32 / segment.frames.max(1) as f32;
            let tip = (
                segment.from.0 + (segment.to.0 - segment.from.0) * progress,
                segment.from.1 + (segment.to.1 - segment.from.1) * progress,
            );

            let hand = synth_hand(segment.pose, tip);
            let t = start.elapsed().as_secs_f64();
            let out = engine.process(t, hand.as_ref(), frame_w, frame_h);

            for event in &out.events {
                eprintln!("[{}] {:?}", out.gesture.label(), event);
            }
            event_count += out.events.len();
            dispatch(&out.events, &mut sink);

            // 1秒に1回のステータス
            frame_count += 1;
            let elapsed = fps_timer.elapsed().as_secs_f32();
            if elapsed >= 1.0 {
                let cursor = out
                    .cursor
                    .map(|(x, y)| format!("({:.0}, {:.0})", x, y))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "FPS: {:.1} | mode: {:?} | cursor: {} | events: {}",
                    frame_count as f32 / elapsed,
                    engine.mode(),
                    cursor,
                    event_count
                );
                frame_count = 0;
                event_count = 0;
                fps_timer = Instant::now();
            }

            // FPS上限制御（spin wait for precision）
            while loop_start.elapsed() < frame_duration {
                std::hint::spin_loop();
            }
        }
    }

    // 終了時は保持状態を必ず解放する
    let events = engine.release_all();
    for event in &events {
        eprintln!("[shutdown] {:?}", event);
    }
    dispatch(&events, &mut sink);

    println!("Shutting down...");
    Ok(())
}
