use anyhow::Result;
use std::io::{self, Write};
use std::time::Instant;

use virt_mouse::config::Config;
use virt_mouse::engine::HandEngine;
use virt_mouse::hand::{HandLandmarks, Landmark, LandmarkIndex};
use virt_mouse::intent::{dispatch, OscIntentSink};

const CONFIG_PATH: &str = "config.toml";

/// 指の上下と親指の開きから合成ランドマークを作る
fn make_hand(
    index: bool,
    middle: bool,
    ring: bool,
    pinky: bool,
    thumb_out: bool,
    tip_x: f32,
    tip_y: f32,
) -> HandLandmarks {
    use LandmarkIndex::*;
    let mut hand = HandLandmarks::default();
    let set = |hand: &mut HandLandmarks, tip: LandmarkIndex, pip: LandmarkIndex, up: bool| {
        let (t, p) = if up { (0.3, 0.5) } else { (0.6, 0.5) };
        hand.points[tip as usize] = Landmark::new(tip_x, t);
        hand.points[pip as usize] = Landmark::new(tip_x, p);
    };
    set(&mut hand, MiddleTip, MiddlePip, middle);
    set(&mut hand, RingTip, RingPip, ring);
    set(&mut hand, PinkyTip, PinkyPip, pinky);
    hand.points[IndexTip as usize] = Landmark::new(tip_x, tip_y);
    hand.points[IndexPip as usize] =
        Landmark::new(tip_x, if index { tip_y + 0.2 } else { tip_y - 0.2 });
    hand.points[ThumbMcp as usize] = Landmark::new(0.2, 0.9);
    let thumb_x = if thumb_out { 0.35 } else { 0.21 };
    hand.points[ThumbTip as usize] = Landmark::new(thumb_x, 0.9);
    hand
}

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("=== Virt Mouse - Engine Test ===");
    println!("シンク送信先: {}", config.sink.addr);
    println!();
    println!("コマンド:");
    println!("  m x y         - Move ポーズ (正規化座標, 例: m 0.5 0.5)");
    println!("  s x y         - Scroll ポーズ");
    println!("  z x y         - Zoom ポーズ");
    println!("  p             - Pause ポーズ (グー)");
    println!("  n             - 手なしフレーム");
    println!("  q             - 終了");
    println!();

    let mut sink = OscIntentSink::new(&config.sink.addr)?;
    let start = Instant::now();
    let mut engine = HandEngine::new(&config, 0.0);
    let frame_w = config.camera.width as f32;
    let frame_h = config.camera.height as f32;

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let parts: Vec<&str> = input.trim().split_whitespace().collect();

        if parts.is_empty() {
            continue;
        }

        let t = start.elapsed().as_secs_f64();
        let hand = match parts[0] {
            "m" | "s" | "z" if parts.len() == 3 => {
                let x: f32 = parts[1].parse()?;
                let y: f32 = parts[2].parse()?;
                match parts[0] {
                    "m" => Some(make_hand(true, false, false, false, false, x, y)),
                    "s" => Some(make_hand(true, true, false, false, false, x, y)),
                    _ => Some(make_hand(true, false, false, false, true, x, y)),
                }
            }
            "p" => Some(make_hand(false, false, false, false, false, 0.5, 0.5)),
            "n" => None,
            "q" => {
                // 保持状態を残さず終了する
                let events = engine.release_all();
                dispatch(&events, &mut sink);
                println!("終了します");
                break;
            }
            _ => {
                println!("不明なコマンド: {}", parts[0]);
                continue;
            }
        };

        let out = engine.process(t, hand.as_ref(), frame_w, frame_h);
        println!("安定ラベル: {}", out.gesture.label());
        if let Some((x, y)) = out.cursor {
            println!("カーソル: ({:.1}, {:.1})", x, y);
        }
        for event in &out.events {
            println!("  -> {:?}", event);
        }
        dispatch(&out.events, &mut sink);
    }

    Ok(())
}
