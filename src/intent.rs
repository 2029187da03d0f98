use anyhow::Result;
use rosc::{encoder, OscMessage, OscPacket, OscType};
use std::net::UdpSocket;

/// インジェクタープロセスのデフォルトアドレス
pub const SINK_DEFAULT_ADDR: &str = "127.0.0.1:39571";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// 副作用を持たないポインタ/キーボード操作指示
///
/// コアはOSを直接触らない。外部のシンクがこれを実際の入力操作に変換する。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntentEvent {
    /// ポインタを画面座標へ移動
    MoveTo { x: f32, y: f32 },
    /// ボタン押下（ドラッグ開始）
    ButtonDown(MouseButton),
    /// ボタン解放（ドラッグ終了）
    ButtonUp(MouseButton),
    /// 単発クリック
    Click(MouseButton),
    /// ホイールスクロール（正=上方向）
    ScrollBy(f32),
    /// 修飾キー押しっぱなし開始
    ModifierHold,
    /// 修飾キー解放
    ModifierRelease,
}

/// インテントの送出先
pub trait IntentSink {
    fn send(&mut self, event: &IntentEvent) -> Result<()>;
}

/// IntentEventをOSCメッセージに変換
/// アドレスはイベント種別ごとに固定、引数は座標/ボタン/量
pub fn build_osc_message(event: &IntentEvent) -> OscMessage {
    fn button_arg(btn: MouseButton) -> OscType {
        OscType::Int(match btn {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
        })
    }

    match event {
        IntentEvent::MoveTo { x, y } => OscMessage {
            addr: "/virtmouse/move".to_string(),
            args: vec![OscType::Float(*x), OscType::Float(*y)],
        },
        IntentEvent::ButtonDown(btn) => OscMessage {
            addr: "/virtmouse/button/down".to_string(),
            args: vec![button_arg(*btn)],
        },
        IntentEvent::ButtonUp(btn) => OscMessage {
            addr: "/virtmouse/button/up".to_string(),
            args: vec![button_arg(*btn)],
        },
        IntentEvent::Click(btn) => OscMessage {
            addr: "/virtmouse/click".to_string(),
            args: vec![button_arg(*btn)],
        },
        IntentEvent::ScrollBy(amount) => OscMessage {
            addr: "/virtmouse/scroll".to_string(),
            args: vec![OscType::Float(*amount)],
        },
        IntentEvent::ModifierHold => OscMessage {
            addr: "/virtmouse/modifier".to_string(),
            args: vec![OscType::Int(1)],
        },
        IntentEvent::ModifierRelease => OscMessage {
            addr: "/virtmouse/modifier".to_string(),
            args: vec![OscType::Int(0)],
        },
    }
}

/// OSCメッセージをバイト列にエンコード
pub fn encode_osc_message(msg: &OscMessage) -> Result<Vec<u8>> {
    let packet = OscPacket::Message(msg.clone());
    let encoded = encoder::encode(&packet)?;
    Ok(encoded)
}

/// インジェクタープロセスへOSC/UDPでインテントを送るシンク
pub struct OscIntentSink {
    socket: UdpSocket,
    target_addr: String,
}

impl OscIntentSink {
    pub fn new(target_addr: &str) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        Ok(Self {
            socket,
            target_addr: target_addr.to_string(),
        })
    }

    /// デフォルトアドレス(127.0.0.1:39571)で作成
    pub fn default_addr() -> Result<Self> {
        Self::new(SINK_DEFAULT_ADDR)
    }
}

impl IntentSink for OscIntentSink {
    fn send(&mut self, event: &IntentEvent) -> Result<()> {
        let msg = build_osc_message(event);
        let data = encode_osc_message(&msg)?;
        self.socket.send_to(&data, &self.target_addr)?;
        Ok(())
    }
}

/// テスト・シミュレーター用の記録シンク
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<IntentEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl IntentSink for RecordingSink {
    fn send(&mut self, event: &IntentEvent) -> Result<()> {
        self.events.push(*event);
        Ok(())
    }
}

/// 1フレーム分のイベントをシンクへ流す
///
/// MoveToの拒否（画面外など）は無視して続行する。その他のイベントも
/// 送りっぱなしでリトライしない。シンク側の失敗でフレームループは止めない。
pub fn dispatch(events: &[IntentEvent], sink: &mut dyn IntentSink) {
    for event in events {
        if let Err(e) = sink.send(event) {
            match event {
                IntentEvent::MoveTo { .. } => {}
                _ => eprintln!("[sink] send failed for {:?}: {}", event, e),
            }
        }
    }
}
