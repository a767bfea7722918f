/// vista-telemetry 基本使用示例
///
/// 模拟一串入站消息，演示注册表、窗口与三个聚合视图。
use chrono::Utc;

use vista_telemetry::{is_online, TelemetryPipeline};
use vista_types::{InboundMessage, SessionEvent};

fn main() {
    // 初始化日志
    tracing_subscriber::fmt::init();

    println!("=== VISTA IOT 遥测管道示例 ===\n");

    let mut pipeline = TelemetryPipeline::new();
    pipeline.handle_event(SessionEvent::Connected);

    // 1. 模拟设备上报（最后一条是坏负载，会被丢弃）
    let samples = [
        (
            "devices/temp-01/data",
            r#"{"type":"temperature","sensorValue":21.5,"unit":"C"}"#,
        ),
        (
            "devices/hum-01/data",
            r#"{"type":"humidity","sensorValue":55.0,"unit":"%"}"#,
        ),
        (
            "devices/temp-01/data",
            r#"{"type":"temperature","sensorValue":22.1,"unit":"C"}"#,
        ),
        ("devices/switch-01/status", r#"{"status":"on"}"#),
        ("devices/bad-01/data", "not json"),
    ];
    for (topic, payload) in samples {
        pipeline.handle_event(SessionEvent::Message(InboundMessage::new(
            topic,
            payload.as_bytes(),
        )));
    }

    // 2. 设备列表与在线状态
    println!("--- 设备列表 ---");
    let now = Utc::now();
    for device in pipeline.registry().list() {
        println!(
            "{} [{}] online={} status={:?}",
            device.id,
            device.device_type,
            is_online(device.last_seen, now),
            device.status
        );
    }

    // 3. 三个聚合视图
    println!("\n--- 最新值快照 ---");
    for latest in pipeline.latest_values() {
        println!("{} = {}", latest.series, latest.value);
    }

    println!("\n--- 序列统计 ---");
    for stat in pipeline.series_statistics() {
        println!(
            "{}: min={} max={} avg={:.2} count={}",
            stat.series, stat.min, stat.max, stat.avg, stat.count
        );
    }

    println!("\n--- 时间桶 ---");
    for bucket in pipeline.time_buckets() {
        println!("{}: {:?}", bucket.time, bucket.values);
    }
}
