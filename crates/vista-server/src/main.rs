use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use vista_config::{ConfigLoader, VistaConfig};
use vista_control::{CommandDispatcher, CommandValue, MqttCommandChannel};
use vista_telemetry::{is_online, TelemetryPipeline};
use vista_transport::MqttSession;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "vista.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 运行遥测管道（默认）
    Run {
        /// 汇总日志输出间隔（秒）
        #[arg(long, default_value_t = 10)]
        report_secs: u64,
    },
    /// 向设备发送一条指令
    Send {
        device_id: String,
        command: String,
        /// 指令参数（能解析为数值则按数值发送）
        value: Option<String>,
    },
    /// 自由文本指令：JSON 解析失败时回落为原始文本
    SendText { device_id: String, text: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    info!(config = %args.config, "Starting VISTA IOT dashboard core");

    let loader = ConfigLoader::new(&args.config);
    loader.validate()?;
    let config = loader.load()?;

    match args.command.unwrap_or(Command::Run { report_secs: 10 }) {
        Command::Run { report_secs } => run_pipeline(&config, report_secs).await,
        Command::Send {
            device_id,
            command,
            value,
        } => {
            let dispatcher = connect_dispatcher(&config).await?;
            dispatcher
                .send(&device_id, &command, value.map(parse_value))
                .await?;
            Ok(())
        }
        Command::SendText { device_id, text } => {
            let dispatcher = connect_dispatcher(&config).await?;
            let kind = dispatcher.send_text(&device_id, &text).await?;
            info!(kind = kind.as_str(), "Text command dispatched");
            Ok(())
        }
    }
}

/// 运行遥测管道直到事件流关闭或收到退出信号
async fn run_pipeline(config: &VistaConfig, report_secs: u64) -> anyhow::Result<()> {
    info!(flow_editor = %config.flow_editor.url, "Flow editor embedded by reference");

    let session = Arc::new(MqttSession::connect(&config.broker).await?);
    for topic in &config.subscriptions.topics {
        session.subscribe(topic).await?;
    }

    let mut events = session
        .take_events()
        .ok_or_else(|| anyhow::anyhow!("Event receiver already taken"))?;

    let mut pipeline = TelemetryPipeline::new();
    let mut report = tokio::time::interval(Duration::from_secs(report_secs));

    // 单一消费循环：事件处理与汇总输出都在这一个任务里
    loop {
        tokio::select! {
            maybe_event = events.recv() => match maybe_event {
                Some(event) => pipeline.handle_event(event),
                None => {
                    warn!("Event stream closed");
                    break;
                }
            },
            _ = report.tick() => report_summary(&pipeline),
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    session.disconnect().await;
    Ok(())
}

/// 连接 Broker 并装配指令派发器
async fn connect_dispatcher(config: &VistaConfig) -> anyhow::Result<CommandDispatcher> {
    let session = Arc::new(MqttSession::connect(&config.broker).await?);
    let channel = Arc::new(MqttCommandChannel::new(session));
    Ok(CommandDispatcher::new(channel))
}

/// 指令参数：优先数值，否则按文本
fn parse_value(value: String) -> CommandValue {
    match value.parse::<f64>() {
        Ok(number) => CommandValue::Number(number),
        Err(_) => CommandValue::Text(value),
    }
}

/// 输出管道汇总：设备数、在线数、窗口读数与每序列最新值
fn report_summary(pipeline: &TelemetryPipeline) {
    let now = Utc::now();
    let online = pipeline
        .registry()
        .list()
        .iter()
        .filter(|d| is_online(d.last_seen, now))
        .count();

    info!(
        connected = pipeline.is_connected(),
        devices = pipeline.registry().len(),
        online = online,
        readings = pipeline.window().len(),
        "Pipeline summary"
    );

    for latest in pipeline.latest_values() {
        info!(series = %latest.series, value = latest.value, "Latest value");
    }
}
