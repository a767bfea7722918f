use std::sync::Arc;
use tracing::{info, warn};

use crate::channel::CommandChannel;
use crate::model::{CommandMessage, CommandValue, TextCommandKind};

/// 指令派发器
///
/// 构造 `CommandMessage` 并经指令通道发出。发送失败原样上报，
/// 由调用方决定是否重试。
pub struct CommandDispatcher {
    channel: Arc<dyn CommandChannel>,
}

impl CommandDispatcher {
    pub fn new(channel: Arc<dyn CommandChannel>) -> Self {
        Self { channel }
    }

    /// 发送指令
    pub async fn send(
        &self,
        device_id: &str,
        command: &str,
        value: Option<CommandValue>,
    ) -> anyhow::Result<()> {
        let message = CommandMessage::new(device_id, command, value);
        self.channel.send_command(&message).await?;

        info!(device_id = %device_id, command = %command, "Command dispatched");
        Ok(())
    }

    /// 自由文本入口
    ///
    /// 先尝试把文本解析为 JSON：成功则以 `custom` 类别发送规范化后
    /// 的 JSON 字符串；失败则以 `message` 类别发送原始文本。返回实际
    /// 使用的类别，回落对调用方可见。
    pub async fn send_text(
        &self,
        device_id: &str,
        text: &str,
    ) -> anyhow::Result<TextCommandKind> {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(parsed) => {
                let normalized = serde_json::to_string(&parsed)?;
                self.send(
                    device_id,
                    TextCommandKind::Custom.as_str(),
                    Some(CommandValue::Text(normalized)),
                )
                .await?;
                Ok(TextCommandKind::Custom)
            }
            Err(e) => {
                warn!(
                    device_id = %device_id,
                    error = %e,
                    "Text is not JSON, falling back to raw message command"
                );
                self.send(
                    device_id,
                    TextCommandKind::Message.as_str(),
                    Some(CommandValue::Text(text.to_string())),
                )
                .await?;
                Ok(TextCommandKind::Message)
            }
        }
    }
}
