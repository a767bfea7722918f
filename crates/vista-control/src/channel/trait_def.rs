use async_trait::async_trait;

use crate::model::CommandMessage;

/// 指令通道 trait
#[async_trait]
pub trait CommandChannel: Send + Sync {
    /// 发送指令到设备
    async fn send_command(&self, command: &CommandMessage) -> anyhow::Result<()>;
}
