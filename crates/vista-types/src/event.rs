use serde::{Deserialize, Serialize};

use crate::message::InboundMessage;

/// 会话事件
///
/// 传输层回调（connect / message / close / error）收敛为一个封闭的
/// 变体集合，由管道的单一消费点按投递顺序处理。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// 连接建立（含重连成功）
    Connected,
    /// 连接断开
    Disconnected,
    /// 收到消息
    Message(InboundMessage),
    /// 传输错误（不致命，仅上报）
    Error(String),
}
