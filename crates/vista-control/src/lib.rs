pub mod channel;
pub mod dispatcher;
pub mod model;

pub use channel::{CommandChannel, MqttCommandChannel};
pub use dispatcher::CommandDispatcher;
pub use model::{CommandMessage, CommandValue, TextCommandKind};
