pub mod event;
pub mod message;
pub mod topic;

pub use event::SessionEvent;
pub use message::InboundMessage;
