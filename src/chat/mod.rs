mod controller;
mod message;
mod session;
mod clock;
mod view;

pub use controller::ChatController;
pub use message::{ChatMessage, Incoming, Outgoing};
pub use session::ChatSession;
pub use clock::{format_time, format_time_in, init_local_offset, local_offset, wall_clock, INVALID_TIME};
pub use view::{Align, Bubble, ChatView};
