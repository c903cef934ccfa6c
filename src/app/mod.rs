pub mod background;
pub mod input;
pub mod messages;
pub mod runtime;
pub mod signals;

pub use messages::BackgroundMessage;
pub use runtime::run_tui;
