pub mod handler;
pub mod messages;
pub mod sink;

pub use handler::handle_websocket;
