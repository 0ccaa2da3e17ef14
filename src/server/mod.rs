// Server module entry point
// Binding, connection handling, graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted as server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::{Server, ServerOptions};
pub use signal::shutdown_signal;
