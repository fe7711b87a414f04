//! Supervision of the external frpc process

mod ansi;
mod console;
mod manager;

pub use ansi::{strip_ansi, trailing_escape_len};
pub use console::ConsoleBuffer;
pub use manager::{ProcessSupervisor, SupervisorError, SupervisorEvent, STOPPED_MARKER};
