//! Core vocabulary shared by the kernel and the binary:
//! - Command: semantic viewer commands
//! - Key: normalized key chords
//! - Service: named long-lived collaborators

pub mod command;
pub mod event;
pub mod service;

pub use command::Command;
pub use event::Key;
pub use service::Service;
