//! Concrete `FrameSource` implementations for roshambo.

pub mod command;
pub mod file;

pub use command::CommandFrameSource;
pub use file::FileFrameSource;
