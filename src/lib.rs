// Library exports for marktoggle

pub mod buffer;
pub mod commands;
pub mod config;
pub mod cursor_state;
pub mod error;
pub mod operations;
pub mod registry;
pub mod token;

pub use buffer::{CursorEnd, EditorBuffer, LineBuffer, Position, Selection};
pub use commands::Toggler;
pub use cursor_state::CursorState;
pub use error::{ConfigError, FormatError};
pub use operations::Operation;
pub use registry::{CommandKey, FormatKind, FormatSpec, Registry};
pub use token::Token;
