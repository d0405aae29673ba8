// Toggle executor
// Decides between applying and removing a format and runs the matching operation

use crate::buffer::{CursorEnd, EditorBuffer};
use crate::cursor_state::{self, CursorState};
use crate::error::FormatError;
use crate::operations::Operation;
use crate::registry::{CommandKey, Registry};

/// Runs format commands against an editor buffer
#[derive(Debug, Clone, Copy)]
pub struct Toggler<'r> {
    registry: &'r Registry,
}

impl<'r> Toggler<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Toggler { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Formats active at the start of the current selection
    pub fn cursor_state<B: EditorBuffer + ?Sized>(&self, buffer: &B) -> CursorState {
        let start = buffer.cursor(CursorEnd::Start);
        let tokens = buffer.line_tokens(start.line);
        cursor_state::resolve(self.registry, &tokens, start.ch)
    }

    /// Toggle a format at the current selection
    /// Returns the operation that was run
    pub fn execute<B: EditorBuffer + ?Sized>(
        &self,
        buffer: &mut B,
        key: CommandKey,
    ) -> Result<Operation, FormatError> {
        let state = self.cursor_state(buffer);
        let spec = self.registry.get(key)?;

        let operation = Operation::select(spec.kind(), state.is_active(key));
        tracing::debug!(command = %key, ?operation, active = ?state.active, "toggling format");

        operation.run(buffer, spec);
        Ok(operation)
    }

    /// Toggle a format given by its command name, e.g. "bold" or "oList"
    pub fn execute_str<B: EditorBuffer + ?Sized>(
        &self,
        buffer: &mut B,
        name: &str,
    ) -> Result<Operation, FormatError> {
        let key = name.parse()?;
        self.execute(buffer, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::LineBuffer;
    use crate::token::Token;

    #[test]
    fn test_apply_when_inactive() {
        let registry = Registry::builtin().unwrap();
        let toggler = Toggler::new(&registry);

        let mut buffer = LineBuffer::new("Title");
        let op = toggler.execute(&mut buffer, CommandKey::H1).unwrap();
        assert_eq!(op, Operation::BlockApply);
        assert_eq!(buffer.text(), "# Title");
        assert_eq!(buffer.selection_text(), "Title");
    }

    #[test]
    fn test_remove_when_active() {
        let registry = Registry::builtin().unwrap();
        let toggler = Toggler::new(&registry);

        let mut buffer = LineBuffer::new("# Title");
        buffer.set_line_tokens(0, vec![Token::from_line("# Title", 0, 7, "header header-1")]);
        buffer.select(0, 3, 3);

        let op = toggler.execute(&mut buffer, CommandKey::H1).unwrap();
        assert_eq!(op, Operation::BlockRemove);
        assert_eq!(buffer.text(), "Title");
    }

    #[test]
    fn test_other_format_active_still_applies() {
        let registry = Registry::builtin().unwrap();
        let toggler = Toggler::new(&registry);

        let line = "**word**";
        let mut buffer = LineBuffer::new(line);
        buffer.set_line_tokens(0, vec![Token::from_line(line, 0, 8, "strong")]);
        buffer.select(0, 2, 6);

        let op = toggler.execute(&mut buffer, CommandKey::Italic).unwrap();
        assert_eq!(op, Operation::InlineApply);
        assert_eq!(buffer.text(), "**_word_**");
    }

    #[test]
    fn test_cursor_state_uses_selection_start() {
        let registry = Registry::builtin().unwrap();
        let toggler = Toggler::new(&registry);

        let line = "_a_ plain";
        let mut buffer = LineBuffer::new(line);
        buffer.set_line_tokens(0, vec![Token::from_line(line, 0, 3, "em")]);
        buffer.select(0, 1, 8);

        let state = toggler.cursor_state(&buffer);
        assert!(state.is_active(CommandKey::Italic));
        assert_eq!(state.token.unwrap().text, "_a_");
    }

    #[test]
    fn test_unknown_command_leaves_buffer() {
        let registry = Registry::builtin().unwrap();
        let toggler = Toggler::new(&registry);

        let mut buffer = LineBuffer::new("text");
        buffer.select(0, 0, 4);
        let err = toggler.execute_str(&mut buffer, "strikethrough").unwrap_err();

        assert!(matches!(err, FormatError::UnknownCommand(name) if name == "strikethrough"));
        assert_eq!(buffer.text(), "text");
        assert_eq!(buffer.selection_text(), "text");
        assert!(!buffer.is_focused());
    }

    #[test]
    fn test_execute_str() {
        let registry = Registry::builtin().unwrap();
        let toggler = Toggler::new(&registry);

        let mut buffer = LineBuffer::new("Item");
        toggler.execute_str(&mut buffer, "uList").unwrap();
        assert_eq!(buffer.text(), "* Item");
    }
}
