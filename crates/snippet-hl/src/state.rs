#![forbid(unsafe_code)]

//! Cross-line scan state.

/// Context carried from one line to the next.
///
/// Only the TypeScript/TSX scanner reads or writes it; the JSON and shell
/// scanners receive and return [`ScanState::default`]. A value lives for one
/// formatting pass and is never shared between documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScanState {
    /// Inside a markup element's opening tag (between `<tag` and `>`).
    pub in_markup_element: bool,
    /// Open `{` count, floor-clamped at zero.
    pub brace_depth: u32,
    /// Inside a `/* ... */` comment that did not close on its line.
    pub in_block_comment: bool,
}

impl ScanState {
    /// The state at the start of a document.
    pub const fn new() -> Self {
        Self {
            in_markup_element: false,
            brace_depth: 0,
            in_block_comment: false,
        }
    }

    pub(crate) fn open_brace(&mut self) {
        self.brace_depth = self.brace_depth.saturating_add(1);
    }

    pub(crate) fn close_brace(&mut self) {
        self.brace_depth = self.brace_depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_matches_default() {
        assert_eq!(ScanState::new(), ScanState::default());
    }

    #[test]
    fn brace_depth_never_goes_negative() {
        let mut state = ScanState::new();
        state.close_brace();
        assert_eq!(state.brace_depth, 0);
        state.open_brace();
        state.open_brace();
        state.close_brace();
        assert_eq!(state.brace_depth, 1);
    }
}
