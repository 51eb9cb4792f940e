pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";

/// Label state of one copy control.
///
/// Each successful copy starts a new generation; a revert only applies to the
/// generation it was scheduled for, so a stale revert never clears a newer
/// confirmation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CopyFeedback {
    generation: u64,
    copied: bool,
}

impl CopyFeedback {
    /// Show the confirmation. Returns the generation the revert must target.
    pub fn confirm(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.copied = true;
        self.generation
    }

    /// Revert to the idle label if `generation` is still current.
    pub fn revert(&mut self, generation: u64) -> bool {
        if self.copied && self.generation == generation {
            self.copied = false;
            return true;
        }
        false
    }

    #[must_use]
    pub fn is_copied(&self) -> bool {
        self.copied
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.copied { COPIED_LABEL } else { COPY_LABEL }
    }
}
