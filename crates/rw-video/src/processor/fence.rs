//! Code fence tracking.
//!
//! Directive syntax inside fenced code blocks is documentation, not a
//! directive, so the processor leaves those lines alone.

/// Open fence: character and length of the opening run.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line; returns `true` if it opened or closed a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let Some((ch, len)) = fence_run(trimmed) else {
            return false;
        };

        match self.open {
            Some((open_ch, open_len)) => {
                // Closing fence: same char, at least as long, nothing after it.
                if ch == open_ch && len >= open_len && trimmed[len..].trim().is_empty() {
                    self.open = None;
                    return true;
                }
                false
            }
            None => {
                self.open = Some((ch, len));
                true
            }
        }
    }
}

/// Leading run of three or more backticks or tildes.
fn fence_run(s: &str) -> Option<(char, usize)> {
    let first = s.chars().next().filter(|&c| c == '`' || c == '~')?;
    let len = s.chars().take_while(|&c| c == first).count();
    (len >= 3).then_some((first, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtick_fence() {
        let mut fence = FenceTracker::new();
        assert!(!fence.in_fence());
        assert!(fence.update("```markdown"));
        assert!(fence.in_fence());
        assert!(!fence.update("::youtube[abc]"));
        assert!(fence.in_fence());
        assert!(fence.update("```"));
        assert!(!fence.in_fence());
    }

    #[test]
    fn test_closing_must_match() {
        let mut fence = FenceTracker::new();
        fence.update("~~~~");
        assert!(!fence.update("```"));
        assert!(!fence.update("~~~"));
        assert!(!fence.update("~~~~ trailing"));
        assert!(fence.in_fence());
        assert!(fence.update("~~~~~"));
        assert!(!fence.in_fence());
    }

    #[test]
    fn test_short_run_is_not_fence() {
        let mut fence = FenceTracker::new();
        assert!(!fence.update("`` inline ``"));
        assert!(!fence.in_fence());
    }
}
