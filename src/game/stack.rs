//! The action stack: what the game is doing right now, and inside what.
//!
//! A frame is pushed when an action enters the pipeline and popped when its
//! after phase completes, so the stack reads as the chain of nested actions
//! with the innermost last. Frames hold snapshots refreshed at phase
//! boundaries; handlers inspect them ("is this damage happening inside an
//! attack?") but can never mutate the live stack.

use crate::actions::Action;

/// Snapshot of one nesting level.
#[derive(Clone, Debug)]
pub struct ActionFrame {
    /// The action as of the last phase boundary (substitution and apply
    /// refresh it).
    pub action: Action,
    /// 0 for the outermost action.
    pub depth: usize,
}

/// Owned by the game; only the pipeline pushes and pops.
#[derive(Debug, Default)]
pub(crate) struct ActionStack {
    frames: Vec<ActionFrame>,
}

impl ActionStack {
    pub(crate) fn push(&mut self, action: Action) {
        let depth = self.frames.len();
        self.frames.push(ActionFrame { action, depth });
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    pub(crate) fn refresh_top(&mut self, action: &Action) {
        if let Some(frame) = self.frames.last_mut() {
            frame.action = action.clone();
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn frames(&self) -> &[ActionFrame] {
        &self.frames
    }
}
