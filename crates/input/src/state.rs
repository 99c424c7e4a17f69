use crate::action::Action;
use glam::Vec3;
use std::collections::BTreeSet;

/// Snapshot of input relevant to one frame of the simulation loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Camera-local movement intent: x = right, y = up, z = forward.
    pub movement: Vec3,
    pub sprint: bool,
    pub spawn_held: bool,
    pub step_held: bool,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    /// An otherwise idle frame with the spawn input held.
    pub fn spawning() -> Self {
        Self {
            spawn_held: true,
            ..Self::default()
        }
    }
}

/// Currently held actions. Modifier chords (ctrl+x) are resolved by the
/// shell before they reach here.
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    held: BTreeSet<Action>,
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press or release. Returns true if the held state changed.
    pub fn set(&mut self, action: Action, pressed: bool) -> bool {
        let changed = if pressed {
            self.held.insert(action)
        } else {
            self.held.remove(&action)
        };
        if changed {
            tracing::trace!(?action, pressed, "action state changed");
        }
        changed
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn snapshot(&self) -> FrameInput {
        let axis = |pos: Action, neg: Action| -> f32 {
            (self.is_held(pos) as i32 - self.is_held(neg) as i32) as f32
        };
        FrameInput {
            movement: Vec3::new(
                axis(Action::MoveRight, Action::MoveLeft),
                axis(Action::MoveUp, Action::MoveDown),
                axis(Action::MoveForward, Action::MoveBackward),
            ),
            sprint: self.is_held(Action::Sprint),
            spawn_held: self.is_held(Action::Spawn),
            step_held: self.is_held(Action::Step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_snapshot() {
        let state = ActionState::new();
        assert_eq!(state.snapshot(), FrameInput::idle());
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut state = ActionState::new();
        state.set(Action::MoveForward, true);
        state.set(Action::MoveBackward, true);
        state.set(Action::MoveRight, true);
        let input = state.snapshot();
        assert_eq!(input.movement, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn repeated_press_is_not_a_change() {
        let mut state = ActionState::new();
        assert!(state.set(Action::Spawn, true));
        assert!(!state.set(Action::Spawn, true));
        assert!(state.snapshot().spawn_held);
        assert!(state.set(Action::Spawn, false));
        assert!(!state.snapshot().spawn_held);
    }

    #[test]
    fn clear_releases_all() {
        let mut state = ActionState::new();
        state.set(Action::Step, true);
        state.set(Action::MoveUp, true);
        state.clear();
        assert_eq!(state.snapshot(), FrameInput::idle());
    }
}
