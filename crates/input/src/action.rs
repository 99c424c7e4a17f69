/// A held-or-not action the desktop shell can bind a key to.
///
/// Actions are level-triggered: the shell reports press and release, and
/// `ActionState` keeps what is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    /// Multiplies camera speed while held.
    Sprint,
    /// Launch a projectile (one per press).
    Spawn,
    /// Gate for the `while_held` and `on_press` step activations.
    Step,
    Quit,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveUp,
        Action::MoveDown,
        Action::Sprint,
        Action::Spawn,
        Action::Step,
        Action::Quit,
    ];

    /// Whether this action moves the camera.
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Action::MoveForward
                | Action::MoveBackward
                | Action::MoveLeft
                | Action::MoveRight
                | Action::MoveUp
                | Action::MoveDown
        )
    }
}
