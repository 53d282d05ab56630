use winit::event::ElementState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Shift held; the editor uses it to scroll variants instead of kinds.
    Modifier,
    Quit,
}

const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Modifier => 4,
            InputAction::Quit => 5,
        }
    }
}

/// Turns a held key into a single-tick press edge.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct KeyEdge {
    is_down: bool,
    pressed: bool,
}

impl KeyEdge {
    pub(crate) fn handle(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.is_down {
                    self.pressed = true;
                }
                self.is_down = true;
            }
            ElementState::Released => self.is_down = false,
        }
    }

    pub(crate) fn is_down(&self) -> bool {
        self.is_down
    }

    pub(crate) fn take(&mut self) -> bool {
        std::mem::take(&mut self.pressed)
    }
}

/// Press edges captured since the previous tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct InputEdges {
    pub(crate) switch_scene: bool,
    pub(crate) save: bool,
    pub(crate) jump: bool,
    pub(crate) dash: bool,
    pub(crate) toggle_grid: bool,
    pub(crate) autotile: bool,
    pub(crate) left_click: bool,
    pub(crate) right_click: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_edge_fires_once_per_press() {
        let mut edge = KeyEdge::default();

        edge.handle(ElementState::Pressed);
        edge.handle(ElementState::Pressed);
        assert!(edge.take());
        assert!(!edge.take());
        assert!(edge.is_down());

        edge.handle(ElementState::Released);
        assert!(!edge.is_down());
        edge.handle(ElementState::Pressed);
        assert!(edge.take());
    }

    #[test]
    fn action_states_track_each_action_independently() {
        let mut states = ActionStates::default();
        states.set(InputAction::Modifier, true);
        states.set(InputAction::MoveLeft, true);
        states.set(InputAction::MoveLeft, false);

        assert!(states.is_down(InputAction::Modifier));
        assert!(!states.is_down(InputAction::MoveLeft));
        assert!(!states.is_down(InputAction::Quit));
    }
}
