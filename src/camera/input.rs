use nalgebra::{Point2, Vector2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Click to pick a body.
    Select,
    /// Drag to look around.
    Look,
    /// Drag to pan. Only meaningful while the camera is free.
    Pan,
}

/// Discrete commands, each fired once per key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    NextTarget,
    PreviousTarget,
    CancelFocus,
    ToggleDisplayMode,
    TogglePause,
    SpeedUp,
    SlowDown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonSet {
    pub select: bool,
    pub look: bool,
    pub pan: bool,
}

impl ButtonSet {
    pub fn contains(&self, button: PointerButton) -> bool {
        match button {
            PointerButton::Select => self.select,
            PointerButton::Look => self.look,
            PointerButton::Pan => self.pan,
        }
    }

    pub fn set(&mut self, button: PointerButton, value: bool) {
        match button {
            PointerButton::Select => self.select = value,
            PointerButton::Look => self.look = value,
            PointerButton::Pan => self.pan = value,
        }
    }

    pub fn any(&self) -> bool {
        self.select || self.look || self.pan
    }
}

/// Everything the simulation needs to know about one frame of user input.
/// Pointer coordinates are in framebuffer pixels, origin at the top left.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub pointer: Point2<f32>,
    pub pointer_delta: Vector2<f32>,
    pub pressed: ButtonSet,
    pub held: ButtonSet,
    pub released: ButtonSet,
    /// Positive scrolls zoom in.
    pub scroll: f32,
    pub actions: Vec<InputAction>,
}

impl InputSnapshot {
    /// A frame with the pointer resting at `pointer` and nothing happening.
    pub fn idle(pointer: Point2<f32>) -> Self {
        InputSnapshot {
            pointer,
            ..Default::default()
        }
    }

    pub fn is_held(&self, button: PointerButton) -> bool {
        self.held.contains(button)
    }

    pub fn was_pressed(&self, button: PointerButton) -> bool {
        self.pressed.contains(button)
    }

    pub fn was_released(&self, button: PointerButton) -> bool {
        self.released.contains(button)
    }

    pub fn has_action(&self, action: InputAction) -> bool {
        self.actions.contains(&action)
    }

    // -- Builders, mostly for scripted input --

    pub fn with_action(mut self, action: InputAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_drag(mut self, button: PointerButton, dx: f32, dy: f32) -> Self {
        self.held.set(button, true);
        self.pointer_delta = Vector2::new(dx, dy);
        self
    }

    pub fn with_click(mut self, button: PointerButton) -> Self {
        self.pressed.set(button, true);
        self.held.set(button, true);
        self
    }

    pub fn with_scroll(mut self, scroll: f32) -> Self {
        self.scroll = scroll;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let input = InputSnapshot::idle(Point2::new(10.0, 20.0))
            .with_drag(PointerButton::Look, 3.0, -4.0)
            .with_scroll(2.0)
            .with_action(InputAction::NextTarget);

        assert!(input.is_held(PointerButton::Look));
        assert!(!input.is_held(PointerButton::Pan));
        assert!(!input.was_pressed(PointerButton::Look));
        assert_eq!(input.pointer_delta, Vector2::new(3.0, -4.0));
        assert_eq!(input.scroll, 2.0);
        assert!(input.has_action(InputAction::NextTarget));
        assert!(!input.has_action(InputAction::CancelFocus));
    }

    #[test]
    fn test_click_is_pressed_and_held() {
        let input = InputSnapshot::default().with_click(PointerButton::Select);
        assert!(input.was_pressed(PointerButton::Select));
        assert!(input.is_held(PointerButton::Select));
        assert!(input.held.any());
        assert!(!input.released.any());
    }
}
