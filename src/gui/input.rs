use std::time::Instant;

use kiss3d::event::{Action, EventManager, Key, MouseButton, WindowEvent};
use nalgebra::Point2;

use crate::camera::input::{ButtonSet, InputAction, InputSnapshot, PointerButton};

// Key config, all in one place
const KEY_PREV_FOCUS: Key = Key::Q;
const KEY_NEXT_FOCUS: Key = Key::E;
const KEY_CANCEL_FOCUS: Key = Key::Home;
const KEY_TOGGLE_DISPLAY: Key = Key::Tab;
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_TOGGLE_PAUSE: Key = Key::Space;

const BUTTON_SELECT: MouseButton = MouseButton::Button1;
const BUTTON_LOOK: MouseButton = MouseButton::Button2;
const BUTTON_PAN: MouseButton = MouseButton::Button3;

fn key_action(key: Key) -> Option<InputAction> {
    match key {
        KEY_PREV_FOCUS => Some(InputAction::PreviousTarget),
        KEY_NEXT_FOCUS => Some(InputAction::NextTarget),
        KEY_CANCEL_FOCUS => Some(InputAction::CancelFocus),
        KEY_TOGGLE_DISPLAY => Some(InputAction::ToggleDisplayMode),
        KEY_SPEED_UP => Some(InputAction::SpeedUp),
        KEY_SLOW_DOWN => Some(InputAction::SlowDown),
        KEY_TOGGLE_PAUSE => Some(InputAction::TogglePause),
        _ => None,
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        BUTTON_SELECT => Some(PointerButton::Select),
        BUTTON_LOOK => Some(PointerButton::Look),
        BUTTON_PAN => Some(PointerButton::Pan),
        _ => None,
    }
}

/// Turns the window's event stream into one `InputSnapshot` per frame.
/// Held buttons and the pointer position carry over between frames.
pub struct InputCollector {
    pointer: Point2<f32>,
    held: ButtonSet,
}

impl InputCollector {
    pub fn new() -> Self {
        InputCollector {
            pointer: Point2::origin(),
            held: ButtonSet::default(),
        }
    }

    pub fn collect(&mut self, mut events: EventManager) -> InputSnapshot {
        let mut snapshot = InputSnapshot::idle(self.pointer);
        snapshot.held = self.held;

        for event in events.iter() {
            self.apply(&event.value, &mut snapshot);
        }

        snapshot.pointer = self.pointer;
        snapshot.held = self.held;
        snapshot
    }

    fn apply(&mut self, event: &WindowEvent, snapshot: &mut InputSnapshot) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let position = Point2::new(x as f32, y as f32);
                snapshot.pointer_delta += position - self.pointer;
                self.pointer = position;
            }
            WindowEvent::MouseButton(button, action, _) => {
                let button = match pointer_button(button) {
                    Some(b) => b,
                    None => return,
                };
                match action {
                    Action::Press => {
                        snapshot.pressed.set(button, true);
                        self.held.set(button, true);
                    }
                    Action::Release => {
                        snapshot.released.set(button, true);
                        self.held.set(button, false);
                    }
                }
            }
            WindowEvent::Scroll(_, dy, _) => {
                snapshot.scroll += dy as f32;
            }
            WindowEvent::Key(key, Action::Press, _) => {
                if let Some(action) = key_action(key) {
                    snapshot.actions.push(action);
                }
            }
            _ => {}
        }
    }
}

impl Default for InputCollector {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: usize,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: usize) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            previous_fps: 0.0,
            window_size_millis,
        }
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    pub fn increment(&mut self) {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed.as_millis() > self.window_size_millis as u128 {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.instant = Instant::now();
            self.counter = 0;
        }
    }
}

/// Wall-clock time between frames, capped so that a stall (dragging the
/// window, a breakpoint) doesn't fling everything forward.
pub struct FrameTimer {
    last: Instant,
    max_dt: f64,
}

impl FrameTimer {
    pub fn new(max_dt: f64) -> Self {
        FrameTimer {
            last: Instant::now(),
            max_dt,
        }
    }

    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        dt.min(self.max_dt)
    }
}
