//! Keyboard/mouse polling into a plain snapshot the simulation consumes.
use raylib::prelude::*;

#[derive(Copy, Clone, Debug, Default)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub mouse_dx: f32,
    pub mouse_dy: f32,
    pub fire: bool,
}

pub fn process_events(window: &mut RaylibHandle) -> InputState {
    let mouse = window.get_mouse_delta();
    InputState {
        forward: window.is_key_down(KeyboardKey::KEY_W),
        back: window.is_key_down(KeyboardKey::KEY_S),
        strafe_left: window.is_key_down(KeyboardKey::KEY_A),
        strafe_right: window.is_key_down(KeyboardKey::KEY_D),
        mouse_dx: mouse.x,
        mouse_dy: mouse.y,
        fire: window.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT),
    }
}
