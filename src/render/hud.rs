//! Text overlay drawn directly on the window after the framebuffer texture.
use raylib::prelude::*;

pub struct HudInfo<'a> {
    pub health: i32,
    pub max_health: i32,
    pub fps: u32,
    pub enemies_left: usize,
    pub banner: Option<&'a str>,
}

/// Green when healthy, yellow below half, red below a quarter.
pub fn health_color(health: i32, max_health: i32) -> Color {
    let max = max_health.max(1);
    if health * 4 < max {
        Color::RED
    } else if health * 2 < max {
        Color::YELLOW
    } else {
        Color::GREEN
    }
}

pub fn draw_hud(d: &mut RaylibDrawHandle, info: &HudInfo, width: i32, height: i32) {
    d.draw_text(&format!("FPS: {}", info.fps), 10, 10, 20, Color::WHITE);
    d.draw_text(&format!("ENEMIES: {}", info.enemies_left), 10, 36, 20, Color::WHITE);
    d.draw_text(
        &format!("HEALTH {}", info.health.max(0)),
        10,
        height - 40,
        30,
        health_color(info.health, info.max_health),
    );

    // crosshair
    let (cx, cy) = (width / 2, height / 2);
    d.draw_line(cx - 8, cy, cx + 8, cy, Color::WHITE);
    d.draw_line(cx, cy - 8, cx, cy + 8, Color::WHITE);

    if let Some(text) = info.banner {
        let size = 60;
        let w = d.measure_text(text, size);
        d.draw_rectangle(0, cy - 50, width, 100, Color::new(0, 0, 0, 160));
        d.draw_text(text, cx - w / 2, cy - size / 2, size, Color::RED);
    }
}
