use gridq::render::{draw_experience_log, draw_grid, draw_stats};
use gridq::Trainer;
use macroquad::prelude::*;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

const WINDOW_WIDTH: i32 = 1000;
const WINDOW_HEIGHT: i32 = 720;
const PANEL_WIDTH: f32 = 320.0;
const MARGIN: f32 = 20.0;
const LOG_HEIGHT: f32 = 220.0;
const SPEED_STEP: f32 = 5.0;
const EPSILON_STEP: f32 = 0.05;

fn window_conf() -> Conf {
    Conf {
        window_title: "gridq".to_owned(),
        window_width: WINDOW_WIDTH,
        window_height: WINDOW_HEIGHT,
        window_resizable: false,
        ..Default::default()
    }
}

fn init_logging() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(d) = "gridq=info".parse() {
        filter = filter.add_directive(d);
    }
    fmt().with_env_filter(filter).init();
}

#[macroquad::main(window_conf)]
async fn main() {
    init_logging();

    let mut trainer = Trainer::new();

    loop {
        clear_background(Color::new(0.06, 0.09, 0.16, 1.0));

        handle_key_inputs(&mut trainer);
        draw_controls(&mut trainer);

        trainer.update(Duration::from_secs_f32(get_frame_time()));

        let state = trainer.state();
        let grid_size = screen_height() - LOG_HEIGHT - MARGIN * 3.0;
        let grid_area = Rect::new(PANEL_WIDTH + MARGIN * 2.0, MARGIN, grid_size, grid_size);
        draw_grid(&state.grid, state.agent.position, grid_area);

        let log_area = Rect::new(
            PANEL_WIDTH + MARGIN * 2.0,
            screen_height() - LOG_HEIGHT - MARGIN,
            screen_width() - PANEL_WIDTH - MARGIN * 3.0,
            LOG_HEIGHT,
        );
        draw_experience_log(&state.experiences, log_area);

        next_frame().await
    }
}

fn draw_controls(trainer: &mut Trainer) {
    draw_stats(trainer.state(), trainer.speed(), Rect::new(MARGIN, MARGIN, PANEL_WIDTH, 140.0));

    let button_w = (PANEL_WIDTH - MARGIN) / 2.0;
    let (label, color) = if trainer.is_training() {
        ("Pause", Color::from_rgba(220, 38, 38, 255))
    } else {
        ("Start", Color::from_rgba(22, 163, 74, 255))
    };

    if Button::new(MARGIN, 180.0, button_w, 44.0, label, color).draw_and_check_click() {
        trainer.toggle_training();
    }
    if Button::new(MARGIN * 2.0 + button_w, 180.0, button_w, 44.0, "Reset", Color::from_rgba(71, 85, 105, 255)).draw_and_check_click() {
        trainer.reset();
    }

    let auto = trainer.state().agent.auto_epsilon;
    let decay_label = if auto { "Epsilon: auto decay" } else { "Epsilon: fixed" };
    if Button::new(MARGIN, 240.0, PANEL_WIDTH, 36.0, decay_label, Color::from_rgba(37, 99, 235, 255)).draw_and_check_click() {
        trainer.set_automatic_decay(!auto);
    }

    let speed_slider = Slider::new(MARGIN, 320.0, PANEL_WIDTH, "Speed", 0.0, 100.0);
    if let Some(speed) = speed_slider.draw_and_check_drag(trainer.speed()) {
        if speed != trainer.speed() {
            trainer.set_speed(speed);
        }
    }

    let epsilon_slider = Slider::new(MARGIN, 380.0, PANEL_WIDTH, "Epsilon", 0.0, 1.0);
    if let Some(epsilon) = epsilon_slider.draw_and_check_drag(trainer.state().agent.epsilon) {
        trainer.set_exploration_rate(epsilon);
    }

    draw_text("Space: start/pause   R: reset   A: decay mode", MARGIN, 440.0, 16.0, GRAY);
    draw_text("Up/Down: speed   Left/Right: epsilon", MARGIN, 460.0, 16.0, GRAY);
}

struct Button {
    rect: Rect,
    text: &'static str,
    color: Color,
}

impl Button {
    fn new(x: f32, y: f32, w: f32, h: f32, text: &'static str, color: Color) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            text,
            color,
        }
    }

    fn draw_and_check_click(&self) -> bool {
        let mouse_pos = mouse_position();
        let mouse_over = self.rect.contains(vec2(mouse_pos.0, mouse_pos.1));

        let color = if mouse_over {
            Color::new(self.color.r * 0.8, self.color.g * 0.8, self.color.b * 0.8, 1.0) // darker on hover
        } else {
            self.color
        };

        draw_rectangle(self.rect.x, self.rect.y, self.rect.w, self.rect.h, color);
        let text_dims = measure_text(self.text, None, 22, 1.0);
        let text_x = self.rect.x + (self.rect.w - text_dims.width) / 2.0;
        let text_y = self.rect.y + (self.rect.h - text_dims.height) / 2.0 + text_dims.offset_y;
        draw_text(self.text, text_x, text_y, 22.0, WHITE);
        mouse_over && is_mouse_button_pressed(MouseButton::Left)
    }
}

struct Slider {
    track: Rect,
    label: &'static str,
    min: f32,
    max: f32,
}

impl Slider {
    fn new(x: f32, y: f32, w: f32, label: &'static str, min: f32, max: f32) -> Self {
        Self {
            track: Rect::new(x, y, w, 8.0),
            label,
            min,
            max,
        }
    }

    // returns the new value while the track is being dragged
    fn draw_and_check_drag(&self, value: f32) -> Option<f32> {
        let t = ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0);

        draw_text(self.label, self.track.x, self.track.y - 10.0, 18.0, WHITE);
        draw_rectangle(self.track.x, self.track.y, self.track.w, self.track.h, Color::from_rgba(51, 65, 85, 255));
        draw_rectangle(self.track.x, self.track.y, self.track.w * t, self.track.h, Color::from_rgba(59, 130, 246, 255));
        draw_circle(self.track.x + self.track.w * t, self.track.y + self.track.h / 2.0, 9.0, WHITE);

        let (mx, my) = mouse_position();
        let hit_box = Rect::new(self.track.x - 10.0, self.track.y - 10.0, self.track.w + 20.0, self.track.h + 20.0);
        if is_mouse_button_down(MouseButton::Left) && hit_box.contains(vec2(mx, my)) {
            let t = ((mx - self.track.x) / self.track.w).clamp(0.0, 1.0);
            return Some(self.min + t * (self.max - self.min));
        }
        None
    }
}

fn handle_key_inputs(trainer: &mut Trainer) {
    if is_key_pressed(KeyCode::Space) {
        trainer.toggle_training();
    }
    if is_key_pressed(KeyCode::R) {
        trainer.reset();
    }
    if is_key_pressed(KeyCode::A) {
        let auto = trainer.state().agent.auto_epsilon;
        trainer.set_automatic_decay(!auto);
    }

    let speed = trainer.speed();
    if is_key_pressed(KeyCode::Up) {
        trainer.set_speed(speed + SPEED_STEP);
    } else if is_key_pressed(KeyCode::Down) {
        trainer.set_speed(speed - SPEED_STEP);
    }

    let epsilon = trainer.state().agent.epsilon;
    if is_key_pressed(KeyCode::Right) {
        trainer.set_exploration_rate(epsilon + EPSILON_STEP);
    } else if is_key_pressed(KeyCode::Left) {
        trainer.set_exploration_rate(epsilon - EPSILON_STEP);
    }
}
