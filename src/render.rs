use crate::agent::experience::ExperienceLog;
use crate::grid::{Action, CellKind, Grid, Pos};
use crate::simulation::SimulationState;
use macroquad::prelude::*;

// Q-values map onto the heat scale between these two
const Q_COLOR_MIN: f32 = -2.0;
const Q_COLOR_MAX: f32 = 10.0;

pub fn q_opacity(q: f32) -> f32 {
    let val = (q - Q_COLOR_MIN) / (Q_COLOR_MAX - Q_COLOR_MIN);
    val.clamp(0.05, 0.9)
}

// green for positive, red otherwise
pub fn q_color(q: f32) -> Color {
    if q > 0.0 {
        Color::new(0.13, 0.77, 0.37, q_opacity(q))
    } else {
        Color::new(0.94, 0.27, 0.27, q_opacity(q.abs()))
    }
}

pub fn speed_label(speed: f32) -> &'static str {
    if speed < 20.0 {
        "Slow"
    } else if speed > 80.0 {
        "Fast"
    } else {
        "Normal"
    }
}

pub fn action_name(action: Action) -> &'static str {
    match action {
        Action::Up => "Up",
        Action::Right => "Right",
        Action::Down => "Down",
        Action::Left => "Left",
    }
}

fn fmt_pos(pos: Pos) -> String {
    format!("({},{})", pos.0, pos.1)
}

pub fn draw_grid(grid: &Grid, agent: Pos, area: Rect) {
    let cell_size = area.w.min(area.h) / grid.size() as f32;
    let gap: f32 = 2.0;

    draw_rectangle(area.x, area.y, cell_size * grid.size() as f32, cell_size * grid.size() as f32, Color::new(0.2, 0.25, 0.33, 1.0));

    for cell in grid.cells() {
        let x = area.x + cell.pos.0 as f32 * cell_size + gap;
        let y = area.y + cell.pos.1 as f32 * cell_size + gap;
        let s = cell_size - gap * 2.0;

        let background = match cell.kind {
            CellKind::Wall => Color::new(0.28, 0.33, 0.41, 1.0),
            _ => Color::new(0.12, 0.16, 0.23, 1.0),
        };
        draw_rectangle(x, y, s, s, background);

        match cell.kind {
            CellKind::Empty => {
                // one triangle per action, pointing from the centre to its edge
                let centre = vec2(x + s / 2.0, y + s / 2.0);
                let tl = vec2(x, y);
                let tr = vec2(x + s, y);
                let br = vec2(x + s, y + s);
                let bl = vec2(x, y + s);
                let edges = [(tl, tr), (tr, br), (bl, br), (tl, bl)];

                for action in Action::ALL {
                    let (a, b) = edges[action.index()];
                    draw_triangle(a, b, centre, q_color(cell.q_values[action.index()]));
                }
            }
            CellKind::Goal => {
                draw_rectangle_lines(x, y, s, s, 3.0, GREEN);
                draw_centered_text("+10", x + s / 2.0, y + s / 2.0, 24.0, GREEN);
            }
            CellKind::Pit => {
                draw_rectangle_lines(x, y, s, s, 3.0, RED);
                draw_centered_text("-10", x + s / 2.0, y + s / 2.0, 24.0, RED);
            }
            CellKind::Wall => {}
        }
    }

    let agent_x = area.x + (agent.0 as f32 + 0.5) * cell_size;
    let agent_y = area.y + (agent.1 as f32 + 0.5) * cell_size;
    draw_circle(agent_x, agent_y, cell_size * 0.35, Color::new(0.23, 0.51, 0.96, 1.0));
    draw_circle_lines(agent_x, agent_y, cell_size * 0.35, 2.0, WHITE);
    draw_centered_text("DQN", agent_x, agent_y, 16.0, WHITE);
}

pub fn draw_stats(state: &SimulationState, speed: f32, area: Rect) {
    let agent = &state.agent;
    let score_color = if agent.score >= 0.0 { GREEN } else { RED };
    let lines = [
        (format!("Episode: {}", agent.episode), WHITE),
        (format!("Epsilon: {:.2} ({})", agent.epsilon, if agent.auto_epsilon { "auto decay" } else { "fixed" }), WHITE),
        (format!("Speed: {:.0} ({})", speed, speed_label(speed)), WHITE),
        (format!("Current reward: {:.1}", agent.score), score_color),
        (format!("Status: {}", if state.training { "training" } else { "paused" }), WHITE),
    ];

    for (i, (text, color)) in lines.iter().enumerate() {
        draw_text(text, area.x, area.y + 24.0 * (i as f32 + 1.0), 22.0, *color);
    }
}

pub fn draw_experience_log(log: &ExperienceLog, area: Rect) {
    draw_rectangle(area.x, area.y, area.w, area.h, Color::new(0.06, 0.09, 0.16, 1.0));
    draw_text(
        &format!("Replay buffer  size: {}/{}", log.len(), log.capacity()),
        area.x + 8.0,
        area.y + 22.0,
        20.0,
        Color::new(0.66, 0.55, 0.98, 1.0),
    );

    if log.is_empty() {
        draw_text("No experience yet. Start training to collect some.", area.x + 8.0, area.y + 50.0, 18.0, GRAY);
        return;
    }

    for (i, exp) in log.iter().enumerate() {
        let reward_color = if exp.reward > 0.0 {
            GREEN
        } else if exp.reward < 0.0 {
            RED
        } else {
            GRAY
        };
        let y = area.y + 48.0 + i as f32 * 20.0;
        let text = format!("{} -> {:<5} -> ", fmt_pos(exp.state), action_name(exp.action));
        let dims = draw_text(&text, area.x + 8.0, y, 18.0, WHITE);
        let reward = format!("{:>5.1}", exp.reward);
        let reward_dims = draw_text(&reward, area.x + 8.0 + dims.width, y, 18.0, reward_color);
        draw_text(
            &format!(" -> {}", fmt_pos(exp.next_state)),
            area.x + 8.0 + dims.width + reward_dims.width,
            y,
            18.0,
            WHITE,
        );
    }
}

fn draw_centered_text(text: &str, x: f32, y: f32, size: f32, color: Color) {
    let dims = measure_text(text, None, size as u16, 1.0);
    draw_text(text, x - dims.width / 2.0, y + dims.offset_y / 2.0, size, color);
}
