use crate::error::{GridError, Result};
use crate::params::{GOAL, GRID_SIZE, MIN_GRID_SIZE, PIT, START, WALLS};
use std::ops::{Index, IndexMut};

pub type Pos = (i32, i32); // (x, y), y grows downwards

pub const NUM_ACTIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
}

impl Action {
    pub const ALL: [Action; NUM_ACTIONS] = [Action::Up, Action::Right, Action::Down, Action::Left];

    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Right => 1,
            Action::Down => 2,
            Action::Left => 3,
        }
    }

    // unit vector (N, E, S, W)
    pub fn delta(self) -> Pos {
        match self {
            Action::Up => (0, -1),
            Action::Right => (1, 0),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Up => "↑",
            Action::Right => "→",
            Action::Down => "↓",
            Action::Left => "←",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Wall,
    Goal,
    Pit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub pos: Pos,
    pub kind: CellKind,
    pub q_values: [f32; NUM_ACTIONS], // [Up, Right, Down, Left]
}

impl Cell {
    pub fn max_q(&self) -> f32 {
        self.q_values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }
}

// square, fixed wall/goal/pit layout, cells stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: i32,
    cells: Vec<Cell>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self::build(GRID_SIZE)
    }

    // same layout as the default grid; too small to hold it is an error
    pub fn with_size(size: i32) -> Result<Self> {
        if size < MIN_GRID_SIZE {
            return Err(GridError::UnsupportedGridSize { size, min: MIN_GRID_SIZE });
        }
        Ok(Self::build(size))
    }

    fn build(size: i32) -> Self {
        let mut cells = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                let pos = (x, y);
                let kind = if pos == GOAL {
                    CellKind::Goal
                } else if WALLS.contains(&pos) {
                    CellKind::Wall
                } else if pos == PIT {
                    CellKind::Pit
                } else {
                    CellKind::Empty
                };
                cells.push(Cell { pos, kind, q_values: [0.0; NUM_ACTIONS] });
            }
        }

        let grid = Self { size, cells };
        debug_assert_eq!(grid.kind_at(START), Some(CellKind::Empty));
        grid
    }

    pub fn size(&self) -> i32 {self.size}
    pub fn cells(&self) -> &[Cell] {&self.cells}

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size as usize)
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.0 >= 0 && pos.0 < self.size && pos.1 >= 0 && pos.1 < self.size
    }

    fn offset(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.1 * self.size + pos.0) as usize)
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        let i = self.offset(pos)?;
        self.cells.get(i)
    }

    pub fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        let i = self.offset(pos)?;
        self.cells.get_mut(i)
    }

    pub fn kind_at(&self, pos: Pos) -> Option<CellKind> {
        self.cell(pos).map(|c| c.kind)
    }

    pub fn q_values(&self, pos: Pos) -> [f32; NUM_ACTIONS] {
        self[pos].q_values
    }

    fn check_wall_collision(&self, pos: Pos) -> bool {
        !matches!(self.kind_at(pos), Some(kind) if kind != CellKind::Wall)
    }

    // returns (next position, bumped into a wall or the border)
    pub fn resolve_move(&self, pos: Pos, action: Action) -> (Pos, bool) {
        let (dx, dy) = action.delta();
        let target = (pos.0 + dx, pos.1 + dy);

        if self.check_wall_collision(target) {
            (pos, true)
        } else {
            (target, false)
        }
    }

    // first best action per cell; None for walls and terminal cells
    pub fn greedy_policy(&self) -> Vec<Option<Action>> {
        self.cells
            .iter()
            .map(|cell| {
                if cell.kind != CellKind::Empty {
                    return None;
                }
                let max_q = cell.max_q();
                Action::ALL.into_iter().find(|a| cell.q_values[a.index()] == max_q)
            })
            .collect()
    }

    pub fn policy_map(&self) -> String {
        let policy = self.greedy_policy();
        let mut out = String::new();

        for (row, cells) in policy.chunks(self.size as usize).zip(self.rows()) {
            let line: Vec<&str> = row
                .iter()
                .zip(cells)
                .map(|(action, cell)| match cell.kind {
                    CellKind::Wall => "#",
                    CellKind::Goal => "G",
                    CellKind::Pit => "X",
                    CellKind::Empty => action.map(Action::label).unwrap_or("·"),
                })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }

        out
    }
}

// panics on positions outside the grid, like slice indexing
impl Index<Pos> for Grid {
    type Output = Cell;

    fn index(&self, pos: Pos) -> &Cell {
        match self.offset(pos) {
            Some(i) => &self.cells[i],
            None => panic!("position {:?} is outside the {}x{} grid", pos, self.size, self.size),
        }
    }
}

impl IndexMut<Pos> for Grid {
    fn index_mut(&mut self, pos: Pos) -> &mut Cell {
        match self.offset(pos) {
            Some(i) => &mut self.cells[i],
            None => panic!("position {:?} is outside the {}x{} grid", pos, self.size, self.size),
        }
    }
}
