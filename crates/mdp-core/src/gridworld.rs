//! Stochastic gridworld environment
//!
//! Cells on a rectangular grid with walls, a start cell and a terminal goal.
//! Moves slip to either perpendicular direction with probability `slip`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::model::{MdpModel, Transition};

/// Grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Movement action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// The two directions a slip can deflect this move into
    pub fn perpendicular(self) -> [Move; 2] {
        match self {
            Move::Up | Move::Down => [Move::Left, Move::Right],
            Move::Left | Move::Right => [Move::Up, Move::Down],
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Move::Up => '^',
            Move::Down => 'v',
            Move::Left => '<',
            Move::Right => '>',
        }
    }
}

/// Gridworld layout and dynamics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    /// Probability of slipping to each perpendicular direction
    pub slip: f64,
    pub step_reward: f64,
    pub goal_reward: f64,
    pub start: Cell,
    pub goal: Cell,
    pub walls: Vec<Cell>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            slip: 0.1,
            step_reward: -1.0,
            goal_reward: 0.0,
            start: Cell::new(0, 0),
            goal: Cell::new(4, 4),
            walls: vec![
                Cell::new(1, 1),
                Cell::new(1, 3),
                Cell::new(3, 1),
                Cell::new(3, 2),
            ],
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PlanError::Config("grid must have at least one cell".into()));
        }
        if !(0.0..=0.5).contains(&self.slip) {
            return Err(PlanError::Config(format!(
                "slip must be within [0, 0.5], got {}",
                self.slip
            )));
        }
        let inside = |c: &Cell| c.row < self.height && c.col < self.width;
        for (name, cell) in [("start", &self.start), ("goal", &self.goal)] {
            if !inside(cell) {
                return Err(PlanError::Config(format!("{name} {cell} is outside the grid")));
            }
            if self.walls.contains(cell) {
                return Err(PlanError::Config(format!("{name} {cell} is a wall")));
            }
        }
        if self.start == self.goal {
            return Err(PlanError::Config("start and goal must differ".into()));
        }
        Ok(())
    }
}

/// Gridworld MDP built from a validated [`GridConfig`]
#[derive(Debug, Clone)]
pub struct Gridworld {
    config: GridConfig,
    walls: HashSet<Cell>,
}

impl Gridworld {
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        let walls = config.walls.iter().copied().collect();
        Ok(Self { config, walls })
    }

    pub fn goal(&self) -> Cell {
        self.config.goal
    }

    pub fn is_wall(&self, cell: &Cell) -> bool {
        self.walls.contains(cell)
    }

    /// Cell reached by moving from `cell`; blocked moves stay put
    pub fn step(&self, cell: Cell, direction: Move) -> Cell {
        let next = match direction {
            Move::Up if cell.row > 0 => Cell::new(cell.row - 1, cell.col),
            Move::Down if cell.row + 1 < self.config.height => Cell::new(cell.row + 1, cell.col),
            Move::Left if cell.col > 0 => Cell::new(cell.row, cell.col - 1),
            Move::Right if cell.col + 1 < self.config.width => Cell::new(cell.row, cell.col + 1),
            _ => return cell,
        };
        if self.is_wall(&next) {
            cell
        } else {
            next
        }
    }

    /// Text picture of the grid, one line per row.
    /// Walls are `#`, the goal `G`, every other cell is drawn by `f`.
    pub fn render<F>(&self, mut f: F) -> String
    where
        F: FnMut(Cell) -> char,
    {
        let mut out = String::with_capacity((self.config.width + 1) * self.config.height);
        for row in 0..self.config.height {
            for col in 0..self.config.width {
                let cell = Cell::new(row, col);
                let c = if self.is_wall(&cell) {
                    '#'
                } else if cell == self.config.goal {
                    'G'
                } else {
                    f(cell)
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }

    fn reward_for(&self, next: Cell) -> f64 {
        if next == self.config.goal {
            self.config.goal_reward
        } else {
            self.config.step_reward
        }
    }
}

impl MdpModel for Gridworld {
    type State = Cell;
    type Action = Move;

    fn actions(&self, state: &Cell) -> Vec<Move> {
        if self.is_terminal(state) {
            Vec::new()
        } else {
            Move::ALL.to_vec()
        }
    }

    fn transitions(&self, state: &Cell, action: &Move) -> Vec<Transition<Cell>> {
        if self.is_terminal(state) {
            return Vec::new();
        }

        let slip = self.config.slip;
        let outcomes = std::iter::once((*action, 1.0 - 2.0 * slip))
            .chain(action.perpendicular().into_iter().map(|m| (m, slip)));

        outcomes
            .filter(|&(_, p)| p > 0.0)
            .map(|(direction, p)| {
                let next = self.step(*state, direction);
                Transition::new(p, self.reward_for(next), next)
            })
            .collect()
    }

    fn is_terminal(&self, state: &Cell) -> bool {
        *state == self.config.goal
    }

    fn initial_state(&self) -> Cell {
        self.config.start
    }
}
