use std::collections::HashSet;

use super::action::Direction;
use super::config::GameConfig;

/// A lattice position on the game grid, in cell units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn manhattan(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// What a candidate head position would run into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Free,
    Wall,
    SelfCollision,
    Food,
}

impl CellKind {
    pub fn is_collision(&self) -> bool {
        matches!(self, CellKind::Wall | CellKind::SelfCollision)
    }
}

/// Fixed-size board. The playable area spans `0..width` x `0..height`;
/// walls form the ring one cell outside it.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cell_size: i32,
    origin: (i32, i32),
    walls: HashSet<Position>,
}

impl Grid {
    pub fn new(width: usize, height: usize, cell_size: i32, origin: (i32, i32)) -> Self {
        let (w, h) = (width as i32, height as i32);
        let mut walls = HashSet::with_capacity(2 * (width + height) + 4);
        for x in -1..=w {
            walls.insert(Position::new(x, -1));
            walls.insert(Position::new(x, h));
        }
        for y in -1..=h {
            walls.insert(Position::new(-1, y));
            walls.insert(Position::new(w, y));
        }

        Self {
            width,
            height,
            cell_size,
            origin,
            walls,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.grid_width,
            config.grid_height,
            config.cell_size,
            config.origin,
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn center(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Check if a position is within the playable area
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.walls.contains(&pos)
    }

    /// True for cells on the outermost playable row or column
    pub fn is_near_wall(&self, pos: Position) -> bool {
        pos.x <= 0
            || pos.y <= 0
            || pos.x >= self.width as i32 - 1
            || pos.y >= self.height as i32 - 1
    }

    /// Cells between `pos` and the closest wall along each axis
    pub fn wall_distance(&self, pos: Position) -> (i32, i32) {
        let dx = pos.x.min(self.width as i32 - 1 - pos.x);
        let dy = pos.y.min(self.height as i32 - 1 - pos.y);
        (dx.max(0), dy.max(0))
    }

    /// Classify a candidate head position before the move is committed
    pub fn classify(&self, pos: Position, body: &[Position], food: Position) -> CellKind {
        if self.is_wall(pos) {
            CellKind::Wall
        } else if body.contains(&pos) {
            CellKind::SelfCollision
        } else if pos == food {
            CellKind::Food
        } else {
            CellKind::Free
        }
    }

    /// Every playable cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    /// Top-left pixel of a cell, for display consumers
    pub fn to_pixels(&self, pos: Position) -> (i32, i32) {
        (
            self.origin.0 + pos.x * self.cell_size,
            self.origin.1 + pos.y * self.cell_size,
        )
    }
}

/// The snake's body and heading
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// A single-segment snake
    pub fn new(head: Position, direction: Direction) -> Self {
        Self {
            body: vec![head],
            direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Check if position overlaps any segment, head included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Push a new head; drop the tail unless growing
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
        assert_eq!(pos.manhattan(Position::new(2, 9)), 7);
    }

    #[test]
    fn test_wall_ring() {
        let grid = Grid::new(4, 3, 20, (0, 0));
        // (4 + 2) * 2 + 3 * 2 ring cells
        assert_eq!(grid.walls.len(), 18);
        assert!(grid.is_wall(Position::new(-1, -1)));
        assert!(grid.is_wall(Position::new(4, 1)));
        assert!(grid.is_wall(Position::new(2, 3)));
        assert!(!grid.is_wall(Position::new(0, 0)));
        assert!(!grid.is_wall(Position::new(3, 2)));
        assert!(grid.walls.iter().all(|p| !grid.is_in_bounds(*p)));
    }

    #[test]
    fn test_classify() {
        let grid = Grid::new(10, 10, 20, (0, 0));
        let body = vec![Position::new(5, 5), Position::new(4, 5)];
        let food = Position::new(6, 5);

        assert_eq!(grid.classify(Position::new(-1, 5), &body, food), CellKind::Wall);
        assert_eq!(
            grid.classify(Position::new(4, 5), &body, food),
            CellKind::SelfCollision
        );
        assert_eq!(grid.classify(food, &body, food), CellKind::Food);
        assert_eq!(grid.classify(Position::new(5, 6), &body, food), CellKind::Free);
        assert!(CellKind::Wall.is_collision());
        assert!(!CellKind::Food.is_collision());
    }

    #[test]
    fn test_near_wall_and_distance() {
        let grid = Grid::new(10, 8, 20, (0, 0));
        assert!(grid.is_near_wall(Position::new(0, 4)));
        assert!(grid.is_near_wall(Position::new(5, 7)));
        assert!(!grid.is_near_wall(Position::new(5, 4)));
        assert_eq!(grid.wall_distance(Position::new(2, 6)), (2, 1));
    }

    #[test]
    fn test_pixel_mapping() {
        let grid = Grid::new(28, 28, 20, (20, 70));
        assert_eq!(grid.to_pixels(Position::new(0, 0)), (20, 70));
        assert_eq!(grid.to_pixels(Position::new(3, 2)), (80, 110));
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right);
        assert_eq!(snake.len(), 1);

        snake.advance(Position::new(6, 5), false);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Position::new(6, 5));

        snake.advance(Position::new(7, 5), true);
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.body, vec![Position::new(7, 5), Position::new(6, 5)]);
        assert!(snake.occupies(Position::new(6, 5)));
    }

    #[test]
    fn test_cells_cover_board() {
        let grid = Grid::new(3, 2, 20, (0, 0));
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Position::new(0, 0));
        assert_eq!(cells[5], Position::new(2, 1));
    }
}
