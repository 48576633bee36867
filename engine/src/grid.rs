use std::fmt;

use glam::IVec2;

use crate::direction::Direction;

// One grid position. Each cell owns its left and bottom walls; its right
// wall belongs to the right-hand neighbour and its top wall to the
// neighbour above, so no shared wall is stored twice. The top edge of the
// topmost row and the right edge of the rightmost column form a static
// perimeter owned by no cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub visited: bool,
    pub left_wall: bool,
    pub bottom_wall: bool,
}

impl Cell {
    fn intact() -> Self {
        Self {
            visited: false,
            left_wall: true,
            bottom_wall: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    InvalidDimension { width: i32, height: i32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidDimension { width, height } => {
                write!(f, "grid dimensions must be positive, got {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for GridError {}

// A width x height field of cells, (0, 0) at the bottom left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    // All cells unvisited, every internal wall intact.
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimension { width, height });
        }

        let cells = vec![vec![Cell::intact(); width as usize]; height as usize];

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_in_bounds(&self, coord: IVec2) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    pub fn cell(&self, coord: IVec2) -> &Cell {
        self.assert_in_bounds(coord);
        &self.cells[coord.y as usize][coord.x as usize]
    }

    fn cell_mut(&mut self, coord: IVec2) -> &mut Cell {
        self.assert_in_bounds(coord);
        &mut self.cells[coord.y as usize][coord.x as usize]
    }

    pub fn is_visited(&self, coord: IVec2) -> bool {
        self.cell(coord).visited
    }

    // Idempotent.
    pub fn mark_visited(&mut self, coord: IVec2) {
        self.cell_mut(coord).visited = true;
    }

    // Clears the wall on the given side of `coord`. For Up and Right the
    // wall is stored on the neighbouring cell, so the caller must already
    // have checked that the neighbour is in bounds. Idempotent.
    pub fn break_wall(&mut self, coord: IVec2, direction: Direction) {
        match direction {
            Direction::Left => self.cell_mut(coord).left_wall = false,
            Direction::Down => self.cell_mut(coord).bottom_wall = false,
            Direction::Right => self.cell_mut(coord + IVec2::new(1, 0)).left_wall = false,
            Direction::Up => self.cell_mut(coord + IVec2::new(0, 1)).bottom_wall = false,
        }
    }

    // True iff `coord` and its neighbour in `direction` both exist and the
    // wall between them has been carved away.
    pub fn passage_exists(&self, coord: IVec2, direction: Direction) -> bool {
        let neighbour = coord + direction.offset();

        if !self.is_in_bounds(coord) || !self.is_in_bounds(neighbour) {
            return false;
        }

        match direction {
            Direction::Left => !self.cell(coord).left_wall,
            Direction::Down => !self.cell(coord).bottom_wall,
            Direction::Right => !self.cell(neighbour).left_wall,
            Direction::Up => !self.cell(neighbour).bottom_wall,
        }
    }

    fn assert_in_bounds(&self, coord: IVec2) {
        assert!(
            self.is_in_bounds(coord),
            "coordinate ({}, {}) is outside the {}x{} grid",
            coord.x,
            coord.y,
            self.width,
            self.height
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_dimensions() {
        for (width, height) in [(0, 5), (5, 0), (0, 0), (-1, 3), (3, -2)] {
            assert_eq!(
                Grid::new(width, height),
                Err(GridError::InvalidDimension { width, height })
            );
        }
    }

    #[test]
    fn new_grid_is_unvisited_with_all_walls_intact() {
        let grid = Grid::new(3, 2).unwrap();

        for y in 0..2 {
            for x in 0..3 {
                let cell = grid.cell(IVec2::new(x, y));
                assert!(!cell.visited);
                assert!(cell.left_wall);
                assert!(cell.bottom_wall);
            }
        }
    }

    #[test]
    fn bounds_are_strict_on_both_axes() {
        let grid = Grid::new(4, 3).unwrap();

        assert!(grid.is_in_bounds(IVec2::new(0, 0)));
        assert!(grid.is_in_bounds(IVec2::new(3, 2)));
        assert!(!grid.is_in_bounds(IVec2::new(4, 0)));
        assert!(!grid.is_in_bounds(IVec2::new(0, 3)));
        assert!(!grid.is_in_bounds(IVec2::new(-1, 0)));
        assert!(!grid.is_in_bounds(IVec2::new(0, -1)));
    }

    #[test]
    fn marking_visited_is_idempotent() {
        let mut grid = Grid::new(2, 2).unwrap();
        let coord = IVec2::new(1, 1);

        assert!(!grid.is_visited(coord));
        grid.mark_visited(coord);
        grid.mark_visited(coord);
        assert!(grid.is_visited(coord));
        assert!(!grid.is_visited(IVec2::new(0, 0)));
    }

    #[test]
    #[should_panic(expected = "outside the 2x2 grid")]
    fn marking_out_of_bounds_panics() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.mark_visited(IVec2::new(2, 0));
    }

    #[test]
    fn breaking_up_clears_the_upper_neighbours_bottom_wall() {
        let mut grid = Grid::new(2, 2).unwrap();
        let lower = IVec2::new(0, 0);
        let upper = IVec2::new(0, 1);

        grid.break_wall(lower, Direction::Up);

        assert!(!grid.cell(upper).bottom_wall);
        assert!(grid.cell(lower).bottom_wall);
        assert!(grid.passage_exists(lower, Direction::Up));
        assert!(grid.passage_exists(upper, Direction::Down));
    }

    #[test]
    fn breaking_right_clears_the_right_neighbours_left_wall() {
        let mut grid = Grid::new(2, 1).unwrap();
        let left = IVec2::new(0, 0);
        let right = IVec2::new(1, 0);

        grid.break_wall(left, Direction::Right);

        assert!(!grid.cell(right).left_wall);
        assert!(grid.cell(left).left_wall);
        assert!(grid.passage_exists(left, Direction::Right));
        assert!(grid.passage_exists(right, Direction::Left));
    }

    #[test]
    fn breaking_the_same_wall_twice_is_a_no_op() {
        let mut grid = Grid::new(2, 1).unwrap();
        let left = IVec2::new(0, 0);

        grid.break_wall(left, Direction::Right);
        let after_first = grid.clone();
        grid.break_wall(left, Direction::Right);

        assert_eq!(grid, after_first);
    }

    #[test]
    fn no_passage_through_the_perimeter() {
        let grid = Grid::new(2, 2).unwrap();

        assert!(!grid.passage_exists(IVec2::new(0, 0), Direction::Left));
        assert!(!grid.passage_exists(IVec2::new(0, 0), Direction::Down));
        assert!(!grid.passage_exists(IVec2::new(1, 1), Direction::Right));
        assert!(!grid.passage_exists(IVec2::new(1, 1), Direction::Up));
    }
}
