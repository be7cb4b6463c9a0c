use crate::components::{Cell, Dir, GhostId, Marker, Pos};

pub const DEFAULT_GRID_W: usize = 15;
pub const DEFAULT_GRID_H: usize = 10;

const PILLAR_STRIDE_X: usize = 4;
const PILLAR_STRIDE_Y: usize = 3;

/// The playfield: visible cell contents plus the dot layer underneath.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
    dots: Vec<Vec<bool>>,
}

impl Grid {
    /// Builds the fixed pillar maze: a walled border plus a wall wherever
    /// `x % 4 == 0 && y % 3 == 0`. Every other cell starts with a dot.
    pub fn generate(width: usize, height: usize) -> Self {
        let mut cells = vec![vec![Cell::Wall; width]; height];
        let mut dots = vec![vec![false; width]; height];
        for y in 0..height {
            for x in 0..width {
                if !is_wall_at(x, y, width, height) {
                    cells[y][x] = Cell::Collectible;
                    dots[y][x] = true;
                }
            }
        }
        Self {
            width,
            height,
            cells,
            dots,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Out-of-bounds positions read as walls.
    pub fn cell(&self, pos: Pos) -> Cell {
        if !self.in_bounds(pos) {
            return Cell::Wall;
        }
        self.cells[pos.y][pos.x]
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.cells[pos.y][pos.x] != Cell::Wall
    }

    pub fn has_collectible(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.dots[pos.y][pos.x]
    }

    pub fn ghost_at(&self, pos: Pos) -> Option<GhostId> {
        match self.cell(pos) {
            Cell::Ghost(id) => Some(id),
            _ => None,
        }
    }

    pub fn neighbor(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x.checked_add_signed(dx)?;
        let ny = pos.y.checked_add_signed(dy)?;
        let next = Pos::new(nx, ny);
        self.in_bounds(next).then_some(next)
    }

    /// Draws a marker over the cell. The dot layer is left alone.
    pub fn place_marker(&mut self, marker: Marker, pos: Pos) {
        if self.in_bounds(pos) {
            self.cells[pos.y][pos.x] = marker.into();
        }
    }

    /// Restores whatever the dot layer says lies under the marker.
    pub fn clear_marker(&mut self, pos: Pos) {
        if !self.in_bounds(pos) || self.cells[pos.y][pos.x] == Cell::Wall {
            return;
        }
        self.cells[pos.y][pos.x] = if self.dots[pos.y][pos.x] {
            Cell::Collectible
        } else {
            Cell::Empty
        };
    }

    /// Eats the dot at `pos`. Returns false when there was nothing to eat.
    pub fn consume_if_collectible(&mut self, pos: Pos) -> bool {
        if !self.has_collectible(pos) {
            return false;
        }
        self.dots[pos.y][pos.x] = false;
        true
    }

    /// Drops the dot under a start position without touching the visible
    /// cell.
    pub fn remove_collectible(&mut self, pos: Pos) {
        if self.in_bounds(pos) {
            self.dots[pos.y][pos.x] = false;
        }
    }

    pub fn collectible_count(&self) -> usize {
        self.dots.iter().flatten().filter(|&&dot| dot).count()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }
}

fn is_wall_at(x: usize, y: usize, width: usize, height: usize) -> bool {
    x == 0
        || y == 0
        || x + 1 == width
        || y + 1 == height
        || (x % PILLAR_STRIDE_X == 0 && y % PILLAR_STRIDE_Y == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_grid_has_ninety_eight_dots() {
        let grid = Grid::generate(DEFAULT_GRID_W, DEFAULT_GRID_H);
        assert_eq!(grid.collectible_count(), 98);
    }

    #[test]
    fn pillars_sit_on_the_stride() {
        let grid = Grid::generate(DEFAULT_GRID_W, DEFAULT_GRID_H);
        assert_eq!(grid.cell(Pos::new(4, 3)), Cell::Wall);
        assert_eq!(grid.cell(Pos::new(12, 6)), Cell::Wall);
        assert_eq!(grid.cell(Pos::new(4, 4)), Cell::Collectible);
        assert_eq!(grid.cell(Pos::new(5, 3)), Cell::Collectible);
    }

    #[test]
    fn consume_is_idempotent() {
        let mut grid = Grid::generate(DEFAULT_GRID_W, DEFAULT_GRID_H);
        let pos = Pos::new(2, 2);
        assert!(grid.consume_if_collectible(pos));
        assert!(!grid.consume_if_collectible(pos));
        assert_eq!(grid.collectible_count(), 97);
    }

    #[test]
    fn consume_on_wall_is_a_no_op() {
        let mut grid = Grid::generate(DEFAULT_GRID_W, DEFAULT_GRID_H);
        assert!(!grid.consume_if_collectible(Pos::new(0, 0)));
        assert!(!grid.consume_if_collectible(Pos::new(40, 40)));
    }

    #[test]
    fn clear_marker_restores_the_dot_layer() {
        let mut grid = Grid::generate(DEFAULT_GRID_W, DEFAULT_GRID_H);
        let fed = Pos::new(3, 2);
        let eaten = Pos::new(3, 1);

        grid.place_marker(Marker::Ghost(GhostId(1)), fed);
        assert_eq!(grid.cell(fed), Cell::Ghost(GhostId(1)));
        assert!(grid.has_collectible(fed));
        grid.clear_marker(fed);
        assert_eq!(grid.cell(fed), Cell::Collectible);

        assert!(grid.consume_if_collectible(eaten));
        grid.place_marker(Marker::Player, eaten);
        grid.clear_marker(eaten);
        assert_eq!(grid.cell(eaten), Cell::Empty);
    }

    #[test]
    fn neighbor_stops_at_the_edge() {
        let grid = Grid::generate(DEFAULT_GRID_W, DEFAULT_GRID_H);
        assert_eq!(grid.neighbor(Pos::new(0, 0), Dir::Left), None);
        assert_eq!(grid.neighbor(Pos::new(0, 0), Dir::Up), None);
        assert_eq!(
            grid.neighbor(Pos::new(14, 9), Dir::Right),
            None,
            "x == width must be out of bounds"
        );
        assert_eq!(
            grid.neighbor(Pos::new(1, 1), Dir::Down),
            Some(Pos::new(1, 2))
        );
    }

    proptest! {
        #[test]
        fn generation_follows_the_pillar_rule(width in 3usize..40, height in 3usize..30) {
            let grid = Grid::generate(width, height);
            for y in 0..height {
                for x in 0..width {
                    let pos = Pos::new(x, y);
                    let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                    let pillar = x % 4 == 0 && y % 3 == 0;
                    prop_assert_eq!(grid.cell(pos) == Cell::Wall, border || pillar);
                    prop_assert_eq!(grid.has_collectible(pos), !(border || pillar));
                    prop_assert_eq!(grid.is_walkable(pos), !(border || pillar));
                }
            }
        }
    }
}
