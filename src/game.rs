use rand::Rng;
use tracing::{debug, info};

use crate::components::{Cell, Command, Dir, GhostId, Marker, Pos};
use crate::error::Error;
use crate::ghost::{Ghost, GhostColor, Prediction};
use crate::level::{Grid, DEFAULT_GRID_H, DEFAULT_GRID_W};

pub const DEFAULT_GHOSTS: usize = 4;
pub const PLAYER_START: Pos = Pos::new(1, 1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Won,
    Lost,
    Quit,
}

impl Status {
    pub fn is_over(self) -> bool {
        self != Status::Running
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GhostReport {
    pub id: GhostId,
    pub pos: Pos,
    pub color: GhostColor,
    pub predictions: Vec<Prediction>,
}

/// Read-only view handed to the renderer once per tick.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub cells: Vec<Vec<Cell>>,
    pub player: Pos,
    pub ghosts: Vec<GhostReport>,
    pub dots_left: usize,
    pub status: Status,
}

pub struct Game {
    grid: Grid,
    player: Pos,
    ghosts: Vec<Ghost>,
    dots_left: usize,
    status: Status,
}

impl Game {
    /// Default board: 15x10 pillar maze, player at (1,1), ghosts on their
    /// staggered start cells. Start cells march right, so collection stops
    /// at the first one past the grid edge.
    pub fn new(ghost_count: usize) -> Result<Self, Error> {
        let starts: Vec<Pos> = (0..ghost_count)
            .map(Ghost::start_pos)
            .take_while(|pos| pos.x < DEFAULT_GRID_W && pos.y < DEFAULT_GRID_H)
            .collect();
        let game = Self::with_layout(DEFAULT_GRID_W, DEFAULT_GRID_H, PLAYER_START, &starts)?;
        if starts.len() < ghost_count {
            let idx = starts.len();
            return Err(Error::StartOutsideMaze {
                who: format!("G{}", idx + 1),
                pos: Ghost::start_pos(idx),
            });
        }
        Ok(game)
    }

    /// Ghost `i` in `ghost_starts` gets id `i + 1`. Start cells carry no dot.
    pub fn with_layout(
        width: usize,
        height: usize,
        player: Pos,
        ghost_starts: &[Pos],
    ) -> Result<Self, Error> {
        if width < 3 || height < 3 {
            return Err(Error::GridTooSmall { width, height });
        }
        let mut grid = Grid::generate(width, height);

        let mut taken: Vec<Pos> = Vec::with_capacity(ghost_starts.len() + 1);
        for (who, pos) in std::iter::once(("player".to_string(), player)).chain(
            ghost_starts
                .iter()
                .enumerate()
                .map(|(idx, pos)| (GhostId(idx as u32 + 1).to_string(), *pos)),
        ) {
            if !grid.in_bounds(pos) {
                return Err(Error::StartOutsideMaze { who, pos });
            }
            if !grid.is_walkable(pos) {
                return Err(Error::StartBlocked { who, pos });
            }
            if taken.contains(&pos) {
                return Err(Error::StartOccupied { who, pos });
            }
            taken.push(pos);
        }

        grid.remove_collectible(player);
        grid.place_marker(Marker::Player, player);
        let mut ghosts = Vec::with_capacity(ghost_starts.len());
        for (idx, &pos) in ghost_starts.iter().enumerate() {
            let ghost = Ghost::new(GhostId(idx as u32 + 1), pos);
            grid.remove_collectible(pos);
            grid.place_marker(Marker::Ghost(ghost.id()), pos);
            ghosts.push(ghost);
        }

        let dots_left = grid.collectible_count();
        if dots_left == 0 {
            return Err(Error::NothingToEat { width, height });
        }
        info!(width, height, ghosts = ghosts.len(), dots_left, "game ready");
        Ok(Self {
            grid,
            player,
            ghosts,
            dots_left,
            status: Status::Running,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn dots_left(&self) -> usize {
        self.dots_left
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Runs one turn: player first, then each ghost in id order. A finished
    /// game ignores further commands.
    pub fn tick(&mut self, command: Command, rng: &mut impl Rng) -> Status {
        if self.status.is_over() {
            return self.status;
        }
        match command {
            Command::Quit => {
                info!("player quit");
                self.status = Status::Quit;
                return self.status;
            }
            Command::Move(dir) => self.move_player(dir),
        }
        if self.status.is_over() {
            return self.status;
        }
        if self.dots_left == 0 {
            info!("all dots eaten");
            self.status = Status::Won;
            return self.status;
        }
        self.update_ghosts(rng);
        self.status
    }

    fn move_player(&mut self, dir: Dir) {
        let Some(next) = self
            .grid
            .neighbor(self.player, dir)
            .filter(|&next| self.grid.is_walkable(next))
        else {
            debug!(dir = dir.name(), at = %self.player, "player move blocked");
            return;
        };

        if let Some(id) = self.grid.ghost_at(next) {
            info!(ghost = %id, at = %next, "player ran into a ghost");
            self.status = Status::Lost;
            return;
        }

        if self.grid.consume_if_collectible(next) {
            self.dots_left = self.dots_left.saturating_sub(1);
        }
        self.grid.clear_marker(self.player);
        self.player = next;
        self.grid.place_marker(Marker::Player, next);
    }

    fn update_ghosts(&mut self, rng: &mut impl Rng) {
        for ghost in self.ghosts.iter_mut() {
            ghost.step_random(&mut self.grid, rng);
            if ghost.pos() == self.player {
                info!(ghost = %ghost.id(), at = %self.player, "ghost caught the player");
                self.status = Status::Lost;
                return;
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self.grid.rows().to_vec(),
            player: self.player,
            ghosts: self
                .ghosts
                .iter()
                .map(|ghost| GhostReport {
                    id: ghost.id(),
                    pos: ghost.pos(),
                    color: ghost.color(),
                    predictions: ghost.predict(&self.grid, self.player),
                })
                .collect(),
            dots_left: self.dots_left,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, GHOSTS_VAR};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_board_starts_with_ninety_three_dots() {
        let game = Game::new(DEFAULT_GHOSTS).expect("default layout is valid");
        assert_eq!(game.dots_left(), 93);
        assert_eq!(game.dots_left(), game.grid().collectible_count());
        assert_eq!(game.status(), Status::Running);
    }

    #[test]
    fn markers_are_placed_at_start() {
        let game = Game::new(DEFAULT_GHOSTS).expect("default layout is valid");
        assert_eq!(game.grid().cell(PLAYER_START), Cell::Player);
        for ghost in game.ghosts() {
            assert_eq!(game.grid().cell(ghost.pos()), Cell::Ghost(ghost.id()));
        }
        let ids: Vec<u32> = game.ghosts().iter().map(|g| g.id().0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn six_ghosts_still_fit_and_recycle_colors() {
        let game = Game::new(6).expect("six ghosts fit on the default board");
        assert_eq!(game.dots_left(), 91);
        assert_eq!(game.ghosts()[4].color(), GhostColor::Red);
        assert_eq!(game.ghosts()[5].color(), GhostColor::Green);
    }

    #[test]
    fn seventh_ghost_lands_on_the_border() {
        match Game::new(7) {
            Err(Error::StartBlocked { who, pos }) => {
                assert_eq!(who, "G7");
                assert_eq!(pos, Pos::new(14, 3));
            }
            other => panic!("expected StartBlocked, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn layout_rejects_bad_starts() {
        assert!(matches!(
            Game::with_layout(2, 5, Pos::new(1, 1), &[]),
            Err(Error::GridTooSmall { width: 2, height: 5 })
        ));
        assert!(matches!(
            Game::with_layout(15, 10, Pos::new(20, 1), &[]),
            Err(Error::StartOutsideMaze { .. })
        ));
        assert!(matches!(
            Game::with_layout(15, 10, Pos::new(1, 1), &[Pos::new(1, 1)]),
            Err(Error::StartOccupied { .. })
        ));
    }

    #[test]
    fn quit_ends_without_moving_anyone() {
        let mut game = Game::new(DEFAULT_GHOSTS).expect("default layout is valid");
        let before: Vec<Pos> = game.ghosts().iter().map(|g| g.pos()).collect();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(game.tick(Command::Quit, &mut rng), Status::Quit);
        let after: Vec<Pos> = game.ghosts().iter().map(|g| g.pos()).collect();
        assert_eq!(before, after);
        assert_eq!(game.player(), PLAYER_START);
    }

    #[test]
    fn finished_game_ignores_commands() {
        let mut game = Game::new(DEFAULT_GHOSTS).expect("default layout is valid");
        let mut rng = StdRng::seed_from_u64(1);
        game.tick(Command::Quit, &mut rng);

        assert_eq!(game.tick(Command::Move(Dir::Right), &mut rng), Status::Quit);
        assert_eq!(game.player(), PLAYER_START);
    }

    #[test]
    fn eating_moves_the_player_and_counts_once() {
        let mut game = Game::with_layout(15, 10, Pos::new(1, 1), &[]).expect("valid");
        let mut rng = StdRng::seed_from_u64(1);
        let start = game.dots_left();

        game.tick(Command::Move(Dir::Right), &mut rng);
        assert_eq!(game.player(), Pos::new(2, 1));
        assert_eq!(game.dots_left(), start - 1);
        assert_eq!(game.grid().cell(Pos::new(1, 1)), Cell::Empty);

        game.tick(Command::Move(Dir::Left), &mut rng);
        game.tick(Command::Move(Dir::Right), &mut rng);
        assert_eq!(game.dots_left(), start - 1);
        assert_eq!(game.grid().cell(Pos::new(2, 1)), Cell::Player);
        assert_eq!(game.grid().cell(Pos::new(1, 1)), Cell::Empty);
    }

    #[test]
    fn snapshot_reports_every_ghost() {
        let game = Game::new(DEFAULT_GHOSTS).expect("default layout is valid");
        let snapshot = game.snapshot();
        assert_eq!(snapshot.player, PLAYER_START);
        assert_eq!(snapshot.dots_left, 93);
        assert_eq!(snapshot.ghosts.len(), 4);
        assert_eq!(snapshot.cells.len(), DEFAULT_GRID_H);
        assert_eq!(snapshot.cells[0].len(), DEFAULT_GRID_W);
        for (report, ghost) in snapshot.ghosts.iter().zip(game.ghosts()) {
            assert_eq!(report.id, ghost.id());
            assert_eq!(report.pos, ghost.pos());
            assert_eq!(report.predictions, ghost.predict(game.grid(), game.player()));
            assert!(!report.predictions.is_empty());
        }
    }

    #[test]
    fn huge_ghost_count_is_a_setup_error() {
        let settings = Settings::from_lookup(|name| {
            (name == GHOSTS_VAR).then(|| "1000000000000".to_string())
        })
        .expect("count parses");
        match Game::new(settings.ghosts) {
            Err(Error::StartBlocked { who, .. }) => assert_eq!(who, "G7"),
            other => panic!("expected StartBlocked, got {:?}", other.map(|_| ())),
        }
        assert!(matches!(Game::new(usize::MAX), Err(Error::StartBlocked { .. })));
    }

    #[test]
    fn board_without_dots_is_rejected() {
        // A 3x3 board has a single open cell and the player stands on it.
        assert!(matches!(
            Game::with_layout(3, 3, Pos::new(1, 1), &[]),
            Err(Error::NothingToEat { width: 3, height: 3 })
        ));
    }
}
