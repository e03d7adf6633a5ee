//! Property and scenario tests for tiles, the grid and the solver.

use std::collections::HashSet;
use std::io::Write;

use edge_puzzle::{
    find_solution, find_solutions, Board, Direction, Grid, Holder, PuzzleConfig, PuzzleError, Side,
    SolverConfig, Tile, TileId, TilePool, CELLS, COLS, ROWS,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn side_strategy() -> impl Strategy<Value = Side> {
    prop::sample::select(Side::ALL.to_vec())
}

fn tile_strategy() -> impl Strategy<Value = Tile> {
    prop::array::uniform4(side_strategy()).prop_map(|sides| Tile::new(TileId(0), 0, sides))
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

/// Standard tiles in random rotations, some of them laid out on the grid.
fn partial_layout() -> impl Strategy<Value = (Vec<usize>, Vec<u8>, Vec<bool>)> {
    (
        Just((0..CELLS).collect::<Vec<usize>>()).prop_shuffle(),
        prop::collection::vec(0u8..4, CELLS),
        prop::collection::vec(any::<bool>(), CELLS),
    )
}

fn build_layout(order: &[usize], turns: &[u8], occupied: &[bool]) -> (Grid, Holder) {
    let mut holder = Holder::from_config(&PuzzleConfig::standard()).unwrap();
    for (index, &turn) in turns.iter().enumerate() {
        holder.tile_mut(TileId(index)).unwrap().rotate_to(turn);
    }

    let mut grid = Grid::new();
    for cell in 0..CELLS {
        if occupied[cell] {
            let id = TileId(order[cell]);
            grid.place(id, (cell / COLS) as i32, (cell % COLS) as i32)
                .unwrap();
            holder.take(id);
        }
    }
    (grid, holder)
}

/// Fit check written directly from the rule: every occupied neighbour must match.
fn reference_fits(grid: &Grid, holder: &Holder, tile: &Tile, row: i32, col: i32) -> bool {
    if !(0..ROWS as i32).contains(&row) || !(0..COLS as i32).contains(&col) {
        return false;
    }
    if grid.tile_at(row, col).is_some() {
        return false;
    }
    let neighbours = [
        (row - 1, col, Direction::North),
        (row + 1, col, Direction::South),
        (row, col - 1, Direction::West),
        (row, col + 1, Direction::East),
    ];
    neighbours.iter().all(|&(r, c, direction)| match grid.tile_at(r, c) {
        None => true,
        Some(id) => {
            let neighbour = holder.tile(id).unwrap();
            tile.side(direction)
                .compatible(neighbour.side(direction.opposite()))
        }
    })
}

proptest! {
    #[test]
    fn compatibility_is_symmetric_and_exact(a in side_strategy(), b in side_strategy()) {
        prop_assert_eq!(a.compatible(b), b.compatible(a));
        prop_assert_eq!(
            a.compatible(b),
            a.suit() == b.suit() && a.polarity() != b.polarity()
        );
    }

    #[test]
    fn four_turns_restore_the_tile(tile in tile_strategy()) {
        let original = tile.sides();

        let mut clockwise = tile.clone();
        let mut counter = tile;
        for _ in 0..4 {
            clockwise.rotate_clockwise();
            counter.rotate_counter_clockwise();
        }

        prop_assert_eq!(clockwise.sides(), original);
        prop_assert_eq!(clockwise.orientation(), 0);
        prop_assert_eq!(counter.sides(), original);
        prop_assert_eq!(counter.orientation(), 0);
    }

    #[test]
    fn clockwise_turn_shifts_edges(tile in tile_strategy(), direction in direction_strategy()) {
        let before = tile.clone();
        let mut after = tile;
        after.rotate_clockwise();

        prop_assert_eq!(after.side(direction), before.side(direction.counter_clockwise()));
    }

    #[test]
    fn orientation_tracks_turn_count(tile in tile_strategy(), turns in 0usize..12) {
        let original = tile.clone();
        let mut turned = tile;
        for _ in 0..turns {
            turned.rotate_clockwise();
        }

        prop_assert_eq!(usize::from(turned.orientation()), turns % 4);
        prop_assert_eq!(turned.sides(), original.rotated_sides((turns % 4) as u8));
    }

    #[test]
    fn off_board_never_fits(row in -5i32..8, col in -5i32..8) {
        prop_assume!(!(0..3).contains(&row) || !(0..3).contains(&col));
        let holder = Holder::from_config(&PuzzleConfig::standard()).unwrap();
        let grid = Grid::new();
        let tile = holder.tile(TileId(0)).unwrap();

        prop_assert!(!grid.fits(&holder, tile, row, col));
    }

    #[test]
    fn fits_checks_every_occupied_neighbour(
        (order, turns, occupied) in partial_layout(),
        row in 0i32..3,
        col in 0i32..3
    ) {
        let (grid, holder) = build_layout(&order, &turns, &occupied);

        for &id in holder.held() {
            let tile = holder.tile(id).unwrap();
            prop_assert_eq!(
                grid.fits(&holder, tile, row, col),
                reference_fits(&grid, &holder, tile, row, col)
            );
        }
    }

    #[test]
    fn remove_then_place_restores_solved_state(
        (order, turns, occupied) in partial_layout(),
        cell in 0usize..CELLS
    ) {
        let (mut grid, holder) = build_layout(&order, &turns, &occupied);
        let (row, col) = ((cell / COLS) as i32, (cell % COLS) as i32);
        let before = grid.is_solved(&holder);

        if let Some(id) = grid.remove(row, col) {
            prop_assert!(grid.place(id, row, col).unwrap());
            prop_assert_eq!(grid.tile_at(row, col), Some(id));
        }
        prop_assert_eq!(grid.is_solved(&holder), before);
    }

    #[test]
    fn solve_works_from_any_scramble(seed in any::<u64>()) {
        let mut board = Board::standard().unwrap();
        board.pool_mut().scramble(&mut ChaCha8Rng::seed_from_u64(seed));

        board.solve().unwrap();

        prop_assert!(board.is_solved());
        let ids: HashSet<TileId> = board.grid().occupied().map(|(_, _, id)| id).collect();
        prop_assert_eq!(ids.len(), CELLS);
        prop_assert!(ids.iter().all(|id| id.0 < CELLS));
        prop_assert!(board.pool().held().is_empty());
    }

    #[test]
    fn commit_is_idempotent_under_later_turns(
        seed in any::<u64>(),
        pick in 0usize..4,
        turns in prop::collection::vec(0u8..4, CELLS)
    ) {
        let mut board = Board::standard().unwrap();
        board.pool_mut().scramble(&mut ChaCha8Rng::seed_from_u64(seed));
        let result = find_solutions(board.pool(), &SolverConfig::default()).unwrap();
        let solution = &result.solutions[pick % result.solutions.len()];

        board.commit(solution).unwrap();
        prop_assert!(board.is_solved());

        for (index, &turn) in turns.iter().enumerate() {
            for _ in 0..turn {
                board.rotate_clockwise(TileId(index)).unwrap();
            }
        }
        board.commit(solution).unwrap();

        prop_assert!(board.is_solved());
        prop_assert!(board.pool().held().is_empty());
        for (row, col, placement) in solution.iter() {
            let tile = board.tile_at(row as i32, col as i32).unwrap();
            prop_assert_eq!(tile.id(), placement.tile);
            prop_assert_eq!(tile.orientation(), placement.orientation);
        }
    }
}

fn tile(id: usize, sides: [Side; 4]) -> Tile {
    Tile::new(TileId(id), id, sides)
}

#[test]
fn seam_only_accepts_matching_tile() {
    // A shows club_out to the east; only B shows club_in to the west.
    let holder = Holder::new(vec![
        tile(0, [Side::HeartIn, Side::ClubOut, Side::HeartIn, Side::HeartIn]),
        tile(1, [Side::SpadeIn, Side::SpadeIn, Side::SpadeIn, Side::ClubIn]),
        tile(2, [Side::ClubIn, Side::ClubIn, Side::ClubIn, Side::ClubOut]),
        tile(3, [Side::DiamondOut, Side::ClubIn, Side::DiamondOut, Side::DiamondIn]),
    ]);
    let mut grid = Grid::new();

    assert!(grid.fits(&holder, holder.tile(TileId(0)).unwrap(), 0, 0));
    grid.place(TileId(0), 0, 0).unwrap();

    assert!(grid.fits(&holder, holder.tile(TileId(1)).unwrap(), 0, 1));
    assert!(!grid.fits(&holder, holder.tile(TileId(2)).unwrap(), 0, 1));
    assert!(!grid.fits(&holder, holder.tile(TileId(3)).unwrap(), 0, 1));
}

#[test]
fn rotation_makes_centre_tile_fit() {
    let mut holder = Holder::new(vec![
        tile(0, [Side::HeartIn, Side::HeartIn, Side::SpadeOut, Side::HeartIn]),
        tile(1, [Side::HeartIn, Side::DiamondOut, Side::ClubIn, Side::SpadeIn]),
    ]);
    let mut grid = Grid::new();
    grid.place(TileId(0), 0, 1).unwrap();
    holder.take(TileId(0));

    assert!(!grid.fits(&holder, holder.tile(TileId(1)).unwrap(), 1, 1));

    holder.tile_mut(TileId(1)).unwrap().rotate_clockwise();
    let turned = holder.tile(TileId(1)).unwrap();
    assert_eq!(turned.side(Direction::North), Side::SpadeIn);
    assert!(grid.fits(&holder, turned, 1, 1));
}

#[test]
fn solved_state_reflects_every_seam() {
    let mut board = Board::standard().unwrap();
    board.solve().unwrap();
    assert!(board.is_solved());

    // Turning the centre tile breaks its seams even though nothing moved.
    let centre = board.tile_at(1, 1).unwrap().id();
    board.rotate_clockwise(centre).unwrap();
    assert!(!board.is_solved());

    board.rotate_counter_clockwise(centre).unwrap();
    assert!(board.is_solved());
}

#[test]
fn reset_empties_board_and_refills_holder() {
    let mut board = Board::standard().unwrap();
    board.solve().unwrap();

    let returned = board.reset();

    assert_eq!(returned.len(), CELLS);
    for row in 0..ROWS as i32 {
        for col in 0..COLS as i32 {
            assert!(board.tile_at(row, col).is_none());
        }
    }
    assert!(board.pool().is_full());
    assert!(!board.is_solved());
}

#[test]
fn solving_twice_is_deterministic() {
    let mut first = Board::standard().unwrap();
    let mut second = Board::standard().unwrap();
    first.pool_mut().scramble(&mut ChaCha8Rng::seed_from_u64(99));
    second.pool_mut().scramble(&mut ChaCha8Rng::seed_from_u64(99));

    first.solve().unwrap();
    second.solve().unwrap();

    assert_eq!(first.grid(), second.grid());
}

#[test]
fn unsolvable_tile_set_reports_failure() {
    let config = PuzzleConfig {
        id: "mismatched".to_string(),
        title: String::new(),
        tiles: vec![
            edge_puzzle::TileSpec::new(Side::HeartIn, Side::HeartIn, Side::HeartIn, Side::HeartIn);
            CELLS
        ],
    };
    let mut board = Board::from_config(&config).unwrap();
    board.place(TileId(3), 2, 2).unwrap();

    let err = board.solve().unwrap_err();

    assert!(matches!(err, PuzzleError::Unsolvable { .. }));
    assert_eq!(board.grid().tile_at(2, 2), Some(TileId(3)));
    assert_eq!(board.grid().occupied().count(), 1);
}

#[test]
fn tile_set_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let json = serde_json::to_string(&PuzzleConfig::standard()).unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let config = PuzzleConfig::from_path(file.path()).unwrap();
    assert_eq!(config.id, "standard");

    let holder = Holder::from_config(&config).unwrap();
    assert!(find_solution(&holder).unwrap().is_solved());
}

#[test]
fn missing_tile_set_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    assert!(matches!(
        PuzzleConfig::from_path(&path),
        Err(PuzzleError::ReadTileSet { .. })
    ));
}
