//! Fragment splitting and fall planning across whole boards

use std::collections::HashSet;

use tui_cascade::core::{landed, plan_falls, split_fragments, Board, Fragment};
use tui_cascade::types::{Rgb, BOARD_WIDTH};

const GRAY: Rgb = Rgb::new(128, 128, 128);

fn ragged_board() -> Board {
    Board::from_bottom_rows(
        &[
            "..##......",
            "#..#..##..",
            "##.#...#.#",
            "##########",
            "#.#.#.#.#.",
            "##########",
            "###..#####",
        ],
        GRAY,
    )
}

fn clear_full_rows(board: &mut Board) -> Vec<usize> {
    let rows = board.full_rows();
    for &y in &rows {
        board.clear_row(y);
    }
    rows.to_vec()
}

fn cells_of(fragments: &[Fragment]) -> Vec<(i32, i32)> {
    fragments
        .iter()
        .flat_map(|f| f.occupied_cells().map(|(x, y, _)| (x, y)))
        .collect()
}

#[test]
fn test_fragments_are_disjoint_and_conserve_mass() {
    let mut board = ragged_board();
    let rows = clear_full_rows(&mut board);
    assert_eq!(rows, vec![16, 18]);
    let after_clear = board.occupied_count();

    let fragments = split_fragments(&mut board, &rows);
    let cells = cells_of(&fragments);
    let unique: HashSet<_> = cells.iter().copied().collect();

    assert_eq!(unique.len(), cells.len(), "a cell belongs to two fragments");
    assert_eq!(cells.len() + board.occupied_count(), after_clear);
    // Everything above the bottom-most cleared row was lifted.
    assert!(cells.iter().all(|&(_, y)| y < 18));
    assert!((0..18).all(|y| (0..BOARD_WIDTH as i32).all(|x| !board.is_occupied(x, y))));
    // Row 19 stays on the board.
    assert_eq!(board.occupied_count(), 8);
}

#[test]
fn test_fragments_are_connected_groups() {
    let mut board = Board::from_bottom_rows(&["##..#", "#...#", "##########"], GRAY);
    let rows = clear_full_rows(&mut board);
    let fragments = split_fragments(&mut board, &rows);

    let mut sizes: Vec<usize> = fragments.iter().map(|f| f.occupied_count()).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![2, 3]);
}

#[test]
fn test_landed_fragments_rest_and_do_not_overlap() {
    let mut board = ragged_board();
    let rows = clear_full_rows(&mut board);
    let fragments = split_fragments(&mut board, &rows);

    let drops = plan_falls(&board, &fragments);
    assert_eq!(drops.len(), fragments.len());

    let mut settled = board.clone();
    let resting: Vec<Fragment> = fragments
        .iter()
        .zip(&drops)
        .map(|(f, &rows)| landed(f, rows))
        .collect();
    for fragment in &resting {
        assert!(
            settled.is_within_board_and_free(fragment),
            "fragment at ({}, {}) overlaps",
            fragment.origin_x,
            fragment.origin_y
        );
        settled.merge(fragment);
    }

    // None of them could fall any further once all are merged.
    for fragment in &resting {
        let mut without = settled.clone();
        for (x, y, _) in fragment.occupied_cells() {
            without.take(x, y);
        }
        assert!(!without.is_within_board_and_free(&fragment.shifted(0, 1)));
    }
    assert_eq!(
        settled.occupied_count(),
        board.occupied_count() + cells_of(&fragments).len()
    );
}

#[test]
fn test_fragment_stops_on_fragment_below() {
    // Two stacked fragments separated by a gap; the lower lands first.
    let mut board = Board::from_bottom_rows(&["#.........", "..........", "#.........", "##########"], GRAY);
    let rows = clear_full_rows(&mut board);
    let fragments = split_fragments(&mut board, &rows);
    assert_eq!(fragments.len(), 2);

    let drops = plan_falls(&board, &fragments);
    let rest: Vec<i32> = fragments
        .iter()
        .zip(&drops)
        .map(|(f, &d)| landed(f, d).origin_y)
        .collect();
    // Scan order: the lower cell first.
    assert_eq!(rest, vec![19, 18]);
}
