//! Fall planner - where does every fragment come to rest?
//!
//! All fragments of one collapse pass fall together, one row per step. The
//! planner replays that lockstep descent against a scratch copy of the board:
//! a fragment stops when its next position is blocked by the board or by a
//! fragment that already stopped, and a stopped fragment becomes part of the
//! floor for everyone still moving. The result is one drop distance per
//! fragment, which the animation tasks then replay independently.

use crate::board::Board;
use crate::piece::Fragment;

/// Number of rows each fragment falls before it rests, in input order.
pub fn plan_falls(board: &Board, fragments: &[Fragment]) -> Vec<usize> {
    let mut floor = board.clone();
    let mut current: Vec<Fragment> = fragments.to_vec();
    let mut resting = vec![false; fragments.len()];
    let mut drops = vec![0usize; fragments.len()];

    loop {
        // Settle to a fixed point: a fragment stopping can block the one above it.
        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..current.len() {
                if resting[i] {
                    continue;
                }
                let candidate = current[i].shifted(0, 1);
                if !floor.is_within_board_and_free(&candidate) {
                    resting[i] = true;
                    floor.merge(&current[i]);
                    changed = true;
                }
            }
        }

        if resting.iter().all(|&r| r) {
            return drops;
        }

        for i in 0..current.len() {
            if !resting[i] {
                current[i] = current[i].shifted(0, 1);
                drops[i] += 1;
            }
        }
    }
}

/// Position of `fragment` after falling `rows` rows
pub fn landed(fragment: &Fragment, rows: usize) -> Fragment {
    fragment.shifted(0, rows as i32)
}
