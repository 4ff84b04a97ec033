//! Row collapse - clear complete rows and let what is above them fall
//!
//! One collapse runs in passes until the board has no complete row:
//!
//! 1. complete rows are cleared and erased on the sink
//! 2. everything above the bottom-most cleared row is split into fragments
//! 3. the planner decides how far each fragment falls
//! 4. one task per fragment animates its own drop; all tasks are joined
//! 5. every landed fragment is merged into the board exactly once
//!
//! Fragment tasks own their fragment and never touch the board, so the only
//! shared thing during a pass is the sink.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{info, trace};

use crate::core::{plan_falls, split_fragments, Board, Fragment};
use crate::error::EngineError;
use crate::sink::{draw_piece, erase_piece, RenderSink};

/// Totals for one `RowCollapse` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollapseReport {
    /// Passes that found at least one complete row
    pub passes: usize,
    pub rows_cleared: usize,
    pub fragments: usize,
}

/// Collapse every complete row of `board`, animating fragment falls.
pub async fn collapse(
    board: &mut Board,
    sink: &Arc<dyn RenderSink>,
    step: Duration,
) -> Result<CollapseReport, EngineError> {
    let mut report = CollapseReport::default();

    loop {
        let rows = board.full_rows();
        if rows.is_empty() {
            break;
        }

        report.passes += 1;
        report.rows_cleared += rows.len();

        for &y in &rows {
            board.clear_row(y);
            for x in 0..board.width() {
                sink.erase_cell(x, y);
            }
        }

        let fragments = split_fragments(board, &rows);
        report.fragments += fragments.len();
        info!(
            pass = report.passes,
            rows = ?rows.as_slice(),
            fragments = fragments.len(),
            "collapse pass"
        );

        for fragment in settle(board, fragments, sink, step).await? {
            board.merge(&fragment);
            // A neighbour's erase may have hit these cells mid-flight.
            draw_piece(sink.as_ref(), &fragment);
        }
        sink.refresh();
    }

    Ok(report)
}

/// Let `fragments` fall concurrently; returns them at their resting positions.
///
/// `board` must not contain the fragments. It is only read, to plan the drops.
pub async fn settle(
    board: &Board,
    fragments: Vec<Fragment>,
    sink: &Arc<dyn RenderSink>,
    step: Duration,
) -> Result<Vec<Fragment>, EngineError> {
    let drops = plan_falls(board, &fragments);

    let mut tasks = JoinSet::new();
    for (fragment, rows) in fragments.into_iter().zip(drops) {
        tasks.spawn(fall(fragment, rows, Arc::clone(sink), step));
    }

    let mut settled = Vec::with_capacity(tasks.len());
    while let Some(result) = tasks.join_next().await {
        settled.push(result?);
    }
    Ok(settled)
}

/// Animate one fragment down `rows` rows
async fn fall(mut fragment: Fragment, rows: usize, sink: Arc<dyn RenderSink>, step: Duration) -> Fragment {
    for _ in 0..rows {
        let next = fragment.shifted(0, 1);
        erase_piece(sink.as_ref(), &fragment);
        draw_piece(sink.as_ref(), &next);
        sink.refresh();
        fragment = next;

        if step.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(step).await;
        }
    }

    trace!(x = fragment.origin_x, y = fragment.origin_y, rows, "fragment landed");
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{NullSink, RecordingSink, RenderOp};
    use crate::types::Rgb;

    const GRAY: Rgb = Rgb::new(128, 128, 128);

    fn null_sink() -> Arc<dyn RenderSink> {
        Arc::new(NullSink)
    }

    #[tokio::test]
    async fn nothing_to_collapse() {
        let mut board = Board::from_bottom_rows(&["#########."], GRAY);
        let report = collapse(&mut board, &null_sink(), Duration::ZERO).await.unwrap();

        assert_eq!(report, CollapseReport::default());
        assert_eq!(board.occupied_count(), 9);
    }

    #[tokio::test]
    async fn single_row_clears_and_stub_falls() {
        let mut board = Board::from_bottom_rows(&["#.........", "##########"], GRAY);
        let report = collapse(&mut board, &null_sink(), Duration::ZERO).await.unwrap();

        assert_eq!(
            report,
            CollapseReport {
                passes: 1,
                rows_cleared: 1,
                fragments: 1
            }
        );
        assert_eq!(board.occupied_count(), 1);
        assert!(board.is_occupied(0, 19));
    }

    #[tokio::test]
    async fn falling_fragment_can_complete_a_second_row() {
        // The stub above the cleared row fills the gap in the row below it.
        let mut board = Board::from_bottom_rows(
            &[
                ".........#",
                "##########",
                "#########.",
            ],
            GRAY,
        );
        let report = collapse(&mut board, &null_sink(), Duration::ZERO).await.unwrap();

        assert_eq!(report.passes, 2);
        assert_eq!(report.rows_cleared, 2);
        assert_eq!(board.occupied_count(), 0);
    }

    #[tokio::test]
    async fn settle_returns_every_fragment_landed() {
        let board = Board::new();
        let fragments = vec![
            Fragment::from_rows(&["##", "##"], GRAY, 0, 0),
            Fragment::from_rows(&["#"], GRAY, 7, 10),
        ];

        let mut settled = settle(&board, fragments, &null_sink(), Duration::ZERO)
            .await
            .unwrap();
        settled.sort_by_key(|f| f.origin_x);

        assert_eq!(settled[0].origin_y, 18);
        assert_eq!(settled[1].origin_y, 19);
    }

    #[tokio::test]
    async fn fall_animation_refreshes_per_step() {
        let board = Board::new();
        let recorder = Arc::new(RecordingSink::new());
        let sink: Arc<dyn RenderSink> = recorder.clone();

        let fragment = Fragment::from_rows(&["#"], GRAY, 3, 16);
        settle(&board, vec![fragment], &sink, Duration::ZERO).await.unwrap();

        let ops = recorder.ops();
        assert_eq!(recorder.refresh_count(), 3);
        assert_eq!(
            ops.last(),
            Some(&RenderOp::Refresh),
            "each step ends with a refresh"
        );
        assert!(ops.contains(&RenderOp::Draw { x: 3, y: 19, color: GRAY }));
    }
}
