//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Rules are kept apart from room
//! bookkeeping so they can be checked in isolation.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::check_winner;

use super::{Board, Outcome};
use tracing::instrument;

/// Evaluates a board for a winner or a draw.
///
/// A line of three equal marks wins. Without a winning line, a full board is
/// a draw. Boards where both marks complete a line cannot arise from single
/// moves and are not given a meaning here.
#[instrument(level = "trace")]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some(mark) = check_winner(board) {
        Outcome::Won(mark)
    } else if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}
