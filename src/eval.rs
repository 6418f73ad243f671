// Static evaluation and leaf utility. Scores are from black's point of view:
// positive favours black (the maximizing side), kings count double.

use crate::board::{Board, Side};

/// Magnitude of a decided game before the depth adjustment.
pub const WIN_SCORE: i32 = 1_000_000;

pub fn evaluate(board: &Board) -> i32 {
    let red = board.red_men() + 2 * board.red_kings();
    let black = board.black_men() + 2 * board.black_kings();
    black as i32 - red as i32
}

pub fn is_game_over(board: &Board) -> bool {
    board.total(Side::Red) == 0 || board.total(Side::Black) == 0
}

/// Side whose opponent has run out of pieces.
pub fn winner(board: &Board) -> Option<Side> {
    if board.total(Side::Red) == 0 {
        Some(Side::Black)
    } else if board.total(Side::Black) == 0 {
        Some(Side::Red)
    } else {
        None
    }
}

/// Score of a win for `side` reached `depth` plies below the root.
/// Faster black wins and slower black losses score higher.
pub fn win_for(side: Side, depth: u32) -> i32 {
    match side {
        Side::Black => WIN_SCORE - depth as i32,
        Side::Red => -WIN_SCORE + depth as i32,
    }
}

/// Score when `side` must move but cannot: an immediate loss for that side.
pub fn loss_for(side: Side, depth: u32) -> i32 {
    win_for(side.opponent(), depth)
}

pub fn utility(board: &Board, depth: u32) -> i32 {
    match winner(board) {
        Some(side) => win_for(side, depth),
        None => evaluate(board),
    }
}
