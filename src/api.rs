//! Request-level operations over the engine: list a side's moves, apply a
//! chosen move, and ask the engine for its move. A web or terminal front end
//! only needs these three calls plus `Board` parsing/rendering.

use crate::board::{Board, Coord, Piece, Side};
use crate::error::{CheckersError, CheckersResult};
use crate::eval::winner;
use crate::movegen::generate_successors;
use crate::search::SearchEngine;
use std::collections::BTreeMap;
use tracing::info;

/// Origin square -> destinations reachable from it, in generation order.
pub type MoveMap = BTreeMap<Coord, Vec<Coord>>;

/// A move chosen by the engine. A capture chain is reported by its first and
/// last squares only.
#[derive(Clone, Debug)]
pub struct AiMove {
    pub from: Coord,
    pub to: Coord,
    pub board: Board,
    pub score: i32,
}

/// Every legal move for `side` under the forced-capture rule.
pub fn list_moves(board: &Board, side: Side) -> MoveMap {
    let mut moves = MoveMap::new();
    for succ in generate_successors(board, side) {
        if let (Some(from), Some(to)) = (succ.origin(), succ.dest()) {
            moves.entry(from).or_default().push(to);
        }
    }
    moves
}

/// Play `piece` from `from` to `to`, returning the resulting board.
///
/// The move must be one of the side's legal successors; with a capture
/// available anywhere, only captures qualify.
pub fn apply_move(board: &Board, from: Coord, to: Coord, piece: Piece) -> CheckersResult<Board> {
    let from = from.checked()?;
    let to = to.checked()?;
    let found = board.piece_at(from).unwrap_or(Piece::Empty);
    let Some(side) = piece.side() else {
        return Err(CheckersError::PieceMismatch {
            at: from,
            expected: piece,
            found,
        });
    };
    if found != piece {
        return Err(CheckersError::PieceMismatch {
            at: from,
            expected: piece,
            found,
        });
    }
    generate_successors(board, side)
        .into_iter()
        .find(|s| s.origin() == Some(from) && s.dest() == Some(to))
        .ok_or(CheckersError::IllegalMove { from, to })
}

/// Let the engine choose a move for `side`.
///
/// Fails with `GameOver` when one side has no pieces, with `NoLegalMoves`
/// when `side` is blocked and with `ZeroHorizon` when the engine cannot look
/// a single ply ahead.
pub fn ai_move(engine: &mut SearchEngine, board: &Board, side: Side) -> CheckersResult<AiMove> {
    if let Some(w) = winner(board) {
        return Err(CheckersError::GameOver { winner: w });
    }
    if generate_successors(board, side).is_empty() {
        return Err(CheckersError::NoLegalMoves { side });
    }
    if engine.config().horizon == 0 {
        return Err(CheckersError::ZeroHorizon);
    }
    let result = engine.select_move(board, side)?;
    let Some(best) = result.best else {
        return Err(CheckersError::NoLegalMoves { side });
    };
    let (Some(from), Some(to)) = (best.origin(), best.dest()) else {
        return Err(CheckersError::NoLegalMoves { side });
    };
    info!(
        %side,
        %from,
        %to,
        score = result.score,
        nodes = result.stats.nodes,
        "engine move"
    );
    Ok(AiMove {
        from,
        to,
        board: best,
        score: result.score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchConfig;

    fn board(rows: [&str; 8]) -> Board {
        Board::from_text(&rows.join("\n")).unwrap()
    }

    #[test]
    fn opening_move_map() {
        let moves = list_moves(&Board::initial(), Side::Red);
        assert_eq!(moves.len(), 4);
        assert_eq!(moves[&Coord::new(5, 0)], vec![Coord::new(4, 1)]);
        assert_eq!(
            moves[&Coord::new(5, 2)],
            vec![Coord::new(4, 1), Coord::new(4, 3)]
        );
        assert_eq!(moves.values().map(Vec::len).sum::<usize>(), 7);
    }

    #[test]
    fn move_map_only_lists_captures_when_forced() {
        let b = board([
            "........",
            "..b.....",
            "........",
            "....b...",
            ".....r..",
            "........",
            "........",
            "........",
        ]);
        let moves = list_moves(&b, Side::Black);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[&Coord::new(3, 4)], vec![Coord::new(5, 6)]);
    }

    #[test]
    fn apply_legal_and_illegal_moves() {
        let b = Board::initial();
        let next = apply_move(&b, Coord::new(5, 2), Coord::new(4, 3), Piece::RedMan).unwrap();
        assert_eq!(next.piece_at(Coord::new(4, 3)), Some(Piece::RedMan));
        assert_eq!(next.piece_at(Coord::new(5, 2)), Some(Piece::Empty));
        assert_eq!(next.side_to_move(), Side::Black);

        assert!(matches!(
            apply_move(&b, Coord::new(5, 2), Coord::new(3, 4), Piece::RedMan),
            Err(CheckersError::IllegalMove { .. })
        ));
        assert!(matches!(
            apply_move(&b, Coord::new(5, 2), Coord::new(4, 3), Piece::BlackMan),
            Err(CheckersError::PieceMismatch { .. })
        ));
        assert!(matches!(
            apply_move(&b, Coord::new(5, 2), Coord::new(4, 8), Piece::RedMan),
            Err(CheckersError::InvalidCoord { row: 4, col: 8 })
        ));
    }

    #[test]
    fn apply_rejects_simple_move_when_capture_is_forced() {
        let b = board([
            "........",
            "..b.....",
            "........",
            "....b...",
            ".....r..",
            "........",
            "........",
            "........",
        ]);
        assert!(matches!(
            apply_move(&b, Coord::new(1, 2), Coord::new(2, 3), Piece::BlackMan),
            Err(CheckersError::IllegalMove { .. })
        ));
        let next = apply_move(&b, Coord::new(3, 4), Coord::new(5, 6), Piece::BlackMan).unwrap();
        assert_eq!(next.total(Side::Red), 0);
    }

    #[test]
    fn ai_reports_chain_endpoints() {
        let b = board([
            "........",
            ".b......",
            "..r.r...",
            "........",
            "..R.r...",
            "........",
            "........",
            "........",
        ]);
        let mut engine = SearchEngine::new(SearchConfig::default().with_horizon(4));
        let mv = ai_move(&mut engine, &b, Side::Black).unwrap();
        assert_eq!(mv.from, Coord::new(1, 1));
        assert!(mv.to == Coord::new(5, 1) || mv.to == Coord::new(5, 5));
        assert_eq!(mv.board.total(Side::Red), 2);
    }

    #[test]
    fn ai_errors_when_no_move_exists() {
        let mut engine = SearchEngine::new(SearchConfig::default().with_horizon(4));
        let won = board([
            "........",
            "........",
            "...b....",
            "........",
            "........",
            "........",
            "........",
            "........",
        ]);
        assert!(matches!(
            ai_move(&mut engine, &won, Side::Red),
            Err(CheckersError::GameOver { winner: Side::Black })
        ));
        let stuck = board([
            "........",
            "........",
            "........",
            "........",
            "........",
            "b.......",
            ".r......",
            "..r.....",
        ]);
        assert!(matches!(
            ai_move(&mut engine, &stuck, Side::Black),
            Err(CheckersError::NoLegalMoves { side: Side::Black })
        ));
    }

    #[test]
    fn zero_horizon_is_not_reported_as_blocked() {
        let mut engine = SearchEngine::new(SearchConfig::default().with_horizon(0));
        let b = Board::initial();
        assert_eq!(list_moves(&b, Side::Black).values().map(Vec::len).sum::<usize>(), 7);
        assert!(matches!(
            ai_move(&mut engine, &b, Side::Black),
            Err(CheckersError::ZeroHorizon)
        ));

        let mut engine = SearchEngine::new(SearchConfig::default().with_horizon(1));
        let mv = ai_move(&mut engine, &b, Side::Black).unwrap();
        assert_eq!(mv.from.row, 2);
        assert_eq!(mv.to.row, 3);
    }
}
