// Move generation:
// - Men step and capture along their two forward diagonals, kings along all four
// - Captures continue as a chain until no further capture exists; every complete
//   chain is its own successor
// - A man is crowned the moment it lands on the far row, and a chain ends there
// - Forced capture is applied once over the whole side: if any successor captures,
//   only capturing successors are returned

use crate::board::{Board, Coord, Piece, Side};
use crate::error::CheckersResult;

const RED_FORWARD: [(i32, i32); 2] = [(-1, -1), (-1, 1)];
const BLACK_FORWARD: [(i32, i32); 2] = [(1, -1), (1, 1)];
const KING_DIRS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Diagonal directions a piece may move and capture in.
pub fn directions(piece: Piece) -> &'static [(i32, i32)] {
    match piece {
        Piece::RedMan => &RED_FORWARD,
        Piece::BlackMan => &BLACK_FORWARD,
        Piece::RedKing | Piece::BlackKing => &KING_DIRS,
        Piece::Empty => &[],
    }
}

/// Every board reachable by one complete move of `side`.
pub fn generate_successors(board: &Board, side: Side) -> Vec<Board> {
    let mut successors = Vec::new();
    for (at, _) in board.pieces_of(side) {
        successors.extend(moves_from(board, at));
    }
    filter_captures(board, side, successors)
}

/// Moves of the single piece on `from`, ignoring what the rest of the side could do.
/// An empty square yields no moves.
pub fn piece_moves(board: &Board, from: Coord) -> CheckersResult<Vec<Board>> {
    let from = from.checked()?;
    Ok(moves_from(board, from))
}

/// Terminal states of every capture chain that `piece`, standing on `at`, can
/// still make. Empty when no further capture exists or `at` does not hold `piece`.
pub fn chain_jumps(board: &Board, at: Coord, piece: Piece) -> Vec<Board> {
    let Some(side) = piece.side() else {
        return Vec::new();
    };
    if board.piece_at(at) != Some(piece) {
        return Vec::new();
    }
    let origin = board.origin().unwrap_or(at);
    let mut chains = Vec::new();
    for &dir in directions(piece) {
        let over = at.offset(dir);
        let landing = over.offset(dir);
        if !can_capture(board, over, landing, side) {
            continue;
        }
        let mut next = board.clone();
        let crowned = capture(&mut next, at, over, landing, piece);
        next.set_move(origin, landing, board.ply());
        extend_chain(next, landing, piece, crowned, &mut chains);
    }
    chains
}

/// True when `child` removed at least one of the opponent's pieces.
pub fn is_capture(parent: &Board, child: &Board, side: Side) -> bool {
    let opp = side.opponent();
    child.total(opp) < parent.total(opp)
}

fn moves_from(board: &Board, from: Coord) -> Vec<Board> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };
    let Some(side) = piece.side() else {
        return Vec::new();
    };
    let ply = board.ply() + 1;
    let mut simple = Vec::new();
    let mut jumps = Vec::new();

    for &dir in directions(piece) {
        let step = from.offset(dir);
        let landing = step.offset(dir);
        if can_capture(board, step, landing, side) {
            let mut next = board.clone();
            let crowned = capture(&mut next, from, step, landing, piece);
            next.set_move(from, landing, ply);
            extend_chain(next, landing, piece, crowned, &mut jumps);
        } else if board.is_empty_at(step) {
            let mut next = board.clone();
            next.take(from);
            next.put(step, promoted(piece, step));
            next.set_move(from, step, ply);
            simple.push(next);
        }
    }

    if jumps.is_empty() { simple } else { jumps }
}

// A freshly crowned king ends the chain where it lands.
fn extend_chain(board: Board, at: Coord, piece: Piece, crowned: bool, out: &mut Vec<Board>) {
    if crowned {
        out.push(board);
        return;
    }
    let further = chain_jumps(&board, at, piece);
    if further.is_empty() {
        out.push(board);
    } else {
        out.extend(further);
    }
}

fn can_capture(board: &Board, over: Coord, landing: Coord, side: Side) -> bool {
    board.is_empty_at(landing)
        && board
            .piece_at(over)
            .is_some_and(|p| p.belongs_to(side.opponent()))
}

// Returns whether the mover was crowned on landing.
fn capture(board: &mut Board, from: Coord, over: Coord, landing: Coord, piece: Piece) -> bool {
    board.take(from);
    board.take(over);
    let placed = promoted(piece, landing);
    board.put(landing, placed);
    placed != piece
}

fn promoted(piece: Piece, at: Coord) -> Piece {
    match piece.side() {
        Some(side) if !piece.is_king() && at.row == side.promotion_row() => piece.crowned(),
        _ => piece,
    }
}

fn filter_captures(board: &Board, side: Side, successors: Vec<Board>) -> Vec<Board> {
    if successors.iter().any(|s| is_capture(board, s, side)) {
        successors
            .into_iter()
            .filter(|s| is_capture(board, s, side))
            .collect()
    } else {
        successors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    fn board(rows: [&str; 8]) -> Board {
        Board::from_text(&rows.join("\n")).unwrap()
    }

    fn recount(b: &Board) -> [u32; 4] {
        let mut counts = [0u32; 4];
        for p in b.cells() {
            match p {
                Piece::RedMan => counts[0] += 1,
                Piece::RedKing => counts[1] += 1,
                Piece::BlackMan => counts[2] += 1,
                Piece::BlackKing => counts[3] += 1,
                Piece::Empty => {}
            }
        }
        counts
    }

    const JUMP_BOARD: [&str; 8] = [
        "........",
        "........",
        "........",
        "....b...",
        ".....r..",
        "........",
        "........",
        "........",
    ];

    const CHAIN_BOARD: [&str; 8] = [
        "........",
        ".b......",
        "..r.r...",
        "........",
        "..R.r...",
        "........",
        "........",
        "........",
    ];

    #[test]
    fn opening_has_seven_red_moves() {
        let b = Board::initial();
        let succ = generate_successors(&b, Side::Red);
        assert_eq!(succ.len(), 7);
        for s in &succ {
            assert!(!is_capture(&b, s, Side::Red));
            assert_eq!(s.origin().map(|c| c.row), Some(5));
            assert_eq!(s.dest().map(|c| c.row), Some(4));
            assert_eq!(s.ply(), 1);
            assert_eq!(s.side_to_move(), Side::Black);
        }
        assert_eq!(generate_successors(&b, Side::Black).len(), 7);
    }

    #[test]
    fn single_man_steps_forward() {
        let mut rows = ["........"; 8];
        rows[2] = "...b....";
        let moves = piece_moves(&board(rows), Coord::new(2, 3)).unwrap();
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].piece_at(Coord::new(3, 2)), Some(Piece::BlackMan));
        assert_eq!(moves[1].piece_at(Coord::new(3, 4)), Some(Piece::BlackMan));
    }

    #[test]
    fn man_captures_over_adjacent_opponent() {
        let b = board(JUMP_BOARD);
        let moves = piece_moves(&b, Coord::new(3, 4)).unwrap();
        assert_eq!(moves.len(), 1);
        let m = &moves[0];
        assert_eq!(m.piece_at(Coord::new(5, 6)), Some(Piece::BlackMan));
        assert_eq!(m.piece_at(Coord::new(4, 5)), Some(Piece::Empty));
        assert_eq!(m.total(Side::Red), b.total(Side::Red) - 1);
        assert_eq!(m.origin(), Some(Coord::new(3, 4)));
        assert_eq!(m.dest(), Some(Coord::new(5, 6)));
    }

    #[test]
    fn king_moves_in_four_directions() {
        let mut rows = ["........"; 8];
        rows[1] = "...R....";
        let moves = piece_moves(&board(rows), Coord::new(1, 3)).unwrap();
        let dests: Vec<Coord> = moves.iter().filter_map(|m| m.dest()).collect();
        assert_eq!(
            dests,
            vec![
                Coord::new(0, 2),
                Coord::new(0, 4),
                Coord::new(2, 2),
                Coord::new(2, 4)
            ]
        );
        assert!(moves.iter().all(|m| m.red_kings() == 1));
    }

    #[test]
    fn men_do_not_capture_backward() {
        let mut rows = ["........"; 8];
        rows[4] = ".....r..";
        rows[5] = "......b.";
        let b = board(rows);
        let moves = piece_moves(&b, Coord::new(5, 6)).unwrap();
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|m| !is_capture(&b, m, Side::Black)));
    }

    #[test]
    fn empty_square_and_off_board_requests() {
        let b = board(JUMP_BOARD);
        assert!(piece_moves(&b, Coord::new(5, 6)).unwrap().is_empty());
        assert!(piece_moves(&b, Coord::new(8, 1)).is_err());
    }

    #[test]
    fn blocked_man_has_no_moves() {
        let b = board([
            "........",
            "........",
            "........",
            "..b.....",
            ".r.r....",
            "b...r...",
            "........",
            "........",
        ]);
        assert!(piece_moves(&b, Coord::new(3, 2)).unwrap().is_empty());
    }

    #[test]
    fn forced_capture_applies_across_pieces() {
        let b = board([
            "........",
            "........",
            "........",
            "..b.....",
            ".r......",
            "........",
            "b.......",
            "........",
        ]);
        let black = generate_successors(&b, Side::Black);
        assert_eq!(black.len(), 1);
        assert_eq!(black[0].origin(), Some(Coord::new(3, 2)));
        assert_eq!(black[0].dest(), Some(Coord::new(5, 0)));

        let red = generate_successors(&b, Side::Red);
        assert_eq!(red.len(), 1);
        assert_eq!(red[0].dest(), Some(Coord::new(2, 3)));
        assert_eq!(red[0].total(Side::Black), 1);
    }

    #[test]
    fn chain_search_branches_from_intermediate_square() {
        // CHAIN_BOARD after the first jump (1,1) -> (3,3)
        let b = board([
            "........",
            "........",
            "....r...",
            "...b....",
            "..R.r...",
            "........",
            "........",
            "........",
        ]);
        let chains = chain_jumps(&b, Coord::new(3, 3), Piece::BlackMan);
        assert_eq!(chains.len(), 2);
        let dests: Vec<Coord> = chains.iter().filter_map(|c| c.dest()).collect();
        assert_eq!(dests, vec![Coord::new(5, 1), Coord::new(5, 5)]);
        for c in &chains {
            assert_eq!(c.black_men(), 1);
            assert_eq!(c.total(Side::Red), b.total(Side::Red) - 1);
            assert_eq!(c.piece_at(Coord::new(3, 3)), Some(Piece::Empty));
            assert_eq!(recount(c), c.counts());
        }
        assert_eq!(chains[0].red_kings(), 0);
        assert_eq!(chains[1].red_kings(), 1);
        assert_ne!(chains[0], chains[1]);
    }

    #[test]
    fn chain_search_needs_the_piece_on_its_square() {
        let b = board(CHAIN_BOARD);
        assert!(chain_jumps(&b, Coord::new(3, 3), Piece::BlackMan).is_empty());
        // right square, wrong piece
        assert!(chain_jumps(&b, Coord::new(1, 1), Piece::BlackKing).is_empty());
        assert_eq!(chain_jumps(&b, Coord::new(1, 1), Piece::BlackMan).len(), 2);
    }

    #[test]
    fn full_chain_reports_first_and_last_square() {
        let b = board(CHAIN_BOARD);
        let succ = generate_successors(&b, Side::Black);
        assert_eq!(succ.len(), 2);
        for s in &succ {
            assert_eq!(s.origin(), Some(Coord::new(1, 1)));
            assert_eq!(s.total(Side::Red), b.total(Side::Red) - 2);
            assert_eq!(s.piece_at(Coord::new(2, 2)), Some(Piece::Empty));
            assert_eq!(s.ply(), 1);
        }
        assert_eq!(succ[0].dest(), Some(Coord::new(5, 1)));
        assert_eq!(succ[1].dest(), Some(Coord::new(5, 5)));
    }

    #[test]
    fn crowning_mid_chain_ends_the_chain() {
        let b = board([
            "........",
            "........",
            "........",
            "b.......",
            ".r......",
            "........",
            "...r.r..",
            "........",
        ]);
        let succ = generate_successors(&b, Side::Black);
        assert_eq!(succ.len(), 1);
        let s = &succ[0];
        assert_eq!(s.dest(), Some(Coord::new(7, 4)));
        assert_eq!(s.piece_at(Coord::new(7, 4)), Some(Piece::BlackKing));
        // a king could jump (6,5) from here, but the chain already stopped
        assert_eq!(s.piece_at(Coord::new(6, 5)), Some(Piece::RedMan));
        assert_eq!(s.total(Side::Red), 1);
        assert_eq!(s.black_men(), 0);
        assert_eq!(s.black_kings(), 1);
    }

    #[test]
    fn step_onto_far_row_crowns() {
        let mut rows = ["........"; 8];
        rows[1] = "..r.....";
        let succ = generate_successors(&board(rows), Side::Red);
        assert_eq!(succ.len(), 2);
        for s in &succ {
            assert_eq!(s.red_men(), 0);
            assert_eq!(s.red_kings(), 1);
            assert_eq!(s.dest().map(|c| c.row), Some(0));
        }
    }

    #[test]
    fn random_playouts_keep_counts_consistent() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..20 {
            let mut b = Board::initial();
            let mut side = Side::Red;
            for _ in 0..120 {
                let succ = generate_successors(&b, side);
                let any_capture = succ.iter().any(|s| is_capture(&b, s, side));
                for s in &succ {
                    assert_eq!(recount(s), s.counts());
                    assert!(s.total_pieces() <= b.total_pieces());
                    assert_eq!(s.total_pieces() < b.total_pieces(), is_capture(&b, s, side));
                    assert_eq!(is_capture(&b, s, side), any_capture);
                    for (at, p) in s.pieces_of(side) {
                        if !p.is_king() {
                            assert_ne!(at.row, side.promotion_row());
                        }
                    }
                }
                match succ.choose(&mut rng) {
                    Some(next) => b = next.clone(),
                    None => break,
                }
                side = side.opponent();
            }
        }
    }
}
