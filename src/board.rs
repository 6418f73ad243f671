// Board state:
// - Flat 64-cell array, row-major, row 0 at the top of the printed grid
// - Material counts carried next to the cells and updated by every mutation
// - Origin/destination of the move that produced the state, plus a ply counter
// - Text format: 8 rows of `.`, `r`, `R`, `b`, `B`

use crate::error::{CheckersError, CheckersResult};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const BOARD_DIM: i32 = 8;
pub const CELLS: usize = 64;

// =====================
// Sides and Pieces
// =====================
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Side {
    Red,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }
    pub fn to_char(self) -> char {
        match self {
            Side::Red => 'r',
            Side::Black => 'b',
        }
    }
    /// Row on which a man of this side is crowned.
    pub fn promotion_row(self) -> i32 {
        match self {
            Side::Red => 0,
            Side::Black => BOARD_DIM - 1,
        }
    }
    pub fn man(self) -> Piece {
        match self {
            Side::Red => Piece::RedMan,
            Side::Black => Piece::BlackMan,
        }
    }
    pub fn king(self) -> Piece {
        match self {
            Side::Red => Piece::RedKing,
            Side::Black => Piece::BlackKing,
        }
    }
    /// Black is the maximizing side; scores are from black's point of view.
    pub fn is_maximizer(self) -> bool {
        self == Side::Black
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => write!(f, "red"),
            Side::Black => write!(f, "black"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Side::Red),
            "b" | "black" => Ok(Side::Black),
            other => Err(format!("unknown side {:?} (expected r or b)", other)),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Piece {
    Empty,
    RedMan,
    RedKing,
    BlackMan,
    BlackKing,
}

impl Piece {
    pub fn from_char(c: char) -> Option<Piece> {
        match c {
            '.' => Some(Piece::Empty),
            'r' => Some(Piece::RedMan),
            'R' => Some(Piece::RedKing),
            'b' => Some(Piece::BlackMan),
            'B' => Some(Piece::BlackKing),
            _ => None,
        }
    }
    pub fn to_char(self) -> char {
        match self {
            Piece::Empty => '.',
            Piece::RedMan => 'r',
            Piece::RedKing => 'R',
            Piece::BlackMan => 'b',
            Piece::BlackKing => 'B',
        }
    }
    pub fn side(self) -> Option<Side> {
        match self {
            Piece::RedMan | Piece::RedKing => Some(Side::Red),
            Piece::BlackMan | Piece::BlackKing => Some(Side::Black),
            Piece::Empty => None,
        }
    }
    pub fn is_empty(self) -> bool {
        self == Piece::Empty
    }
    pub fn is_king(self) -> bool {
        matches!(self, Piece::RedKing | Piece::BlackKing)
    }
    pub fn belongs_to(self, side: Side) -> bool {
        self.side() == Some(side)
    }
    /// King version of this piece; kings and empty cells are returned unchanged.
    pub fn crowned(self) -> Piece {
        match self {
            Piece::RedMan => Piece::RedKing,
            Piece::BlackMan => Piece::BlackKing,
            other => other,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

// =====================
// Coordinates
// =====================
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Coord {
        Coord { row, col }
    }
    pub fn is_on_board(self) -> bool {
        (0..BOARD_DIM).contains(&self.row) && (0..BOARD_DIM).contains(&self.col)
    }
    pub fn offset(self, (dr, dc): (i32, i32)) -> Coord {
        Coord::new(self.row + dr, self.col + dc)
    }
    /// Reject off-board coordinates at the boundary.
    pub fn checked(self) -> CheckersResult<Coord> {
        if self.is_on_board() {
            Ok(self)
        } else {
            Err(CheckersError::InvalidCoord {
                row: self.row,
                col: self.col,
            })
        }
    }
    // caller guarantees the coordinate is on the board
    fn index(self) -> usize {
        (self.row * BOARD_DIM + self.col) as usize
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Parses `row,col`.
impl FromStr for Coord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (r, c) = s
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .split_once(',')
            .ok_or_else(|| format!("expected row,col but got {:?}", s))?;
        let row = r.trim().parse::<i32>().map_err(|e| e.to_string())?;
        let col = c.trim().parse::<i32>().map_err(|e| e.to_string())?;
        Ok(Coord::new(row, col))
    }
}

// =====================
// Board State
// =====================
#[derive(Clone, Debug)]
pub struct Board {
    cells: [Piece; CELLS],
    red_men: u32,
    red_kings: u32,
    black_men: u32,
    black_kings: u32,
    origin: Option<Coord>,
    dest: Option<Coord>,
    ply: u32,
}

const INITIAL_LAYOUT: [&str; 8] = [
    ".b.b.b.b",
    "b.b.b.b.",
    ".b.b.b.b",
    "........",
    "........",
    "r.r.r.r.",
    ".r.r.r.r",
    "r.r.r.r.",
];

impl Board {
    pub fn empty() -> Board {
        Board {
            cells: [Piece::Empty; CELLS],
            red_men: 0,
            red_kings: 0,
            black_men: 0,
            black_kings: 0,
            origin: None,
            dest: None,
            ply: 0,
        }
    }

    /// Standard opening position, 12 men per side, black on top.
    pub fn initial() -> Board {
        let mut b = Board::empty();
        for (r, line) in INITIAL_LAYOUT.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if let Some(p) = Piece::from_char(ch) {
                    if !p.is_empty() {
                        b.put(Coord::new(r as i32, c as i32), p);
                    }
                }
            }
        }
        b
    }

    /// Build a board from a grid and the four piece counts, rejecting counts
    /// that disagree with the grid.
    pub fn new(
        grid: [[Piece; 8]; 8],
        red_men: u32,
        red_kings: u32,
        black_men: u32,
        black_kings: u32,
    ) -> CheckersResult<Board> {
        let board = Board::from_grid(grid)?;
        let given = [red_men, red_kings, black_men, black_kings];
        let actual = board.counts();
        if given != actual {
            return Err(CheckersError::CountMismatch { given, actual });
        }
        Ok(board)
    }

    /// Build a board from a grid, deriving the counts.
    pub fn from_grid(grid: [[Piece; 8]; 8]) -> CheckersResult<Board> {
        let mut b = Board::empty();
        for (r, row) in grid.iter().enumerate() {
            for (c, &p) in row.iter().enumerate() {
                let at = Coord::new(r as i32, c as i32);
                if let Some(side) = p.side() {
                    if !p.is_king() && at.row == side.promotion_row() {
                        return Err(CheckersError::UnpromotedMan { at });
                    }
                    b.put(at, p);
                }
            }
        }
        Ok(b)
    }

    /// Parse the 8-line text format. Blank lines and trailing whitespace are ignored.
    pub fn from_text(text: &str) -> CheckersResult<Board> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end())
            .filter(|l| !l.is_empty())
            .collect();
        if lines.len() != BOARD_DIM as usize {
            return Err(CheckersError::BadRowCount { rows: lines.len() });
        }
        let mut grid = [[Piece::Empty; 8]; 8];
        for (r, line) in lines.iter().enumerate() {
            let len = line.chars().count();
            if len != BOARD_DIM as usize {
                return Err(CheckersError::BadRowLength { row: r, len });
            }
            for (c, ch) in line.chars().enumerate() {
                grid[r][c] = Piece::from_char(ch).ok_or(CheckersError::UnknownSymbol {
                    symbol: ch,
                    row: r,
                    col: c,
                })?;
            }
        }
        Board::from_grid(grid)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> CheckersResult<Board> {
        let text = std::fs::read_to_string(path)?;
        Board::from_text(&text)
    }

    pub fn contains(c: Coord) -> bool {
        c.is_on_board()
    }

    /// Piece at `c`, or `None` when `c` is off the board.
    pub fn piece_at(&self, c: Coord) -> Option<Piece> {
        if c.is_on_board() {
            Some(self.cells[c.index()])
        } else {
            None
        }
    }

    pub fn is_empty_at(&self, c: Coord) -> bool {
        self.piece_at(c) == Some(Piece::Empty)
    }

    /// Red men, red kings, black men, black kings.
    pub fn counts(&self) -> [u32; 4] {
        [self.red_men, self.red_kings, self.black_men, self.black_kings]
    }
    pub fn red_men(&self) -> u32 {
        self.red_men
    }
    pub fn red_kings(&self) -> u32 {
        self.red_kings
    }
    pub fn black_men(&self) -> u32 {
        self.black_men
    }
    pub fn black_kings(&self) -> u32 {
        self.black_kings
    }
    pub fn men(&self, side: Side) -> u32 {
        match side {
            Side::Red => self.red_men,
            Side::Black => self.black_men,
        }
    }
    pub fn kings(&self, side: Side) -> u32 {
        match side {
            Side::Red => self.red_kings,
            Side::Black => self.black_kings,
        }
    }
    pub fn total(&self, side: Side) -> u32 {
        self.men(side) + self.kings(side)
    }
    pub fn total_pieces(&self) -> u32 {
        self.total(Side::Red) + self.total(Side::Black)
    }

    pub fn origin(&self) -> Option<Coord> {
        self.origin
    }
    pub fn dest(&self) -> Option<Coord> {
        self.dest
    }
    pub fn ply(&self) -> u32 {
        self.ply
    }

    /// Whose turn it is on a standalone snapshot; red moves first.
    pub fn side_to_move(&self) -> Side {
        if self.ply % 2 == 0 { Side::Red } else { Side::Black }
    }

    /// Occupied squares belonging to `side`, in row-major order.
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, &p)| {
            if p.belongs_to(side) {
                Some((Coord::new(i as i32 / BOARD_DIM, i as i32 % BOARD_DIM), p))
            } else {
                None
            }
        })
    }

    /// Flattened cells plus the piece total of each side.
    pub fn canonical_key(&self) -> String {
        let mut s: String = self.cells.iter().map(|p| p.to_char()).collect();
        s.push('|');
        s.push_str(&self.total(Side::Red).to_string());
        s.push('|');
        s.push_str(&self.total(Side::Black).to_string());
        s
    }

    pub fn cells(&self) -> &[Piece; CELLS] {
        &self.cells
    }

    pub fn render_with_coords(&self) -> String {
        let mut out = String::from("    ");
        for c in 0..BOARD_DIM {
            out.push_str(&format!("{} ", c));
        }
        out.push_str("\n    ");
        for _ in 0..BOARD_DIM {
            out.push_str("_ ");
        }
        out.push('\n');
        for r in 0..BOARD_DIM {
            out.push_str(&format!("{} | ", r));
            for c in 0..BOARD_DIM {
                out.push(self.cells[Coord::new(r, c).index()].to_char());
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }

    // ---------------------
    // Mutation primitives used by move generation on freshly cloned boards
    // ---------------------

    /// Empty `at` and return what was there, keeping the counts in step.
    pub(crate) fn take(&mut self, at: Coord) -> Piece {
        let p = self.cells[at.index()];
        self.cells[at.index()] = Piece::Empty;
        match p {
            Piece::RedMan => self.red_men -= 1,
            Piece::RedKing => self.red_kings -= 1,
            Piece::BlackMan => self.black_men -= 1,
            Piece::BlackKing => self.black_kings -= 1,
            Piece::Empty => {}
        }
        p
    }

    /// Place `p` on an empty square, keeping the counts in step.
    pub(crate) fn put(&mut self, at: Coord, p: Piece) {
        debug_assert!(self.cells[at.index()].is_empty());
        self.cells[at.index()] = p;
        match p {
            Piece::RedMan => self.red_men += 1,
            Piece::RedKing => self.red_kings += 1,
            Piece::BlackMan => self.black_men += 1,
            Piece::BlackKing => self.black_kings += 1,
            Piece::Empty => {}
        }
    }

    pub(crate) fn set_move(&mut self, origin: Coord, dest: Coord, ply: u32) {
        self.origin = Some(origin);
        self.dest = Some(dest);
        self.ply = ply;
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

/// Equality is board content only; counts follow from the cells.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..BOARD_DIM {
            for c in 0..BOARD_DIM {
                write!(f, "{}", self.cells[Coord::new(r, c).index()].to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = CheckersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_text(s)
    }
}
