use std::fmt;

/// Misuse of the field or game API. None of these are recoverable: they mean
/// the caller broke a precondition, and the operation left the state untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// Coordinates outside `0..size`.
    OutOfBounds { col: usize, row: usize, size: usize },
    /// A tile was added onto a cell that already holds one.
    Occupied { col: usize, row: usize },
    /// A tile was moved onto a cell holding a tile of another value.
    ValueMismatch {
        col: usize,
        row: usize,
        expected: u32,
        found: u32,
    },
    /// The tile passed to a move is not the one stored at its coordinates.
    NotOnBoard { col: usize, row: usize },
    /// Tile values are powers of two from 2 to `MAX_TILE_VALUE`.
    InvalidValue(u32),
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfBounds { col, row, size } => {
                write!(f, "cell ({col}, {row}) is outside a {size}x{size} field")
            }
            Error::Occupied { col, row } => write!(f, "cell ({col}, {row}) is already occupied"),
            Error::ValueMismatch {
                col,
                row,
                expected,
                found,
            } => write!(
                f,
                "cannot move a {expected} onto cell ({col}, {row}) holding a {found}"
            ),
            Error::NotOnBoard { col, row } => {
                write!(f, "tile at ({col}, {row}) is not on the field")
            }
            Error::InvalidValue(v) => write!(f, "expected values 2,4,8,16..., got {}", v),
            Error::InvalidConfig(msg) => write!(f, "invalid game config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
