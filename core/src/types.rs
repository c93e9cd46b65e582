use ndarray::Array2;

/// Single axis used for board rows, columns and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Board position as `(row, col)`.
pub type Pos = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Pos {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Shape of an `Array2` as `(rows, cols)`.
pub fn grid_size<T>(grid: &Array2<T>) -> Pos {
    let (rows, cols) = grid.dim();
    (
        rows.try_into().unwrap_or(Coord::MAX),
        cols.try_into().unwrap_or(Coord::MAX),
    )
}

pub trait NeighborsExt {
    fn neighbors(&self, pos: Pos) -> Neighbors;
}

impl<T> NeighborsExt for Array2<T> {
    fn neighbors(&self, pos: Pos) -> Neighbors {
        Neighbors::new(pos, grid_size(self))
    }
}

const OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Moves `pos` by `offset`, yielding a position only if it stays on the board.
fn step(pos: Pos, offset: (i8, i8), bounds: Pos) -> Option<Pos> {
    let row = pos.0.checked_add_signed(offset.0)?;
    let col = pos.1.checked_add_signed(offset.1)?;
    (row < bounds.0 && col < bounds.1).then_some((row, col))
}

/// The up-to-8 in-bounds neighbours of a position. Edges do not wrap.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Pos,
    bounds: Pos,
    next: usize,
}

impl Neighbors {
    pub fn new(center: Pos, bounds: Pos) -> Self {
        Self {
            center,
            bounds,
            next: 0,
        }
    }
}

impl Iterator for Neighbors {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&offset) = OFFSETS.get(self.next) {
            self.next += 1;
            if let Some(pos) = step(self.center, offset, self.bounds) {
                return Some(pos);
            }
        }
        None
    }
}
