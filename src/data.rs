use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Sub};

/// A cell position in (row, col) form. Signed so that stepping off the grid
/// is representable and can be rejected by a bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub r: i32,
    pub c: i32,
}

impl Pos {
    pub fn new(r: i32, c: i32) -> Pos {
        Pos { r, c }
    }

    /// Manhattan distance.
    pub fn dist(self, other: Pos) -> i32 {
        (self.r - other.r).abs() + (self.c - other.c).abs()
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.r, self.c)
    }
}

/// The four compass directions actions are named by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    N,
    S,
    E,
    W,
}

impl Dir {
    /// (row, col) delta: N=(-1,0), S=(1,0), E=(0,1), W=(0,-1).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::N => (-1, 0),
            Dir::S => (1, 0),
            Dir::E => (0, 1),
            Dir::W => (0, -1),
        }
    }
}

pub const DIRECTIONS: [Dir; 4] = [Dir::N, Dir::S, Dir::E, Dir::W];

impl Add<Dir> for Pos {
    type Output = Pos;

    fn add(self, dir: Dir) -> Pos {
        let (dr, dc) = dir.delta();
        Pos { r: self.r + dr, c: self.c + dc }
    }
}

impl Sub<Dir> for Pos {
    type Output = Pos;

    fn sub(self, dir: Dir) -> Pos {
        let (dr, dc) = dir.delta();
        Pos { r: self.r - dr, c: self.c - dc }
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Dir::N => write!(f, "N"),
            Dir::S => write!(f, "S"),
            Dir::E => write!(f, "E"),
            Dir::W => write!(f, "W"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_arithmetic() {
        let pos = Pos::new(3, 4);
        assert_eq!(pos + Dir::N, Pos::new(2, 4));
        assert_eq!(pos + Dir::S, Pos::new(4, 4));
        assert_eq!(pos + Dir::E, Pos::new(3, 5));
        assert_eq!(pos + Dir::W, Pos::new(3, 3));
        assert_eq!(pos - Dir::N, pos + Dir::S);
        assert_eq!(pos - Dir::E, pos + Dir::W);
    }

    #[test]
    fn manhattan_dist() {
        assert_eq!(Pos::new(0, 0).dist(Pos::new(2, 3)), 5);
        assert_eq!(Pos::new(2, 3).dist(Pos::new(0, 0)), 5);
        assert_eq!(Pos::new(1, 1).dist(Pos::new(1, 1)), 0);
    }
}
