use std::ops::Index;

use crate::data::Pos;

/// A rectangular grid stored as a flat `Vec`, indexed by `Pos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Vec2d<T> {
    data: Vec<T>,
    rows: u16,
    cols: u16,
}

impl<T: Copy> Vec2d<T> {
    /// Builds a grid from possibly ragged rows, padding short rows with `pad`.
    pub(crate) fn new(grid: &[Vec<T>], pad: T) -> Self {
        assert!(!grid.is_empty());

        let max_cols = grid.iter().map(Vec::len).max().unwrap_or(0);
        assert!(max_cols > 0);

        let mut data = Vec::with_capacity(grid.len() * max_cols);
        for row in grid {
            data.extend_from_slice(row);
            for _ in row.len()..max_cols {
                data.push(pad);
            }
        }
        Vec2d {
            data,
            rows: grid.len() as u16,
            cols: max_cols as u16,
        }
    }
}

impl<T> Vec2d<T> {
    pub(crate) fn rows(&self) -> u16 {
        self.rows
    }

    pub(crate) fn cols(&self) -> u16 {
        self.cols
    }

    pub(crate) fn get(&self, pos: Pos) -> Option<&T> {
        if pos.r < 0 || pos.c < 0 || pos.r >= i32::from(self.rows) || pos.c >= i32::from(self.cols)
        {
            None
        } else {
            Some(&self.data[pos.r as usize * usize::from(self.cols) + pos.c as usize])
        }
    }
}

impl<T> Index<Pos> for Vec2d<T> {
    type Output = T;

    fn index(&self, index: Pos) -> &Self::Output {
        match self.get(index) {
            Some(cell) => cell,
            None => panic!("position {} out of bounds", index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_are_padded() {
        let grid = Vec2d::new(&[vec![1, 2, 3], vec![4]], 0);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid[Pos::new(0, 2)], 3);
        assert_eq!(grid[Pos::new(1, 0)], 4);
        assert_eq!(grid[Pos::new(1, 1)], 0);
        assert_eq!(grid[Pos::new(1, 2)], 0);
    }

    #[test]
    fn out_of_bounds_get() {
        let grid = Vec2d::new(&[vec![true]], false);
        assert_eq!(grid.get(Pos::new(0, 0)), Some(&true));
        assert_eq!(grid.get(Pos::new(-1, 0)), None);
        assert_eq!(grid.get(Pos::new(0, 1)), None);
        assert_eq!(grid.get(Pos::new(1, 0)), None);
    }
}
