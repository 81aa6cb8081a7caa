/// Row-major grid of `height` rows with `width` cells each.
pub struct Array2d<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Array2d<T>
where
    T: Clone,
{
    pub fn new(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width {
            return None;
        }
        self.data.get(x + self.width * y)
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.width {
            return None;
        }
        self.data.get_mut(x + self.width * y)
    }

    pub fn row(&self, y: usize) -> &[T] {
        &self.data[self.width * y..self.width * (y + 1)]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_do_not_overlap() {
        let mut grid = Array2d::new(3, 2, 0);
        *grid.get_mut(2, 0).unwrap() = 5;
        *grid.get_mut(0, 1).unwrap() = 7;

        assert_eq!(6, grid.len());
        assert_eq!(&[0, 0, 5], grid.row(0));
        assert_eq!(&[7, 0, 0], grid.row(1));
        assert_eq!(None, grid.get(3, 0));
        assert_eq!(None, grid.get(0, 2));
    }
}
