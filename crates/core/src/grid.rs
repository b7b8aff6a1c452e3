//! Row-major grid geometry and double-buffered cell storage.
//!
//! [`DoubleBuffer`] keeps two equally sized buffers and a ping-pong index
//! saying which one is current. A step reads the front buffer, writes the
//! back buffer, then [`DoubleBuffer::swap`] flips the index; no cell is ever
//! copied between the two.

/// Dimensions of a `cols × rows` lattice stored row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridSize {
    pub cols: usize,
    pub rows: usize,
}

impl GridSize {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of `(x, y)`; the caller guarantees it is in range.
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    /// Flat index with toroidal wrapping for any signed coordinate.
    pub fn wrapped_index(&self, x: isize, y: isize) -> usize {
        let xi = x.rem_euclid(self.cols as isize) as usize;
        let yi = y.rem_euclid(self.rows as isize) as usize;
        self.index(xi, yi)
    }

    /// Flat index if `(x, y)` lies inside the grid, `None` otherwise.
    pub fn checked_index(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return None;
        }
        Some(self.index(x as usize, y as usize))
    }
}

/// Offsets `(dx, dy)` of every cell in a disc of the given radius, in
/// row-major order.
pub fn disc_offsets(radius: isize) -> impl Iterator<Item = (isize, isize)> {
    (-radius..=radius).flat_map(move |dy| {
        (-radius..=radius)
            .filter(move |dx| dx * dx + dy * dy <= radius * radius)
            .map(move |dx| (dx, dy))
    })
}

/// Two same-length buffers with a ping-pong "current" index.
#[derive(Debug, Clone, Default)]
pub struct DoubleBuffer<T> {
    buffers: [Vec<T>; 2],
    current: usize,
}

impl<T: Clone> DoubleBuffer<T> {
    /// Both buffers filled with `value`.
    pub fn filled(len: usize, value: T) -> Self {
        Self {
            buffers: [vec![value.clone(); len], vec![value; len]],
            current: 0,
        }
    }

    /// Front buffer from `front`, back buffer filled with `back`.
    pub fn from_front(front: Vec<T>, back: T) -> Self {
        let len = front.len();
        Self {
            buffers: [front, vec![back; len]],
            current: 0,
        }
    }

    /// Sets one cell in both buffers, so cells a step never rewrites (an
    /// inert border, say) stay in sync across swaps.
    pub fn set_both(&mut self, index: usize, value: T) {
        self.buffers[0][index] = value.clone();
        self.buffers[1][index] = value;
    }
}

impl<T> DoubleBuffer<T> {
    pub fn len(&self) -> usize {
        self.buffers[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers[0].is_empty()
    }

    /// The current (readable) buffer.
    pub fn front(&self) -> &[T] {
        &self.buffers[self.current]
    }

    pub fn front_mut(&mut self) -> &mut [T] {
        &mut self.buffers[self.current]
    }

    /// Read-only front and writable back at the same time.
    pub fn split(&mut self) -> (&[T], &mut [T]) {
        let [a, b] = &mut self.buffers;
        let (front, back) = if self.current == 0 { (a, b) } else { (b, a) };
        (front.as_slice(), back.as_mut_slice())
    }

    /// Flips which buffer is current.
    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }

    /// Index of the current buffer (0 or 1).
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Drops both allocations.
    pub fn release(&mut self) {
        self.buffers = [Vec::new(), Vec::new()];
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_len_and_index_are_row_major() {
        let g = GridSize::new(4, 3);
        assert_eq!(g.len(), 12);
        assert_eq!(g.index(1, 2), 9);
    }

    #[test]
    fn wrapped_index_wraps_both_axes() {
        let g = GridSize::new(4, 3);
        assert_eq!(g.wrapped_index(-1, 0), g.index(3, 0));
        assert_eq!(g.wrapped_index(4, -1), g.index(0, 2));
        assert_eq!(g.wrapped_index(-9, 7), g.index(3, 1));
    }

    #[test]
    fn checked_index_rejects_out_of_range() {
        let g = GridSize::new(4, 3);
        assert_eq!(g.checked_index(0, 0), Some(0));
        assert_eq!(g.checked_index(-1, 0), None);
        assert_eq!(g.checked_index(4, 0), None);
        assert_eq!(g.checked_index(0, 3), None);
    }

    #[test]
    fn disc_offsets_radius_zero_is_single_cell() {
        let offsets: Vec<_> = disc_offsets(0).collect();
        assert_eq!(offsets, vec![(0, 0)]);
    }

    #[test]
    fn disc_offsets_count_matches_lattice_points() {
        // Lattice points with dx² + dy² <= r²: r=1 → 5, r=3 → 29, r=8 → 197.
        assert_eq!(disc_offsets(1).count(), 5);
        assert_eq!(disc_offsets(3).count(), 29);
        assert_eq!(disc_offsets(8).count(), 197);
    }

    #[test]
    fn swap_flips_front_without_copying() {
        let mut buf = DoubleBuffer::from_front(vec![1, 2, 3], 0);
        assert_eq!(buf.front(), &[1, 2, 3]);
        {
            let (front, back) = buf.split();
            for (b, f) in back.iter_mut().zip(front) {
                *b = f * 10;
            }
        }
        buf.swap();
        assert_eq!(buf.front(), &[10, 20, 30]);
        assert_eq!(buf.current_index(), 1);
        buf.swap();
        assert_eq!(buf.front(), &[1, 2, 3]);
    }

    #[test]
    fn set_both_survives_swap() {
        let mut buf = DoubleBuffer::filled(4, 0.0_f32);
        buf.set_both(2, 1.0);
        assert_eq!(buf.front()[2], 1.0);
        buf.swap();
        assert_eq!(buf.front()[2], 1.0);
    }

    #[test]
    fn release_empties_both_buffers() {
        let mut buf = DoubleBuffer::filled(16, 1u8);
        buf.swap();
        buf.release();
        assert!(buf.is_empty());
        assert_eq!(buf.current_index(), 0);
        buf.swap();
        assert!(buf.front().is_empty());
    }
}
