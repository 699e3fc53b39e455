//! Circular delay buffer shared by the Delay, Flanger and Chorus effects.
//!
//! The buffer has a *capacity* (allocated storage) and a *length* (the wrap
//! point currently in use). Shrinking the length never frees memory and
//! growing the capacity is the only operation that allocates, so effects
//! call [`DelayLine::grow`] from parameter setters and never from
//! `process_block`.

#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    len: usize,
    write_pos: usize,
}

impl DelayLine {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: vec![0.0; capacity],
            len: capacity,
            write_pos: 0,
        }
    }

    /// Grow storage to at least `capacity` samples. Never shrinks.
    pub fn grow(&mut self, capacity: usize) {
        if self.buffer.len() < capacity {
            self.buffer.resize(capacity, 0.0);
        }
    }

    /// Set the wrap length, clamped to `1..=capacity`.
    pub fn set_len(&mut self, len: usize) {
        self.len = len.clamp(1, self.buffer.len());
        if self.write_pos >= self.len {
            self.write_pos %= self.len;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// The sample at the write cursor, written `len` samples ago.
    #[inline]
    pub fn current(&self) -> f32 {
        self.buffer[self.write_pos]
    }

    /// Sample `delay` positions behind the write cursor (wraps at `len`).
    #[inline]
    pub fn tap(&self, delay: usize) -> f32 {
        self.buffer[self.index_behind(delay)]
    }

    /// Linear interpolation between the tap at `floor(delay)` and the slot
    /// after it.
    #[inline]
    pub fn tap_interpolated(&self, delay: f32) -> f32 {
        let delay = delay.max(0.0);
        let whole = delay as usize;
        let frac = delay - whole as f32;

        let idx = self.index_behind(whole);
        let a = self.buffer[idx];
        let b = self.buffer[(idx + 1) % self.len];
        a + frac * (b - a)
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
    }

    #[inline]
    pub fn advance(&mut self) {
        self.write_pos = (self.write_pos + 1) % self.len;
    }

    #[inline]
    fn index_behind(&self, delay: usize) -> usize {
        (self.write_pos + self.len - delay % self.len) % self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(line: &mut DelayLine, sample: f32) {
        line.write(sample);
        line.advance();
    }

    #[test]
    fn current_returns_sample_from_len_ago() {
        let mut line = DelayLine::new(4);
        for i in 1..=4 {
            push(&mut line, i as f32);
        }
        assert_eq!(line.current(), 1.0);
        push(&mut line, 5.0);
        assert_eq!(line.current(), 2.0);
    }

    #[test]
    fn tap_reads_behind_cursor() {
        let mut line = DelayLine::new(8);
        for i in 0..8 {
            push(&mut line, i as f32);
        }
        // Last written is 7, one behind the cursor
        assert_eq!(line.tap(1), 7.0);
        assert_eq!(line.tap(3), 5.0);
    }

    #[test]
    fn interpolated_tap_blends_neighbours() {
        let mut line = DelayLine::new(8);
        for i in 0..8 {
            push(&mut line, i as f32);
        }
        let a = line.tap(3);
        let b = line.tap(2);
        let mid = line.tap_interpolated(3.5);
        assert!((mid - (a + 0.5 * (b - a))).abs() < 1e-6);
    }

    #[test]
    fn grow_only_and_len_clamped() {
        let mut line = DelayLine::new(16);
        line.grow(8);
        assert_eq!(line.capacity(), 16);
        line.grow(32);
        assert_eq!(line.capacity(), 32);

        line.set_len(0);
        assert_eq!(line.len(), 1);
        line.set_len(100);
        assert_eq!(line.len(), 32);
    }

    #[test]
    fn shrinking_len_keeps_cursor_in_range() {
        let mut line = DelayLine::new(16);
        for _ in 0..12 {
            push(&mut line, 1.0);
        }
        line.set_len(4);
        // Must not index past the wrap point
        push(&mut line, 2.0);
        assert!(line.current().is_finite());
    }
}
