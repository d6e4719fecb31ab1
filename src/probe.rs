// Quadratic probe sequence over a prime-length slot array.
//
// Yields `(base + i²) mod len` for `i = 0, 1, .., len - 1`. Successive squares
// differ by `2i + 1`, so the position is advanced incrementally and never
// needs `i²` itself, which would overflow for large tables.
pub(crate) struct Probe {
    // The current slot index.
    pos: usize,
    // The number of offsets yielded so far.
    i: usize,
    len: usize,
}

impl Probe {
    #[inline]
    pub(crate) fn start(hash: u64, len: usize) -> Probe {
        debug_assert!(len > 0);
        Probe {
            pos: (hash % len as u64) as usize,
            i: 0,
            len,
        }
    }
}

impl Iterator for Probe {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.i == self.len {
            return None;
        }
        let current = self.pos;
        // Both terms are below `len`, so the sum fits in a usize.
        let step = (2 * self.i + 1) % self.len;
        self.pos += step;
        if self.pos >= self.len {
            self.pos -= self.len;
        }
        self.i += 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.len - self.i;
        (left, Some(left))
    }
}
