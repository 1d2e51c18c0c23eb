/// Outward scan over list indices: `start, start-1, start+1, start-2, ...`.
///
/// Each round yields the forward cursor first, then the backward one. The start
/// is clamped into `0..len`; once one side runs out the other continues alone,
/// so every index is produced exactly once.
#[derive(Clone, Debug)]
pub struct ResolutionOrder {
    len: usize,
    forward: usize,
    /// Next backward index plus one; zero means exhausted
    backward: usize,
    forward_turn: bool,
}

impl ResolutionOrder {
    pub fn new(len: usize, start: usize) -> Self {
        let start = if len == 0 { 0 } else { start.min(len - 1) };
        Self {
            len,
            forward: start,
            backward: start,
            forward_turn: true,
        }
    }
}

impl Iterator for ResolutionOrder {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            let forward_left = self.forward < self.len;
            let backward_left = self.backward > 0;
            if !forward_left && !backward_left {
                return None;
            }

            let take_forward = self.forward_turn;
            self.forward_turn = !self.forward_turn;

            if take_forward && forward_left {
                self.forward += 1;
                return Some(self.forward - 1);
            }
            if !take_forward && backward_left {
                self.backward -= 1;
                return Some(self.backward);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len.saturating_sub(self.forward) + self.backward.min(self.len);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ResolutionOrder {}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(len: usize, start: usize) -> Vec<usize> {
        ResolutionOrder::new(len, start).collect()
    }

    #[test]
    fn test_outward_from_middle() {
        assert_eq!(order(5, 2), vec![2, 1, 3, 0, 4]);
    }

    #[test]
    fn test_edge_starts() {
        assert_eq!(order(5, 0), vec![0, 1, 2, 3, 4]);
        assert_eq!(order(5, 4), vec![4, 3, 2, 1, 0]);
        assert_eq!(order(4, 1), vec![1, 0, 2, 3]);
    }

    #[test]
    fn test_clamped_start() {
        assert_eq!(order(3, 10), vec![2, 1, 0]);
        assert_eq!(order(1, 0), vec![0]);
        assert!(order(0, 3).is_empty());
    }

    #[test]
    fn test_every_index_once() {
        for len in 0..8 {
            for start in 0..len + 2 {
                let mut seen = order(len, start);
                assert_eq!(ResolutionOrder::new(len, start).len(), seen.len());
                seen.sort_unstable();
                assert_eq!(seen, (0..len).collect::<Vec<_>>());
            }
        }
    }
}
