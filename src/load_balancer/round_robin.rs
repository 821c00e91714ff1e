//! Round-robin load balancing strategy.

/// Round-robin cursor.
///
/// Not synchronized on its own; the owning group serializes every call.
#[derive(Debug, Default, Clone)]
pub struct RoundRobin {
    cursor: usize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index to serve out of `len` hosts, advancing the cursor.
    pub fn next_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if self.cursor >= len {
            self.cursor = 0;
        }
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % len;
        Some(index)
    }

    /// Keep the cursor valid after the host at `removed` was dropped,
    /// leaving `remaining` hosts.
    pub fn on_remove(&mut self, removed: usize, remaining: usize) {
        if removed < self.cursor {
            self.cursor -= 1;
        }
        if self.cursor >= remaining {
            self.cursor = 0;
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin() {
        let mut rr = RoundRobin::new();
        assert_eq!(rr.next_index(2), Some(0));
        assert_eq!(rr.next_index(2), Some(1));
        assert_eq!(rr.next_index(2), Some(0));
    }

    #[test]
    fn test_empty() {
        let mut rr = RoundRobin::new();
        assert_eq!(rr.next_index(0), None);
    }

    #[test]
    fn test_remove_before_cursor_keeps_next_host() {
        let mut rr = RoundRobin::new();
        // hosts [a, b, c]; serve a, b -> cursor at c
        rr.next_index(3);
        rr.next_index(3);
        assert_eq!(rr.cursor(), 2);
        // drop a: hosts [b, c], c now at 1
        rr.on_remove(0, 2);
        assert_eq!(rr.cursor(), 1);
    }

    #[test]
    fn test_remove_at_tail_wraps() {
        let mut rr = RoundRobin::new();
        rr.next_index(3);
        rr.next_index(3);
        // drop c (the cursor): hosts [a, b]
        rr.on_remove(2, 2);
        assert_eq!(rr.cursor(), 0);
    }
}
