use std::collections::VecDeque;

/// Fixed-capacity FIFO ordered oldest to newest.
///
/// Pushing into a full history drops the oldest entry.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    deque: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            deque: VecDeque::with_capacity(cap),
            capacity: cap,
        }
    }

    /// Append `item` as the newest entry, returning the evicted oldest one.
    #[inline]
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }

        let evicted = if self.is_full() {
            self.deque.pop_front()
        } else {
            None
        };

        self.deque.push_back(item);

        evicted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.deque.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.deque.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.deque.len() == self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn newest(&self) -> Option<&T> {
        self.deque.back()
    }

    /// The two newest entries as `(previous, latest)`.
    #[inline]
    pub fn last_pair(&self) -> Option<(&T, &T)> {
        let n = self.deque.len();
        if n < 2 {
            return None;
        }
        Some((&self.deque[n - 2], &self.deque[n - 1]))
    }

    /// Chronological iteration, oldest first.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &'_ T> + ExactSizeIterator {
        self.deque.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_evicts_oldest() {
        let mut history = BoundedHistory::with_capacity(3);
        assert_eq!(history.push(1), None);
        assert_eq!(history.push(2), None);
        assert_eq!(history.push(3), None);
        assert!(history.is_full());

        assert_eq!(history.push(4), Some(1));
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), [2, 3, 4]);
        assert_eq!(history.newest(), Some(&4));
    }

    #[test]
    fn test_last_pair() {
        let mut history = BoundedHistory::with_capacity(4);
        history.push(10);
        assert!(history.last_pair().is_none());

        history.push(20);
        history.push(30);
        assert_eq!(history.last_pair(), Some((&20, &30)));
    }
}
