//! Binary min-heap keyed by an explicit priority.
//!
//! Nodes live in a `Vec` laid out as a complete binary tree: the parent of
//! `i` is `(i - 1) / 2`, its children are `2i + 1` and `2i + 2`. Every node's
//! priority is `<=` both of its children's, so the root is always a minimum.
//!
//! Items with equal priority come out in an unspecified order (it depends on
//! sift direction), so callers must treat ties as a set.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    #[error("items and priorities differ in length ({items} vs {priorities})")]
    LengthMismatch { items: usize, priorities: usize },
}

#[derive(Debug, Clone)]
struct Node<T, P> {
    item: T,
    priority: P,
}

/// Min-heap: lower priority is extracted first.
#[derive(Debug, Clone)]
pub struct PriorityHeap<T, P = i64> {
    nodes: Vec<Node<T, P>>,
}

impl<T, P> PriorityHeap<T, P> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The current minimum without removing it.
    pub fn peek_min(&self) -> Option<(&T, &P)> {
        self.nodes.first().map(|n| (&n.item, &n.priority))
    }
}

impl<T, P: Ord> PriorityHeap<T, P> {
    /// Append `item` and sift it up. O(log n).
    pub fn insert(&mut self, item: T, priority: P) {
        self.nodes.push(Node { item, priority });
        self.sift_up(self.nodes.len() - 1);
    }

    /// Remove and return the item with the smallest priority. O(log n).
    pub fn extract_min(&mut self) -> Option<T> {
        if self.nodes.is_empty() {
            return None;
        }
        let last = self.nodes.len() - 1;
        self.nodes.swap(0, last);
        let min = self.nodes.pop()?;
        self.sift_down(0);
        Some(min.item)
    }

    /// Extract up to `count` items in non-decreasing priority order.
    pub fn extract_up_to(&mut self, count: usize) -> Vec<T> {
        let mut out = Vec::with_capacity(count.min(self.nodes.len()));
        while out.len() < count {
            match self.extract_min() {
                Some(item) => out.push(item),
                None => break,
            }
        }
        out
    }

    /// Replace the contents with `items[i]` at `priorities[i]`. O(n).
    ///
    /// Nodes are laid out in input order, then sifted down from the last
    /// internal node to the root. On a length mismatch the heap is left
    /// untouched.
    pub fn build_from(
        &mut self,
        items: impl IntoIterator<Item = T>,
        priorities: impl IntoIterator<Item = P>,
    ) -> Result<(), HeapError> {
        let items: Vec<T> = items.into_iter().collect();
        let priorities: Vec<P> = priorities.into_iter().collect();
        if items.len() != priorities.len() {
            return Err(HeapError::LengthMismatch {
                items: items.len(),
                priorities: priorities.len(),
            });
        }

        self.nodes.clear();
        self.nodes.extend(
            items
                .into_iter()
                .zip(priorities)
                .map(|(item, priority)| Node { item, priority }),
        );
        self.heapify();
        Ok(())
    }

    fn heapify(&mut self) {
        for i in (0..self.nodes.len() / 2).rev() {
            self.sift_down(i);
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.nodes[index].priority >= self.nodes[parent].priority {
                break;
            }
            self.nodes.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.nodes[left].priority < self.nodes[smallest].priority {
                smallest = left;
            }
            if right < len && self.nodes[right].priority < self.nodes[smallest].priority {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.nodes.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T, P> Default for PriorityHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> FromIterator<(T, P)> for PriorityHeap<T, P> {
    /// Bulk construction (O(n)), same as [`PriorityHeap::build_from`].
    fn from_iter<I: IntoIterator<Item = (T, P)>>(iter: I) -> Self {
        let mut heap = Self {
            nodes: iter
                .into_iter()
                .map(|(item, priority)| Node { item, priority })
                .collect(),
        };
        heap.heapify();
        heap
    }
}
