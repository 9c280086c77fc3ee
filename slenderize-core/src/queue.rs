//! Insertion-ordered output queue.
//!
//! Strictly FIFO: fragments compose in exactly the order they were
//! appended. That ordering is what interleaves a child's open and close
//! tags correctly between its parent's.

use std::collections::VecDeque;
use std::fmt::Write;

use crate::fragment::Fragment;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputQueue {
    fragments: VecDeque<Fragment>,
}

impl OutputQueue {
    pub fn new() -> Self {
        Self { fragments: VecDeque::with_capacity(64) }
    }

    #[inline]
    pub fn append(&mut self, fragment: Fragment) {
        self.fragments.push_back(fragment);
    }

    /// Remove every fragment, front to back.
    pub fn drain_in_order(&mut self) -> impl Iterator<Item = Fragment> + '_ {
        self.fragments.drain(..)
    }

    /// Iterate front to back without consuming.
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Render every fragment in order, followed by a single newline.
    pub fn compose(&self) -> String {
        let mut out = String::with_capacity(self.fragments.len() * 8);
        for fragment in &self.fragments {
            // Writing into a String cannot fail
            let _ = write!(out, "{fragment}");
        }
        out.push('\n');
        out
    }
}
