//! Stack of currently open tags.

/// LIFO of open tag names; the top is the most recently opened, deepest tag.
#[derive(Debug, Default)]
pub struct TagStack {
    tags: Vec<String>,
}

impl TagStack {
    pub fn new() -> Self {
        Self { tags: Vec::with_capacity(16) }
    }

    #[inline]
    pub fn push(&mut self, name: String) {
        self.tags.push(name);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<String> {
        self.tags.pop()
    }
}
