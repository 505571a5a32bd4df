/// Ordered, append-only collection with positional identity.
///
/// Entries can be pushed and edited in place but never removed or reordered,
/// so an index handed out once keeps addressing the same entry for the
/// lifetime of the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct AppendOnly<T> {
    items: Vec<T>,
}

impl<T> AppendOnly<T> {
    /// Creates a collection seeded with a single entry.
    pub fn with_first(first: T) -> Self {
        Self { items: vec![first] }
    }

    /// Appends an entry and returns its index.
    pub fn push(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}
