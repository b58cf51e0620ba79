use std::fmt;
use std::ops::Deref;

/// Ordered child list. Built append-only while parsing, read-only afterwards.
///
/// An empty list owns no heap allocation.
pub struct NodeList<T>(Box<[T]>);

impl<T> NodeList<T> {
    pub fn empty() -> Self {
        NodeList(Box::default())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn first(&self) -> Option<&T> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.0.last()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0.into_vec()
    }
}

impl<T> Default for NodeList<T> {
    fn default() -> Self {
        NodeList::empty()
    }
}

impl<T> From<Vec<T>> for NodeList<T> {
    fn from(items: Vec<T>) -> Self {
        if items.is_empty() {
            return NodeList::empty();
        }
        NodeList(items.into_boxed_slice())
    }
}

impl<T> FromIterator<T> for NodeList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        NodeList::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T> Deref for NodeList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<'a, T> IntoIterator for &'a NodeList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_does_not_allocate() {
        let list: NodeList<u64> = NodeList::from(Vec::with_capacity(16));
        assert!(list.is_empty());
        assert_eq!(std::mem::size_of_val(list.as_slice()), 0);
    }

    #[test]
    fn keeps_insertion_order() {
        let list: NodeList<_> = (1..=4).collect();
        assert_eq!(list.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(list.last(), Some(&4));
    }
}
