#![deny(clippy::missing_inline_in_public_items)]

use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A field that can hold no value, one value, or many values.
///
/// Backends that populate relations lazily tend to send `null`, a bare object, or an array
/// for the same field depending on how the document was loaded. Deserializing into this type
/// accepts all three shapes.
///
/// Mutations keep the representation canonical: an empty collection is always `None`, a
/// single element is always `One`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
    #[default]
    None,
}

impl<T> OneOrMany<T> {
    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(v) => v.len(),
            Self::None => 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// View the contents as a slice, regardless of variant.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(t) => std::slice::from_ref(t),
            Self::Many(v) => v,
            Self::None => &[],
        }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            Self::One(t) => std::slice::from_mut(t),
            Self::Many(v) => v,
            Self::None => &mut [],
        }
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Appends a value at the end.
    #[inline]
    pub fn push(&mut self, new: T) {
        let mut items = std::mem::take(self).into_vec();
        items.push(new);
        *self = Self::from(items);
    }

    /// Keeps only the elements for which `keep` returns `true`, preserving order.
    #[inline]
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut items = std::mem::take(self).into_vec();
        items.retain(keep);
        *self = Self::from(items);
    }

    /// Replaces the first element matching `predicate` with `new`.
    ///
    /// Returns the replaced element, or gives `new` back in `Err` if nothing matched.
    #[inline]
    pub fn replace_first<F>(&mut self, mut predicate: F, new: T) -> Result<T, T>
    where
        F: FnMut(&T) -> bool,
    {
        match self.iter_mut().find(|t| predicate(t)) {
            Some(slot) => Ok(std::mem::replace(slot, new)),
            None => Err(new),
        }
    }

    /// Consumes the container, returning its elements in order.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(t) => vec![t],
            Self::Many(v) => v,
            Self::None => Vec::new(),
        }
    }

    /// Checks if the container holds no values.
    #[inline]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Checks if the container holds exactly the `One` variant.
    #[inline]
    pub const fn is_one(&self) -> bool {
        matches!(self, Self::One(_))
    }

    /// Checks if the container holds the `Many` variant.
    #[inline]
    pub const fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }
}

impl<T> From<T> for OneOrMany<T> {
    #[inline]
    fn from(t: T) -> Self {
        Self::One(t)
    }
}

impl<T> From<Option<T>> for OneOrMany<T> {
    #[inline]
    fn from(t: Option<T>) -> Self {
        t.map_or(Self::None, Self::One)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    #[inline]
    fn from(mut v: Vec<T>) -> Self {
        match v.len() {
            0 => Self::None,
            1 => v.pop().map_or(Self::None, Self::One),
            _ => Self::Many(v),
        }
    }
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    #[inline]
    fn from(value: OneOrMany<T>) -> Self {
        value.into_vec()
    }
}

impl<T> FromIterator<T> for OneOrMany<T> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T> IntoIterator for OneOrMany<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a, T> IntoIterator for &'a OneOrMany<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Index<usize> for OneOrMany<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::none(OneOrMany::<usize>::None, 0)]
    #[case::one(OneOrMany::One(1), 1)]
    #[case::many(OneOrMany::Many(vec![1, 2, 3]), 3)]
    fn test_len(#[case] input: OneOrMany<usize>, #[case] expected: usize) {
        assert_eq!(input.len(), expected);
        assert_eq!(input.is_empty(), expected == 0);
    }

    #[rstest]
    #[case::none(OneOrMany::None, 1, OneOrMany::One(1))]
    #[case::one(OneOrMany::One(1), 2, OneOrMany::Many(vec![1, 2]))]
    #[case::many(OneOrMany::Many(vec![1, 2]), 3, OneOrMany::Many(vec![1, 2, 3]))]
    fn test_push(
        #[case] mut input: OneOrMany<usize>,
        #[case] new: usize,
        #[case] expected: OneOrMany<usize>,
    ) {
        input.push(new);
        assert_eq!(input, expected);
    }

    #[rstest]
    #[case::drop_only(OneOrMany::One(1), OneOrMany::None)]
    #[case::collapse_to_one(OneOrMany::Many(vec![1, 2]), OneOrMany::One(2))]
    #[case::keep_order(OneOrMany::Many(vec![3, 1, 2, 4]), OneOrMany::Many(vec![3, 2, 4]))]
    #[case::nothing_to_drop(OneOrMany::None, OneOrMany::None)]
    fn test_retain(#[case] mut input: OneOrMany<usize>, #[case] expected: OneOrMany<usize>) {
        input.retain(|n| *n != 1);
        assert_eq!(input, expected);
    }

    #[test]
    fn test_replace_first() {
        let mut items = OneOrMany::Many(vec![1, 2, 3, 2]);
        assert_eq!(items.replace_first(|n| *n == 2, 20), Ok(2));
        assert_eq!(items, OneOrMany::Many(vec![1, 20, 3, 2]));
        assert_eq!(items.replace_first(|n| *n == 9, 90), Err(90));

        let mut none = OneOrMany::<usize>::None;
        assert_eq!(none.replace_first(|_| true, 1), Err(1));
        assert!(none.is_none());
    }

    #[rstest]
    #[case::empty(vec![], OneOrMany::None)]
    #[case::single(vec![7], OneOrMany::One(7))]
    #[case::several(vec![7, 8], OneOrMany::Many(vec![7, 8]))]
    fn test_from_vec(#[case] input: Vec<usize>, #[case] expected: OneOrMany<usize>) {
        assert_eq!(OneOrMany::from(input.clone()), expected);
        assert_eq!(input.into_iter().collect::<OneOrMany<_>>(), expected);
    }

    #[test]
    fn test_iter_and_index() {
        let items = OneOrMany::Many(vec!["a", "b"]);
        assert_eq!(items.iter().copied().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(items[1], "b");
        assert_eq!(items.first(), Some(&"a"));
        assert_eq!(items.get(2), None);
        assert_eq!(Vec::from(items), vec!["a", "b"]);
    }

    #[rstest]
    #[case::null("null", OneOrMany::None)]
    #[case::bare("4", OneOrMany::One(4))]
    #[case::list("[4, 5]", OneOrMany::Many(vec![4, 5]))]
    fn test_deserialize_any_shape(#[case] json: &str, #[case] expected: OneOrMany<u32>) {
        let actual: OneOrMany<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_serialize_keeps_shape() {
        assert_eq!(serde_json::to_string(&OneOrMany::<u32>::None).unwrap(), "null");
        assert_eq!(serde_json::to_string(&OneOrMany::One(1)).unwrap(), "1");
        assert_eq!(
            serde_json::to_string(&OneOrMany::Many(vec![1, 2])).unwrap(),
            "[1,2]"
        );
    }
}
