use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

/// Something stored in an [`Entries`] collection under a name.
pub trait Named {
    fn name(&self) -> &str;
}

/// A name-keyed collection that keeps every value submitted under a name, in
/// the order the values were decoded.
///
/// Used for form fields, uploaded files and cookies alike.
///
/// # Examples
///
/// ```
/// use cgi_form::{Error, Request};
///
/// let request = Request::decode_query(b"color=red&color=blue&size=10");
///
/// assert_eq!(request.fields().get("size").unwrap().value(), "10");
/// assert_eq!(request.fields().get_all("color").unwrap().len(), 2);
/// assert!(matches!(request.fields().get("color"), Err(Error::IsList { .. })));
/// assert!(matches!(request.fields().get("shape"), Err(Error::NotFound { .. })));
/// ```
#[derive(Clone)]
pub struct Entries<T> {
    items: Vec<T>,
    index: HashMap<String, Vec<usize>>,
}

impl<T: Named> Entries<T> {
    pub fn new() -> Self {
        Entries {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, item: T) {
        let idx = self.items.len();
        self.index.entry(item.name().to_owned()).or_default().push(idx);
        self.items.push(item);
    }

    /// Returns the single value stored under `name`.
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) when nothing was
    /// submitted under `name`, and with [`Error::IsList`](crate::Error::IsList)
    /// when several values were.
    pub fn get(&self, name: &str) -> crate::Result<&T> {
        match self.positions(name)? {
            [idx] => Ok(&self.items[*idx]),
            positions => Err(crate::Error::IsList {
                name: name.to_owned(),
                count: positions.len(),
            }),
        }
    }

    /// Returns every value stored under `name`, in decode order.
    pub fn get_all(&self, name: &str) -> crate::Result<Vec<&T>> {
        Ok(self.positions(name)?.iter().map(|idx| &self.items[*idx]).collect())
    }

    /// Returns the first value stored under `name`, if any.
    pub fn first(&self, name: &str) -> Option<&T> {
        self.index
            .get(name)
            .and_then(|positions| positions.first())
            .map(|idx| &self.items[*idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates over all values in decode order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterates over the distinct names, in the order each was first seen.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let mut seen = std::collections::HashSet::new();
        self.items
            .iter()
            .map(Named::name)
            .filter(move |name| seen.insert(*name))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn positions(&self, name: &str) -> crate::Result<&[usize]> {
        self.index
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| crate::Error::NotFound { name: name.to_owned() })
    }
}

impl<T: Named> Default for Entries<T> {
    fn default() -> Self {
        Entries::new()
    }
}

impl<T: Debug> Debug for Entries<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> IntoIterator for Entries<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Entries<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
