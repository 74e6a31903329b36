//! # Request Item Collections
//!
//! Ordered multi-value containers for headers, query parameters, form
//! fields and file uploads.

/// Insertion-ordered multi-map; repeated keys keep every value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMultiMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for OrderedMultiMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> OrderedMultiMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: T) {
        self.entries.push((key.into(), value));
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a T> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> IntoIterator for OrderedMultiMap<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Case-insensitive, ordered header collection.
///
/// A `None` value means "do not send this header", which is how
/// `Header:` suppresses a default header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    entries: Vec<(String, Option<String>)>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header value.
    ///
    /// `None` replaces every existing value. A real value replaces a lone
    /// `None` placeholder and otherwise accumulates.
    pub fn add(&mut self, name: &str, value: Option<String>) {
        let spelling = self.spelling_of(name);
        match value {
            None => {
                self.remove(name);
                self.entries.push((spelling, None));
            }
            Some(value) => {
                if self.get_all(name).all(|v| v.is_none()) {
                    self.remove(name);
                }
                self.entries.push((spelling, Some(value)));
            }
        }
    }

    /// Set a header only when it was not given yet
    pub fn set_default(&mut self, name: &str, value: &str) {
        if !self.contains(name) {
            self.entries.push((name.to_string(), Some(value.to_string())));
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'a str>> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref())
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    /// Headers that should actually be sent
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // First spelling wins so `content-type` after `Content-Type` stays `Content-Type`
    fn spelling_of(&self, name: &str) -> String {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(k, _)| k.clone())
            .unwrap_or_else(|| name.to_string())
    }
}
