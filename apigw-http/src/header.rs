use indexmap::IndexMap;

/// Canonical name of the request header carrying cookies.
pub const COOKIE: &str = "Cookie";

/// Canonical name of the response header carrying cookies to be set by the client.
pub const SET_COOKIE: &str = "Set-Cookie";

/// Canonical name of the request header identifying the target host.
pub const HOST: &str = "Host";

/// Ordered multimap of HTTP headers with case-insensitive names.
///
/// Lookups ignore ASCII case, while iteration yields each header under the name it was last
/// [`set`](HeaderMultimap::set) with (or first [`append`](HeaderMultimap::append)ed with).
/// Entries are iterated in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderMultimap {
  // Keyed by the folded name; values hold the output name and the ordered values.
  entries: IndexMap<String, (String, Vec<String>)>,
}

impl HeaderMultimap {
  /// Construct an empty multimap.
  pub fn new() -> Self {
    Self::default()
  }

  /// Construct an empty multimap with room for `capacity` distinct header names.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      entries: IndexMap::with_capacity(capacity),
    }
  }

  /// Return the first value of the named header, if present.
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .entries
      .get(&fold(name))
      .and_then(|(_, values)| values.first())
      .map(String::as_str)
  }

  /// Return every value of the named header in the order they were added.
  pub fn get_all(&self, name: &str) -> &[String] {
    self
      .entries
      .get(&fold(name))
      .map(|(_, values)| values.as_slice())
      .unwrap_or(&[])
  }

  /// Return whether the named header is present.
  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(&fold(name))
  }

  /// Replace any existing values of the named header with `value`.
  pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.set_all(name, vec![value.into()]);
  }

  /// Bind `values` as the complete value list of the named header, replacing any existing values.
  pub fn set_all(&mut self, name: impl Into<String>, values: Vec<String>) {
    let name = name.into();
    self.entries.insert(fold(&name), (name, values));
  }

  /// Add `value` to the named header, keeping any existing values.
  pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
    let name = name.into();
    self
      .entries
      .entry(fold(&name))
      .or_insert_with(|| (name, Vec::new()))
      .1
      .push(value.into());
  }

  /// Remove the named header, returning its values.
  pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
    self
      .entries
      .shift_remove(&fold(name))
      .map(|(_, values)| values)
  }

  /// Iterate over `(name, values)` pairs in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
    self
      .entries
      .values()
      .map(|(name, values)| (name.as_str(), values.as_slice()))
  }

  /// Number of distinct header names.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Return whether no headers are present.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl IntoIterator for HeaderMultimap {
  type Item = (String, Vec<String>);
  type IntoIter = indexmap::map::IntoValues<String, (String, Vec<String>)>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_values()
  }
}

fn fold(name: &str) -> String {
  name.to_ascii_lowercase()
}
