//! Ordered form parameter multimap and its URL encodings.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

/// RFC 3986 unreserved characters stay literal; everything else is
/// percent-encoded.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// How a parameter name or value is percent-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingProfile {
    /// `application/x-www-form-urlencoded`: RFC 3986 unreserved characters
    /// are kept and a space becomes `+`.
    Form,
    /// Strict RFC 3986: a space becomes `%20`. Used for the string to sign
    /// and the signed body.
    Rfc3986,
}

impl EncodingProfile {
    /// Encode a single name or value.
    pub fn encode(self, value: &str) -> String {
        match self {
            EncodingProfile::Rfc3986 => utf8_percent_encode(value, UNRESERVED).to_string(),
            EncodingProfile::Form => value
                .split(' ')
                .map(|part| utf8_percent_encode(part, UNRESERVED).to_string())
                .collect::<Vec<_>>()
                .join("+"),
        }
    }
}

/// Where numbering of an indexed list starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    /// `Prefix.0`, `Prefix.1`, ...
    Zero,
    /// `Prefix.1`, `Prefix.2`, ...
    #[default]
    One,
}

impl IndexBase {
    /// First index.
    pub fn start(self) -> usize {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }
}

/// An ordered multimap of form parameters.
///
/// Insertion order is preserved until [`FormParams::sort_by_name`] is called;
/// names may repeat.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FormParams {
    pairs: Vec<(String, String)>,
}

impl FormParams {
    /// Create an empty multimap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Set a single-valued parameter. The first existing pair with this name
    /// keeps its position and takes the new value; later duplicates are
    /// dropped. A new name is appended.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter().position(|(n, _)| *n == name) {
            Some(pos) => {
                self.pairs[pos].1 = value;
                let mut seen = 0usize;
                self.pairs.retain(|(n, _)| {
                    if *n == name {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => self.pairs.push((name, value)),
        }
    }

    /// Remove every pair with this name.
    pub fn remove(&mut self, name: &str) {
        self.pairs.retain(|(n, _)| n != name);
    }

    /// Append `Prefix.N` pairs numbered from `base`.
    pub fn push_indexed<I, V>(&mut self, prefix: &str, base: IndexBase, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        for (offset, value) in values.into_iter().enumerate() {
            self.push(format!("{}.{}", prefix, base.start() + offset), value);
        }
    }

    /// Replace every `Prefix.N` (and `Prefix.N.Field`) pair with a fresh
    /// list numbered from `base`. The new list takes the position of the
    /// first replaced pair, or is appended if none existed.
    pub fn replace_indexed<I, V>(&mut self, prefix: &str, base: IndexBase, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let mut fresh = FormParams::new();
        fresh.push_indexed(prefix, base, values);
        self.splice_indexed(prefix, fresh);
    }

    /// Replace every `Prefix.N...` pair with the given pairs, keeping the
    /// position of the first replaced pair.
    pub fn splice_indexed(&mut self, prefix: &str, fresh: FormParams) {
        let at = self
            .pairs
            .iter()
            .position(|(n, _)| is_indexed_name(n, prefix))
            .unwrap_or(self.pairs.len());
        self.pairs.retain(|(n, _)| !is_indexed_name(n, prefix));
        let at = at.min(self.pairs.len());
        self.pairs.splice(at..at, fresh.pairs);
    }

    /// Append all pairs of `other` in order.
    pub fn extend_from(&mut self, other: &FormParams) {
        self.pairs.extend(other.pairs.iter().cloned());
    }

    /// First value for a name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All values for a name, in order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Whether any pair has this name.
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(n, _)| n == name)
    }

    /// Names in order, duplicates included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(n, _)| n.as_str())
    }

    /// Pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Stable sort by name in byte order. Pairs with equal names keep their
    /// relative order.
    pub fn sort_by_name(&mut self) {
        self.pairs.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
    }

    /// Move the pairs with this name to the front, preserving the rest.
    pub fn move_to_front(&mut self, name: &str) {
        let (mut front, rest): (Vec<_>, Vec<_>) =
            self.pairs.drain(..).partition(|(n, _)| n == name);
        front.extend(rest);
        self.pairs = front;
    }

    /// Move the pairs with this name to the back, preserving the rest.
    pub fn move_to_back(&mut self, name: &str) {
        let (back, mut rest): (Vec<_>, Vec<_>) =
            self.pairs.drain(..).partition(|(n, _)| n == name);
        rest.extend(back);
        self.pairs = rest;
    }

    /// Encode as `name=value&...` using the given profile.
    pub fn encode(&self, profile: EncodingProfile) -> String {
        self.pairs
            .iter()
            .map(|(n, v)| format!("{}={}", profile.encode(n), profile.encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Decode a form body. `+` is read as a space.
    pub fn from_encoded(body: &str) -> Self {
        let decode = |s: &str| {
            let spaced = s.replace('+', " ");
            percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
        };

        let pairs = body
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((n, v)) => (decode(n), decode(v)),
                None => (decode(segment), String::new()),
            })
            .collect();

        Self { pairs }
    }
}

impl fmt::Debug for FormParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FormParams {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect(),
        }
    }
}

/// True for `Prefix.<digits>` and `Prefix.<digits>.<anything>`.
fn is_indexed_name(name: &str, prefix: &str) -> bool {
    let Some(rest) = name
        .strip_prefix(prefix)
        .and_then(|r| r.strip_prefix('.'))
    else {
        return false;
    };
    let index = rest.split('.').next().unwrap_or_default();
    !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())
}
