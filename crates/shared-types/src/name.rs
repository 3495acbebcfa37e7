//! # Names
//!
//! Hierarchical names made of opaque binary components.
//!
//! ## Ordering
//!
//! Components compare byte-wise lexicographically; on a common-prefix tie
//! the shorter component sorts first. Names compare component-wise with the
//! same shorter-is-prior rule, so a name always sorts before its extensions.
//!
//! ## URI form
//!
//! ```text
//! ccnx:/parc/home/%C1.M.S.x   (scheme optional)
//! /a/.../b                    (empty component)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::NameError;

/// URI scheme accepted (and stripped) when parsing.
pub const URI_SCHEME: &str = "ccnx:";

/// A single opaque name component.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NameComponent(Vec<u8>);

impl NameComponent {
    /// Wrap raw bytes as a component.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw component bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Component length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the zero-length component.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Write the URI-escaped form of this component.
    fn write_escaped(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // All-dot (and empty) components get three extra dots so they
        // cannot be confused with relative path segments.
        if self.0.iter().all(|&b| b == b'.') {
            for _ in 0..self.0.len() + 3 {
                f.write_str(".")?;
            }
            return Ok(());
        }
        for &b in &self.0 {
            if is_unreserved(b) {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "%{:02X}", b)?;
            }
        }
        Ok(())
    }

    /// Parse one URI path segment into a component.
    fn parse_escaped(segment: &str) -> Result<Self, NameError> {
        if !segment.is_empty() && segment.bytes().all(|b| b == b'.') {
            if segment.len() < 3 {
                return Err(NameError::InvalidUri(format!(
                    "relative segment '{}' is not allowed",
                    segment
                )));
            }
            return Ok(Self(vec![b'.'; segment.len() - 3]));
        }

        let raw = segment.as_bytes();
        let mut out = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'%' {
                let hi = raw.get(i + 1).and_then(|c| hex_value(*c));
                let lo = raw.get(i + 2).and_then(|c| hex_value(*c));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
                    _ => {
                        return Err(NameError::InvalidUri(format!(
                            "bad percent escape in '{}'",
                            segment
                        )))
                    }
                }
                i += 3;
            } else {
                out.push(raw[i]);
                i += 1;
            }
        }
        Ok(Self(out))
    }
}

impl From<&[u8]> for NameComponent {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for NameComponent {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for NameComponent {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl AsRef<[u8]> for NameComponent {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for NameComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_escaped(f)
    }
}

/// An ordered sequence of name components.
///
/// Names are values: every "modifying" operation returns a new `Name`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Name {
    components: Vec<NameComponent>,
}

impl Name {
    /// Build a name from components.
    pub fn new<I, C>(components: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<NameComponent>,
    {
        Self {
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    /// The empty (root) name `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a URI such as `ccnx:/a/b` or `/a/b`.
    pub fn from_uri(uri: &str) -> Result<Self, NameError> {
        uri.parse()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True for the root name.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component at `index`, if present.
    pub fn component(&self, index: usize) -> Option<&NameComponent> {
        self.components.get(index)
    }

    /// All components in order.
    pub fn components(&self) -> &[NameComponent] {
        &self.components
    }

    /// The final component.
    pub fn last(&self) -> Option<&NameComponent> {
        self.components.last()
    }

    /// True iff every component of `self` equals the corresponding
    /// component of `other` and `self` is no longer than `other`.
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.len() <= other.len()
            && self
                .components
                .iter()
                .zip(other.components.iter())
                .all(|(a, b)| a == b)
    }

    /// A new name with `component` appended.
    pub fn append(&self, component: impl Into<NameComponent>) -> Name {
        let mut components = self.components.clone();
        components.push(component.into());
        Name { components }
    }

    /// A new name made of the first `count` components.
    pub fn cut(&self, count: usize) -> Name {
        Name {
            components: self.components[..count.min(self.len())].to_vec(),
        }
    }

    /// The name without its final component (root stays root).
    pub fn parent(&self) -> Name {
        self.cut(self.len().saturating_sub(1))
    }

    /// A new name with the last component replaced.
    pub fn replace_last(&self, component: impl Into<NameComponent>) -> Name {
        self.parent().append(component)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in &self.components {
            f.write_str("/")?;
            component.write_escaped(f)?;
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.strip_prefix(URI_SCHEME).unwrap_or(s);
        if !path.starts_with('/') {
            return Err(NameError::InvalidUri(format!("'{}' is not absolute", s)));
        }
        let path = path.trim_end_matches('/');

        let mut components = Vec::new();
        for segment in path.split('/').skip(1) {
            components.push(NameComponent::parse_escaped(segment)?);
        }
        Ok(Name { components })
    }
}

/// RFC 3986 unreserved characters are written unescaped.
fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
