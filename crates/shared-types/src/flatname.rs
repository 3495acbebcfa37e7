//! # Flat Names
//!
//! Compact, self-delimiting byte encoding of a [`Name`], suitable as an
//! index key.
//!
//! Each component is written as a length delimiter followed by the raw
//! component bytes. The delimiter is the big-endian base-128 length with the
//! high bit set on every byte except the last, and is at most 3 bytes long,
//! so components are limited to `2^21 - 1` bytes.

use crate::errors::NameError;
use crate::name::{Name, NameComponent};

/// Longest delimiter, in bytes.
pub const MAX_DELIMITER_BYTES: usize = 3;

/// Largest component length a delimiter can express.
pub const MAX_COMPONENT_LEN: usize = (1 << (7 * MAX_DELIMITER_BYTES)) - 1;

impl Name {
    /// Encode as a flat name.
    pub fn to_flatname(&self) -> Result<Vec<u8>, NameError> {
        let mut out = Vec::new();
        for component in self.components() {
            append_delimiter(&mut out, component.len())?;
            out.extend_from_slice(component.as_bytes());
        }
        Ok(out)
    }

    /// Decode a flat name.
    pub fn from_flatname(flatname: &[u8]) -> Result<Name, NameError> {
        let mut components = Vec::new();
        walk_components(flatname, |bytes| components.push(NameComponent::from(bytes)))?;
        Ok(Name::new(components))
    }
}

/// Number of components in a flat name, validating it on the way.
pub fn flatname_component_count(flatname: &[u8]) -> Result<usize, NameError> {
    walk_components(flatname, |_| {})
}

fn append_delimiter(out: &mut Vec<u8>, len: usize) -> Result<(), NameError> {
    if len > MAX_COMPONENT_LEN {
        return Err(NameError::ComponentTooLong {
            len,
            max: MAX_COMPONENT_LEN,
        });
    }
    let mut groups = [0u8; MAX_DELIMITER_BYTES];
    let mut n = 0;
    let mut rest = len;
    loop {
        groups[n] = (rest & 0x7F) as u8;
        n += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    for i in (0..n).rev() {
        let continuation = if i == 0 { 0 } else { 0x80 };
        out.push(groups[i] | continuation);
    }
    Ok(())
}

/// Parse one delimiter at the start of `bytes`.
///
/// Returns `(delimiter_len, component_len)`.
fn next_component(bytes: &[u8]) -> Result<(usize, usize), NameError> {
    if bytes[0] == 0x80 {
        return Err(NameError::MalformedFlatname(
            "delimiter is not minimal".to_string(),
        ));
    }
    let limit = bytes.len().min(MAX_DELIMITER_BYTES);
    let mut len = 0usize;
    let mut i = 0;
    while i < limit && bytes[i] & 0x80 != 0 {
        len = (len | (bytes[i] & 0x7F) as usize) << 7;
        i += 1;
    }
    if i >= limit {
        return Err(NameError::MalformedFlatname(
            "delimiter too long or truncated".to_string(),
        ));
    }
    len |= bytes[i] as usize;
    i += 1;
    if i + len > bytes.len() {
        return Err(NameError::MalformedFlatname(format!(
            "component of {} bytes overruns buffer",
            len
        )));
    }
    Ok((i, len))
}

fn walk_components<F>(flatname: &[u8], mut visit: F) -> Result<usize, NameError>
where
    F: FnMut(&[u8]),
{
    let mut offset = 0;
    let mut count = 0;
    while offset < flatname.len() {
        let (delim, len) = next_component(&flatname[offset..])?;
        visit(&flatname[offset + delim..offset + delim + len]);
        offset += delim + len;
        count += 1;
    }
    Ok(count)
}
