//! # Marker Naming
//!
//! Default [`SegmentNaming`] profile: segment and version numbers live in
//! name components that start with a one-byte marker followed by the
//! minimal big-endian encoding of the number.
//!
//! ```text
//! segment 0     -> 00
//! segment 300   -> 00 01 2C
//! version 0x1A2 -> FD 01 A2
//! ```

use shared_types::{Name, NameComponent};

use crate::ports::outbound::SegmentNaming;

/// First byte of a segment component.
pub const SEGMENT_MARKER: u8 = 0x00;

/// First byte of a version component.
pub const VERSION_MARKER: u8 = 0xFD;

/// Numbers are limited to 64 bits.
const MAX_NUMBER_BYTES: usize = 8;

/// Marker-prefixed segment and version components.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkerNaming;

impl MarkerNaming {
    pub fn new() -> Self {
        Self
    }

    /// Encode `version` as a version component.
    pub fn version_component(&self, version: u64) -> NameComponent {
        marked_number(VERSION_MARKER, version, true)
    }

    /// True if `component` is a version component.
    pub fn is_version(&self, component: &NameComponent) -> bool {
        let bytes = component.as_bytes();
        bytes.len() > 1 && bytes.len() <= MAX_NUMBER_BYTES + 1 && bytes[0] == VERSION_MARKER
    }

    /// Segment number in `component`, if it is a segment component.
    pub fn component_segment_number(&self, component: &NameComponent) -> Option<u64> {
        match component.as_bytes().split_first() {
            Some((&SEGMENT_MARKER, digits)) if digits.len() <= MAX_NUMBER_BYTES => {
                Some(digits.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
            }
            _ => None,
        }
    }

    fn last_version_index(&self, name: &Name) -> Option<usize> {
        name.components().iter().rposition(|c| self.is_version(c))
    }
}

impl SegmentNaming for MarkerNaming {
    fn is_segment(&self, name: &Name) -> bool {
        self.segment_number(name).is_some()
    }

    fn segment_number(&self, name: &Name) -> Option<u64> {
        name.last().and_then(|c| self.component_segment_number(c))
    }

    fn segment_name(&self, prefix: &Name, number: u64) -> Name {
        let component = self.segment_component(number);
        if self.is_segment(prefix) {
            prefix.replace_last(component)
        } else {
            prefix.append(component)
        }
    }

    fn has_terminal_version(&self, name: &Name) -> bool {
        self.terminal_version_cut_point(name).is_some()
    }

    fn terminal_version_cut_point(&self, name: &Name) -> Option<usize> {
        let index = self.last_version_index(name)?;
        let trailing_segments_only = name.components()[index + 1..]
            .iter()
            .all(|c| self.component_segment_number(c).is_some());
        trailing_segments_only.then_some(index + 1)
    }

    fn segment_component(&self, number: u64) -> NameComponent {
        marked_number(SEGMENT_MARKER, number, false)
    }
}

/// Marker byte followed by the minimal big-endian bytes of `number`.
///
/// Zero encodes as no digits unless `nonempty` is set.
fn marked_number(marker: u8, number: u64, nonempty: bool) -> NameComponent {
    let digits = number.to_be_bytes();
    let skip = digits.iter().take_while(|&&b| b == 0).count();
    let mut bytes = Vec::with_capacity(1 + MAX_NUMBER_BYTES - skip);
    bytes.push(marker);
    bytes.extend_from_slice(&digits[skip..]);
    if nonempty && bytes.len() == 1 {
        bytes.push(0);
    }
    NameComponent::from(bytes)
}
