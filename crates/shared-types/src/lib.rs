//! # Shared Types Crate
//!
//! Core value types of the content-centric networking stack.
//!
//! ## Design Principles
//!
//! - **Names are values**: [`Name`] and [`NameComponent`] are immutable;
//!   every derived name is a new value.
//! - **Canonical ordering**: the derived `Ord` on names is the canonical
//!   CCN ordering used by exclusion filters and child selection.
//! - **Implicit digest**: a [`ContentObject`]'s digest is never part of
//!   its stored name, but can always be appended with
//!   [`ContentObject::full_name`].

pub mod content;
pub mod errors;
pub mod flatname;
pub mod name;

pub use content::{
    ContentDigest, ContentObject, ContentObjectBuilder, ContentType, Hash, PublisherId,
    PublisherKind, PublisherPublicKeyDigest, Signature, SignedInfo,
};
pub use errors::NameError;
pub use flatname::flatname_component_count;
pub use name::{Name, NameComponent, URI_SCHEME};
