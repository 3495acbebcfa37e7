//! # Content Objects
//!
//! Named, signed units of content.
//!
//! A content object's name does not include its digest. The digest is
//! computed from the signed representation and acts as an implicit final
//! name component (see [`ContentObject::full_name`]).

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::name::{Name, NameComponent};

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// SHA-256 digest of a content object's signed representation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentDigest(pub Hash);

impl ContentDigest {
    /// The digest as a name component.
    pub fn as_component(&self) -> NameComponent {
        NameComponent::from(&self.0[..])
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Digest of the publisher's public key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublisherPublicKeyDigest(pub Hash);

impl fmt::Display for PublisherPublicKeyDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// What a [`PublisherId`] digest refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublisherKind {
    /// Digest of the publisher's public key.
    #[default]
    Key,
    /// Digest of the publisher's certificate.
    Certificate,
    /// Digest of the key of the publisher's issuer.
    IssuerKey,
    /// Digest of the certificate of the publisher's issuer.
    IssuerCertificate,
}

/// Publisher identity used in Interest constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublisherId {
    /// What the digest identifies.
    pub kind: PublisherKind,
    /// The identifying digest.
    pub digest: Hash,
}

impl PublisherId {
    /// Identity of the given kind.
    pub fn new(kind: PublisherKind, digest: Hash) -> Self {
        Self { kind, digest }
    }

    /// Identity naming a publisher key directly.
    pub fn from_key(key: PublisherPublicKeyDigest) -> Self {
        Self::new(PublisherKind::Key, key.0)
    }

    /// True if this identity's digest is the given publisher key digest.
    pub fn identifies(&self, key: &PublisherPublicKeyDigest) -> bool {
        self.digest == key.0
    }
}

/// Kind of payload carried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[default]
    Data,
    Encrypted,
    Gone,
    Key,
    Link,
    Nack,
}

/// Signed metadata of a content object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInfo {
    /// Digest of the signing key.
    pub publisher: PublisherPublicKeyDigest,
    /// Signing time, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Payload kind.
    pub content_type: ContentType,
    /// How long the object may be served from caches.
    pub freshness_seconds: Option<u32>,
    /// Segment component of the last segment of the enclosing object.
    pub final_block_id: Option<NameComponent>,
}

/// Signature block of a content object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Digest algorithm identifier (e.g. `"SHA-256"`).
    pub digest_algorithm: String,
    /// Merkle-path witness for aggregated signatures.
    pub witness: Option<Vec<u8>>,
    /// Signature bytes.
    pub bits: Vec<u8>,
}

/// Borrowed view hashed to produce the content digest.
#[derive(Serialize)]
struct SignedRepresentation<'a> {
    name: &'a Name,
    signed_info: &'a SignedInfo,
    content: &'a [u8],
    signature: &'a Signature,
}

/// Named, signed content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentObject {
    name: Name,
    signed_info: SignedInfo,
    content: Vec<u8>,
    signature: Signature,
}

impl ContentObject {
    /// Assemble an already-signed object.
    pub fn new(name: Name, signed_info: SignedInfo, content: Vec<u8>, signature: Signature) -> Self {
        Self {
            name,
            signed_info,
            content,
            signature,
        }
    }

    /// Start building an object published under `name`.
    pub fn builder(name: Name) -> ContentObjectBuilder {
        ContentObjectBuilder::new(name)
    }

    /// Name the object is published under (no digest component).
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Signed metadata.
    pub fn signed_info(&self) -> &SignedInfo {
        &self.signed_info
    }

    /// Publisher key digest.
    pub fn publisher(&self) -> &PublisherPublicKeyDigest {
        &self.signed_info.publisher
    }

    /// Payload bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Signature block.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// SHA-256 over the canonical encoding of the signed representation.
    pub fn digest(&self) -> ContentDigest {
        let repr = SignedRepresentation {
            name: &self.name,
            signed_info: &self.signed_info,
            content: &self.content,
            signature: &self.signature,
        };
        let encoded = bincode::serialize(&repr).unwrap_or_default();
        ContentDigest(Sha256::digest(&encoded).into())
    }

    /// The digest as a name component.
    pub fn digest_component(&self) -> NameComponent {
        self.digest().as_component()
    }

    /// Name extended with the implicit digest component.
    pub fn full_name(&self) -> Name {
        self.name.append(self.digest_component())
    }
}

/// Fluent builder for [`ContentObject`].
#[derive(Clone, Debug)]
pub struct ContentObjectBuilder {
    name: Name,
    signed_info: SignedInfo,
    content: Vec<u8>,
    signature: Signature,
}

impl ContentObjectBuilder {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            signed_info: SignedInfo::default(),
            content: Vec::new(),
            signature: Signature::default(),
        }
    }

    pub fn content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = content.into();
        self
    }

    pub fn publisher(mut self, publisher: PublisherPublicKeyDigest) -> Self {
        self.signed_info.publisher = publisher;
        self
    }

    pub fn timestamp_ms(mut self, timestamp_ms: u64) -> Self {
        self.signed_info.timestamp_ms = timestamp_ms;
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.signed_info.content_type = content_type;
        self
    }

    pub fn freshness_seconds(mut self, seconds: u32) -> Self {
        self.signed_info.freshness_seconds = Some(seconds);
        self
    }

    pub fn final_block_id(mut self, component: NameComponent) -> Self {
        self.signed_info.final_block_id = Some(component);
        self
    }

    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    pub fn build(self) -> ContentObject {
        ContentObject::new(self.name, self.signed_info, self.content, self.signature)
    }
}
