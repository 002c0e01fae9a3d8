//! Error types for meta-model fetching, decoding, resolution, and emission.

use thiserror::Error;

/// Error type for the fetch → decode → resolve → emit pipeline.
///
/// Every variant is fatal: errors propagate unchanged to the process
/// boundary, which reports them and exits non-zero. There is no retry,
/// partial-result, or default-substitution path.
#[derive(Debug, Error)]
pub enum Error {
    /// The meta-model document could not be fetched.
    #[error("failed to fetch meta-model: {0}")]
    Transport(#[from] reqwest::Error),

    /// The meta-model document failed strict decoding.
    #[error("failed to decode meta-model: {0}")]
    Decode(#[from] serde_json::Error),

    /// A reference names a definition absent from the structure,
    /// enumeration, and type-alias namespaces.
    #[error("reference not found: {name}")]
    ReferenceNotFound {
        /// The unresolvable reference name.
        name: String,
    },

    /// The requested structure is not in the catalog.
    #[error("structure not found: {name}")]
    StructureNotFound {
        /// The requested structure name.
        name: String,
    },

    /// A base primitive has no Go spelling in the mapping table yet.
    #[error("no Go type mapping for base type '{name}'")]
    UnsupportedBaseType {
        /// The unmapped base type name.
        name: String,
    },

    /// A schema kind has no emission rule in field position.
    #[error("cannot emit schema kind '{kind}' in field position")]
    UnsupportedKind {
        /// The wire discriminator of the unsupported kind.
        kind: &'static str,
    },

    /// Writing to the output stream failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
