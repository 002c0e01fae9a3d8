//! LSP meta-model catalog: strict decoding and reference resolution.
//!
//! The meta-model is the machine-readable description of the protocol's
//! type system: structures, enumerations, type aliases, and messages, with
//! every field type expressed as a recursive schema-node grammar keyed by a
//! `kind` discriminator. This module decodes the document into the
//! definition catalog and resolves symbolic references against it.

mod resolver;
mod spec;

pub use spec::{
    ArrayNode, BaseNode, Enumeration, LiteralNode, MapNode, MessageDirection, MetaData, Model,
    NodeMeta, Property, ReferenceNode, Request, ResolvedRef, SchemaKind, SchemaNode, SequenceNode,
    StringLiteralNode, Structure, TypeAlias,
};
