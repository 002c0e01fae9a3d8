//! Reference resolution over the decoded catalog.
//!
//! Resolution walks a schema node tree and, for every `reference` node it
//! finds, looks the name up in the catalog and stores an index handle on the
//! node. It is a one-time enrichment: handles are populated lazily the first
//! time a structure is requested and are never invalidated.

use tracing::debug;

use super::spec::{Model, ResolvedRef, SchemaKind, SchemaNode, Structure};
use crate::error::Error;

impl Model {
    /// Looks up a definition by name across the combined namespace.
    ///
    /// Structures are scanned first, then enumerations, then type aliases,
    /// and the first match wins. A name should not appear in more than one
    /// category, but if it does, this scan order is the precedence.
    pub fn lookup(&self, name: &str) -> Option<ResolvedRef> {
        if let Some(idx) = self.structures.iter().position(|s| s.name == name) {
            return Some(ResolvedRef::Structure(idx));
        }
        if let Some(idx) = self.enumerations.iter().position(|e| e.name == name) {
            return Some(ResolvedRef::Enumeration(idx));
        }
        if let Some(idx) = self.type_aliases.iter().position(|a| a.name == name) {
            return Some(ResolvedRef::TypeAlias(idx));
        }
        None
    }

    /// Resolves every `reference` node reachable from `node` through
    /// array/map/or/and/tuple composition. Base, string-literal, and
    /// literal nodes are leaves.
    ///
    /// Fails with [`Error::ReferenceNotFound`] on the first name that has no
    /// definition; it does not collect every broken reference in one pass.
    /// Does not descend into the referenced definitions themselves.
    pub fn resolve(&self, node: &SchemaNode) -> Result<(), Error> {
        match &node.kind {
            SchemaKind::Reference(reference) => {
                if reference.resolved.get().is_none() {
                    let found =
                        self.lookup(&reference.name)
                            .ok_or_else(|| Error::ReferenceNotFound {
                                name: reference.name.clone(),
                            })?;
                    // Lookup is deterministic, so a second resolution of the
                    // same node stores the same handle.
                    let _ = reference.resolved.set(found);
                }
                Ok(())
            }
            SchemaKind::Array(array) => self.resolve(&array.element),
            SchemaKind::Map(map) => {
                self.resolve(&map.key)?;
                self.resolve(&map.value)
            }
            SchemaKind::Or(seq) | SchemaKind::And(seq) | SchemaKind::Tuple(seq) => {
                for item in &seq.items {
                    self.resolve(item)?;
                }
                Ok(())
            }
            SchemaKind::Base(_) | SchemaKind::StringLiteral(_) | SchemaKind::Literal(_) => Ok(()),
        }
    }

    /// Looks up a structure by name and resolves every reference reachable
    /// from its properties, its `extends` list, and its `mixins` list.
    pub fn resolve_structure(&self, name: &str) -> Result<&Structure, Error> {
        let structure = self
            .structures
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::StructureNotFound {
                name: name.to_string(),
            })?;
        debug!(name, properties = structure.properties.len(), "Resolving structure.");
        for node in structure.extends.iter().chain(&structure.mixins) {
            self.resolve(node)?;
        }
        for property in &structure.properties {
            self.resolve(&property.ty)?;
        }
        Ok(structure)
    }
}
