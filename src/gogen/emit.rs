//! Streaming Go struct declaration emitter.

use std::collections::HashSet;
use std::io::Write;

use tracing::debug;

use crate::error::Error;
use crate::gogen::ident::go_pascal;
use crate::metamodel::{Model, Property, ResolvedRef, SchemaKind, Structure};

/// Go spellings for the meta-model's base primitives. Unmapped bases fail
/// with [`Error::UnsupportedBaseType`] rather than guessing.
const GO_BASE_TYPES: &[(&str, &str)] = &[("string", "string")];

fn go_base_type(name: &str) -> Option<&'static str> {
    GO_BASE_TYPES
        .iter()
        .find(|(base, _)| *base == name)
        .map(|(_, go)| *go)
}

/// Prints Go struct declarations for a structure and every structure it
/// references, depth-first, directly to the output stream.
///
/// Referenced structures are printed before the structure that uses them,
/// and each structure is printed at most once. A structure currently being
/// printed is referenced by name only, which is what terminates
/// self-referential and mutually recursive definitions.
pub struct GoPrinter<'m, W> {
    model: &'m Model,
    out: W,
    emitted: HashSet<String>,
}

impl<W> std::fmt::Debug for GoPrinter<'_, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoPrinter")
            .field("emitted", &self.emitted)
            .finish_non_exhaustive()
    }
}

impl<'m, W: Write> GoPrinter<'m, W> {
    pub fn new(model: &'m Model, out: W) -> Self {
        Self {
            model,
            out,
            emitted: HashSet::new(),
        }
    }

    /// Resolves the named structure and prints its declaration, preceded by
    /// the declarations of any structures its fields reference.
    pub fn print_structure(&mut self, name: &str) -> Result<(), Error> {
        let model = self.model;
        let structure = model.resolve_structure(name)?;
        self.print_resolved(structure)
    }

    fn print_resolved(&mut self, structure: &'m Structure) -> Result<(), Error> {
        if !self.emitted.insert(structure.name.clone()) {
            return Ok(());
        }
        debug!(name = %structure.name, "Emitting struct declaration.");

        // Field types are computed before the header is written, so that
        // declarations of referenced structures land above this one.
        let mut fields = Vec::with_capacity(structure.properties.len());
        for property in &structure.properties {
            fields.push(self.field(property)?);
        }

        writeln!(self.out, "type {} struct {{", structure.name)?;
        for field in fields {
            writeln!(self.out, "\t{field}")?;
        }
        writeln!(self.out, "}}")?;
        Ok(())
    }

    fn field(&mut self, property: &'m Property) -> Result<String, Error> {
        let go_type = self.field_type(property)?;
        let tag = if property.optional {
            format!("{},omitempty", property.name)
        } else {
            property.name.clone()
        };
        Ok(format!(
            "{} {} `json:\"{}\"`",
            go_pascal(&property.name),
            go_type,
            tag
        ))
    }

    fn field_type(&mut self, property: &'m Property) -> Result<String, Error> {
        let model = self.model;
        match &property.ty.kind {
            SchemaKind::Base(base) => match go_base_type(&base.name) {
                Some(go) => Ok(go.to_string()),
                None => Err(Error::UnsupportedBaseType {
                    name: base.name.clone(),
                }),
            },
            SchemaKind::Reference(reference) => {
                let resolved = reference.resolved.get().copied().ok_or_else(|| {
                    Error::ReferenceNotFound {
                        name: reference.name.clone(),
                    }
                })?;
                match resolved {
                    ResolvedRef::Structure(idx) => {
                        let target = &model.structures[idx];
                        self.print_structure(&target.name)?;
                        Ok(format!("*{}", target.name))
                    }
                    ResolvedRef::Enumeration(idx) => Ok(model.enumerations[idx].name.clone()),
                    ResolvedRef::TypeAlias(idx) => Ok(model.type_aliases[idx].name.clone()),
                }
            }
            _ => Err(Error::UnsupportedKind {
                kind: property.ty.kind_name(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn model(json: &str) -> Model {
        serde_json::from_str(json).expect("fixture should decode")
    }

    fn generate(model: &Model, name: &str) -> Result<String, Error> {
        let mut out = Vec::new();
        GoPrinter::new(model, &mut out).print_structure(name)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn prints_fields_in_source_order_with_tags() {
        let model = model(
            r#"{
                "metaData": { "version": "3.17.0" },
                "structures": [
                    { "name": "Position", "properties": [
                        { "name": "line", "type": { "kind": "base", "name": "string" } },
                        { "name": "character",
                          "type": { "kind": "base", "name": "string" },
                          "optional": true }
                    ] }
                ]
            }"#,
        );
        let out = generate(&model, "Position").unwrap();
        assert_eq!(
            out,
            "type Position struct {\n\
             \tLine string `json:\"line\"`\n\
             \tCharacter string `json:\"character,omitempty\"`\n\
             }\n"
        );
    }

    #[test]
    fn referenced_structures_print_first_and_exactly_once() {
        let model = model(
            r#"{
                "metaData": { "version": "3.17.0" },
                "structures": [
                    { "name": "Range", "properties": [
                        { "name": "start", "type": { "kind": "reference", "name": "Position" } },
                        { "name": "end", "type": { "kind": "reference", "name": "Position" } }
                    ] },
                    { "name": "Position", "properties": [
                        { "name": "line", "type": { "kind": "base", "name": "string" } }
                    ] }
                ]
            }"#,
        );
        let out = generate(&model, "Range").unwrap();
        assert_eq!(
            out,
            "type Position struct {\n\
             \tLine string `json:\"line\"`\n\
             }\n\
             type Range struct {\n\
             \tStart *Position `json:\"start\"`\n\
             \tEnd *Position `json:\"end\"`\n\
             }\n"
        );
    }

    #[test]
    fn enumerations_and_aliases_are_named_not_expanded() {
        let model = model(
            r#"{
                "metaData": { "version": "3.17.0" },
                "structures": [
                    { "name": "Diagnostic", "properties": [
                        { "name": "severity",
                          "type": { "kind": "reference", "name": "DiagnosticSeverity" },
                          "optional": true },
                        { "name": "source",
                          "type": { "kind": "reference", "name": "DocumentUri" } }
                    ] }
                ],
                "enumerations": [
                    { "name": "DiagnosticSeverity",
                      "type": { "kind": "base", "name": "uinteger" },
                      "values": [ { "name": "Error", "value": 1 } ] }
                ],
                "typeAliases": [
                    { "name": "DocumentUri", "type": { "kind": "base", "name": "string" } }
                ]
            }"#,
        );
        let out = generate(&model, "Diagnostic").unwrap();
        assert_eq!(
            out,
            "type Diagnostic struct {\n\
             \tSeverity DiagnosticSeverity `json:\"severity,omitempty\"`\n\
             \tSource DocumentUri `json:\"source\"`\n\
             }\n"
        );
    }

    #[test]
    fn self_reference_terminates() {
        let model = model(
            r#"{
                "metaData": { "version": "3.17.0" },
                "structures": [
                    { "name": "Node", "properties": [
                        { "name": "parent",
                          "type": { "kind": "reference", "name": "Node" },
                          "optional": true }
                    ] }
                ]
            }"#,
        );
        let out = generate(&model, "Node").unwrap();
        assert_eq!(
            out,
            "type Node struct {\n\
             \tParent *Node `json:\"parent,omitempty\"`\n\
             }\n"
        );
    }

    #[test]
    fn mutual_recursion_terminates() {
        let model = model(
            r#"{
                "metaData": { "version": "3.17.0" },
                "structures": [
                    { "name": "Ping", "properties": [
                        { "name": "pong", "type": { "kind": "reference", "name": "Pong" } }
                    ] },
                    { "name": "Pong", "properties": [
                        { "name": "ping", "type": { "kind": "reference", "name": "Ping" } }
                    ] }
                ]
            }"#,
        );
        let out = generate(&model, "Ping").unwrap();
        // Ping is claimed before its fields are computed, so Pong's
        // back-reference does not recurse into it again.
        assert_eq!(
            out,
            "type Pong struct {\n\
             \tPing *Ping `json:\"ping\"`\n\
             }\n\
             type Ping struct {\n\
             \tPong *Pong `json:\"pong\"`\n\
             }\n"
        );
    }

    #[test]
    fn structure_wins_collision_with_enumeration() {
        let model = model(
            r#"{
                "metaData": { "version": "3.17.0" },
                "structures": [
                    { "name": "Root", "properties": [
                        { "name": "color", "type": { "kind": "reference", "name": "Color" } }
                    ] },
                    { "name": "Color", "properties": [] }
                ],
                "enumerations": [
                    { "name": "Color",
                      "type": { "kind": "base", "name": "string" },
                      "values": [] }
                ]
            }"#,
        );
        let out = generate(&model, "Root").unwrap();
        assert!(out.contains("Color *Color `json:\"color\"`"), "{out}");
        assert!(out.starts_with("type Color struct {"), "{out}");
    }

    #[test]
    fn unmapped_base_type_fails_loudly() {
        let model = model(
            r#"{
                "metaData": { "version": "3.17.0" },
                "structures": [
                    { "name": "Position", "properties": [
                        { "name": "line", "type": { "kind": "base", "name": "uinteger" } }
                    ] }
                ]
            }"#,
        );
        match generate(&model, "Position") {
            Err(Error::UnsupportedBaseType { name }) => assert_eq!(name, "uinteger"),
            other => panic!("expected UnsupportedBaseType, got {other:?}"),
        }
    }

    #[test]
    fn composite_kind_in_field_position_fails_loudly() {
        let model = model(
            r#"{
                "metaData": { "version": "3.17.0" },
                "structures": [
                    { "name": "Report", "properties": [
                        { "name": "items", "type": { "kind": "array",
                          "element": { "kind": "base", "name": "string" } } }
                    ] }
                ]
            }"#,
        );
        match generate(&model, "Report") {
            Err(Error::UnsupportedKind { kind }) => assert_eq!(kind, "array"),
            other => panic!("expected UnsupportedKind, got {other:?}"),
        }
    }

    #[test]
    fn missing_reference_carries_the_name() {
        let model = model(
            r#"{
                "metaData": { "version": "3.17.0" },
                "structures": [
                    { "name": "Broken", "properties": [
                        { "name": "x", "type": { "kind": "reference", "name": "Gone" } }
                    ] }
                ]
            }"#,
        );
        match generate(&model, "Broken") {
            Err(Error::ReferenceNotFound { name }) => assert_eq!(name, "Gone"),
            other => panic!("expected ReferenceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn unknown_structure_fails_before_any_output() {
        let model = model(r#"{ "metaData": { "version": "3.17.0" } }"#);
        let mut out = Vec::new();
        match GoPrinter::new(&model, &mut out).print_structure("Missing") {
            Err(Error::StructureNotFound { name }) => assert_eq!(name, "Missing"),
            other => panic!("expected StructureNotFound, got {other:?}"),
        }
        assert!(out.is_empty());
    }
}
