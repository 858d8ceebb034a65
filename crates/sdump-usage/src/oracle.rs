//! Field-visibility oracle
//!
//! Answers whether a script's source declares state the editor would expose
//! on its component: a `public` field or one marked `[SerializeField]`.
//!
//! [`CSharpFieldOracle`] parses sources with tree-sitter's C# grammar.
//! Sources with syntax errors are refused rather than guessed at.

use crate::error::OracleError;
use std::fs;
use std::path::Path;
use tree_sitter::{Node, Parser};

const PUBLIC_MODIFIER: &str = "public";
const SERIALIZE_ATTRIBUTE: &str = "SerializeField";
const ATTRIBUTE_SUFFIX: &str = "Attribute";

/// Decides whether a script source exposes fields
#[cfg_attr(test, mockall::automock)]
pub trait FieldVisibilityOracle: Send + Sync {
    /// Whether any class in `source` has an exposed field
    ///
    /// # Errors
    /// When the source cannot be read or understood.
    fn has_exposed_field(&self, source: &Path) -> Result<bool, OracleError>;
}

/// tree-sitter backed oracle for C# scripts
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpFieldOracle;

impl CSharpFieldOracle {
    /// Create oracle
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Names of exposed fields, in source order
    ///
    /// Only fields declared directly in a class body count; properties and
    /// locals never do. `path` is used for error context only.
    ///
    /// # Errors
    /// [`OracleError::Syntax`] when the parse tree contains errors.
    pub fn exposed_fields(&self, path: &Path, source: &str) -> Result<Vec<String>, OracleError> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_c_sharp::LANGUAGE.into())?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| OracleError::ParseAborted {
                path: path.to_path_buf(),
            })?;
        let root = tree.root_node();

        if let Some(error) = first_error(root) {
            return Err(OracleError::Syntax {
                path: path.to_path_buf(),
                line: error.start_position().row + 1,
            });
        }

        let bytes = source.as_bytes();
        let mut classes = Vec::new();
        collect_kind(root, "class_declaration", &mut classes);

        let mut fields = Vec::new();
        for class in classes {
            let Some(body) = class.child_by_field_name("body") else {
                continue;
            };
            let mut cursor = body.walk();
            for member in body.children(&mut cursor) {
                if member.kind() == "field_declaration" && is_exposed(member, bytes) {
                    fields.extend(declared_names(member, bytes));
                }
            }
        }

        Ok(fields)
    }
}

impl FieldVisibilityOracle for CSharpFieldOracle {
    fn has_exposed_field(&self, source: &Path) -> Result<bool, OracleError> {
        let text = fs::read_to_string(source).map_err(|e| OracleError::io_error(source, e))?;
        let fields = self.exposed_fields(source, &text)?;
        tracing::debug!(source = %source.display(), exposed = fields.len(), "inspected script source");
        Ok(!fields.is_empty())
    }
}

fn node_text<'s>(node: Node<'_>, bytes: &'s [u8]) -> &'s str {
    node.utf8_text(bytes).unwrap_or_default()
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found.or(Some(node))
}

fn collect_kind<'t>(node: Node<'t>, kind: &str, out: &mut Vec<Node<'t>>) {
    if node.kind() == kind {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_kind(child, kind, out);
    }
}

fn is_exposed(field: Node<'_>, bytes: &[u8]) -> bool {
    let mut cursor = field.walk();
    let exposed = field.children(&mut cursor).any(|child| match child.kind() {
        "modifier" => node_text(child, bytes) == PUBLIC_MODIFIER,
        "attribute_list" => has_serialize_attribute(child, bytes),
        _ => false,
    });
    exposed
}

fn has_serialize_attribute(list: Node<'_>, bytes: &[u8]) -> bool {
    let mut cursor = list.walk();
    let marked = list
        .children(&mut cursor)
        .filter(|child| child.kind() == "attribute")
        .filter_map(|attribute| attribute.child_by_field_name("name"))
        .any(|name| is_serialize_name(node_text(name, bytes)));
    marked
}

/// `SerializeField`, `SerializeFieldAttribute`, optionally namespace-qualified
fn is_serialize_name(name: &str) -> bool {
    let last = name.rsplit('.').next().unwrap_or(name).trim();
    let last = last.strip_suffix(ATTRIBUTE_SUFFIX).unwrap_or(last);
    last == SERIALIZE_ATTRIBUTE
}

fn declared_names(field: Node<'_>, bytes: &[u8]) -> Vec<String> {
    let mut declarators = Vec::new();
    collect_kind(field, "variable_declarator", &mut declarators);
    declarators
        .into_iter()
        .filter_map(|declarator| {
            declarator.child_by_field_name("name").or_else(|| {
                let mut cursor = declarator.walk();
                let name = declarator
                    .named_children(&mut cursor)
                    .find(|child| child.kind() == "identifier");
                name
            })
        })
        .map(|name| node_text(name, bytes).to_string())
        .collect()
}
