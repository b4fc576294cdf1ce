//! Turns an inferred [`TypeNode`] tree into an Avro [`Schema`]

use std::collections::{BTreeMap, HashSet};

use apache_avro::schema::{
    ArraySchema, DecimalSchema, EnumSchema, Name, RecordField, RecordFieldOrder, RecordSchema,
    UnionSchema,
};
use serde_json::Value;

use super::Schema;
use super::error::MaterializeError;
use crate::inference::{SAMPLER_CAPACITY, TypeNode};

/// Schema materializer
///
/// Record and enum names come from the field they were found under; nested
/// records live in the namespace `{namespace}.{parent}`. Array elements and
/// union alternatives share their field's name, so a name that is already
/// taken in its namespace gets a numeric suffix (`address_2`).
#[derive(Debug, Clone)]
pub struct Materializer {
    docs: bool,
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Materializer {
    pub fn new() -> Self {
        Self { docs: true }
    }

    /// Whether fields get a doc string describing the sampled values
    pub fn with_docs(mut self, docs: bool) -> Self {
        self.docs = docs;
        self
    }

    /// Materialize `node` as a schema named `name`
    ///
    /// Records and enums fall back to the name stored in the node when `name`
    /// is `None`.
    pub fn materialize(
        &self,
        node: &TypeNode,
        name: Option<&str>,
        doc: Option<&str>,
        namespace: Option<&str>,
    ) -> Result<Schema, MaterializeError> {
        let mut names = HashSet::new();
        self.build(node, name, doc, namespace.filter(|ns| !ns.is_empty()), &mut names)
    }

    fn build(
        &self,
        node: &TypeNode,
        name: Option<&str>,
        doc: Option<&str>,
        namespace: Option<&str>,
        names: &mut HashSet<String>,
    ) -> Result<Schema, MaterializeError> {
        match node {
            TypeNode::Null { .. } => Ok(Schema::Null),
            TypeNode::Boolean(_) => Ok(Schema::Boolean),
            TypeNode::Int(_) => Ok(Schema::Int),
            TypeNode::Long(_) => Ok(Schema::Long),
            TypeNode::Float(_) => Ok(Schema::Float),
            TypeNode::Double(_) => Ok(Schema::Double),
            TypeNode::Bytes(_) => Ok(Schema::Bytes),
            TypeNode::String(_) => Ok(Schema::String),
            TypeNode::Decimal {
                scale, precision, ..
            } => Ok(Schema::Decimal(DecimalSchema {
                precision: *precision as usize,
                scale: *scale as usize,
                inner: Box::new(Schema::Bytes),
            })),
            TypeNode::Record {
                name: node_name,
                fields,
                ..
            } => {
                let name = name
                    .or(Some(node_name.as_str()))
                    .filter(|n| !n.is_empty())
                    .ok_or(MaterializeError::MissingName("record"))?;
                let name = claim_name(names, name, namespace);

                let child_namespace = match namespace {
                    Some(ns) => format!("{}.{}", ns, name.name),
                    None => name.name.clone(),
                };

                let fields = fields
                    .iter()
                    .enumerate()
                    .map(|(position, (field_name, child))| {
                        let schema = self.build(
                            child,
                            Some(field_name.as_str()),
                            None,
                            Some(&child_namespace),
                            names,
                        )?;
                        Ok(RecordField {
                            name: field_name.clone(),
                            doc: if self.docs { describe(child) } else { None },
                            aliases: None,
                            default: (child.is_null() || child.is_nullable_union())
                                .then_some(Value::Null),
                            schema,
                            order: RecordFieldOrder::Ascending,
                            position,
                            custom_attributes: BTreeMap::new(),
                        })
                    })
                    .collect::<Result<Vec<_>, MaterializeError>>()?;

                let lookup = fields
                    .iter()
                    .map(|field| (field.name.clone(), field.position))
                    .collect();

                Ok(Schema::Record(RecordSchema {
                    name,
                    aliases: None,
                    doc: doc.map(str::to_string),
                    fields,
                    lookup,
                    attributes: BTreeMap::new(),
                }))
            }
            TypeNode::Enum {
                name: node_name,
                symbols,
                ..
            } => {
                let name = name
                    .or(Some(node_name.as_str()))
                    .filter(|n| !n.is_empty())
                    .ok_or(MaterializeError::MissingName("enum"))?;

                Ok(Schema::Enum(EnumSchema {
                    name: claim_name(names, name, namespace),
                    aliases: None,
                    doc: if self.docs { describe(node) } else { None },
                    symbols: symbols.iter().cloned().collect(),
                    default: None,
                    attributes: BTreeMap::new(),
                }))
            }
            TypeNode::Array(element) => {
                let items = match element {
                    Some(element) => self.build(element, name, None, namespace, names)?,
                    None => Schema::Null,
                };
                Ok(Schema::Array(ArraySchema {
                    items: Box::new(items),
                    attributes: BTreeMap::new(),
                }))
            }
            TypeNode::Union(alternatives) => {
                let alternatives = alternatives
                    .iter()
                    .map(|alternative| self.build(alternative, name, None, namespace, names))
                    .collect::<Result<Vec<_>, _>>()?;
                UnionSchema::new(alternatives)
                    .map(Schema::Union)
                    .map_err(|e| MaterializeError::InvalidUnion(e.to_string()))
            }
        }
    }
}

/// Reserve a full name in `namespace`, suffixing `_2`, `_3`, ... while it is taken
fn claim_name(names: &mut HashSet<String>, name: &str, namespace: Option<&str>) -> Name {
    let full_name = |candidate: &str| match namespace {
        Some(ns) => format!("{}.{}", ns, candidate),
        None => candidate.to_string(),
    };

    let mut candidate = name.to_string();
    let mut suffix = 1;
    while !names.insert(full_name(&candidate)) {
        suffix += 1;
        candidate = format!("{}_{}", name, suffix);
    }

    Name {
        name: candidate,
        namespace: namespace.map(str::to_string),
    }
}

/// Materialize with field documentation enabled
pub fn materialize(
    node: &TypeNode,
    name: Option<&str>,
    doc: Option<&str>,
    namespace: Option<&str>,
) -> Result<Schema, MaterializeError> {
    Materializer::new().materialize(node, name, doc, namespace)
}

/// Human readable summary of the values sampled for a node
pub fn describe(node: &TypeNode) -> Option<String> {
    let counts = node.example_counts();
    let samples = counts
        .iter()
        .map(|(_, text)| text.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    match counts.len() {
        0 => None,
        1 => Some(format!("Always this value: {}", samples)),
        n if n < SAMPLER_CAPACITY => {
            let total: u64 = counts.iter().map(|(count, _)| count).sum();
            let shares = counts
                .iter()
                .map(|(count, _)| format!("{:.1}%", *count as f64 / total.max(1) as f64 * 100.0))
                .collect::<Vec<_>>()
                .join(", ");
            Some(format!("({}) All samples: {}", shares, samples))
        }
        _ => Some(format!("Most common samples: {}", samples)),
    }
}
