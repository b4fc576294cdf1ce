//! Type widening
//!
//! [`widen`] merges two type trees into the least specific type able to
//! represent both. It is total: pairs without a dedicated rule become a
//! union, which makes it safe to fold over any stream of examples.

use std::collections::BTreeMap;

use super::types::{TypeKind, TypeNode};

/// Scale and precision needed to hold every value of a narrower numeric kind
///
/// Derived from each kind's largest magnitude with negative scales expanded:
/// `i32::MAX` has 10 digits, `i64::MAX` 19, `f32::MAX` (3.4028235E38) 39
/// and `f64::MAX` (1.7976931348623157E308) 309.
fn numeric_bounds(kind: TypeKind) -> (u32, u32) {
    match kind {
        TypeKind::Int => (0, 10),
        TypeKind::Long => (0, 19),
        TypeKind::Float => (0, 39),
        TypeKind::Double => (0, 309),
        _ => (0, 0),
    }
}

/// Smallest `(scale, precision)` holding both decimal shapes
///
/// Keeps the wider integer part and the wider fraction, so `decimal(10, 0)`
/// and `decimal(7, 6)` give `decimal(16, 6)`.
fn decimal_bounds((s1, p1): (u32, u32), (s2, p2): (u32, u32)) -> (u32, u32) {
    let scale = s1.max(s2);
    let integer_digits = p1.saturating_sub(s1).max(p2.saturating_sub(s2));
    (scale, integer_digits + scale)
}

/// Merge two types into one able to represent both
///
/// The pair is first ordered by [`TypeKind`] rank so that every rule only
/// has to handle `(lower, higher)`, which keeps widening commutative.
pub fn widen(a: &TypeNode, b: &TypeNode) -> TypeNode {
    let (t1, t2) = if a.kind() <= b.kind() { (a, b) } else { (b, a) };

    match (t1, t2) {
        (TypeNode::Null { count: c1 }, TypeNode::Null { count: c2 }) => {
            TypeNode::Null { count: c1 + c2 }
        }
        (TypeNode::Boolean(x), TypeNode::Boolean(y)) => TypeNode::Boolean(x.merge(y)),

        // Numeric promotion
        (TypeNode::Int(x), TypeNode::Int(y)) => TypeNode::Int(x.merge_numeric(y)),
        (TypeNode::Int(x) | TypeNode::Long(x), TypeNode::Long(y)) => {
            TypeNode::Long(x.merge_numeric(y))
        }
        (TypeNode::Float(x), TypeNode::Float(y)) => TypeNode::Float(x.merge_numeric(y)),
        (TypeNode::Int(x) | TypeNode::Long(x), TypeNode::Float(y))
        | (
            TypeNode::Int(x) | TypeNode::Long(x) | TypeNode::Float(x) | TypeNode::Double(x),
            TypeNode::Double(y),
        ) => TypeNode::Double(x.merge_numeric(y)),
        (
            TypeNode::Decimal {
                scale: s1,
                precision: p1,
                samples: x,
            },
            TypeNode::Decimal {
                scale: s2,
                precision: p2,
                samples: y,
            },
        ) => {
            let (scale, precision) = decimal_bounds((*s1, *p1), (*s2, *p2));
            TypeNode::Decimal {
                scale,
                precision,
                samples: x.merge_numeric(y),
            }
        }
        (
            TypeNode::Int(x) | TypeNode::Long(x) | TypeNode::Float(x) | TypeNode::Double(x),
            TypeNode::Decimal {
                scale,
                precision,
                samples,
            },
        ) => {
            let (scale, precision) = decimal_bounds(numeric_bounds(t1.kind()), (*scale, *precision));
            TypeNode::Decimal {
                scale,
                precision,
                samples: x.merge_numeric(samples),
            }
        }

        (TypeNode::Bytes(x), TypeNode::Bytes(y)) => TypeNode::Bytes(x.merge(y)),
        (TypeNode::String(x), TypeNode::String(y)) => TypeNode::String(x.merge(y)),
        // A free-form string breaks the closed symbol set
        (TypeNode::String(x), TypeNode::Enum { samples, .. }) => TypeNode::String(x.merge(samples)),

        (
            TypeNode::Record {
                count: c1,
                name: n1,
                fields: f1,
            },
            TypeNode::Record {
                count: c2,
                name: n2,
                fields: f2,
            },
        ) => TypeNode::Record {
            count: c1 + c2,
            name: n1.min(n2).clone(),
            fields: merge_fields((f1, *c1), (f2, *c2)),
        },

        (
            TypeNode::Enum {
                name: n1,
                symbols: s1,
                samples: x,
            },
            TypeNode::Enum {
                name: n2,
                symbols: s2,
                samples: y,
            },
        ) if n1 == n2 => TypeNode::Enum {
            name: n1.clone(),
            symbols: s1.union(s2).cloned().collect(),
            samples: x.merge(y),
        },

        (TypeNode::Array(e1), TypeNode::Array(e2)) => match (e1, e2) {
            (Some(x), Some(y)) => TypeNode::Array(Some(Box::new(widen(x, y)))),
            (Some(x), None) | (None, Some(x)) => TypeNode::Array(Some(x.clone())),
            (None, None) => TypeNode::Array(None),
        },

        _ => union(t1, t2),
    }
}

impl TypeNode {
    /// Method form of [`widen`]
    pub fn widen(&self, other: &TypeNode) -> TypeNode {
        widen(self, other)
    }
}

/// Union of two field maps; fields missing on one side become nullable
///
/// Each side comes with the number of records it was built from. A field
/// missing on one side was absent from that many records, which becomes the
/// count of its `null` alternative.
fn merge_fields(
    (left, left_count): (&BTreeMap<String, TypeNode>, u64),
    (right, right_count): (&BTreeMap<String, TypeNode>, u64),
) -> BTreeMap<String, TypeNode> {
    let mut merged = BTreeMap::new();

    for (name, field) in left {
        let widened = match right.get(name) {
            Some(other) => widen(field, other),
            None => optional(field, right_count),
        };
        merged.insert(name.clone(), widened);
    }
    for (name, field) in right {
        if !left.contains_key(name) {
            merged.insert(name.clone(), optional(field, left_count));
        }
    }

    merged
}

fn optional(field: &TypeNode, absent: u64) -> TypeNode {
    union(field, &TypeNode::Null { count: absent })
}

/// Whether two union alternatives collapse into one when widened
fn mergeable(a: &TypeNode, b: &TypeNode) -> bool {
    let (ka, kb) = (a.kind(), b.kind());
    if ka.is_numeric() && kb.is_numeric() {
        return true;
    }

    match (a, b) {
        (TypeNode::Enum { name: n1, .. }, TypeNode::Enum { name: n2, .. }) => n1 == n2,
        (TypeNode::String(_), TypeNode::Enum { .. }) | (TypeNode::Enum { .. }, TypeNode::String(_)) => {
            true
        }
        _ => ka == kb && ka != TypeKind::Union,
    }
}

/// Build a union holding the alternatives of both sides
///
/// Nested unions are flattened, alternatives that widen into one another are
/// merged, and the result is ordered by rank so `null` always comes first.
fn union(a: &TypeNode, b: &TypeNode) -> TypeNode {
    let mut alternatives: Vec<TypeNode> = Vec::new();

    for alternative in flatten(a).chain(flatten(b)) {
        let mut merged = alternative.clone();
        alternatives.retain(|existing| {
            if mergeable(existing, &merged) {
                merged = widen(existing, &merged);
                false
            } else {
                true
            }
        });
        alternatives.push(merged);
    }

    alternatives.sort_by(|x, y| x.kind().cmp(&y.kind()).then_with(|| x.name().cmp(&y.name())));

    if alternatives.len() == 1 {
        return alternatives.remove(0);
    }
    TypeNode::Union(alternatives)
}

fn flatten(node: &TypeNode) -> Box<dyn Iterator<Item = &TypeNode> + '_> {
    match node {
        TypeNode::Union(alternatives) => Box::new(alternatives.iter()),
        other => Box::new(std::iter::once(other)),
    }
}
