//! Flattened field listing for a record type.

use std::collections::VecDeque;

use hashbrown::HashSet;

use super::{FieldPath, RecordType, Shape};
use crate::annotation::{Annotation, FLATTEN};

/// One usable field reachable from a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct IntrospectedField {
    pub name: &'static str,
    pub shape: Shape,
    pub path: FieldPath,
    pub annotation: &'static str,
}

impl IntrospectedField {
    pub fn annotation(&self) -> Annotation {
        Annotation::parse(self.annotation)
    }
}

/// List every usable field of `ty`, descending into `flatten` fields.
///
/// Ignored fields (`-`) are dropped together with anything below them.
/// A flattened field contributes its fields, never itself. When two fields
/// share a name the shallower one is kept; at equal depth the one declared
/// first. The result is ordered by depth, then by path.
pub fn introspect(ty: RecordType) -> Vec<IntrospectedField> {
    let mut out: Vec<IntrospectedField> = Vec::new();
    let mut names: HashSet<&'static str> = HashSet::new();
    let mut visited: HashSet<RecordType> = HashSet::new();
    let mut queue: VecDeque<(RecordType, Option<FieldPath>)> = VecDeque::new();

    visited.insert(ty);
    queue.push_back((ty, None));

    // Breadth-first, so every depth is exhausted before the next begins.
    while let Some((current, prefix)) = queue.pop_front() {
        for (index, decl) in current.fields().into_iter().enumerate() {
            let annotation = Annotation::parse(decl.annotation);
            if annotation.is_ignored() {
                continue;
            }
            let path = match &prefix {
                Some(prefix) => prefix.child(index),
                None => FieldPath::root(index),
            };
            if annotation.has(FLATTEN) {
                if let Some(inner) = decl.shape.record_type() {
                    // A type already walked would only yield shadowed names.
                    if visited.insert(inner) {
                        queue.push_back((inner, Some(path)));
                    }
                    continue;
                }
            }
            if names.insert(decl.name) {
                out.push(IntrospectedField {
                    name: decl.name,
                    shape: decl.shape,
                    path,
                    annotation: decl.annotation,
                });
            }
        }
    }

    out.sort_by(|a, b| {
        a.path
            .depth()
            .cmp(&b.path.depth())
            .then_with(|| a.path.indices().cmp(b.path.indices()))
    });
    out
}
