use std::collections::HashMap;
use std::collections::hash_map::Entry;

use patchwork_schema::{FieldTag, Value};

use crate::coerce::FieldCx;
use crate::error::ApplyError;
use crate::options::EmptyStringPolicy;

/// A field that receives values directly.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueField {
    pub tag: FieldTag,
    pub type_name: &'static str,
    pub empty_string: EmptyStringPolicy,
}

#[derive(Clone, Debug)]
pub enum FieldKind {
    Value(ValueField),
    /// An anonymous sub-record whose tags are promoted into the parent.
    Embedded(fn() -> &'static RecordSchema),
}

/// One declared field of a record, in declaration order.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub ident: &'static str,
    pub kind: FieldKind,
}

impl FieldDecl {
    pub fn value(
        ident: &'static str,
        tag: &str,
        type_name: &'static str,
        empty_string: EmptyStringPolicy,
    ) -> Self {
        Self {
            ident,
            kind: FieldKind::Value(ValueField {
                tag: FieldTag::from(tag),
                type_name,
                empty_string,
            }),
        }
    }

    pub fn embedded(ident: &'static str, schema: fn() -> &'static RecordSchema) -> Self {
        Self {
            ident,
            kind: FieldKind::Embedded(schema),
        }
    }

    pub fn tag(&self) -> Option<&FieldTag> {
        match &self.kind {
            FieldKind::Value(field) => Some(&field.tag),
            FieldKind::Embedded(_) => None,
        }
    }
}

/// Where a tag lands: the chain of field positions from the outer record
/// down to the record that declares the field.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedField {
    pub route: Vec<usize>,
    pub record: &'static str,
    pub ident: &'static str,
    pub field: ValueField,
}

impl ResolvedField {
    /// Number of embeddings crossed to reach the field.
    pub fn depth(&self) -> usize {
        self.route.len().saturating_sub(1)
    }
}

/// Tag registry of one record type.
///
/// Promoted tags never override a shallower field. Between fields at the
/// same depth the first declared one wins.
#[derive(Debug)]
pub struct RecordSchema {
    name: &'static str,
    fields: Vec<FieldDecl>,
    index: HashMap<FieldTag, ResolvedField>,
    shadowed: Vec<FieldTag>,
}

impl RecordSchema {
    pub fn new(name: &'static str, fields: Vec<FieldDecl>) -> Self {
        let mut index = HashMap::new();
        let mut shadowed = Vec::new();

        for (position, decl) in fields.iter().enumerate() {
            match &decl.kind {
                FieldKind::Value(field) => {
                    let candidate = ResolvedField {
                        route: vec![position],
                        record: name,
                        ident: decl.ident,
                        field: field.clone(),
                    };
                    register(&mut index, &mut shadowed, candidate);
                }
                FieldKind::Embedded(schema) => {
                    let embedded = schema();
                    for promoted in embedded.index.values() {
                        let mut route = Vec::with_capacity(promoted.route.len() + 1);
                        route.push(position);
                        route.extend_from_slice(&promoted.route);
                        let candidate = ResolvedField {
                            route,
                            ..promoted.clone()
                        };
                        register(&mut index, &mut shadowed, candidate);
                    }
                    shadowed.extend(embedded.shadowed.iter().cloned());
                }
            }
        }

        shadowed.sort();
        shadowed.dedup();
        if !shadowed.is_empty() {
            tracing::debug!(record = name, shadowed = ?shadowed, "field tags shadowed by other fields");
        }

        Self {
            name,
            fields,
            index,
            shadowed,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn resolve(&self, tag: &str) -> Option<&ResolvedField> {
        self.index.get(tag)
    }

    /// Every reachable tag, in declaration order.
    pub fn tags(&self) -> Vec<&FieldTag> {
        let mut resolved: Vec<_> = self.index.iter().collect();
        resolved.sort_by(|(_, a), (_, b)| a.route.cmp(&b.route));
        resolved.into_iter().map(|(tag, _)| tag).collect()
    }

    /// Tags declared more than once across the record and its embeddings.
    pub fn shadowed(&self) -> &[FieldTag] {
        &self.shadowed
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

// Candidates arrive in declaration order, so an existing entry always wins a tie.
fn register(
    index: &mut HashMap<FieldTag, ResolvedField>,
    shadowed: &mut Vec<FieldTag>,
    candidate: ResolvedField,
) {
    match index.entry(candidate.field.tag.clone()) {
        Entry::Vacant(slot) => {
            slot.insert(candidate);
        }
        Entry::Occupied(mut slot) => {
            shadowed.push(slot.key().clone());
            if candidate.route.len() < slot.get().route.len() {
                slot.insert(candidate);
            }
        }
    }
}

/// A record that change sets can be applied to.
///
/// Normally derived with `#[derive(Patchable)]`, which builds the schema
/// once per type and dispatches routes to fields.
pub trait Patchable {
    fn record_schema() -> &'static RecordSchema
    where
        Self: Sized;

    fn schema(&self) -> &'static RecordSchema;

    /// Assigns `value` to the field at `route`, coercing it on the way.
    fn apply_route(
        &mut self,
        route: &[usize],
        value: &Value,
        cx: &FieldCx<'_>,
    ) -> Result<(), ApplyError>;

    fn apply_changes(&mut self, changes: &patchwork_schema::ChangeSet) -> Result<(), ApplyError> {
        crate::apply::apply_changes(changes, self)
    }
}

impl<T: Patchable> Patchable for Box<T> {
    fn record_schema() -> &'static RecordSchema {
        T::record_schema()
    }

    fn schema(&self) -> &'static RecordSchema {
        (**self).schema()
    }

    fn apply_route(
        &mut self,
        route: &[usize],
        value: &Value,
        cx: &FieldCx<'_>,
    ) -> Result<(), ApplyError> {
        (**self).apply_route(route, value, cx)
    }
}
