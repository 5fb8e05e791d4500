use patchwork_schema::{ChangeSet, Value};

use crate::coerce::FieldCx;
use crate::error::ApplyError;
use crate::options::ApplyOptions;
use crate::schema::{Patchable, ResolvedField};

/// Applies change sets onto records, touching only the tagged fields.
///
/// Changes are applied in the record's declaration order. The call is not
/// atomic: when a change fails to coerce, fields declared before it keep
/// their new values.
#[derive(Clone, Debug, Default)]
pub struct ChangeApplicator {
    options: ApplyOptions,
}

impl ChangeApplicator {
    pub fn new(options: ApplyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ApplyOptions {
        &self.options
    }

    pub fn apply<R>(&self, changes: &ChangeSet, record: &mut R) -> Result<(), ApplyError>
    where
        R: Patchable + ?Sized,
    {
        let schema = record.schema();
        let mut planned: Vec<(&ResolvedField, &Value)> = Vec::with_capacity(changes.len());

        for (tag, value) in changes {
            match schema.resolve(tag) {
                Some(resolved) => planned.push((resolved, value)),
                None if self.options.reject_unknown_fields => {
                    return Err(ApplyError::UnknownField {
                        record: schema.name(),
                        tag: tag.clone(),
                    });
                }
                None => {
                    tracing::trace!(record = schema.name(), tag = %tag, "no field for change, skipping");
                }
            }
        }

        planned.sort_by(|(a, _), (b, _)| a.route.cmp(&b.route));
        for (resolved, value) in &planned {
            let cx = FieldCx::new(resolved, &self.options);
            record.apply_route(&resolved.route, value, &cx)?;
        }

        tracing::debug!(
            record = schema.name(),
            applied = planned.len(),
            skipped = changes.len() - planned.len(),
            "applied change set"
        );
        Ok(())
    }

    /// Like [`apply`](Self::apply) for callers whose record may be absent.
    pub fn apply_to<R: Patchable>(
        &self,
        changes: &ChangeSet,
        record: Option<&mut R>,
    ) -> Result<(), ApplyError> {
        match record {
            Some(record) => self.apply(changes, record),
            None => Err(ApplyError::InvalidTarget {
                record: std::any::type_name::<R>(),
                reason: "no record to apply changes to".to_string(),
            }),
        }
    }
}

/// Applies `changes` onto `record` with default options.
pub fn apply_changes<R>(changes: &ChangeSet, record: &mut R) -> Result<(), ApplyError>
where
    R: Patchable + ?Sized,
{
    ChangeApplicator::default().apply(changes, record)
}
