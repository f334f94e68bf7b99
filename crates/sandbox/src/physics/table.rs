use std::fmt;

use thiserror::Error;

use super::body::AttributeVector;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid physics preset '{name}'")]
pub struct InvalidPresetError {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("preset '{preset}' is declared more than once (entries {first_index} and {second_index})")]
pub struct DuplicatePresetError {
    pub preset: String,
    pub first_index: usize,
    pub second_index: usize,
}

/// Ordered mapping from presets to attribute vectors.
///
/// Declaration order is the reverse-lookup tie-break: when two presets share
/// an attribute vector, [`PresetTable::resolve`] returns the earlier one.
#[derive(Debug, Clone, Copy)]
pub struct PresetTable<'a, P, A> {
    entries: &'a [(P, A)],
}

impl<'a, P, A> PresetTable<'a, P, A>
where
    P: Copy + PartialEq + fmt::Display,
    A: Copy + PartialEq,
{
    pub fn new(entries: &'a [(P, A)]) -> Result<Self, DuplicatePresetError> {
        for (second_index, (preset, _)) in entries.iter().enumerate() {
            if let Some(first_index) = entries[..second_index]
                .iter()
                .position(|(earlier, _)| earlier == preset)
            {
                return Err(DuplicatePresetError {
                    preset: preset.to_string(),
                    first_index,
                    second_index,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Caller guarantees `entries` has no repeated preset.
    pub(crate) const fn from_unique(entries: &'a [(P, A)]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'a [(P, A)] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn presets(&self) -> impl Iterator<Item = P> + 'a {
        self.entries.iter().map(|(preset, _)| *preset)
    }

    pub fn attributes_of(&self, preset: P) -> Option<A> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == preset)
            .map(|(_, attributes)| *attributes)
    }

    /// First declared preset whose attribute vector equals `attributes`.
    pub fn resolve(&self, attributes: &A) -> Option<P> {
        self.entries
            .iter()
            .find(|(_, candidate)| candidate == attributes)
            .map(|(preset, _)| *preset)
    }

    /// Overwrites every attribute on `target`. Nothing is written when the
    /// preset is missing from the table.
    pub fn apply<B>(&self, preset: P, target: &mut B) -> Result<(), InvalidPresetError>
    where
        B: ?Sized,
        A: AttributeVector<B>,
    {
        let attributes = self.attributes_of(preset).ok_or_else(|| InvalidPresetError {
            name: preset.to_string(),
        })?;
        attributes.write_to(target);
        Ok(())
    }

    pub fn classify<B>(&self, target: &B) -> Option<P>
    where
        B: ?Sized,
        A: AttributeVector<B>,
    {
        self.resolve(&A::read_from(target))
    }
}
