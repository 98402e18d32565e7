//! Per-field error collection shared by the storefront forms.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Every failing field of a form with its message.
///
/// Serialises as a map from field name to the message's translation key,
/// which is what the UI renders under each field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors<F, M>(BTreeMap<F, M>);

impl<F, M> Default for FieldErrors<F, M> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<F: Ord + Copy, M: Copy> FieldErrors<F, M> {
    #[must_use]
    pub fn get(&self, field: F) -> Option<M> {
        self.0.get(&field).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Failing fields in field order.
    pub fn iter(&self) -> impl Iterator<Item = (F, M)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    pub(crate) fn insert(&mut self, field: F, message: M) {
        self.0.insert(field, message);
    }
}

impl<F, M> fmt::Display for FieldErrors<F, M>
where
    F: Ord + Copy + fmt::Display,
    M: Copy + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Trimmed `value`, or `None` with `message` recorded for `field` when it
/// is blank.
pub(crate) fn required<F: Ord + Copy, M: Copy>(
    errors: &mut FieldErrors<F, M>,
    field: F,
    value: &str,
    message: M,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, message);
        None
    } else {
        Some(value.to_owned())
    }
}
