// SPDX-License-Identifier: MPL-2.0
//! Editable state of the four measurement inputs.

use crate::domain::measurement::{is_decimal_input, MeasurementField, Measurements};

/// Text typed into the four measurement inputs.
#[derive(Debug, Clone, Default)]
pub struct MeasurementForm {
    values: Measurements,
}

impl MeasurementForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an edit from the input widget.
    ///
    /// Text that cannot be the start of a non-negative decimal is ignored and
    /// `false` is returned; the previous value stays in place.
    pub fn edit(&mut self, field: MeasurementField, text: String) -> bool {
        if !is_decimal_input(&text) {
            return false;
        }
        self.values.set(field, text);
        true
    }

    #[must_use]
    pub fn value(&self, field: MeasurementField) -> &str {
        self.values.get(field)
    }

    /// Returns `true` when every field holds text.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.values.is_complete()
    }

    /// Copy of the current values for a submission.
    #[must_use]
    pub fn snapshot(&self) -> Measurements {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_edits_are_stored_verbatim() {
        let mut form = MeasurementForm::new();
        assert!(form.edit(MeasurementField::Length, "120.".into()));
        assert_eq!(form.value(MeasurementField::Length), "120.");
    }

    #[test]
    fn rejected_edits_keep_previous_value() {
        let mut form = MeasurementForm::new();
        form.edit(MeasurementField::Weight, "350".into());
        assert!(!form.edit(MeasurementField::Weight, "-350".into()));
        assert!(!form.edit(MeasurementField::Weight, "35a".into()));
        assert_eq!(form.value(MeasurementField::Weight), "350");
    }

    #[test]
    fn complete_requires_all_four() {
        let mut form = MeasurementForm::new();
        for field in MeasurementField::ALL {
            assert!(!form.is_complete());
            form.edit(field, "1".into());
        }
        assert!(form.is_complete());

        form.edit(MeasurementField::Thickness, String::new());
        assert!(!form.is_complete());
    }
}
