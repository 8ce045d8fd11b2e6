// SPDX-License-Identifier: MPL-2.0
//! The four physical measurements sent alongside the photo.

/// One of the four measurement inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementField {
    Length,
    Width,
    Thickness,
    Weight,
}

impl MeasurementField {
    /// All fields in form order.
    pub const ALL: [MeasurementField; 4] = [
        MeasurementField::Length,
        MeasurementField::Width,
        MeasurementField::Thickness,
        MeasurementField::Weight,
    ];

    /// Multipart field name expected by the prediction API.
    #[must_use]
    pub fn form_name(self) -> &'static str {
        match self {
            MeasurementField::Length => "length_mm",
            MeasurementField::Width => "width_mm",
            MeasurementField::Thickness => "thickness_mm",
            MeasurementField::Weight => "weight_g",
        }
    }

    /// Returns the i18n key for the field label.
    #[must_use]
    pub fn i18n_key(self) -> &'static str {
        match self {
            MeasurementField::Length => "measurement-length",
            MeasurementField::Width => "measurement-width",
            MeasurementField::Thickness => "measurement-thickness",
            MeasurementField::Weight => "measurement-weight",
        }
    }

    /// Unit suffix shown next to the input.
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            MeasurementField::Weight => "g",
            _ => "mm",
        }
    }

    fn index(self) -> usize {
        match self {
            MeasurementField::Length => 0,
            MeasurementField::Width => 1,
            MeasurementField::Thickness => 2,
            MeasurementField::Weight => 3,
        }
    }
}

/// Snapshot of the four raw text values.
///
/// Values are kept exactly as typed; they are never parsed before sending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measurements {
    values: [String; 4],
}

impl Measurements {
    #[must_use]
    pub fn new(length_mm: &str, width_mm: &str, thickness_mm: &str, weight_g: &str) -> Self {
        Self {
            values: [
                length_mm.to_string(),
                width_mm.to_string(),
                thickness_mm.to_string(),
                weight_g.to_string(),
            ],
        }
    }

    #[must_use]
    pub fn get(&self, field: MeasurementField) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: MeasurementField, value: String) {
        self.values[field.index()] = value;
    }

    /// Returns `true` when all four fields hold some text.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(|value| !value.is_empty())
    }

    /// Yields `(form_name, value)` pairs in form order.
    pub fn form_fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        MeasurementField::ALL
            .into_iter()
            .map(move |field| (field.form_name(), self.get(field)))
    }
}

/// Checks whether `text` is acceptable while typing a non-negative decimal.
///
/// Accepts partial input such as `""`, `"12."` or `".5"`; rejects signs,
/// exponents, whitespace and a second decimal point. The one-decimal step is
/// not enforced here.
#[must_use]
pub fn is_decimal_input(text: &str) -> bool {
    let mut seen_point = false;
    for c in text.chars() {
        match c {
            '0'..='9' => {}
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_names_match_api_contract() {
        let names: Vec<_> = MeasurementField::ALL.iter().map(|f| f.form_name()).collect();
        assert_eq!(names, ["length_mm", "width_mm", "thickness_mm", "weight_g"]);
    }

    #[test]
    fn complete_only_when_every_field_has_text() {
        let mut m = Measurements::new("100.5", "80", "70", "");
        assert!(!m.is_complete());
        m.set(MeasurementField::Weight, "350.0".into());
        assert!(m.is_complete());
    }

    #[test]
    fn form_fields_keep_raw_text() {
        let m = Measurements::new("100.50", "080", ".5", "350.");
        let fields: Vec<_> = m.form_fields().collect();
        assert_eq!(fields[0], ("length_mm", "100.50"));
        assert_eq!(fields[1], ("width_mm", "080"));
        assert_eq!(fields[3], ("weight_g", "350."));
    }

    #[test]
    fn decimal_input_filter() {
        assert!(is_decimal_input(""));
        assert!(is_decimal_input("12"));
        assert!(is_decimal_input("12."));
        assert!(is_decimal_input("12.5"));
        assert!(is_decimal_input(".5"));
        assert!(!is_decimal_input("-1"));
        assert!(!is_decimal_input("1.2.3"));
        assert!(!is_decimal_input("1e3"));
        assert!(!is_decimal_input(" 1"));
    }
}
