//! Planned expenses tracked inside a quest.

use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// A single planned expense with a paid/unpaid status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commitment {
    pub id: String,
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub paid: bool,
}

impl Commitment {
    /// Creates an unpaid commitment. Callers validate `name` and `value` first.
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value,
            paid: false,
        }
    }

    pub fn toggle_paid(&mut self) -> bool {
        self.paid = !self.paid;
        self.paid
    }
}

impl Displayable for Commitment {
    fn display_label(&self) -> String {
        let marker = if self.paid { "paid" } else { "unpaid" };
        format!("{} ({:.2}, {})", self.name, self.value, marker)
    }
}

/// Checks that a commitment value is finite and strictly positive.
pub fn is_valid_value(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_commitments_start_unpaid() {
        let mut commitment = Commitment::new("c-1", "Rent", 1000.0);
        assert!(!commitment.paid);
        assert!(commitment.toggle_paid());
        assert!(!commitment.toggle_paid());
    }

    #[test]
    fn value_must_be_finite_and_positive() {
        assert!(is_valid_value(0.01));
        assert!(!is_valid_value(0.0));
        assert!(!is_valid_value(-5.0));
        assert!(!is_valid_value(f64::NAN));
        assert!(!is_valid_value(f64::INFINITY));
    }

    #[test]
    fn missing_paid_flag_decodes_as_unpaid() {
        let commitment: Commitment =
            serde_json::from_str(r#"{"id":"c","name":"Gym","value":30}"#).unwrap();
        assert!(!commitment.paid);
        assert_eq!(commitment.display_label(), "Gym (30.00, unpaid)");
    }
}
