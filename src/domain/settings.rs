use serde::{Deserialize, Serialize};

use crate::currency::CurrencyCode;

/// Process-wide preferences, independent of any quest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Settings {
    pub currency: CurrencyCode,
}
