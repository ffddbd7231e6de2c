// ── Typed request payloads ──

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::Category;

/// A product the dealer adds to the inventory. The market assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub stock: u32,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewProduct {
    /// Name and unit must be non-blank and the price a positive number.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid("product name must not be empty"));
        }
        if self.unit.trim().is_empty() {
            return Err(CoreError::invalid("product unit must not be empty"));
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(CoreError::invalid(format!(
                "product price must be positive, got {}",
                self.price
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hoe() -> NewProduct {
        NewProduct {
            name: "Hand Hoe".into(),
            category: Category::Tools,
            price: 180.0,
            stock: 25,
            unit: "piece".into(),
            image: None,
        }
    }

    #[test]
    fn accepts_complete_product() {
        assert!(hoe().validate().is_ok());
    }

    #[test]
    fn rejects_blank_fields_and_bad_price() {
        let blank_name = NewProduct {
            name: "  ".into(),
            ..hoe()
        };
        assert!(blank_name.validate().is_err());

        let blank_unit = NewProduct {
            unit: String::new(),
            ..hoe()
        };
        assert!(blank_unit.validate().is_err());

        for price in [0.0, -5.0, f64::NAN] {
            let bad = NewProduct { price, ..hoe() };
            assert!(bad.validate().is_err(), "price {price} should be rejected");
        }
    }
}
