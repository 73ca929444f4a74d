//! Bulk discount tiers
//!
//! Tiers are keyed on physical letters produced (letters per set times
//! sets), not on the number of sets.

use serde::{Deserialize, Serialize};

use crate::catalog::DiscountTier;

/// Outcome of applying the tier table to a subtotal
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BulkDiscount {
    pub percentage: u32,
    pub amount: f64,
    pub adjusted_subtotal: f64,
}

/// Percentage of the highest tier `total_units` reaches, or 0
pub fn discount_percentage(tiers: &[DiscountTier], total_units: u32) -> u32 {
    tiers
        .iter()
        .filter(|tier| total_units >= tier.min_units)
        .max_by_key(|tier| tier.min_units)
        .map(|tier| tier.percentage)
        .unwrap_or(0)
}

/// Discount a pre-tax subtotal by the tier `total_units` qualifies for
pub fn apply_bulk_discount(tiers: &[DiscountTier], subtotal: f64, total_units: u32) -> BulkDiscount {
    let percentage = discount_percentage(tiers, total_units);
    if percentage == 0 {
        return BulkDiscount {
            percentage: 0,
            amount: 0.0,
            adjusted_subtotal: subtotal,
        };
    }

    let amount = subtotal * f64::from(percentage) / 100.0;
    BulkDiscount {
        percentage,
        amount,
        adjusted_subtotal: subtotal - amount,
    }
}
