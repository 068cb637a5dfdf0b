//! Customer catalog
//!
//! The market has a fixed set of four customers. Each owns a fraction of
//! total monthly demand (basis points, summing to 10_000) and pays on fixed
//! terms: 0 days means cash on delivery, anything longer books as a
//! receivable. The catalog is configuration, never mutated by the engine.

use crate::core::config::BPS_SCALE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for one of the four fixed customers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerId {
    Laddu,
    ShahiPoori,
    LemonTea,
    Jamoon,
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CustomerId::Laddu => "LADDU",
            CustomerId::ShahiPoori => "SHAHI",
            CustomerId::LemonTea => "LEMON",
            CustomerId::Jamoon => "JAMOON",
        };
        write!(f, "{}", name)
    }
}

/// One customer: demand share and payment terms
///
/// # Example
/// ```
/// use market_sim_core_rs::models::customer::default_catalog;
///
/// let catalog = default_catalog();
/// let laddu = &catalog[0];
/// assert_eq!(laddu.demand(200_000), 80_000); // 40% share
/// assert!(!laddu.pays_immediately()); // 60-day terms
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// Share of total monthly market demand, in bps
    pub share_bps: i64,
    /// Payment term in days; 0 = immediate cash
    pub pay_term_days: u32,
}

impl Customer {
    /// Whether sales to this customer convert to cash in the same month
    pub fn pays_immediately(&self) -> bool {
        self.pay_term_days == 0
    }

    /// This customer's demand for a month, given total market size (m3)
    pub fn demand(&self, total_market: i64) -> i64 {
        total_market * self.share_bps / BPS_SCALE
    }
}

/// The standard four-customer catalog
pub fn default_catalog() -> Vec<Customer> {
    vec![
        Customer {
            id: CustomerId::Laddu,
            name: "Laddu".to_string(),
            share_bps: 4_000,
            pay_term_days: 60,
        },
        Customer {
            id: CustomerId::ShahiPoori,
            name: "Shahi-Poori Ji".to_string(),
            share_bps: 3_000,
            pay_term_days: 30,
        },
        Customer {
            id: CustomerId::LemonTea,
            name: "Lemon & Tea".to_string(),
            share_bps: 2_000,
            pay_term_days: 0,
        },
        Customer {
            id: CustomerId::Jamoon,
            name: "Jamoon".to_string(),
            share_bps: 1_000,
            pay_term_days: 0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_shares_sum_to_whole_market() {
        let total: i64 = default_catalog().iter().map(|c| c.share_bps).sum();
        assert_eq!(total, BPS_SCALE);
    }

    #[test]
    fn demand_floors_via_integer_division() {
        let catalog = default_catalog();
        // 30% of 99 floors to 29
        let shahi = catalog.iter().find(|c| c.id == CustomerId::ShahiPoori).unwrap();
        assert_eq!(shahi.demand(99), 29);
    }

    #[test]
    fn payment_terms() {
        let catalog = default_catalog();
        let immediate: Vec<_> =
            catalog.iter().filter(|c| c.pays_immediately()).map(|c| c.id).collect();
        assert_eq!(immediate, vec![CustomerId::LemonTea, CustomerId::Jamoon]);
    }
}
