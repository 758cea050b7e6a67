//! The optional economy record attached to a claim.
//!
//! A claim holds at most one [`EconomyData`] exclusively; worlds with
//! economy support disabled simply never attach one. The claim itself never
//! interprets the contents -- taxation, rent collection, and sales are the
//! external economy service's business, and this record is only the state
//! it parks on the claim.
//!
//! All monetary amounts are [`Decimal`]; balances never touch floating
//! point.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Economy state parked on a claim by the external economy service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyData {
    /// Tax charged per collection cycle.
    tax_rate: Decimal,
    /// Outstanding tax owed.
    tax_balance: Decimal,
    /// When unpaid tax became overdue, if it is.
    tax_past_due_date: Option<DateTime<Utc>>,
    /// Rent charged per collection cycle, when the claim is rented out.
    rent_rate: Option<Decimal>,
    /// Outstanding rent owed.
    rent_balance: Decimal,
    /// When unpaid rent became overdue, if it is.
    rent_past_due_date: Option<DateTime<Utc>>,
    /// Asking price, when the claim is listed for sale.
    sale_price: Option<Decimal>,
    /// Whether the claim is listed for sale.
    for_sale: bool,
}

impl EconomyData {
    /// Create an empty economy record (zero balances, nothing listed).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tax rate per collection cycle.
    pub const fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Set the tax rate per collection cycle.
    pub const fn set_tax_rate(&mut self, rate: Decimal) {
        self.tax_rate = rate;
    }

    /// The outstanding tax balance.
    pub const fn tax_balance(&self) -> Decimal {
        self.tax_balance
    }

    /// Set the outstanding tax balance.
    pub const fn set_tax_balance(&mut self, balance: Decimal) {
        self.tax_balance = balance;
    }

    /// When unpaid tax became overdue, if it is.
    pub const fn tax_past_due_date(&self) -> Option<DateTime<Utc>> {
        self.tax_past_due_date
    }

    /// Set or clear the tax past-due marker.
    pub const fn set_tax_past_due_date(&mut self, date: Option<DateTime<Utc>>) {
        self.tax_past_due_date = date;
    }

    /// The rent rate, when the claim is rented out.
    pub const fn rent_rate(&self) -> Option<Decimal> {
        self.rent_rate
    }

    /// Set or clear the rent rate.
    pub const fn set_rent_rate(&mut self, rate: Option<Decimal>) {
        self.rent_rate = rate;
    }

    /// The outstanding rent balance.
    pub const fn rent_balance(&self) -> Decimal {
        self.rent_balance
    }

    /// Set the outstanding rent balance.
    pub const fn set_rent_balance(&mut self, balance: Decimal) {
        self.rent_balance = balance;
    }

    /// When unpaid rent became overdue, if it is.
    pub const fn rent_past_due_date(&self) -> Option<DateTime<Utc>> {
        self.rent_past_due_date
    }

    /// Set or clear the rent past-due marker.
    pub const fn set_rent_past_due_date(&mut self, date: Option<DateTime<Utc>>) {
        self.rent_past_due_date = date;
    }

    /// The asking price, when the claim is listed for sale.
    pub const fn sale_price(&self) -> Option<Decimal> {
        self.sale_price
    }

    /// Set or clear the asking price.
    pub const fn set_sale_price(&mut self, price: Option<Decimal>) {
        self.sale_price = price;
    }

    /// Whether the claim is listed for sale.
    pub const fn is_for_sale(&self) -> bool {
        self.for_sale
    }

    /// List or delist the claim for sale.
    pub const fn set_for_sale(&mut self, for_sale: bool) {
        self.for_sale = for_sale;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_empty() {
        let economy = EconomyData::new();
        assert_eq!(economy.tax_rate(), Decimal::ZERO);
        assert_eq!(economy.tax_balance(), Decimal::ZERO);
        assert_eq!(economy.rent_balance(), Decimal::ZERO);
        assert!(economy.tax_past_due_date().is_none());
        assert!(economy.rent_rate().is_none());
        assert!(economy.sale_price().is_none());
        assert!(!economy.is_for_sale());
    }

    #[test]
    fn setters_roundtrip() {
        let mut economy = EconomyData::new();
        economy.set_tax_rate(Decimal::new(25, 1)); // 2.5
        economy.set_tax_balance(Decimal::new(100, 0));
        economy.set_rent_rate(Some(Decimal::new(10, 0)));
        economy.set_sale_price(Some(Decimal::new(5000, 0)));
        economy.set_for_sale(true);

        assert_eq!(economy.tax_rate(), Decimal::new(25, 1));
        assert_eq!(economy.tax_balance(), Decimal::new(100, 0));
        assert_eq!(economy.rent_rate(), Some(Decimal::new(10, 0)));
        assert_eq!(economy.sale_price(), Some(Decimal::new(5000, 0)));
        assert!(economy.is_for_sale());
    }

    #[test]
    fn serde_roundtrip() {
        let mut economy = EconomyData::new();
        economy.set_tax_balance(Decimal::new(375, 2)); // 3.75
        let json = serde_json::to_string(&economy).unwrap();
        let restored: EconomyData = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, economy);
    }
}
