//! Value objects for the cart domain.

use common::ItemId;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::CartError;

/// Symbol printed in front of every formatted amount.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Number of decimal places shown when an amount is displayed.
const DISPLAY_PLACES: u32 = 2;

/// Precision of a tax rate recovered from a rounded tax amount.
const IMPLIED_RATE_PLACES: u32 = 4;

/// Money amount held as an exact decimal.
///
/// Arithmetic is exact; rounding to two places only happens when an amount
/// is displayed or explicitly [`rounded`](Money::rounded).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money amount from minor units (e.g., 1000 = 10.00).
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Creates a Money amount from whole currency units.
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Wraps an exact decimal amount.
    pub fn from_decimal(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the exact decimal amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount rounded half away from zero to two decimal places.
    pub fn rounded(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money(self.0 * Decimal::from(quantity))
    }

    /// Returns the share of this amount given by a tax rate.
    pub fn apply_rate(&self, rate: TaxRate) -> Money {
        Money(self.0 * rate.fraction())
    }

    /// Formats the amount with the given currency symbol and exactly two decimals.
    pub fn format_with(&self, symbol: &str) -> String {
        let rounded = self.rounded().0;
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-{symbol}{:.2}", rounded.abs())
        } else {
            format!("{symbol}{:.2}", rounded.abs())
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_with(CURRENCY_SYMBOL))
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Tax rate as a fraction in `[0, 1]` (e.g., 0.1 for 10%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Creates a tax rate, rejecting fractions outside `[0, 1]`.
    pub fn new(fraction: Decimal) -> Result<Self, CartError> {
        if fraction < Decimal::ZERO || fraction > Decimal::ONE {
            return Err(CartError::InvalidTaxRate { rate: fraction });
        }
        Ok(Self(fraction))
    }

    /// Creates a tax rate from whole percent (e.g., 10 for 10%).
    pub fn from_percent(percent: u32) -> Result<Self, CartError> {
        Self::new(Decimal::from(percent) / Decimal::ONE_HUNDRED)
    }

    /// Recovers the rate that produced `tax` on `base`.
    ///
    /// The result is rounded to four places (hundredths of a percent) since
    /// `tax` was itself rounded. Returns `None` when `base` is not positive or
    /// the ratio is not a valid rate.
    pub fn implied_by(base: Money, tax: Money) -> Option<Self> {
        if !base.is_positive() || tax.is_negative() {
            return None;
        }
        let fraction = (tax.amount() / base.amount())
            .round_dp_with_strategy(IMPLIED_RATE_PLACES, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        Self::new(fraction).ok()
    }

    /// Returns a zero tax rate.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the rate as a fraction.
    pub fn fraction(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a percentage.
    pub fn percent(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).normalize()
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<Decimal> for TaxRate {
    type Error = CartError;

    fn try_from(fraction: Decimal) -> Result<Self, Self::Error> {
        Self::new(fraction)
    }
}

impl From<TaxRate> for Decimal {
    fn from(rate: TaxRate) -> Self {
        rate.0
    }
}

impl std::fmt::Display for TaxRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// A product as offered to the cart: what `add` needs to know about it.
///
/// The unit price is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartProduct {
    id: ItemId,
    name: String,
    unit_price: Money,
    tax_rate: Option<TaxRate>,
}

impl CartProduct {
    /// Creates an untaxed product, rejecting a negative unit price.
    pub fn new(id: ItemId, name: impl Into<String>, unit_price: Money) -> Result<Self, CartError> {
        if unit_price.is_negative() {
            return Err(CartError::NegativePrice {
                id,
                price: unit_price.amount(),
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            unit_price,
            tax_rate: None,
        })
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Tax rate; absent means untaxed.
    pub fn tax_rate(&self) -> Option<TaxRate> {
        self.tax_rate
    }

    /// Sets the tax rate.
    pub fn with_tax_rate(mut self, rate: TaxRate) -> Self {
        self.tax_rate = Some(rate);
        self
    }
}

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog identity; absent for lines restored from an invoice that had none.
    pub id: Option<ItemId>,

    /// Display label.
    pub name: String,

    /// Price per unit.
    pub unit_price: Money,

    /// Quantity, always at least 1 while the line is in a cart.
    pub quantity: u32,

    /// Tax rate; absent is treated as zero.
    pub tax_rate: Option<TaxRate>,
}

impl LineItem {
    /// Creates a line item.
    pub fn new(
        id: Option<ItemId>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
        tax_rate: Option<TaxRate>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            quantity,
            tax_rate,
        }
    }

    /// Returns the effective tax rate, zero when absent.
    pub fn effective_tax_rate(&self) -> TaxRate {
        self.tax_rate.unwrap_or_default()
    }

    /// Returns `unit_price * quantity`.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    /// Returns `unit_price * quantity * tax_rate`.
    pub fn tax_amount(&self) -> Money {
        self.line_total().apply_rate(self.effective_tax_rate())
    }
}

impl From<CartProduct> for LineItem {
    fn from(product: CartProduct) -> Self {
        Self {
            id: Some(product.id),
            name: product.name,
            unit_price: product.unit_price,
            quantity: 1,
            tax_rate: product.tax_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_cents() {
        let money = Money::from_cents(1234);
        assert_eq!(money.amount(), Decimal::new(1234, 2));
        assert_eq!(money, Money::from_decimal(Decimal::new(1234, 2)));
    }

    #[test]
    fn test_money_scale_does_not_affect_equality() {
        assert_eq!(Money::from_major(20), Money::from_cents(2000));
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(1234).to_string(), "₹12.34");
        assert_eq!(Money::from_cents(100).to_string(), "₹1.00");
        assert_eq!(Money::from_cents(5).to_string(), "₹0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-₹12.34");
        assert_eq!(Money::from_major(22).to_string(), "₹22.00");
    }

    #[test]
    fn test_money_display_rounds_half_away_from_zero() {
        let money = Money::from_decimal(Decimal::new(12345, 3));
        assert_eq!(money.format_with("$"), "$12.35");
        assert_eq!(money.rounded(), Money::from_cents(1235));
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a + b, Money::from_cents(1500));
        assert_eq!(a - b, Money::from_cents(500));
        assert_eq!(a.multiply(3), Money::from_cents(3000));
    }

    #[test]
    fn test_money_sum() {
        let total: Money = [100, 250, 5].into_iter().map(Money::from_cents).sum();
        assert_eq!(total, Money::from_cents(355));
    }

    #[test]
    fn test_money_sign() {
        assert!(Money::from_cents(100).is_positive());
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }

    #[test]
    fn test_money_serializes_as_number() {
        let json = serde_json::to_string(&Money::from_cents(1050)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.is_number());
        let back: Money = serde_json::from_str("10.5").unwrap();
        assert_eq!(back, Money::from_cents(1050));
    }

    #[test]
    fn test_tax_rate_bounds() {
        assert!(TaxRate::new(Decimal::ZERO).is_ok());
        assert!(TaxRate::new(Decimal::ONE).is_ok());
        assert!(matches!(
            TaxRate::new(Decimal::new(15, 1)),
            Err(CartError::InvalidTaxRate { .. })
        ));
        assert!(TaxRate::new(Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn test_tax_rate_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<TaxRate>("1.5").is_err());
        let rate: TaxRate = serde_json::from_str("0.05").unwrap();
        assert_eq!(rate, TaxRate::new(Decimal::new(5, 2)).unwrap());
    }

    #[test]
    fn test_tax_rate_percent_display() {
        assert_eq!(TaxRate::from_percent(10).unwrap().to_string(), "10%");
        assert_eq!(TaxRate::new(Decimal::new(125, 3)).unwrap().to_string(), "12.5%");
    }

    #[test]
    fn test_line_item_totals() {
        let item = LineItem::new(
            Some(ItemId::new(1)),
            "Tea",
            Money::from_major(10),
            2,
            Some(TaxRate::from_percent(10).unwrap()),
        );
        assert_eq!(item.line_total(), Money::from_major(20));
        assert_eq!(item.tax_amount(), Money::from_major(2));
    }

    #[test]
    fn test_line_item_absent_tax_is_zero() {
        let item = LineItem::new(None, "Water", Money::from_cents(1500), 3, None);
        assert_eq!(item.effective_tax_rate(), TaxRate::zero());
        assert!(item.tax_amount().is_zero());
    }

    #[test]
    fn test_product_becomes_single_quantity_line() {
        let product = CartProduct::new(ItemId::new(5), "Coffee", Money::from_major(30))
            .unwrap()
            .with_tax_rate(TaxRate::from_percent(5).unwrap());
        let line = LineItem::from(product);
        assert_eq!(line.id, Some(ItemId::new(5)));
        assert_eq!(line.quantity, 1);
        assert_eq!(line.tax_rate, Some(TaxRate::from_percent(5).unwrap()));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let err = CartProduct::new(ItemId::new(3), "Refund", Money::from_cents(-500)).unwrap_err();
        assert!(matches!(err, CartError::NegativePrice { id, .. } if id == ItemId::new(3)));

        let free = CartProduct::new(ItemId::new(4), "Water", Money::zero()).unwrap();
        assert!(free.unit_price().is_zero());
    }

    #[test]
    fn test_implied_tax_rate() {
        let rate = TaxRate::implied_by(Money::from_major(20), Money::from_major(2)).unwrap();
        assert_eq!(rate, TaxRate::from_percent(10).unwrap());

        // 5% of 136.50 is 6.825, stored rounded as 6.83
        let rate = TaxRate::implied_by(Money::from_cents(13_650), Money::from_cents(683)).unwrap();
        assert_eq!(rate, TaxRate::from_percent(5).unwrap());

        assert_eq!(
            TaxRate::implied_by(Money::from_major(10), Money::zero()),
            Some(TaxRate::zero())
        );
        assert_eq!(TaxRate::implied_by(Money::zero(), Money::from_major(1)), None);
        assert_eq!(TaxRate::implied_by(Money::from_major(1), Money::from_major(5)), None);
    }
}
