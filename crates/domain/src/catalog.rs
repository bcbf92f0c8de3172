//! Product catalog as served by `GET /items/`.

use common::ItemId;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::cart::{CartError, CartProduct, Money, TaxRate};

/// Pseudo-category that matches every item.
pub const ALL_CATEGORIES: &str = "All";

/// Category shown for items without one.
pub const UNCATEGORIZED: &str = "Other";

/// Stock level below which a stock-limited item counts as running low.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

fn default_limit_stock() -> bool {
    true
}

/// Reads a backend tax rate, accepting either a fraction or a percentage.
///
/// Values up to 1 are fractions (`0.05` is 5%); values above 1 and up to 100
/// are percentages (`5` is 5%). Anything else is logged and treated as
/// untaxed so one bad row cannot fail the whole catalog.
pub fn tax_rate_from_backend(raw: Decimal) -> Option<TaxRate> {
    let fraction = if raw > Decimal::ONE && raw <= Decimal::ONE_HUNDRED {
        raw / Decimal::ONE_HUNDRED
    } else {
        raw
    };

    match TaxRate::new(fraction) {
        Ok(rate) => Some(rate),
        Err(err) => {
            warn!(%raw, error = %err, "Ignoring unusable catalog tax rate");
            None
        }
    }
}

fn deserialize_tax_rate<'de, D>(deserializer: D) -> Result<Option<TaxRate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Decimal>::deserialize(deserializer)?;
    Ok(raw.and_then(tax_rate_from_backend))
}

/// A product offered for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,

    #[serde(default)]
    pub category: Option<String>,

    pub price: Money,

    #[serde(default, deserialize_with = "deserialize_tax_rate")]
    pub tax_rate: Option<TaxRate>,

    #[serde(default)]
    pub stock_quantity: i64,

    /// When false the item has unlimited stock.
    #[serde(default = "default_limit_stock")]
    pub limit_stock: bool,
}

impl CatalogItem {
    /// Returns the category in display form.
    pub fn display_category(&self) -> String {
        normalize_category(self.category.as_deref())
    }

    /// Returns true if stock is limited and fewer than ten units remain.
    pub fn is_low_stock(&self) -> bool {
        self.limit_stock && self.stock_quantity < LOW_STOCK_THRESHOLD
    }
}

impl TryFrom<&CatalogItem> for CartProduct {
    type Error = CartError;

    fn try_from(item: &CatalogItem) -> Result<Self, Self::Error> {
        let product = CartProduct::new(item.id, item.name.clone(), item.price)?;
        Ok(match item.tax_rate {
            Some(rate) => product.with_tax_rate(rate),
            None => product,
        })
    }
}

/// Title-cases a category name; blank or missing becomes [`UNCATEGORIZED`].
pub fn normalize_category(category: Option<&str>) -> String {
    let Some(raw) = category.map(str::trim).filter(|c| !c.is_empty()) else {
        return UNCATEGORIZED.to_string();
    };

    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => UNCATEGORIZED.to_string(),
    }
}

/// The fetched product list with browsing helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Wraps a fetched product list.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// Returns all items.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Looks up an item by id.
    pub fn get(&self, id: ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns `"All"` followed by each distinct display category in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for item in &self.items {
            let category = item.display_category();
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        categories
    }

    /// Returns items in `category` (case-insensitive, `"All"` matches
    /// everything) whose name contains `search` (case-insensitive).
    pub fn filter(&self, category: &str, search: &str) -> Vec<&CatalogItem> {
        let category = category.to_lowercase();
        let search = search.trim().to_lowercase();
        let any_category = category == ALL_CATEGORIES.to_lowercase();

        self.items
            .iter()
            .filter(|item| any_category || item.display_category().to_lowercase() == category)
            .filter(|item| item.name.to_lowercase().contains(&search))
            .collect()
    }
}

impl From<Vec<CatalogItem>> for Catalog {
    fn from(items: Vec<CatalogItem>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str, category: Option<&str>, stock: i64) -> CatalogItem {
        CatalogItem {
            id: ItemId::new(id),
            name: name.to_string(),
            category: category.map(str::to_string),
            price: Money::from_major(10),
            tax_rate: None,
            stock_quantity: stock,
            limit_stock: true,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            item(1, "Masala Tea", Some("beverages"), 50),
            item(2, "Cold Coffee", Some("BEVERAGES"), 5),
            item(3, "Samosa", Some("snacks"), 20),
            item(4, "Mystery Box", None, 1),
        ])
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category(Some("beverages")), "Beverages");
        assert_eq!(normalize_category(Some("sNACKS")), "Snacks");
        assert_eq!(normalize_category(Some("  ")), "Other");
        assert_eq!(normalize_category(None), "Other");
    }

    #[test]
    fn test_categories_are_distinct_after_normalization() {
        assert_eq!(
            catalog().categories(),
            vec!["All", "Beverages", "Snacks", "Other"]
        );
    }

    #[test]
    fn test_filter_by_category_ignores_case() {
        let catalog = catalog();
        let names: Vec<_> = catalog
            .filter("beverages", "")
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Masala Tea", "Cold Coffee"]);
    }

    #[test]
    fn test_filter_by_search_across_all() {
        let catalog = catalog();
        let found = catalog.filter("All", "COFFEE");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, ItemId::new(2));
    }

    #[test]
    fn test_low_stock() {
        let catalog = catalog();
        assert!(!catalog.get(ItemId::new(1)).unwrap().is_low_stock());
        assert!(catalog.get(ItemId::new(2)).unwrap().is_low_stock());

        let mut unlimited = item(5, "Water", None, 0);
        unlimited.limit_stock = false;
        assert!(!unlimited.is_low_stock());
    }

    #[test]
    fn test_catalog_item_deserializes_backend_shape() {
        let json = r#"{"id": 7, "admin_id": 1, "name": "Tea", "category": "drinks",
                       "price": 15.5, "tax_rate": 0.05, "stock_quantity": 40, "limit_stock": true}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.price, Money::from_cents(1550));
        assert_eq!(item.tax_rate, Some(TaxRate::new(Decimal::new(5, 2)).unwrap()));

        let product = CartProduct::try_from(&item).unwrap();
        assert_eq!(product.id(), ItemId::new(7));
        assert_eq!(product.tax_rate(), item.tax_rate);
    }

    #[test]
    fn test_catalog_tax_rates_accept_fractions_and_percentages() {
        let json = r#"[
            {"id": 1, "name": "Tea", "price": 10, "tax_rate": 0.1},
            {"id": 2, "name": "Coffee", "price": 20, "tax_rate": 5.0},
            {"id": 3, "name": "Cake", "price": 30, "tax_rate": -3},
            {"id": 4, "name": "Water", "price": 5, "tax_rate": 250},
            {"id": 5, "name": "Bun", "price": 8, "tax_rate": null},
            {"id": 6, "name": "Jam", "price": 8}
        ]"#;
        let items: Vec<CatalogItem> = serde_json::from_str(json).unwrap();
        let rates: Vec<_> = items.iter().map(|item| item.tax_rate).collect();

        assert_eq!(
            rates,
            vec![
                Some(TaxRate::from_percent(10).unwrap()),
                Some(TaxRate::from_percent(5).unwrap()),
                None,
                None,
                None,
                None,
            ]
        );
    }

    #[test]
    fn test_negative_price_cannot_reach_the_cart() {
        let mut refund = item(9, "Refund", None, 5);
        refund.price = Money::from_cents(-100);

        let err = CartProduct::try_from(&refund).unwrap_err();
        assert!(matches!(err, CartError::NegativePrice { .. }));
    }
}
