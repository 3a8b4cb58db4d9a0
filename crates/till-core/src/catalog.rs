//! # Product Catalog
//!
//! Static mapping from product code to [`Product`]. Built once at startup,
//! either from the standard table or from configuration, and read-only
//! afterwards.

use std::collections::BTreeMap;

use crate::error::{ConfigError, CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_price_cents, validate_product_code, validate_product_name};

/// The set of products a basket may contain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: BTreeMap<String, Product>,
}

impl Catalog {
    /// The built-in product table.
    ///
    /// | Code    | Name           | Price |
    /// |---------|----------------|-------|
    /// | VOUCHER | Gift Card      | 5.00  |
    /// | TSHIRT  | Summer T-Shirt | 20.00 |
    /// | PANTS   | Summer Pants   | 7.50  |
    pub fn standard() -> Self {
        let products = [
            Product::new("VOUCHER", "Gift Card", Money::from_cents(500)),
            Product::new("TSHIRT", "Summer T-Shirt", Money::from_cents(2000)),
            Product::new("PANTS", "Summer Pants", Money::from_cents(750)),
        ];

        Catalog {
            products: products
                .into_iter()
                .map(|p| (p.code.clone(), p))
                .collect(),
        }
    }

    /// Builds a catalog from configured products.
    ///
    /// ## Errors
    /// - [`ConfigError::DuplicateProduct`] if a code appears twice
    /// - [`ConfigError::Invalid`] if a code, name or price fails validation
    pub fn from_products<I>(products: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = Product>,
    {
        let mut map = BTreeMap::new();

        for product in products {
            let entry = format!("product {}", product.code);
            validate_product_code(&product.code).map_err(|e| ConfigError::invalid(&entry, e))?;
            validate_product_name(&product.name).map_err(|e| ConfigError::invalid(&entry, e))?;
            validate_price_cents(product.unit_price.cents())
                .map_err(|e| ConfigError::invalid(&entry, e))?;

            if map.contains_key(&product.code) {
                return Err(ConfigError::DuplicateProduct(product.code));
            }
            map.insert(product.code.clone(), product);
        }

        Ok(Catalog { products: map })
    }

    /// Returns the product for `code`, if any.
    pub fn get(&self, code: &str) -> Option<&Product> {
        self.products.get(code)
    }

    /// Returns the product for `code` or [`CoreError::ProductNotFound`].
    pub fn lookup(&self, code: &str) -> CoreResult<&Product> {
        self.get(code)
            .ok_or_else(|| CoreError::ProductNotFound(code.to_string()))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.products.contains_key(code)
    }

    /// Products in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
