//! # Promotion Rules
//!
//! Named promotion rules, loaded once from configuration and read-only for
//! the rest of the process.
//!
//! ## Configuration Format
//! ```toml
//! [rules.buy_three_or_more_new_price]
//! description = "If you buy 3 or more, the price per unit should be 19.00."
//! product = "TSHIRT"
//! quantity = 3
//! effect = "bulk_price"      # free_unit | bulk_price
//! newPrice = 19.00           # required for bulk_price, forbidden otherwise
//! ```
//!
//! `newPrice` is in major units and must name an exact amount in cents.
//! `new_price_cents = 1900` is accepted in its place; setting both is an
//! error.
//!
//! ## From Definition to Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  TOML source ──► RuleDefinition (serde) ──► validate ──► Rule          │
//! │                                               │                         │
//! │                                               ├── name/code format      │
//! │                                               ├── product in Catalog    │
//! │                                               ├── effect ↔ new price    │
//! │                                               └── one rule per product  │
//! │                                                                         │
//! │  The effect is a tagged variant; the pricing engine dispatches on it.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::ConfigError;
use crate::money::Money;
use crate::types::LineItem;
use crate::validation::{
    validate_description, validate_price_cents, validate_rule_name, validate_threshold,
};

/// The rules shipped with the crate.
pub const DEFAULT_RULES: &str = include_str!("../rules.toml");

// =============================================================================
// Configuration Shape
// =============================================================================

/// Effect kind as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    FreeUnit,
    BulkPrice,
}

/// One `[rules.<name>]` table, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    #[serde(default)]
    pub description: String,

    /// Target product code.
    pub product: String,

    /// Quantity threshold at which the rule starts to apply.
    pub quantity: u32,

    pub effect: EffectKind,

    /// New unit price in major units (`19.00`), for `bulk_price` only.
    #[serde(default, rename = "newPrice", skip_serializing_if = "Option::is_none")]
    pub new_price: Option<f64>,

    /// Same as `newPrice`, given in cents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_price_cents: Option<i64>,
}

impl RuleDefinition {
    /// The configured new unit price in cents, from whichever key is set.
    fn resolve_new_price(&self, rule: &str) -> Result<Option<i64>, ConfigError> {
        match (self.new_price, self.new_price_cents) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingNewPrice {
                rule: rule.to_string(),
            }),
            (Some(major), None) => major_to_cents(major).map(Some).ok_or_else(|| {
                ConfigError::InexactNewPrice {
                    rule: rule.to_string(),
                    value: major,
                }
            }),
            (None, cents) => Ok(cents),
        }
    }
}

/// Converts a major-unit amount to cents, or `None` if it has a fraction of
/// a cent. Out-of-range amounts saturate and are left to price validation.
fn major_to_cents(major: f64) -> Option<i64> {
    let scaled = major * 100.0;
    let cents = scaled.round();
    if !cents.is_finite() || (scaled - cents).abs() > 1e-6 {
        return None;
    }
    Some(cents as i64)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesDocument {
    #[serde(default)]
    rules: BTreeMap<String, RuleDefinition>,
}

// =============================================================================
// Rule
// =============================================================================

/// What a rule does to a matching line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleEffect {
    /// One unit is given away on top of the scanned quantity. The line is
    /// charged `unit_price × quantity` and its quantity is left as is.
    FreeUnit,
    /// Every unit costs `new_unit_price` once the threshold is reached.
    BulkPrice { new_unit_price: Money },
}

/// A validated promotion rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub description: String,
    /// Product code the rule is bound to.
    pub product: String,
    /// Minimum line quantity for the rule to apply (inclusive).
    pub threshold: u32,
    pub effect: RuleEffect,
}

impl Rule {
    /// True when the rule targets this line's product and the line has
    /// reached the threshold.
    pub fn applies_to(&self, item: &LineItem) -> bool {
        item.product.code == self.product && item.quantity >= self.threshold
    }

    fn from_definition(
        name: String,
        def: RuleDefinition,
        catalog: &Catalog,
    ) -> Result<Self, ConfigError> {
        let entry = format!("rule {}", name);
        validate_rule_name(&name).map_err(|e| ConfigError::invalid(&entry, e))?;
        validate_description(&def.description).map_err(|e| ConfigError::invalid(&entry, e))?;
        validate_threshold(def.quantity).map_err(|e| ConfigError::invalid(&entry, e))?;

        if !catalog.contains(&def.product) {
            return Err(ConfigError::UnknownProduct {
                rule: name,
                product: def.product,
            });
        }

        let effect = match (def.effect, def.resolve_new_price(&name)?) {
            (EffectKind::FreeUnit, None) => RuleEffect::FreeUnit,
            (EffectKind::FreeUnit, Some(_)) => {
                return Err(ConfigError::UnexpectedNewPrice { rule: name });
            }
            (EffectKind::BulkPrice, Some(cents)) => {
                validate_price_cents(cents).map_err(|e| ConfigError::invalid(&entry, e))?;
                RuleEffect::BulkPrice {
                    new_unit_price: Money::from_cents(cents),
                }
            }
            (EffectKind::BulkPrice, None) => {
                return Err(ConfigError::MissingNewPrice { rule: name });
            }
        };

        Ok(Rule {
            name,
            description: def.description,
            product: def.product,
            threshold: def.quantity,
            effect,
        })
    }
}

/// Turns a rule back into its configuration form, e.g. for listing.
impl From<&Rule> for RuleDefinition {
    fn from(rule: &Rule) -> Self {
        let (effect, new_price_cents) = match rule.effect {
            RuleEffect::FreeUnit => (EffectKind::FreeUnit, None),
            RuleEffect::BulkPrice { new_unit_price } => {
                (EffectKind::BulkPrice, Some(new_unit_price.cents()))
            }
        };

        RuleDefinition {
            description: rule.description.clone(),
            product: rule.product.clone(),
            quantity: rule.threshold,
            effect,
            new_price: None,
            new_price_cents,
        }
    }
}

// =============================================================================
// Rule Catalog
// =============================================================================

/// The immutable set of promotion rules.
///
/// Constructed once at startup and shared (behind an `Arc`) by every
/// request; nothing mutates it after construction, so no lock is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleCatalog {
    /// Keyed by rule name, which also fixes the application order.
    rules: BTreeMap<String, Rule>,
}

impl RuleCatalog {
    /// A catalog without promotions: everything sells at list price.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses and validates a TOML rule document against `catalog`.
    ///
    /// ## Errors
    /// Any [`ConfigError`]; the caller is expected to treat it as fatal.
    pub fn load(source: &str, catalog: &Catalog) -> Result<Self, ConfigError> {
        let document: RulesDocument = toml::from_str(source)?;
        Self::from_definitions(document.rules, catalog)
    }

    /// The rules embedded in [`DEFAULT_RULES`].
    pub fn standard(catalog: &Catalog) -> Result<Self, ConfigError> {
        Self::load(DEFAULT_RULES, catalog)
    }

    /// Validates already-deserialized definitions.
    pub fn from_definitions(
        definitions: BTreeMap<String, RuleDefinition>,
        catalog: &Catalog,
    ) -> Result<Self, ConfigError> {
        let mut rules = BTreeMap::new();
        let mut owner_by_product: BTreeMap<String, String> = BTreeMap::new();

        for (name, def) in definitions {
            let rule = Rule::from_definition(name, def, catalog)?;

            if let Some(first) = owner_by_product.get(&rule.product) {
                return Err(ConfigError::OverlappingRules {
                    product: rule.product,
                    first: first.clone(),
                    second: rule.name,
                });
            }
            owner_by_product.insert(rule.product.clone(), rule.name.clone());
            rules.insert(rule.name.clone(), rule);
        }

        Ok(RuleCatalog { rules })
    }

    /// Rules bound to `code`, in name order. Usually zero or one.
    pub fn rules_for(&self, code: &str) -> Vec<&Rule> {
        self.rules.values().filter(|r| r.product == code).collect()
    }

    /// Rules that apply to `item` at its current quantity, in name order.
    pub fn matching<'a>(&'a self, item: &'a LineItem) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.values().filter(move |r| r.applies_to(item))
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(source: &str) -> Result<RuleCatalog, ConfigError> {
        RuleCatalog::load(source, &Catalog::standard())
    }

    #[test]
    fn test_standard_rules() {
        let rules = RuleCatalog::standard(&Catalog::standard()).unwrap();
        assert_eq!(rules.len(), 2);

        let voucher = rules.rules_for("VOUCHER");
        assert_eq!(voucher.len(), 1);
        assert_eq!(voucher[0].effect, RuleEffect::FreeUnit);
        assert_eq!(voucher[0].threshold, 2);

        let tshirt = rules.get("buy_three_or_more_new_price").unwrap();
        assert_eq!(tshirt.product, "TSHIRT");
        assert_eq!(tshirt.threshold, 3);
        assert_eq!(
            tshirt.effect,
            RuleEffect::BulkPrice {
                new_unit_price: Money::from_cents(1900)
            }
        );

        assert!(rules.rules_for("PANTS").is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert!(load("").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(load("[rules.x"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_effect() {
        let source = r#"
            [rules.x]
            product = "TSHIRT"
            quantity = 3
            effect = "half_price"
        "#;
        assert!(matches!(load(source), Err(ConfigError::Parse(_))));
    }

    fn bulk_price_of(source: &str) -> Money {
        match load(source).unwrap().get("x").unwrap().effect {
            RuleEffect::BulkPrice { new_unit_price } => new_unit_price,
            other => panic!("expected a bulk price, got {:?}", other),
        }
    }

    #[test]
    fn test_new_price_in_major_units() {
        let whole = r#"
            [rules.x]
            product = "TSHIRT"
            quantity = 3
            effect = "bulk_price"
            newPrice = 19
        "#;
        assert_eq!(bulk_price_of(whole).cents(), 1900);

        let fractional = r#"
            [rules.x]
            product = "TSHIRT"
            quantity = 3
            effect = "bulk_price"
            newPrice = 19.99
        "#;
        assert_eq!(bulk_price_of(fractional).cents(), 1999);

        let cents = r#"
            [rules.x]
            product = "TSHIRT"
            quantity = 3
            effect = "bulk_price"
            new_price_cents = 1900
        "#;
        assert_eq!(bulk_price_of(cents).cents(), 1900);
    }

    #[test]
    fn test_new_price_below_one_cent() {
        let source = r#"
            [rules.x]
            product = "TSHIRT"
            quantity = 3
            effect = "bulk_price"
            newPrice = 19.005
        "#;
        assert!(matches!(
            load(source),
            Err(ConfigError::InexactNewPrice { rule, value }) if rule == "x" && value == 19.005
        ));

        let infinite = r#"
            [rules.x]
            product = "TSHIRT"
            quantity = 3
            effect = "bulk_price"
            newPrice = inf
        "#;
        assert!(matches!(load(infinite), Err(ConfigError::InexactNewPrice { .. })));
    }

    #[test]
    fn test_new_price_out_of_range() {
        let source = r#"
            [rules.x]
            product = "TSHIRT"
            quantity = 3
            effect = "bulk_price"
            newPrice = 1e300
        "#;
        assert!(matches!(load(source), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_both_new_price_keys() {
        let source = r#"
            [rules.x]
            product = "TSHIRT"
            quantity = 3
            effect = "bulk_price"
            newPrice = 19
            new_price_cents = 1900
        "#;
        assert!(matches!(
            load(source),
            Err(ConfigError::ConflictingNewPrice { rule }) if rule == "x"
        ));
    }

    #[test]
    fn test_bulk_price_requires_new_price() {
        let source = r#"
            [rules.x]
            product = "TSHIRT"
            quantity = 3
            effect = "bulk_price"
        "#;
        assert!(matches!(
            load(source),
            Err(ConfigError::MissingNewPrice { rule }) if rule == "x"
        ));
    }

    #[test]
    fn test_free_unit_rejects_new_price() {
        let source = r#"
            [rules.x]
            product = "VOUCHER"
            quantity = 2
            effect = "free_unit"
            newPrice = 1
        "#;
        assert!(matches!(
            load(source),
            Err(ConfigError::UnexpectedNewPrice { .. })
        ));
    }

    #[test]
    fn test_unknown_product() {
        let source = r#"
            [rules.x]
            product = "DRESS"
            quantity = 2
            effect = "free_unit"
        "#;
        assert!(matches!(
            load(source),
            Err(ConfigError::UnknownProduct { product, .. }) if product == "DRESS"
        ));
    }

    #[test]
    fn test_zero_threshold() {
        let source = r#"
            [rules.x]
            product = "VOUCHER"
            quantity = 0
            effect = "free_unit"
        "#;
        assert!(matches!(load(source), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_negative_new_price() {
        let source = r#"
            [rules.x]
            product = "TSHIRT"
            quantity = 3
            effect = "bulk_price"
            new_price_cents = -5
        "#;
        assert!(matches!(load(source), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_overlapping_rules() {
        let source = r#"
            [rules.a_bulk]
            product = "TSHIRT"
            quantity = 3
            effect = "bulk_price"
            new_price_cents = 1900

            [rules.b_free]
            product = "TSHIRT"
            quantity = 5
            effect = "free_unit"
        "#;
        let err = load(source).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OverlappingRules { ref product, ref first, ref second }
                if product == "TSHIRT" && first == "a_bulk" && second == "b_free"
        ));
    }

    #[test]
    fn test_rule_converts_back_to_definition() {
        let rules = RuleCatalog::standard(&Catalog::standard()).unwrap();
        let definitions: BTreeMap<String, RuleDefinition> = rules
            .iter()
            .map(|rule| (rule.name.clone(), RuleDefinition::from(rule)))
            .collect();

        let tshirt = &definitions["buy_three_or_more_new_price"];
        assert_eq!(tshirt.effect, EffectKind::BulkPrice);
        assert_eq!(tshirt.new_price_cents, Some(1900));

        let rebuilt = RuleCatalog::from_definitions(definitions, &Catalog::standard()).unwrap();
        assert_eq!(rebuilt, rules);
    }

    #[test]
    fn test_applies_to_threshold_boundary() {
        let rules = RuleCatalog::standard(&Catalog::standard()).unwrap();
        let tshirt = Catalog::standard().lookup("TSHIRT").unwrap().clone();

        let at = LineItem::new(tshirt.clone()).with_quantity(3);
        let below = LineItem::new(tshirt).with_quantity(2);

        assert_eq!(rules.matching(&at).count(), 1);
        assert_eq!(rules.matching(&below).count(), 0);
    }
}
