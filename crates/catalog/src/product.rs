use serde::{Deserialize, Serialize};

/// Coarse product category. Substitutions never cross categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ink,
    Toner,
    #[default]
    Other,
}

/// Color classification used by the compatibility guardrail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorClass {
    #[default]
    Black,
    Cyan,
    Magenta,
    Yellow,
    Tricolor,
    Photo,
    Other,
}

/// Coarse cartridge capacity tier.
///
/// The ordering matters: a replacement may only move to an equal or higher
/// tier, so the guardrail compares [`YieldClass::rank`] values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum YieldClass {
    #[default]
    Standard,
    High,
    ExtraHigh,
    SuperHigh,
}

impl YieldClass {
    /// Numeric rank for downgrade checks. Higher is more capacity.
    pub fn rank(self) -> u8 {
        match self {
            YieldClass::Standard => 0,
            YieldClass::High => 1,
            YieldClass::ExtraHigh => 2,
            YieldClass::SuperHigh => 3,
        }
    }
}

/// A single catalog entry.
///
/// Read-only snapshot data: the engine never mutates products. Identifier
/// fields (`sku`, `oem_code`, `dealer_code`, `alt_codes`) are each
/// independently searchable through [`crate::CatalogPort`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogProduct {
    /// Primary stock-keeping unit; unique within a snapshot.
    pub sku: String,
    /// Manufacturer (OEM) part code, when known.
    #[serde(default)]
    pub oem_code: Option<String>,
    /// Distributor/dealer part code, when known.
    #[serde(default)]
    pub dealer_code: Option<String>,
    /// Secondary vendor codes.
    #[serde(default)]
    pub alt_codes: Vec<String>,
    /// Display name.
    pub name: String,
    /// Long-form description used by full-text and description search.
    #[serde(default)]
    pub description: String,
    pub brand: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub color: ColorClass,
    #[serde(default)]
    pub yield_class: YieldClass,
    /// Rated page yield per unit, when published.
    #[serde(default)]
    pub page_yield: Option<u32>,
    /// Catalog unit price (pre-markup).
    #[serde(default)]
    pub unit_price: Option<f64>,
    /// Wholesale acquisition cost.
    #[serde(default)]
    pub wholesale_cost: Option<f64>,
    /// Partner list price shown to customers.
    #[serde(default)]
    pub list_price: Option<f64>,
    /// Product family/series tag used for replacement pre-filtering.
    #[serde(default)]
    pub family: Option<String>,
    /// Compatibility group tag.
    #[serde(default)]
    pub compat_group: Option<String>,
    /// Printer model pattern tag.
    #[serde(default)]
    pub model_pattern: Option<String>,
    /// Merchandising priority; higher wins tie-breaks among equal scores.
    #[serde(default)]
    pub active_priority: u32,
    /// Precomputed semantic embedding of name + description, when indexed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl CatalogProduct {
    /// All identifier values carried by this product, primary first.
    pub fn identifier_values(&self) -> Vec<&str> {
        let mut values = vec![self.sku.as_str()];
        if let Some(code) = self.oem_code.as_deref() {
            values.push(code);
        }
        if let Some(code) = self.dealer_code.as_deref() {
            values.push(code);
        }
        values.extend(self.alt_codes.iter().map(String::as_str));
        values
    }
}
