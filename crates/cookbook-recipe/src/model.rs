//! Parsed recipe types.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Free-form `key: value` metadata declared in a recipe document.
pub type Metadata = BTreeMap<String, String>;

/// A parsed recipe document.
///
/// Produced by a [`RecipeParser`](crate::RecipeParser) and treated as
/// read-only by everything downstream.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Recipe {
    /// Ingredients in order of appearance.
    pub ingredients: Vec<Ingredient>,
    /// Instruction steps as plain text.
    pub steps: Vec<String>,
    /// Document metadata.
    pub metadata: Metadata,
}

/// An ingredient referenced by a recipe.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ingredient {
    /// Ingredient name as it appears in the step text.
    pub name: String,
    /// Quantity, if the document declares one.
    pub quantity: Option<Quantity>,
}

impl Ingredient {
    /// Create an ingredient without a quantity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
        }
    }

    /// Attach a quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

/// Amount and optional unit of an ingredient.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Quantity {
    pub amount: Amount,
    pub unit: Option<String>,
}

impl Quantity {
    pub fn new(amount: Amount, unit: Option<String>) -> Self {
        Self { amount, unit }
    }
}

/// Renders as `amount` or `amount unit`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amount)?;
        if let Some(unit) = &self.unit {
            write!(f, " {unit}")?;
        }
        Ok(())
    }
}

/// Numeric or free-text amount.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// Parse an amount, preferring a number.
    ///
    /// Integers, decimals and simple fractions (`1/2`) become numbers,
    /// anything else is kept as text.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if let Ok(number) = value.parse::<f64>()
            && number.is_finite()
        {
            return Self::Number(number);
        }
        if let Some((num, den)) = value.split_once('/')
            && let (Ok(num), Ok(den)) = (num.trim().parse::<u32>(), den.trim().parse::<u32>())
            && den != 0
        {
            return Self::Number(f64::from(num) / f64::from(den));
        }
        Self::Text(value.to_owned())
    }
}

impl fmt::Display for Amount {
    #[allow(clippy::cast_possible_truncation)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers print without a trailing ".0"
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}
