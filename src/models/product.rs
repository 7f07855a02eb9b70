use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{
    form_message, parse_product_price, validate_product_id, validate_product_name,
    validate_product_price, FormErrors, ValidationError, ValidationResult,
};

/// Stable catalog identifier: a small integer (`"121"`) or a short slug (`"sku-7"`)
///
/// Only ASCII letters, digits, `-` and `_` are accepted, at most 64 of them. Route
/// segments outside that set, such as `a.b`, are rejected before reaching a cart, so
/// adding one leaves the cart state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Parse a raw identifier as it appears in a route or a stored cart
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        validate_product_id(raw)?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the identifier, when it is an integer id
    pub fn as_number(&self) -> Option<u64> {
        if self.0.chars().all(|c| c.is_ascii_digit()) {
            self.0.parse().ok()
        } else {
            None
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<String> for ProductId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_product_id(&value)?;
        Ok(Self(value))
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// Immutable catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    id: ProductId,
    name: String,
    price: Decimal,
}

/// Unchecked wire shape of a product
#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: ProductId,
    name: String,
    price: Decimal,
}

impl TryFrom<ProductRecord> for Product {
    type Error = ValidationError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Product::new(record.id, record.name, record.price)
    }
}

impl Product {
    /// Create a product, rejecting a blank name or a non-positive price
    pub fn new(id: ProductId, name: impl Into<String>, price: Decimal) -> ValidationResult<Self> {
        let name = name.into();
        validate_product_name(&name)?;
        validate_product_price(&price)?;
        Ok(Self {
            id,
            name: name.trim().to_string(),
            price,
        })
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }
}

/// Submitted product form; fields stay raw so every problem can be reported
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "price_text")]
    pub price: String,
}

/// JSON clients may send the price as a number; forms always send text
fn price_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawPrice::deserialize(deserializer)? {
        RawPrice::Text(text) => text,
        RawPrice::Number(number) => number.to_string(),
    })
}

/// A product form that passed validation and is waiting for an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
}

impl NewProduct {
    pub fn with_id(self, id: ProductId) -> ValidationResult<Product> {
        Product::new(id, self.name, self.price)
    }
}

impl CreateProductRequest {
    /// Validate every field, collecting one message list per field
    pub fn parse(&self) -> Result<NewProduct, FormErrors> {
        let mut errors = FormErrors::new();

        if let Err(err) = validate_product_name(&self.name) {
            errors.add(err.field(), form_message(&err));
        }

        let price = match parse_product_price(&self.price) {
            Ok(price) => Some(price),
            Err(err) => {
                errors.add(err.field(), form_message(&err));
                None
            }
        };

        match price {
            Some(price) if errors.is_empty() => Ok(NewProduct {
                name: self.name.trim().to_string(),
                price,
            }),
            _ => Err(errors),
        }
    }
}
