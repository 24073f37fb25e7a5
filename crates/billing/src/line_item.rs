use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use simrs_core::{Money, ValueObject};

use crate::calculator;

/// What a line item bills for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Service,
    Medication,
    Lab,
    Radiology,
    Room,
    Other,
}

impl ItemType {
    pub const ALL: [ItemType; 6] = [
        ItemType::Service,
        ItemType::Medication,
        ItemType::Lab,
        ItemType::Radiology,
        ItemType::Room,
        ItemType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Service => "service",
            ItemType::Medication => "medication",
            ItemType::Lab => "lab",
            ItemType::Radiology => "radiology",
            ItemType::Room => "room",
            ItemType::Other => "other",
        }
    }

    /// Map a select-box value onto a type. Blank means `service`, anything
    /// unrecognised means `other`.
    pub fn parse_lenient(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return ItemType::Service;
        }
        ItemType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(raw))
            .unwrap_or(ItemType::Other)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A billable entry with a parsed quantity and unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub item_type: ItemType,
}

impl ValueObject for LineItem {}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: u32,
        unit_price: Money,
        item_type: ItemType,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            item_type,
        }
    }

    /// `quantity × unit_price`, rounded to cents.
    pub fn total(&self) -> Money {
        calculator::item_total(self.quantity, self.unit_price)
    }

    /// Coerce a raw form row. Never fails: malformed numbers become zero.
    pub fn from_input(input: &LineItemInput) -> Self {
        Self {
            description: input.description.as_deref().unwrap_or_default().trim().to_string(),
            quantity: input.quantity.as_deref().map(parse_quantity).unwrap_or(0),
            unit_price: Money::parse_field(input.unit_price.as_deref()),
            item_type: input
                .item_type
                .as_deref()
                .map(ItemType::parse_lenient)
                .unwrap_or_default(),
        }
    }
}

/// One row exactly as entered in the billing form.
///
/// Every field is optional text. JSON numbers are accepted and kept as their
/// textual form so they go through the same coercion as typed input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineItemInput {
    #[serde(default, deserialize_with = "form_field", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "form_field", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "form_field", skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,
    #[serde(default, deserialize_with = "form_field", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
}

impl LineItemInput {
    pub fn new(description: &str, quantity: &str, unit_price: &str) -> Self {
        Self {
            description: Some(description.to_string()),
            quantity: Some(quantity.to_string()),
            unit_price: Some(unit_price.to_string()),
            item_type: None,
        }
    }

    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type.as_str().to_string());
        self
    }
}

impl From<&LineItem> for LineItemInput {
    fn from(item: &LineItem) -> Self {
        Self {
            description: Some(item.description.clone()),
            quantity: Some(item.quantity.to_string()),
            unit_price: Some(item.unit_price.amount().to_string()),
            item_type: Some(item.item_type.as_str().to_string()),
        }
    }
}

/// Parse a quantity field: the leading integer of the trimmed text
/// (`"2.7"` is 2, `"3 box"` is 3). Empty, non-numeric, negative or
/// out-of-range input is zero.
pub fn parse_quantity(raw: &str) -> u32 {
    let s = raw.trim();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        if !s.is_empty() {
            tracing::debug!(raw, "non-numeric quantity coerced to zero");
        }
        return 0;
    }
    if negative {
        tracing::debug!(raw, "negative quantity coerced to zero");
        return 0;
    }
    match rest[..digits_len].parse::<u32>() {
        Ok(quantity) => quantity,
        Err(_) => {
            tracing::debug!(raw, "quantity out of range, coerced to zero");
            0
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Number(serde_json::Number),
}

pub(crate) fn form_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<FieldValue>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        FieldValue::Text(s) => s,
        FieldValue::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_takes_leading_integer() {
        assert_eq!(parse_quantity("2"), 2);
        assert_eq!(parse_quantity(" 2.7 "), 2);
        assert_eq!(parse_quantity("3 box"), 3);
        assert_eq!(parse_quantity("+4"), 4);
    }

    #[test]
    fn quantity_degrades_to_zero() {
        for raw in ["", "abc", "-3", "-", "99999999999999999999"] {
            assert_eq!(parse_quantity(raw), 0, "input {raw:?}");
        }
    }

    #[test]
    fn item_type_defaults_and_fallbacks() {
        assert_eq!(ItemType::parse_lenient(""), ItemType::Service);
        assert_eq!(ItemType::parse_lenient("Radiology"), ItemType::Radiology);
        assert_eq!(ItemType::parse_lenient("kamar"), ItemType::Other);
    }

    #[test]
    fn from_input_coerces_every_field() {
        let input = LineItemInput {
            description: Some("  Konsultasi dokter ".to_string()),
            quantity: Some("two".to_string()),
            unit_price: None,
            item_type: Some("lab".to_string()),
        };
        let item = LineItem::from_input(&input);
        assert_eq!(item.description, "Konsultasi dokter");
        assert_eq!(item.quantity, 0);
        assert_eq!(item.unit_price, Money::ZERO);
        assert_eq!(item.item_type, ItemType::Lab);
        assert_eq!(item.total(), Money::ZERO);
    }

    #[test]
    fn input_accepts_json_numbers_and_strings() {
        let input: LineItemInput = serde_json::from_str(
            r#"{"description":"Paracetamol","quantity":2,"unit_price":"5000.5","item_type":null}"#,
        )
        .unwrap();
        assert_eq!(input.quantity.as_deref(), Some("2"));
        assert_eq!(input.unit_price.as_deref(), Some("5000.5"));
        assert_eq!(input.item_type, None);

        let item = LineItem::from_input(&input);
        assert_eq!(item.total().to_fixed(), "10001.00");
    }
}
