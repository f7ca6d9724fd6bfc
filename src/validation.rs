//! Field-level validation of the public order-placement payload.
//!
//! Fields are accepted as raw JSON values so that every problem can be
//! reported against its field instead of failing deserialization wholesale.

use std::collections::BTreeMap;

use phonenumber::country::Id as Country;
use phonenumber::Mode;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::errors::FieldErrors;
use crate::domain::order::{OrderDraft, OrderItemInput};

/// Region assumed for phone numbers written without a country code.
pub const DEFAULT_REGION: Country = Country::RU;

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";

/// `None` means the field was absent; an explicit JSON `null` arrives as
/// `Some(Value::Null)`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderPayload {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = String, example = "Ivan")]
    pub firstname: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = String, example = "Petrov")]
    pub lastname: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = String, example = "+79161234567")]
    pub phonenumber: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = String, example = "Moscow, Red Square")]
    pub address: Option<Value>,
    /// `[{"product": <id>, "quantity": <n>}, ...]`
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Object)]
    pub products: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl OrderPayload {
    /// Check every field and collect all problems. Repeated products are
    /// merged into one line with the quantities summed.
    pub fn validate(&self) -> Result<OrderDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let firstname = text_field(&mut errors, "firstname", self.firstname.as_ref(), 50);
        let lastname = text_field(&mut errors, "lastname", self.lastname.as_ref(), 50);
        let address = text_field(&mut errors, "address", self.address.as_ref(), 100);
        let phonenumber = text_field(&mut errors, "phonenumber", self.phonenumber.as_ref(), 128)
            .and_then(|raw| match normalize_phone(&raw) {
                Some(normalized) => Some(normalized),
                None => {
                    push(&mut errors, "phonenumber", "Enter a valid phone number.");
                    None
                }
            });
        let items = product_items(&mut errors, self.products.as_ref());

        match (firstname, lastname, phonenumber, address, items) {
            (Some(firstname), Some(lastname), Some(phonenumber), Some(address), Some(items))
                if errors.is_empty() =>
            {
                Ok(OrderDraft {
                    firstname,
                    lastname,
                    phonenumber,
                    address,
                    items,
                })
            }
            _ => Err(errors),
        }
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn text_field(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
    max_chars: usize,
) -> Option<String> {
    let text = match value {
        None => {
            push(errors, field, REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            push(errors, field, NOT_NULL);
            return None;
        }
        Some(Value::String(text)) => text.trim(),
        Some(_) => {
            push(errors, field, "Not a valid string.");
            return None;
        }
    };

    if text.is_empty() {
        push(errors, field, NOT_BLANK);
        return None;
    }
    if text.chars().count() > max_chars {
        push(
            errors,
            field,
            format!("Ensure this field has no more than {max_chars} characters."),
        );
        return None;
    }
    Some(text.to_string())
}

/// Parse `raw` as a phone number, defaulting to [`DEFAULT_REGION`], and
/// return it in E.164 form when valid.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let number = phonenumber::parse(Some(DEFAULT_REGION), raw).ok()?;
    if !phonenumber::is_valid(&number) {
        return None;
    }
    Some(number.format().mode(Mode::E164).to_string())
}

fn product_items(errors: &mut FieldErrors, value: Option<&Value>) -> Option<Vec<OrderItemInput>> {
    let entries = match value {
        None => {
            push(errors, "products", REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            push(errors, "products", NOT_NULL);
            return None;
        }
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            push(
                errors,
                "products",
                format!(
                    "Expected a list of items but got type \"{}\".",
                    type_name(other)
                ),
            );
            return None;
        }
    };
    if entries.is_empty() {
        push(errors, "products", "This list may not be empty.");
        return None;
    }

    // product id -> total quantity, in first-seen order
    let mut merged: Vec<OrderItemInput> = Vec::with_capacity(entries.len());
    let mut position: BTreeMap<i32, usize> = BTreeMap::new();
    let mut valid = true;

    for (idx, entry) in entries.iter().enumerate() {
        let item = match product_item(entry) {
            Ok(item) => item,
            Err(message) => {
                push(errors, "products", format!("Item {idx}: {message}"));
                valid = false;
                continue;
            }
        };
        match position.get(&item.product_id) {
            Some(&at) => match merged[at].quantity.checked_add(item.quantity) {
                Some(total) => merged[at].quantity = total,
                None => {
                    push(
                        errors,
                        "products",
                        format!("Item {idx}: quantity: Total quantity is too large."),
                    );
                    valid = false;
                }
            },
            None => {
                position.insert(item.product_id, merged.len());
                merged.push(item);
            }
        }
    }

    valid.then_some(merged)
}

fn product_item(entry: &Value) -> Result<OrderItemInput, String> {
    let Value::Object(fields) = entry else {
        return Err(format!(
            "Invalid data. Expected a dictionary, but got {}.",
            type_name(entry)
        ));
    };

    let product_id = match fields.get("product") {
        None => return Err(format!("product: {REQUIRED}")),
        Some(Value::Null) => return Err(format!("product: {NOT_NULL}")),
        Some(value) => value
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or_else(|| {
                format!(
                    "product: Incorrect type. Expected pk value, received {}.",
                    type_name(value)
                )
            })?,
    };

    let quantity = match fields.get("quantity") {
        None => return Err(format!("quantity: {REQUIRED}")),
        Some(Value::Null) => return Err(format!("quantity: {NOT_NULL}")),
        Some(value) => match value.as_i64() {
            Some(q) if q < 1 => {
                return Err("quantity: Ensure this value is greater than or equal to 1.".to_string())
            }
            Some(q) => i32::try_from(q).map_err(|_| {
                format!(
                    "quantity: Ensure this value is less than or equal to {}.",
                    i32::MAX
                )
            })?,
            None => return Err("quantity: A valid integer is required.".to_string()),
        },
    };

    Ok(OrderItemInput {
        product_id,
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(value: Value) -> OrderPayload {
        serde_json::from_value(value).expect("payload deserializes")
    }

    fn valid() -> Value {
        json!({
            "firstname": "Ivan",
            "lastname": "Petrov",
            "phonenumber": "+79161234567",
            "address": "Moscow, Red Square",
            "products": [{"product": 1, "quantity": 2}]
        })
    }

    #[test]
    fn valid_payload_becomes_draft() {
        let draft = payload(valid()).validate().unwrap();

        assert_eq!(draft.firstname, "Ivan");
        assert_eq!(draft.phonenumber, "+79161234567");
        assert_eq!(
            draft.items,
            vec![OrderItemInput {
                product_id: 1,
                quantity: 2
            }]
        );
    }

    #[test]
    fn empty_products_list_is_rejected() {
        let mut body = valid();
        body["products"] = json!([]);

        let errors = payload(body).validate().unwrap_err();

        assert_eq!(errors["products"], vec!["This list may not be empty."]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn missing_and_null_fields_are_reported_per_field() {
        let errors = payload(json!({"firstname": null, "lastname": ""}))
            .validate()
            .unwrap_err();

        assert_eq!(errors["firstname"], vec![NOT_NULL]);
        assert_eq!(errors["lastname"], vec![NOT_BLANK]);
        assert_eq!(errors["phonenumber"], vec![REQUIRED]);
        assert_eq!(errors["address"], vec![REQUIRED]);
        assert_eq!(errors["products"], vec![REQUIRED]);
    }

    #[test]
    fn products_must_be_a_list() {
        let mut body = valid();
        body["products"] = json!("burger");

        let errors = payload(body).validate().unwrap_err();

        assert_eq!(
            errors["products"],
            vec!["Expected a list of items but got type \"str\"."]
        );
    }

    #[test]
    fn non_string_name_is_rejected() {
        let mut body = valid();
        body["firstname"] = json!(["Ivan"]);

        let errors = payload(body).validate().unwrap_err();

        assert_eq!(errors["firstname"], vec!["Not a valid string."]);
    }

    #[test]
    fn invalid_phone_number_is_rejected() {
        let mut body = valid();
        body["phonenumber"] = json!("12345");

        let errors = payload(body).validate().unwrap_err();

        assert_eq!(errors["phonenumber"], vec!["Enter a valid phone number."]);
    }

    #[test]
    fn national_phone_format_uses_default_region() {
        assert_eq!(
            normalize_phone("8 (916) 123-45-67").as_deref(),
            Some("+79161234567")
        );
        assert_eq!(normalize_phone("not a phone"), None);
    }

    #[test]
    fn item_problems_name_the_offending_entry() {
        let mut body = valid();
        body["products"] = json!([
            {"product": 1, "quantity": 1},
            {"product": "one", "quantity": 1},
            {"product": 2, "quantity": 0}
        ]);

        let errors = payload(body).validate().unwrap_err();

        assert_eq!(
            errors["products"],
            vec![
                "Item 1: product: Incorrect type. Expected pk value, received str.",
                "Item 2: quantity: Ensure this value is greater than or equal to 1.",
            ]
        );
    }

    #[test]
    fn repeated_products_are_merged() {
        let mut body = valid();
        body["products"] = json!([
            {"product": 3, "quantity": 1},
            {"product": 1, "quantity": 2},
            {"product": 3, "quantity": 4}
        ]);

        let draft = payload(body).validate().unwrap();

        assert_eq!(
            draft.items,
            vec![
                OrderItemInput {
                    product_id: 3,
                    quantity: 5
                },
                OrderItemInput {
                    product_id: 1,
                    quantity: 2
                },
            ]
        );
    }
}
