//! Partial (PATCH) and full (PUT) update semantics shared by every resource.
//!
//! Request bodies arrive as JSON objects so that field presence can be told
//! apart from a field set to `null`.

use serde_json::{Map, Value};

use crate::{
    Error,
    resource::{READ_ONLY_FIELDS, Resource},
};

/// The result of merging a patch into an existing resource.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate<R> {
    /// The merged and validated resource.
    pub resource: R,
    /// The supplied fields whose stored value changed, in request order.
    pub updated_fields: Vec<String>,
}

/// Merge `patch` into `existing`.
///
/// Fields missing from `patch` keep their current value. Present fields
/// overwrite the current value and `null` resets an optional field to its
/// default.
///
/// # Errors
/// This function will return a:
/// - [Error::UnknownFields] if `patch` names a field the resource does not have,
///   including the read-only fields `id`, `user_id` and `created_at`,
/// - [Error::EmptyPatch] if `patch` is empty,
/// - [Error::MissingFields] if `patch` sets a required field to `null`,
/// - or a validation error if the merged resource is invalid.
pub fn apply_partial_update<R: Resource>(
    existing: &R,
    patch: Map<String, Value>,
) -> Result<PartialUpdate<R>, Error> {
    let unknown_fields: Vec<String> = patch
        .keys()
        .filter(|key| !R::FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();

    if !unknown_fields.is_empty() {
        return Err(Error::UnknownFields(unknown_fields));
    }

    if patch.is_empty() {
        return Err(Error::EmptyPatch);
    }

    let before = to_object(existing)?;
    let supplied_fields: Vec<String> = patch.keys().cloned().collect();

    let mut merged = before.clone();
    merged.extend(patch);

    let resource = apply_full_replacement::<R>(merged)?;
    let after = to_object(&resource)?;

    let updated_fields = supplied_fields
        .into_iter()
        .filter(|field| before.get(field) != after.get(field))
        .collect();

    Ok(PartialUpdate {
        resource,
        updated_fields,
    })
}

/// Build a complete resource from `input`.
///
/// Absent or `null` optional fields take their defaults. The read-only fields `id`,
/// `user_id` and `created_at` are ignored so that a fetched record can be
/// sent back unchanged.
///
/// # Errors
/// This function will return a:
/// - [Error::UnknownFields] if `input` names a field the resource does not have,
/// - [Error::MissingFields] naming every required field that is absent or `null`,
/// - or a validation error if a field has the wrong type or an invalid value.
pub fn apply_full_replacement<R: Resource>(mut input: Map<String, Value>) -> Result<R, Error> {
    for field in READ_ONLY_FIELDS {
        input.remove(*field);
    }

    let unknown_fields: Vec<String> = input
        .keys()
        .filter(|key| !R::FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();

    if !unknown_fields.is_empty() {
        return Err(Error::UnknownFields(unknown_fields));
    }

    let missing_fields: Vec<String> = R::REQUIRED_FIELDS
        .iter()
        .filter(|field| input.get(**field).is_none_or(Value::is_null))
        .map(|field| (*field).to_owned())
        .collect();

    if !missing_fields.is_empty() {
        return Err(Error::MissingFields(missing_fields));
    }

    // `null` on an optional field means "use the default".
    input.retain(|_, value| !value.is_null());

    let resource: R = serde_json::from_value(Value::Object(input))
        .map_err(|error| Error::Validation(format!("invalid {}: {error}", R::NAME)))?;

    resource.validate()?;

    Ok(resource)
}

fn to_object<R: Resource>(resource: &R) -> Result<Map<String, Value>, Error> {
    match serde_json::to_value(resource) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(Error::JsonSerialization(format!(
            "expected {} to serialize as an object, got {other}",
            R::NAME
        ))),
        Err(error) => Err(Error::JsonSerialization(error.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};
    use time::macros::date;

    use crate::{
        Error,
        account::Account,
        transaction::{Transaction, TransactionType},
    };

    use super::{apply_full_replacement, apply_partial_update};

    fn as_object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected a JSON object, got {other}"),
        }
    }

    fn coffee() -> Transaction {
        Transaction {
            amount: 4.5,
            transaction_type: TransactionType::Expense,
            date: date!(2024 - 01 - 15),
            description: "Coffee".to_owned(),
            category_id: Some(2),
            account_id: Some(1),
        }
    }

    #[test]
    fn patch_changes_only_supplied_fields() {
        let existing = coffee();
        let patch = as_object(json!({
            "description": "Updated coffee purchase",
            "amount": 30.50
        }));

        let got = apply_partial_update(&existing, patch).unwrap();

        assert_eq!(got.updated_fields, vec!["description", "amount"]);
        assert_eq!(
            got.resource,
            Transaction {
                amount: 30.5,
                description: "Updated coffee purchase".to_owned(),
                ..existing
            }
        );
    }

    #[test]
    fn updated_fields_follow_request_order() {
        let patch = as_object(json!({"date": "2024-02-01", "amount": 1.0, "type": "income"}));

        let got = apply_partial_update(&coffee(), patch).unwrap();

        assert_eq!(got.updated_fields, vec!["date", "amount", "type"]);
    }

    #[test]
    fn empty_patch_is_rejected() {
        let got = apply_partial_update(&coffee(), Map::new());

        assert_eq!(got, Err(Error::EmptyPatch));
    }

    #[test]
    fn unknown_patch_fields_are_rejected() {
        let patch = as_object(json!({"descripton": "typo", "amount": 2.0}));

        let got = apply_partial_update(&coffee(), patch);

        assert_eq!(got, Err(Error::UnknownFields(vec!["descripton".to_owned()])));
    }

    #[test]
    fn read_only_fields_cannot_be_patched() {
        let patch = as_object(json!({"id": 99}));

        let got = apply_partial_update(&coffee(), patch);

        assert_eq!(got, Err(Error::UnknownFields(vec!["id".to_owned()])));
    }

    #[test]
    fn null_clears_optional_field() {
        let patch = as_object(json!({"category_id": null}));

        let got = apply_partial_update(&coffee(), patch).unwrap();

        assert_eq!(got.resource.category_id, None);
        assert_eq!(got.resource.account_id, Some(1));
    }

    #[test]
    fn null_resets_defaulted_field() {
        let patch = as_object(json!({"description": null}));

        let got = apply_partial_update(&coffee(), patch).unwrap();

        assert_eq!(got.resource.description, "");
        assert_eq!(got.updated_fields, vec!["description"]);
    }

    #[test]
    fn unchanged_fields_are_not_reported() {
        let patch = as_object(json!({"description": "Coffee", "amount": 5.0}));

        let got = apply_partial_update(&coffee(), patch).unwrap();

        assert_eq!(got.updated_fields, vec!["amount"]);
        assert_eq!(got.resource.amount, 5.0);
    }

    #[test]
    fn full_replacement_uses_default_for_null_currency() {
        let input = as_object(json!({"name": "Travel", "type": "savings", "currency": null}));

        let got = apply_full_replacement::<Account>(input).unwrap();

        assert_eq!(got.currency, "USD");
        assert_eq!(got.balance, 0.0);
    }

    #[test]
    fn null_required_field_is_rejected() {
        let patch = as_object(json!({"amount": null}));

        let got = apply_partial_update(&coffee(), patch);

        assert_eq!(got, Err(Error::MissingFields(vec!["amount".to_owned()])));
    }

    #[test]
    fn wrong_type_is_a_validation_error() {
        let patch = as_object(json!({"amount": "lots"}));

        let got = apply_partial_update(&coffee(), patch);

        assert!(matches!(got, Err(Error::Validation(_))));
    }

    #[test]
    fn full_replacement_names_all_missing_fields() {
        let input = as_object(json!({"description": "No amount, type or date"}));

        let got = apply_full_replacement::<Transaction>(input);

        assert_eq!(
            got,
            Err(Error::MissingFields(vec![
                "amount".to_owned(),
                "type".to_owned(),
                "date".to_owned()
            ]))
        );
    }

    #[test]
    fn full_replacement_applies_defaults() {
        let input = as_object(json!({"amount": -20.0, "type": "expense", "date": "2024-01-20"}));

        let got = apply_full_replacement::<Transaction>(input).unwrap();

        assert_eq!(got.description, "");
        assert_eq!(got.category_id, None);
        assert_eq!(got.account_id, None);
    }

    #[test]
    fn full_replacement_ignores_read_only_fields() {
        let input = as_object(json!({
            "id": 12,
            "user_id": "someone-else",
            "created_at": "2024-01-01T00:00:00Z",
            "amount": -20.0,
            "type": "expense",
            "date": "2024-01-20"
        }));

        let got = apply_full_replacement::<Transaction>(input);

        assert!(got.is_ok());
    }

    #[test]
    fn full_replacement_rejects_unknown_fields() {
        let input = as_object(json!({
            "amount": -20.0,
            "type": "expense",
            "date": "2024-01-20",
            "memo": "not a field"
        }));

        let got = apply_full_replacement::<Transaction>(input);

        assert_eq!(got, Err(Error::UnknownFields(vec!["memo".to_owned()])));
    }

    #[test]
    fn full_replacement_is_idempotent() {
        let input = as_object(json!({
            "amount": -20.0,
            "type": "expense",
            "date": "2024-01-20",
            "description": "Lunch",
            "category_id": 4
        }));

        let first = apply_full_replacement::<Transaction>(input.clone()).unwrap();
        let second = apply_full_replacement::<Transaction>(input).unwrap();

        assert_eq!(first, second);
    }
}
