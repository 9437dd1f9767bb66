//! 请求体校验
//!
//! 两套 schema：创建（`title` 必填，其余字段补默认值）与部分更新（字段全部可选，
//! 但至少提交一个）。两者都拒绝未知字段和 `null`。

use serde::Deserialize;
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use super::model::{Category, NewPerk, PerkPatch};
use crate::core::error::CoreError;

const STRING_FIELDS: [&str; 4] = ["title", "description", "category", "merchant"];
const NUMBER_FIELDS: [&str; 1] = ["discountPercent"];

/// 创建请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePerkRequest {
    #[validate(
        required(message = "is required"),
        length(min = 2, message = "length must be at least 2 characters long")
    )]
    pub title: Option<String>,

    pub description: Option<String>,

    pub category: Option<String>,

    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub discount_percent: Option<f64>,

    pub merchant: Option<String>,
}

/// 部分更新请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePerkRequest {
    #[validate(length(min = 2, message = "length must be at least 2 characters long"))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub category: Option<String>,

    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub discount_percent: Option<f64>,

    pub merchant: Option<String>,
}

/// 按创建 schema 校验，成功时返回补齐默认值后的数据
pub fn validate_create(body: Value) -> Result<NewPerk, CoreError> {
    let fields = check_shape(body)?;
    let request: CreatePerkRequest = from_fields(fields)?;

    let mut errors = request.validate().err().unwrap_or_default();
    let category = check_category(request.category.as_deref(), &mut errors);
    if !errors.is_empty() {
        return Err(errors_to_core(errors));
    }

    Ok(NewPerk {
        // required 校验已保证存在
        title: request.title.unwrap_or_default(),
        description: request.description,
        category: category.unwrap_or_default(),
        discount_percent: request.discount_percent.unwrap_or(0.0),
        merchant: request.merchant,
    })
}

/// 按更新 schema 校验，不补默认值
pub fn validate_update(body: Value) -> Result<PerkPatch, CoreError> {
    let fields = check_shape(body)?;
    if fields.is_empty() {
        return Err(CoreError::validation("\"value\" must have at least 1 key"));
    }
    let request: UpdatePerkRequest = from_fields(fields)?;

    let mut errors = request.validate().err().unwrap_or_default();
    let category = check_category(request.category.as_deref(), &mut errors);
    if !errors.is_empty() {
        return Err(errors_to_core(errors));
    }

    Ok(PerkPatch {
        title: request.title,
        description: request.description,
        category,
        discount_percent: request.discount_percent,
        merchant: request.merchant,
    })
}

/// 对象形状检查：未知字段、null 与字段类型
fn check_shape(body: Value) -> Result<Map<String, Value>, CoreError> {
    let Value::Object(fields) = body else {
        return Err(CoreError::validation("\"value\" must be of type object"));
    };

    for (key, value) in &fields {
        let expects_string = STRING_FIELDS.contains(&key.as_str());
        let expects_number = NUMBER_FIELDS.contains(&key.as_str());

        if !expects_string && !expects_number {
            return Err(CoreError::validation(format!("\"{key}\" is not allowed")));
        }
        if value.is_null() {
            return Err(CoreError::validation(format!("\"{key}\" must not be null")));
        }
        if expects_string && !value.is_string() {
            return Err(CoreError::validation(format!("\"{key}\" must be a string")));
        }
        if expects_number && !value.is_number() {
            return Err(CoreError::validation(format!("\"{key}\" must be a number")));
        }
    }

    Ok(fields)
}

fn from_fields<T: for<'de> Deserialize<'de>>(fields: Map<String, Value>) -> Result<T, CoreError> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|err| CoreError::validation(format!("invalid payload: {err}")))
}

fn check_category(raw: Option<&str>, errors: &mut ValidationErrors) -> Option<Category> {
    let raw = raw?;
    match raw.parse::<Category>() {
        Ok(category) => Some(category),
        Err(_) => {
            let allowed: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
            let mut error = ValidationError::new("enum");
            error.message = Some(format!("must be one of [{}]", allowed.join(", ")).into());
            errors.add("category", error);
            None
        }
    }
}

/// 校验错误转为 400 消息，按字段名排序保证输出稳定
fn errors_to_core(errors: ValidationErrors) -> CoreError {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            let field = json_field_name(&field.to_string());
            errors.iter().map(move |error| {
                let reason = error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                (field.clone(), format!("\"{field}\" {reason}"))
            })
        })
        .collect();
    messages.sort();

    let joined: Vec<String> = messages.into_iter().map(|(_, msg)| msg).collect();
    CoreError::validation(joined.join(", "))
}

fn json_field_name(field: &str) -> String {
    match field {
        "discount_percent" => "discountPercent".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(err: CoreError) -> String {
        match err {
            CoreError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_applies_defaults() {
        let perk = validate_create(json!({ "title": "Free Coffee", "merchant": "Acme" })).unwrap();
        assert_eq!(perk.title, "Free Coffee");
        assert_eq!(perk.category, Category::Other);
        assert_eq!(perk.discount_percent, 0.0);
        assert_eq!(perk.merchant.as_deref(), Some("Acme"));
        assert_eq!(perk.description, None);
    }

    #[test]
    fn create_accepts_all_fields_and_empty_strings() {
        let perk = validate_create(json!({
            "title": "Gym week",
            "description": "",
            "category": "fitness",
            "discountPercent": 100,
            "merchant": ""
        }))
        .unwrap();
        assert_eq!(perk.category, Category::Fitness);
        assert_eq!(perk.discount_percent, 100.0);
        assert_eq!(perk.description.as_deref(), Some(""));
        assert_eq!(perk.merchant.as_deref(), Some(""));
    }

    #[test]
    fn create_requires_title_of_two_chars() {
        let msg = message(validate_create(json!({ "merchant": "Acme" })).unwrap_err());
        assert_eq!(msg, "\"title\" is required");

        let msg = message(validate_create(json!({ "title": "A" })).unwrap_err());
        assert_eq!(msg, "\"title\" length must be at least 2 characters long");
    }

    #[test]
    fn create_rejects_out_of_range_discount_and_unknown_category() {
        let msg = message(validate_create(json!({ "title": "Deal", "discountPercent": 101 })).unwrap_err());
        assert_eq!(msg, "\"discountPercent\" must be between 0 and 100");

        let msg = message(validate_create(json!({ "title": "Deal", "discountPercent": -1 })).unwrap_err());
        assert_eq!(msg, "\"discountPercent\" must be between 0 and 100");

        let msg = message(validate_create(json!({ "title": "Deal", "category": "books" })).unwrap_err());
        assert_eq!(
            msg,
            "\"category\" must be one of [food, tech, travel, fitness, other]"
        );
    }

    #[test]
    fn reports_every_field_violation_in_field_order() {
        let msg = message(
            validate_create(json!({ "title": "x", "category": "books", "discountPercent": 400 }))
                .unwrap_err(),
        );
        assert_eq!(
            msg,
            "\"category\" must be one of [food, tech, travel, fitness, other], \
             \"discountPercent\" must be between 0 and 100, \
             \"title\" length must be at least 2 characters long"
        );
    }

    #[test]
    fn rejects_unknown_keys_wrong_types_and_nulls() {
        let msg = message(validate_create(json!({ "title": "Deal", "price": 3 })).unwrap_err());
        assert_eq!(msg, "\"price\" is not allowed");

        let msg = message(validate_create(json!({ "title": 42 })).unwrap_err());
        assert_eq!(msg, "\"title\" must be a string");

        let msg = message(validate_update(json!({ "discountPercent": "10" })).unwrap_err());
        assert_eq!(msg, "\"discountPercent\" must be a number");

        let msg = message(validate_update(json!({ "merchant": null })).unwrap_err());
        assert_eq!(msg, "\"merchant\" must not be null");

        let msg = message(validate_create(json!(["title"])).unwrap_err());
        assert_eq!(msg, "\"value\" must be of type object");
    }

    #[test]
    fn update_needs_at_least_one_field() {
        let msg = message(validate_update(json!({})).unwrap_err());
        assert_eq!(msg, "\"value\" must have at least 1 key");
    }

    #[test]
    fn update_keeps_absent_fields_unset() {
        let patch = validate_update(json!({ "discountPercent": 25.5 })).unwrap();
        assert_eq!(
            patch,
            PerkPatch {
                discount_percent: Some(25.5),
                ..Default::default()
            }
        );

        let patch = validate_update(json!({ "category": "travel", "title": "Trip" })).unwrap();
        assert_eq!(patch.category, Some(Category::Travel));
        assert_eq!(patch.title.as_deref(), Some("Trip"));
        assert_eq!(patch.discount_percent, None);
    }

    #[test]
    fn update_applies_the_same_field_rules() {
        let msg = message(validate_update(json!({ "title": "x" })).unwrap_err());
        assert_eq!(msg, "\"title\" length must be at least 2 characters long");

        let msg = message(validate_update(json!({ "category": "Food" })).unwrap_err());
        assert!(msg.starts_with("\"category\" must be one of"));
    }
}
