//! Perk 数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// 优惠分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Tech,
    Travel,
    Fitness,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Tech,
        Category::Travel,
        Category::Fitness,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Tech => "tech",
            Category::Travel => "travel",
            Category::Fitness => "fitness",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// 已持久化的优惠
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perk {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    pub discount_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 通过校验、已补齐默认值的新建数据
#[derive(Debug, Clone, PartialEq)]
pub struct NewPerk {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub discount_percent: f64,
    pub merchant: Option<String>,
}

/// 部分更新：`None` 表示保持原值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerkPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub discount_percent: Option<f64>,
    pub merchant: Option<String>,
}

impl PerkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.discount_percent.is_none()
            && self.merchant.is_none()
    }

    /// 把补丁合并到已有记录上，并刷新 `updated_at`
    pub fn apply_to(self, perk: &mut Perk, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            perk.title = title;
        }
        if let Some(description) = self.description {
            perk.description = Some(description);
        }
        if let Some(category) = self.category {
            perk.category = category;
        }
        if let Some(discount_percent) = self.discount_percent {
            perk.discount_percent = discount_percent;
        }
        if let Some(merchant) = self.merchant {
            perk.merchant = Some(merchant);
        }
        perk.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Perk {
        let now = Utc::now();
        Perk {
            id: Uuid::new_v4(),
            title: "Free Coffee".to_string(),
            description: Some("one per day".to_string()),
            category: Category::Food,
            discount_percent: 10.0,
            merchant: Some("Acme".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn category_parses_only_known_values() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
        assert!("Food".parse::<Category>().is_err());
        assert!("books".parse::<Category>().is_err());
        assert_eq!(Category::default(), Category::Other);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut perk = sample();
        perk.description = None;
        let value = serde_json::to_value(&perk).unwrap();
        assert_eq!(value["discountPercent"], 10.0);
        assert_eq!(value["category"], "food");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("description").is_none());
    }

    #[test]
    fn patch_only_touches_submitted_fields() {
        let mut perk = sample();
        let before = perk.clone();
        let later = before.updated_at + chrono::Duration::seconds(5);

        PerkPatch {
            discount_percent: Some(50.0),
            ..Default::default()
        }
        .apply_to(&mut perk, later);

        assert_eq!(perk.discount_percent, 50.0);
        assert_eq!(perk.title, before.title);
        assert_eq!(perk.description, before.description);
        assert_eq!(perk.category, before.category);
        assert_eq!(perk.merchant, before.merchant);
        assert_eq!(perk.created_at, before.created_at);
        assert_eq!(perk.updated_at, later);
    }
}
