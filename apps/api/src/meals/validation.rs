//! Input normalization for meal create/update requests.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::meal::MealRow;

/// Fields accepted when creating a meal.
#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update. An absent field leaves the meal unchanged; for the
/// nullable text fields an explicit `null` clears the value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMealRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub enabled: Option<bool>,
}

/// Distinguishes `"field": null` (Some(None)) from a missing field (None).
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Normalized values ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct MealFields {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub enabled: bool,
}

pub fn normalize_name(raw: Option<&str>) -> Result<String, AppError> {
    let name = raw.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::Validation("Meal name is required".to_string()));
    }
    Ok(name.to_string())
}

/// Trims; blank becomes `None`.
pub fn normalize_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Trims each tag, drops blanks and repeats (first occurrence wins).
pub fn normalize_tags(raw: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Case-insensitive name clash among non-deleted meals, ignoring `exclude`.
pub fn find_duplicate<'a>(
    existing: &'a [(Uuid, String)],
    name: &str,
    exclude: Option<Uuid>,
) -> Option<&'a str> {
    let wanted = name.to_lowercase();
    existing
        .iter()
        .filter(|(id, _)| Some(*id) != exclude)
        .find(|(_, other)| other.to_lowercase() == wanted)
        .map(|(_, other)| other.as_str())
}

pub fn duplicate_error(existing_name: &str) -> AppError {
    AppError::Conflict(format!("A meal named \"{existing_name}\" already exists"))
}

impl CreateMealRequest {
    pub fn into_fields(self) -> Result<MealFields, AppError> {
        Ok(MealFields {
            name: normalize_name(self.name.as_deref())?,
            category: normalize_text(self.category.as_deref()),
            description: normalize_text(self.description.as_deref()),
            tags: normalize_tags(&self.tags),
            enabled: true,
        })
    }
}

impl UpdateMealRequest {
    /// Merges the patch onto the stored meal.
    pub fn apply_to(&self, meal: &MealRow) -> Result<MealFields, AppError> {
        let name = match self.name.as_deref() {
            Some(raw) if raw != meal.name => normalize_name(Some(raw)).map_err(|_| {
                AppError::Validation("Meal name cannot be empty".to_string())
            })?,
            _ => meal.name.clone(),
        };

        Ok(MealFields {
            name,
            category: match &self.category {
                Some(value) => normalize_text(value.as_deref()),
                None => meal.category.clone(),
            },
            description: match &self.description {
                Some(value) => normalize_text(value.as_deref()),
                None => meal.description.clone(),
            },
            tags: match &self.tags {
                Some(tags) => normalize_tags(tags),
                None => meal.tags.clone(),
            },
            enabled: self.enabled.unwrap_or(meal.enabled),
        })
    }

    /// True when the request renames the meal.
    pub fn renames(&self, meal: &MealRow) -> bool {
        self.name.as_deref().is_some_and(|raw| raw != meal.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stored_meal() -> MealRow {
        MealRow {
            id: Uuid::new_v4(),
            name: "Beef Tacos".to_string(),
            category: Some("Mexican".to_string()),
            description: Some("Crispy shells".to_string()),
            tags: vec!["tacos".to_string(), "quick".to_string()],
            enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_name_is_trimmed_and_required() {
        assert_eq!(normalize_name(Some("  Pad Thai ")).unwrap(), "Pad Thai");
        assert!(matches!(normalize_name(Some("   ")), Err(AppError::Validation(_))));
        assert!(matches!(normalize_name(None), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_blank_text_becomes_none() {
        assert_eq!(normalize_text(Some("  ")), None);
        assert_eq!(normalize_text(Some(" Asian ")), Some("Asian".to_string()));
        assert_eq!(normalize_text(None), None);
    }

    #[test]
    fn test_tags_deduplicated_in_order() {
        let raw = vec![
            " spicy".to_string(),
            "".to_string(),
            "comfort".to_string(),
            "spicy ".to_string(),
        ];
        assert_eq!(normalize_tags(&raw), vec!["spicy", "comfort"]);
    }

    #[test]
    fn test_duplicate_is_case_insensitive() {
        let id = Uuid::new_v4();
        let existing = vec![(id, "Greek Salad".to_string())];
        assert_eq!(find_duplicate(&existing, "greek salad", None), Some("Greek Salad"));
        assert_eq!(find_duplicate(&existing, "GREEK SALAD", Some(id)), None);
        assert_eq!(find_duplicate(&existing, "Caesar Salad", None), None);
    }

    #[test]
    fn test_duplicate_error_message() {
        let err = duplicate_error("Sushi Rolls");
        assert_eq!(
            err.to_string(),
            "Conflict: A meal named \"Sushi Rolls\" already exists"
        );
    }

    #[test]
    fn test_create_request_defaults_enabled() {
        let req: CreateMealRequest =
            serde_json::from_str(r#"{"name":" BBQ Ribs ","category":"","tags":["bbq"]}"#).unwrap();
        let fields = req.into_fields().unwrap();
        assert_eq!(fields.name, "BBQ Ribs");
        assert_eq!(fields.category, None);
        assert_eq!(fields.tags, vec!["bbq"]);
        assert!(fields.enabled);
    }

    #[test]
    fn test_patch_absent_fields_unchanged() {
        let meal = stored_meal();
        let patch: UpdateMealRequest = serde_json::from_str(r#"{"enabled":false}"#).unwrap();
        let fields = patch.apply_to(&meal).unwrap();
        assert_eq!(fields.name, meal.name);
        assert_eq!(fields.category, meal.category);
        assert_eq!(fields.description, meal.description);
        assert_eq!(fields.tags, meal.tags);
        assert!(!fields.enabled);
    }

    #[test]
    fn test_patch_null_clears_text() {
        let meal = stored_meal();
        let patch: UpdateMealRequest =
            serde_json::from_str(r#"{"category":null,"description":"  "}"#).unwrap();
        let fields = patch.apply_to(&meal).unwrap();
        assert_eq!(fields.category, None);
        assert_eq!(fields.description, None);
    }

    #[test]
    fn test_patch_rejects_blank_rename() {
        let meal = stored_meal();
        let patch: UpdateMealRequest = serde_json::from_str(r#"{"name":"   "}"#).unwrap();
        assert!(patch.renames(&meal));
        assert!(matches!(patch.apply_to(&meal), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_patch_same_name_is_not_rename() {
        let meal = stored_meal();
        let patch: UpdateMealRequest = serde_json::from_str(r#"{"name":"Beef Tacos"}"#).unwrap();
        assert!(!patch.renames(&meal));
    }

    #[test]
    fn test_patch_empty_tags_clears() {
        let meal = stored_meal();
        let patch: UpdateMealRequest = serde_json::from_str(r#"{"tags":[]}"#).unwrap();
        assert!(patch.apply_to(&meal).unwrap().tags.is_empty());
    }
}
