use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mercado_core::{CategoryId, DomainError, DomainResult, Entity, ValueObject, require_non_blank};

use crate::validate;

/// Display color in `#RGB` or `#RRGGBB` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl ValueObject for HexColor {}

impl HexColor {
    pub fn parse(s: impl Into<String>) -> DomainResult<Self> {
        let s = s.into();
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| DomainError::validation(format!("color '{s}' must start with '#'")))?;
        let well_formed =
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
        if !well_formed {
            return Err(DomainError::validation(format!(
                "color '{s}' must be #RGB or #RRGGBB"
            )));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HexColor {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

/// A product category (public collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub color: HexColor,
    pub image_url: String,
    pub is_active: bool,
    /// Number of active products in this category; maintained by the store.
    pub product_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Category {
    type Id = CategoryId;
    const KIND: &'static str = "category";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn default_true() -> bool {
    true
}

/// Input for creating a category.
///
/// A supplied `productCount` is ignored; the store derives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    #[serde(default)]
    pub id: Option<CategoryId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: HexColor,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, color: HexColor) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            color,
            image_url: String::new(),
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_id(mut self, id: CategoryId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Partial update of a category. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<HexColor>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl Category {
    /// Validate input and build a new category (product count starts at zero).
    pub fn create(data: NewCategory, now: DateTime<Utc>) -> DomainResult<Self> {
        let (created_at, updated_at) =
            validate::creation_stamps(data.created_at, data.updated_at, now)?;
        let category = Self {
            id: data.id.unwrap_or_else(CategoryId::new),
            name: data.name.trim().to_string(),
            description: data.description,
            color: data.color,
            image_url: data.image_url,
            is_active: data.is_active,
            product_count: 0,
            created_at,
            updated_at,
        };
        category.validate()?;
        Ok(category)
    }

    /// Apply a patch, returning the updated record. `self` is not modified.
    pub fn patched(&self, patch: &CategoryPatch, now: DateTime<Utc>) -> DomainResult<Self> {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.trim().to_string();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(color) = &patch.color {
            next.color = color.clone();
        }
        if let Some(image_url) = &patch.image_url {
            next.image_url = image_url.clone();
        }
        if let Some(is_active) = patch.is_active {
            next.is_active = is_active;
        }
        next.validate()?;
        next.updated_at = validate::refreshed(self.updated_at, now);
        Ok(next)
    }

    fn validate(&self) -> DomainResult<()> {
        require_non_blank("name", &self.name)?;
        validate::image_url("imageUrl", &self.image_url)
    }
}
