//! Navigation bookmark models.

use serde::Serialize;
use utoipa::ToSchema;

use crate::datetime::{serialize_rfc3339, serialize_rfc3339_opt};

/// A bookmark category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NavigationCategory {
    /// Category ID.
    pub id: i64,
    /// Display name.
    pub category_name: String,
    /// Sort key (ascending).
    pub category_sort: i32,
    /// Soft-delete flag.
    pub del_flag: String,
    /// Creator.
    pub create_by: Option<String>,
    /// Creation time.
    #[serde(serialize_with = "serialize_rfc3339")]
    pub create_time: String,
    /// Last updater.
    pub update_by: Option<String>,
    /// Last update time.
    #[serde(serialize_with = "serialize_rfc3339_opt")]
    pub update_time: Option<String>,
    /// Free-form remark.
    pub remark: Option<String>,
}

/// A bookmarked website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NavigationWebsite {
    /// Website ID.
    pub id: i64,
    /// Display name.
    pub site_name: String,
    /// Target URL.
    pub site_url: String,
    /// Icon URL.
    pub site_icon: Option<String>,
    /// Short description.
    pub site_overview: Option<String>,
    /// Sort key within the category (ascending).
    pub site_sort: i32,
    /// Owning category.
    pub category_id: i64,
    /// Soft-delete flag.
    pub del_flag: String,
    /// Creator.
    pub create_by: Option<String>,
    /// Creation time.
    #[serde(serialize_with = "serialize_rfc3339")]
    pub create_time: String,
    /// Last updater.
    pub update_by: Option<String>,
    /// Last update time.
    #[serde(serialize_with = "serialize_rfc3339_opt")]
    pub update_time: Option<String>,
    /// Free-form remark.
    pub remark: Option<String>,
}

/// A category together with its websites.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithWebsites {
    /// Category ID.
    pub id: i64,
    /// Display name.
    pub category_name: String,
    /// Sort key.
    pub category_sort: i32,
    /// Websites in this category, in list order.
    pub website_list: Vec<NavigationWebsite>,
}

/// Data for creating a category.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    /// Display name.
    pub category_name: String,
    /// Sort key.
    pub category_sort: i32,
    /// Remark.
    pub remark: Option<String>,
    /// Creator.
    pub create_by: Option<String>,
}

impl NewCategory {
    /// Create a new category with sort key 0.
    pub fn new(category_name: impl Into<String>) -> Self {
        Self {
            category_name: category_name.into(),
            ..Default::default()
        }
    }

    /// Set the sort key.
    pub fn with_sort(mut self, sort: i32) -> Self {
        self.category_sort = sort;
        self
    }
}

/// Partial update for a category. Unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    /// New name.
    pub category_name: Option<String>,
    /// New sort key.
    pub category_sort: Option<i32>,
    /// New remark.
    pub remark: Option<Option<String>>,
    /// Who made the change.
    pub update_by: Option<String>,
}

impl CategoryUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    pub fn category_name(mut self, name: impl Into<String>) -> Self {
        self.category_name = Some(name.into());
        self
    }

    /// Set the sort key.
    pub fn category_sort(mut self, sort: i32) -> Self {
        self.category_sort = Some(sort);
        self
    }
}

/// Data for creating a website.
#[derive(Debug, Clone, Default)]
pub struct NewWebsite {
    /// Display name.
    pub site_name: String,
    /// Target URL.
    pub site_url: String,
    /// Icon URL.
    pub site_icon: Option<String>,
    /// Short description.
    pub site_overview: Option<String>,
    /// Sort key.
    pub site_sort: i32,
    /// Owning category.
    pub category_id: i64,
    /// Remark.
    pub remark: Option<String>,
    /// Creator.
    pub create_by: Option<String>,
}

impl NewWebsite {
    /// Create a new website in the given category.
    pub fn new(site_name: impl Into<String>, site_url: impl Into<String>, category_id: i64) -> Self {
        Self {
            site_name: site_name.into(),
            site_url: site_url.into(),
            category_id,
            ..Default::default()
        }
    }

    /// Set the sort key.
    pub fn with_sort(mut self, sort: i32) -> Self {
        self.site_sort = sort;
        self
    }
}

/// Partial update for a website. Unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct WebsiteUpdate {
    /// New name.
    pub site_name: Option<String>,
    /// New URL.
    pub site_url: Option<String>,
    /// New icon.
    pub site_icon: Option<Option<String>>,
    /// New description.
    pub site_overview: Option<Option<String>>,
    /// New sort key.
    pub site_sort: Option<i32>,
    /// Move to another category.
    pub category_id: Option<i64>,
    /// New remark.
    pub remark: Option<Option<String>>,
    /// Who made the change.
    pub update_by: Option<String>,
}

impl WebsiteUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    pub fn site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = Some(name.into());
        self
    }

    /// Set the sort key.
    pub fn site_sort(mut self, sort: i32) -> Self {
        self.site_sort = Some(sort);
        self
    }

    /// Move to another category.
    pub fn category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }
}
