//! Grouped navigation listing.

use std::collections::HashMap;

use super::repository::{CategoryRepository, WebsiteRepository};
use super::types::{CategoryWithWebsites, NavigationWebsite};
use crate::db::DbPool;
use crate::Result;

/// List every live category with its live websites.
///
/// Returns an empty list when there are no categories. Websites keep the
/// order of [`WebsiteRepository::list`]; a category without websites gets an
/// empty list. Websites pointing at a missing category are left out.
pub async fn list_by_category(pool: &DbPool) -> Result<Vec<CategoryWithWebsites>> {
    let categories = CategoryRepository::new(pool).list().await?;
    if categories.is_empty() {
        return Ok(Vec::new());
    }

    let websites = WebsiteRepository::new(pool).list().await?;
    let mut by_category: HashMap<i64, Vec<NavigationWebsite>> = HashMap::new();
    for website in websites {
        by_category
            .entry(website.category_id)
            .or_default()
            .push(website);
    }

    Ok(categories
        .into_iter()
        .map(|category| CategoryWithWebsites {
            website_list: by_category.remove(&category.id).unwrap_or_default(),
            id: category.id,
            category_name: category.category_name,
            category_sort: category.category_sort,
        })
        .collect())
}
