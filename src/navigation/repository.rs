//! Navigation repositories.

use sqlx::QueryBuilder;

use super::types::{
    CategoryUpdate, NavigationCategory, NavigationWebsite, NewCategory, NewWebsite, WebsiteUpdate,
};
use crate::datetime;
use crate::db::{DbBackend, DbPool, DEL_FLAG_ACTIVE, DEL_FLAG_DELETED};
use crate::Result;

const CATEGORY_COLUMNS: &str = "id, category_name, category_sort, del_flag, create_by, create_time,
                                update_by, update_time, remark";

const WEBSITE_COLUMNS: &str = "id, site_name, site_url, site_icon, site_overview, site_sort,
                               category_id, del_flag, create_by, create_time, update_by,
                               update_time, remark";

/// Repository for navigation categories.
pub struct CategoryRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new CategoryRepository with the given pool.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new category.
    pub async fn create(&self, category: &NewCategory) -> Result<NavigationCategory> {
        let query = format!(
            "INSERT INTO navigation_category
                (category_name, category_sort, del_flag, create_by, create_time, remark)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {CATEGORY_COLUMNS}"
        );
        let category = sqlx::query_as::<_, NavigationCategory>(&query)
            .bind(&category.category_name)
            .bind(category.category_sort)
            .bind(DEL_FLAG_ACTIVE)
            .bind(&category.create_by)
            .bind(datetime::now_db())
            .bind(&category.remark)
            .fetch_one(self.pool)
            .await?;
        Ok(category)
    }

    /// List live categories ordered by sort key.
    pub async fn list(&self) -> Result<Vec<NavigationCategory>> {
        let query = format!(
            "SELECT {CATEGORY_COLUMNS} FROM navigation_category
             WHERE del_flag = $1
             ORDER BY category_sort, id"
        );
        let categories = sqlx::query_as::<_, NavigationCategory>(&query)
            .bind(DEL_FLAG_ACTIVE)
            .fetch_all(self.pool)
            .await?;
        Ok(categories)
    }

    /// Update a live category. Returns false if it doesn't exist.
    pub async fn update(&self, id: i64, update: &CategoryUpdate) -> Result<bool> {
        let mut query: QueryBuilder<DbBackend> = QueryBuilder::new("UPDATE navigation_category SET ");
        let mut separated = query.separated(", ");

        if let Some(ref name) = update.category_name {
            separated.push("category_name = ");
            separated.push_bind_unseparated(name.clone());
        }
        if let Some(sort) = update.category_sort {
            separated.push("category_sort = ");
            separated.push_bind_unseparated(sort);
        }
        if let Some(ref remark) = update.remark {
            separated.push("remark = ");
            separated.push_bind_unseparated(remark.clone());
        }
        separated.push("update_by = ");
        separated.push_bind_unseparated(update.update_by.clone());
        separated.push("update_time = ");
        separated.push_bind_unseparated(datetime::now_db());

        query.push(" WHERE id = ");
        query.push_bind(id);
        query.push(" AND del_flag = ");
        query.push_bind(DEL_FLAG_ACTIVE);

        let result = query.build().execute(self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a category. Returns false if it doesn't exist.
    pub async fn delete(&self, id: i64, deleted_by: Option<&str>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE navigation_category SET del_flag = $1, update_by = $2, update_time = $3
             WHERE id = $4 AND del_flag = $5",
        )
        .bind(DEL_FLAG_DELETED)
        .bind(deleted_by)
        .bind(datetime::now_db())
        .bind(id)
        .bind(DEL_FLAG_ACTIVE)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Repository for navigation websites.
pub struct WebsiteRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> WebsiteRepository<'a> {
    /// Create a new WebsiteRepository with the given pool.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new website.
    pub async fn create(&self, website: &NewWebsite) -> Result<NavigationWebsite> {
        let query = format!(
            "INSERT INTO navigation_website
                (site_name, site_url, site_icon, site_overview, site_sort, category_id,
                 del_flag, create_by, create_time, remark)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {WEBSITE_COLUMNS}"
        );
        let website = sqlx::query_as::<_, NavigationWebsite>(&query)
            .bind(&website.site_name)
            .bind(&website.site_url)
            .bind(&website.site_icon)
            .bind(&website.site_overview)
            .bind(website.site_sort)
            .bind(website.category_id)
            .bind(DEL_FLAG_ACTIVE)
            .bind(&website.create_by)
            .bind(datetime::now_db())
            .bind(&website.remark)
            .fetch_one(self.pool)
            .await?;
        Ok(website)
    }

    /// List live websites ordered by sort key.
    pub async fn list(&self) -> Result<Vec<NavigationWebsite>> {
        let query = format!(
            "SELECT {WEBSITE_COLUMNS} FROM navigation_website
             WHERE del_flag = $1
             ORDER BY site_sort, id"
        );
        let websites = sqlx::query_as::<_, NavigationWebsite>(&query)
            .bind(DEL_FLAG_ACTIVE)
            .fetch_all(self.pool)
            .await?;
        Ok(websites)
    }

    /// Update a live website. Returns false if it doesn't exist.
    pub async fn update(&self, id: i64, update: &WebsiteUpdate) -> Result<bool> {
        let result = build_website_update(id, update)
            .build()
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update several websites in one transaction.
    ///
    /// Returns true if every website was updated. If any ID does not resolve
    /// to a live website, nothing is changed and false is returned.
    pub async fn batch_update(&self, updates: &[(i64, WebsiteUpdate)]) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        for (id, update) in updates {
            let result = build_website_update(*id, update)
                .build()
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(false);
            }
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Soft-delete a website. Returns false if it doesn't exist.
    pub async fn delete(&self, id: i64, deleted_by: Option<&str>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE navigation_website SET del_flag = $1, update_by = $2, update_time = $3
             WHERE id = $4 AND del_flag = $5",
        )
        .bind(DEL_FLAG_DELETED)
        .bind(deleted_by)
        .bind(datetime::now_db())
        .bind(id)
        .bind(DEL_FLAG_ACTIVE)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn build_website_update(id: i64, update: &WebsiteUpdate) -> QueryBuilder<'static, DbBackend> {
    let mut query: QueryBuilder<DbBackend> = QueryBuilder::new("UPDATE navigation_website SET ");
    let mut separated = query.separated(", ");

    if let Some(ref name) = update.site_name {
        separated.push("site_name = ");
        separated.push_bind_unseparated(name.clone());
    }
    if let Some(ref url) = update.site_url {
        separated.push("site_url = ");
        separated.push_bind_unseparated(url.clone());
    }
    if let Some(ref icon) = update.site_icon {
        separated.push("site_icon = ");
        separated.push_bind_unseparated(icon.clone());
    }
    if let Some(ref overview) = update.site_overview {
        separated.push("site_overview = ");
        separated.push_bind_unseparated(overview.clone());
    }
    if let Some(sort) = update.site_sort {
        separated.push("site_sort = ");
        separated.push_bind_unseparated(sort);
    }
    if let Some(category_id) = update.category_id {
        separated.push("category_id = ");
        separated.push_bind_unseparated(category_id);
    }
    if let Some(ref remark) = update.remark {
        separated.push("remark = ");
        separated.push_bind_unseparated(remark.clone());
    }
    separated.push("update_by = ");
    separated.push_bind_unseparated(update.update_by.clone());
    separated.push("update_time = ");
    separated.push_bind_unseparated(datetime::now_db());

    query.push(" WHERE id = ");
    query.push_bind(id);
    query.push(" AND del_flag = ");
    query.push_bind(DEL_FLAG_ACTIVE);

    query
}
