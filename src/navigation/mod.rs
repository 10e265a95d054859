//! Navigation bookmarks: categories and the websites filed under them.

mod repository;
mod service;
mod types;

pub use repository::{CategoryRepository, WebsiteRepository};
pub use service::list_by_category;
pub use types::{
    CategoryUpdate, CategoryWithWebsites, NavigationCategory, NavigationWebsite, NewCategory,
    NewWebsite, WebsiteUpdate,
};
