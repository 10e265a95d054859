//! Daily life records: short dated notes owned by authenticated users.

mod repository;
mod types;

pub use repository::RecordRepository;
pub use types::{DailyLifeRecord, NewRecord, RecordUpdate};
