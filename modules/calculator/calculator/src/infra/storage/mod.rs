//! Infrastructure storage layer: `SeaORM` persistence of the calculation history.
//!
//! - `entity` - the `calculations` table
//! - `mapper` - conversions between entity models and SDK records
//! - `migrations` - schema migrations
//! - `db` - connection setup

pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;

mod sea_orm_repo;

pub use sea_orm_repo::SeaOrmHistoryRepository;
