//! Entity models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts (with `validator` derives)
//! - A `Deserialize` update DTO (all `Option` fields) where the entity is editable

pub mod book;
pub mod borrow_request;
pub mod notification;
pub mod user;
