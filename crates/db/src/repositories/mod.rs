//! Table repositories.
//!
//! Each repository is a unit struct with async associated functions taking
//! the pool (or a transaction) explicitly. Multi-entity lifecycle writes
//! (create request, approve, return) live in [`borrow_request_repo`] and run
//! inside a single transaction; an early return before `commit` rolls the
//! whole transaction back when the `Transaction` guard drops.

pub mod book_repo;
pub mod borrow_request_repo;
pub mod notification_repo;
pub mod stats_repo;
pub mod user_repo;

pub use book_repo::{BookFilter, BookRepo};
pub use borrow_request_repo::{ApproveOutcome, BorrowRequestRepo, OwnerReturnOutcome, ReturnOutcome};
pub use notification_repo::NotificationRepo;
pub use stats_repo::{CommunityStats, StatsRepo};
pub use user_repo::UserRepo;
