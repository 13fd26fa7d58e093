//! Service layer for user records.
//! - `users::UserService` holds the decision logic of every operation.
//! - `users::repository::UserRepository` is the store port; SeaORM and
//!   in-memory adapters implement it.

pub mod errors;
pub mod users;
#[cfg(test)]
pub mod test_support;

pub use errors::UserError;
pub use users::UserService;
