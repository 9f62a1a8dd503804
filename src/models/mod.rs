//! Data models for Biblius

pub mod book;
pub mod borrow;
pub mod transaction;
pub mod user;

// Re-export commonly used types
pub use book::{Author, Book, BookDetails, Category};
pub use borrow::{BorrowDetails, BorrowedBook};
pub use transaction::{Invoice, Transaction};
pub use user::{Role, User, UserClaims};
