//! Storage areas of a repository
//!
//! - `database`: loose object store (`.git/objects`)
//! - `index`: staged entry set (`.git/index`)
//! - `repository`: ties both together and exposes the diff entry points

pub mod database;
pub mod index;
pub mod repository;
