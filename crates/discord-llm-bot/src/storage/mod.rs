//! Storage module for the read-only books database

mod database;

pub use database::BooksDatabase;
