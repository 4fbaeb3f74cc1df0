//! registrar-server: HTTP backend for relational record management
//!
//! CRUD over tasks, users with profiles, authors with books, and
//! student/course enrollments, backed by SQLite.

pub mod db;
pub mod http;
pub mod models;
