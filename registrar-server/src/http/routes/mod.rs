//! Route handlers organized by resource

use serde::Serialize;

pub mod health;
pub mod tasks;
pub mod users;
pub mod authors;
pub mod enrollments;
pub mod records;

/// Plain confirmation body shared by update and delete endpoints
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
