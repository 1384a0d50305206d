//! Note entity model and DTOs.

use notable_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full note row from the `notes` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Note {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new note.
#[derive(Debug, Deserialize)]
pub struct CreateNote {
    pub title: String,
    pub description: String,
}

/// DTO for replacing a note's content. Both fields are required: the
/// editor always submits the full title + description pair.
#[derive(Debug, Deserialize)]
pub struct UpdateNote {
    pub title: String,
    pub description: String,
}
