//! Room type DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::RoomType;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomTypeDto {
    pub id: i32,
    pub name: String,
    pub description: String,
}

impl From<RoomType> for RoomTypeDto {
    fn from(t: RoomType) -> Self {
        Self {
            id: t.id,
            name: t.name,
            description: t.description,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RoomTypeRequest {
    #[validate(length(min = 1, max = 50, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
}
