use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::game::GameResponse;
use super::shared::{validate_max_len, validate_name};
use crate::domain::{RecordId, Studio, StudioChanges};
use crate::error::AppError;

/// Request body for creating a studio.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudioRequest {
    /// Must be absent: a studio that already has an id cannot be created again.
    #[serde(default)]
    pub id: Option<i32>,
    #[schema(example = "Acme Games")]
    pub name: String,
    /// May be empty.
    #[schema(example = "Curitiba, BR")]
    pub location: String,
    #[schema(example = "2010-05-17")]
    pub creation_date: NaiveDate,
}

impl CreateStudioRequest {
    pub fn into_studio(self) -> Studio {
        let mut studio = Studio::new(
            self.name.trim().to_string(),
            self.location.trim().to_string(),
            self.creation_date,
        );
        studio.id = RecordId::from(self.id);
        studio
    }
}

pub fn validate_create_studio(req: &CreateStudioRequest) -> Result<(), AppError> {
    validate_name("Name", &req.name)?;
    validate_max_len("Location", &req.location, 256)
}

/// Request body for updating a studio. Every field must be supplied.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudioRequest {
    #[schema(example = "Acme Interactive")]
    pub name: String,
    #[schema(example = "Lisbon, PT")]
    pub location: String,
    #[schema(example = "2011-01-01")]
    pub creation_date: NaiveDate,
}

impl From<UpdateStudioRequest> for StudioChanges {
    fn from(req: UpdateStudioRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            location: req.location.trim().to_string(),
            creation_date: req.creation_date,
        }
    }
}

pub fn validate_update_studio(req: &UpdateStudioRequest) -> Result<(), AppError> {
    validate_name("Name", &req.name)?;
    validate_max_len("Location", &req.location, 256)
}

/// Response for a freshly created studio.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudioResponse {
    #[schema(value_type = i32, example = 1)]
    pub id: RecordId,
    pub name: String,
    pub location: String,
    pub creation_date: NaiveDate,
}

impl From<Studio> for CreateStudioResponse {
    fn from(s: Studio) -> Self {
        Self {
            id: s.id,
            name: s.name,
            location: s.location,
            creation_date: s.creation_date,
        }
    }
}

/// A studio with the games it owns.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudioResponse {
    #[schema(value_type = i32, example = 1)]
    pub id: RecordId,
    pub name: String,
    pub location: String,
    pub creation_date: NaiveDate,
    pub games: Vec<GameResponse>,
}

impl From<Studio> for StudioResponse {
    fn from(s: Studio) -> Self {
        Self {
            id: s.id,
            name: s.name,
            location: s.location,
            creation_date: s.creation_date,
            games: s.games.into_iter().map(GameResponse::from).collect(),
        }
    }
}
