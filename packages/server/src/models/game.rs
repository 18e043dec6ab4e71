use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::shared::{validate_max_len, validate_name};
use crate::domain::{Game, GameChanges, RecordId};
use crate::error::AppError;

/// Request body for creating a game inside a studio.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    /// Must be absent: a game that already has an id cannot be created again.
    #[serde(default)]
    pub id: Option<i32>,
    /// Owning studio.
    #[serde(alias = "fkStudioId")]
    #[schema(example = 1)]
    pub studio_id: i32,
    #[schema(example = "Academy Heist")]
    pub name: String,
    #[schema(example = "A stealth game set in a boarding school.")]
    pub overview: String,
    /// Defaults to today when omitted.
    #[serde(default)]
    #[schema(example = "2024-01-01")]
    pub launch_date: Option<NaiveDate>,
}

impl CreateGameRequest {
    pub fn into_game(self) -> Game {
        let launch_date = self
            .launch_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        let mut game = Game::new(
            self.name.trim().to_string(),
            self.overview.trim().to_string(),
            launch_date,
        );
        game.id = RecordId::from(self.id);
        game
    }
}

pub fn validate_create_game(req: &CreateGameRequest) -> Result<(), AppError> {
    validate_name("Name", &req.name)?;
    validate_overview(&req.overview)
}

/// Request body for updating a game. Every field must be supplied; the owning
/// studio cannot be changed.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameRequest {
    pub name: String,
    pub overview: String,
    pub launch_date: NaiveDate,
}

impl From<UpdateGameRequest> for GameChanges {
    fn from(req: UpdateGameRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            overview: req.overview.trim().to_string(),
            launch_date: req.launch_date,
        }
    }
}

pub fn validate_update_game(req: &UpdateGameRequest) -> Result<(), AppError> {
    validate_name("Name", &req.name)?;
    validate_overview(&req.overview)
}

fn validate_overview(overview: &str) -> Result<(), AppError> {
    if overview.trim().is_empty() {
        return Err(AppError::Validation("Overview must not be empty".into()));
    }
    validate_max_len("Overview", overview, 10_000)
}

/// `GET /games/name?name=` query.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GameSearchQuery {
    /// Case-insensitive fragment of the game name.
    #[param(example = "acm")]
    pub name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    #[schema(value_type = i32, example = 1)]
    pub id: RecordId,
    pub name: String,
    pub overview: String,
    pub launch_date: NaiveDate,
    /// Name of the owning studio.
    pub studio: String,
}

impl From<Game> for GameResponse {
    fn from(g: Game) -> Self {
        Self {
            id: g.id,
            name: g.name,
            overview: g.overview,
            launch_date: g.launch_date,
            studio: g.studio,
        }
    }
}
