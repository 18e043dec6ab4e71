use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role required to delete studios, games and users.
pub const ADMIN_ROLE: &str = "ADMIN";

/// The role assigned to newly registered users.
pub const DEFAULT_ROLE: &str = "USER";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tbRole")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,

    #[sea_orm(has_many)]
    pub users: HasMany<super::user_role::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
