use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tbStudio")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub location: String,
    pub creation_date: Date,

    #[sea_orm(has_many)]
    pub games: HasMany<super::game::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
