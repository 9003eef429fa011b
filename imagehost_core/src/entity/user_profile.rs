use crate::ids::{ProfileId, UserId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// Display attributes owned exclusively by one user. A blank profile
// accompanies the blank user handed to the registration form; both rows are
// written in the same transaction on submit.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: ProfileId,
    pub user_id: UserId,
    pub full_name: String,
    pub email_address: String,
    pub mobile_number: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
