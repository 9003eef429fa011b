// SeaORM entities
// One module per table; relations mirror the foreign keys declared in the
// migrations under `models::migrator`.

pub mod comment;
pub mod image;
pub mod image_tag;
pub mod tag;
pub mod user;
pub mod user_profile;


pub mod prelude {
    // Re-export all entities for convenience
    pub use super::comment::{
        ActiveModel as CommentActiveModel, Column as CommentColumn, Entity as Comment,
        Model as CommentModel,
    };
    pub use super::image::{
        ActiveModel as ImageActiveModel, Column as ImageColumn, Entity as Image,
        Model as ImageModel,
    };
    pub use super::image_tag::{
        ActiveModel as ImageTagActiveModel, Column as ImageTagColumn, Entity as ImageTag,
        Model as ImageTagModel,
    };
    pub use super::tag::{
        ActiveModel as TagActiveModel, Column as TagColumn, Entity as Tag, Model as TagModel,
    };
    pub use super::user::{
        ActiveModel as UserActiveModel, Column as UserColumn, Entity as User, Model as UserModel,
    };
    pub use super::user_profile::{
        ActiveModel as UserProfileActiveModel, Column as UserProfileColumn,
        Entity as UserProfile, Model as UserProfileModel,
    };

    // Re-export commonly used SeaORM types and traits
    pub use sea_orm::{
        ActiveModelTrait,
        ActiveValue,

        ColumnTrait,
        ConnectionTrait,

        // Database and connection types
        Database,
        DatabaseConnection,
        DbConn,
        // Common result types
        DbErr,
        Delete,

        // Core traits
        EntityTrait,
        Insert,
        Linked,

        ModelTrait,
        NotSet,
        PaginatorTrait,
        QueryFilter,
        QueryOrder,
        QuerySelect,
        Related,
        RelationTrait,
        // Query builders
        Select,
        // Active model helpers
        Set,
        TransactionTrait,

        Unchanged,
        Update,
    };
}
