use std::collections::HashSet;

use chrono::Utc;
use thiserror::Error;

use crate::entity::prelude::*;
use crate::ids::{CommentId, ImageId, TagId, UserId};

#[derive(Debug, Error)]
pub enum ImagesServiceError {
    #[error("fatal database error")]
    DbError(#[from] sea_orm::DbErr),
}

/// Fields collected by the upload form.
#[derive(Clone, Debug, Default)]
pub struct NewImage {
    pub title: String,
    pub description: String,
    /// base64-encoded file content
    pub image_file: String,
    pub tags: Vec<String>,
}

#[derive(Clone)]
pub struct ImagesService {
    db: DatabaseConnection,
}

impl ImagesService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All images, newest upload first.
    pub async fn list_images(&self) -> Result<Vec<ImageModel>, ImagesServiceError> {
        Ok(Image::find()
            .order_by_desc(ImageColumn::UploadedAt)
            .all(&self.db)
            .await?)
    }

    /// Image plus its owner in a single join. Every image has exactly one
    /// owner; a row with a dangling user_id cannot exist under the FK.
    pub async fn image_with_owner(
        &self,
        id: ImageId,
    ) -> Result<Option<(ImageModel, UserModel)>, ImagesServiceError> {
        let found = Image::find_by_id(id)
            .find_also_related(User)
            .one(&self.db)
            .await?;
        Ok(found.and_then(|(image, owner)| owner.map(|owner| (image, owner))))
    }

    /// Tags are fetched on demand, separately from the image row.
    pub async fn tags_for(&self, image: &ImageModel) -> Result<Vec<TagModel>, ImagesServiceError> {
        Ok(image.find_related(Tag).all(&self.db).await?)
    }

    /// Comments are fetched on demand, oldest first.
    pub async fn comments_for(
        &self,
        image: &ImageModel,
    ) -> Result<Vec<CommentModel>, ImagesServiceError> {
        Ok(image
            .find_related(Comment)
            .order_by_asc(CommentColumn::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Insert the image and its tag links in one transaction. Tag names are
    /// trimmed, deduplicated and found-or-created against the shared
    /// vocabulary.
    pub async fn create_image(
        &self,
        owner: UserId,
        new_image: NewImage,
    ) -> Result<ImageModel, ImagesServiceError> {
        let txn = self.db.begin().await?;

        let image = ImageActiveModel {
            id: Set(ImageId::new()),
            title: Set(new_image.title),
            description: Set(new_image.description),
            image_file: Set(new_image.image_file),
            user_id: Set(owner),
            uploaded_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        let mut seen = HashSet::new();
        for name in new_image.tags {
            let name = name.trim().to_string();
            if name.is_empty() || !seen.insert(name.clone()) {
                continue;
            }

            let tag = find_or_create_tag(&txn, &name).await?;
            ImageTag::insert(ImageTagActiveModel {
                image_id: Set(image.id),
                tag_id: Set(tag.id),
            })
            .exec(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(image)
    }

    /// Comments and join rows go with the image; tags survive.
    pub async fn delete_image(&self, id: ImageId) -> Result<(), ImagesServiceError> {
        Image::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    pub async fn add_comment(
        &self,
        image_id: ImageId,
        author: UserId,
        text: String,
    ) -> Result<CommentModel, ImagesServiceError> {
        Ok(CommentActiveModel {
            id: Set(CommentId::new()),
            image_id: Set(image_id),
            user_id: Set(author),
            text: Set(text),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?)
    }
}

async fn find_or_create_tag<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<TagModel, ImagesServiceError> {
    if let Some(tag) = Tag::find()
        .filter(TagColumn::Name.eq(name))
        .one(conn)
        .await?
    {
        return Ok(tag);
    }

    Ok(TagActiveModel {
        id: Set(TagId::new()),
        name: Set(name.to_string()),
    }
    .insert(conn)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::users::{NewUser, UsersService};
    use crate::test_utils::setup_test_db;

    async fn register_user(db: &DatabaseConnection, username: &str) -> UserModel {
        UsersService::new(db.clone())
            .register(NewUser {
                username: username.to_string(),
                password: "pass1!".to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    fn new_image(title: &str, tags: &[&str]) -> NewImage {
        NewImage {
            title: title.to_string(),
            description: format!("{title} description"),
            image_file: "aGVsbG8=".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn list_images_is_newest_first() {
        let db = setup_test_db().await;
        let service = ImagesService::new(db.clone());
        let owner = register_user(&db, "alice").await;

        let first = service
            .create_image(owner.id, new_image("first", &[]))
            .await
            .unwrap();
        let second = service
            .create_image(owner.id, new_image("second", &[]))
            .await
            .unwrap();

        let listed = service.list_images().await.unwrap();
        assert_eq!(
            listed.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
    }

    #[tokio::test]
    async fn image_with_owner_joins_the_owning_user() {
        let db = setup_test_db().await;
        let service = ImagesService::new(db.clone());
        let owner = register_user(&db, "bob").await;

        let image = service
            .create_image(owner.id, new_image("mine", &[]))
            .await
            .unwrap();

        let (found, found_owner) = service.image_with_owner(image.id).await.unwrap().unwrap();
        assert_eq!(found.id, image.id);
        assert_eq!(found_owner.id, owner.id);

        let missing = service.image_with_owner(ImageId::new()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn tag_names_are_shared_between_images() {
        let db = setup_test_db().await;
        let service = ImagesService::new(db.clone());
        let owner = register_user(&db, "carol").await;

        let one = service
            .create_image(owner.id, new_image("one", &["nature", "sky"]))
            .await
            .unwrap();
        let two = service
            .create_image(owner.id, new_image("two", &["nature"]))
            .await
            .unwrap();

        // "nature" is a single shared row
        let tags = Tag::find().all(&db).await.unwrap();
        assert_eq!(tags.len(), 2);

        let one_tags = service.tags_for(&one).await.unwrap();
        let two_tags = service.tags_for(&two).await.unwrap();
        assert_eq!(one_tags.len(), 2);
        assert_eq!(two_tags.len(), 1);
        assert!(one_tags.iter().any(|t| t.id == two_tags[0].id));
    }

    #[tokio::test]
    async fn duplicate_and_blank_tag_names_are_skipped() {
        let db = setup_test_db().await;
        let service = ImagesService::new(db.clone());
        let owner = register_user(&db, "dave").await;

        let image = service
            .create_image(owner.id, new_image("tagged", &["sky", " sky", "", "  "]))
            .await
            .unwrap();

        let tags = service.tags_for(&image).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "sky");
    }

    #[tokio::test]
    async fn delete_image_removes_comments_but_keeps_shared_tags() {
        let db = setup_test_db().await;
        let service = ImagesService::new(db.clone());
        let owner = register_user(&db, "erin").await;

        let doomed = service
            .create_image(owner.id, new_image("doomed", &["nature"]))
            .await
            .unwrap();
        let survivor = service
            .create_image(owner.id, new_image("survivor", &["nature"]))
            .await
            .unwrap();

        service
            .add_comment(doomed.id, owner.id, "nice shot".to_string())
            .await
            .unwrap();

        service.delete_image(doomed.id).await.unwrap();

        // Comments went with the image
        let comments = Comment::find()
            .filter(CommentColumn::ImageId.eq(doomed.id))
            .all(&db)
            .await
            .unwrap();
        assert!(comments.is_empty());

        // The tag survives and is still attached to the other image
        let nature = Tag::find()
            .filter(TagColumn::Name.eq("nature"))
            .one(&db)
            .await
            .unwrap();
        assert!(nature.is_some());

        let survivor_tags = service.tags_for(&survivor).await.unwrap();
        assert_eq!(survivor_tags.len(), 1);
        assert_eq!(survivor_tags[0].name, "nature");
    }

    #[tokio::test]
    async fn comments_are_listed_oldest_first() {
        let db = setup_test_db().await;
        let service = ImagesService::new(db.clone());
        let owner = register_user(&db, "frank").await;

        let image = service
            .create_image(owner.id, new_image("discussed", &[]))
            .await
            .unwrap();

        let first = service
            .add_comment(image.id, owner.id, "first".to_string())
            .await
            .unwrap();
        let second = service
            .add_comment(image.id, owner.id, "second".to_string())
            .await
            .unwrap();

        let comments = service.comments_for(&image).await.unwrap();
        assert_eq!(
            comments.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
    }
}
