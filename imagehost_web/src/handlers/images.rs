use axum::{
    extract::{Form, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;

use imagehost_core::ids::ImageId;
use imagehost_core::service::images::NewImage;

use super::logged_user;
use crate::view::{error_page, View};
use crate::AppState;

/// GET /images — the public feed, newest first.
pub async fn image_feed(State(state): State<AppState>) -> Response {
    match state.images.list_images().await {
        Ok(images) => View::new("images", json!({ "images": images })).into_response(),
        Err(e) => {
            tracing::error!("listing images failed: {e}");
            error_page()
        }
    }
}

/// GET /images/{id} — the image with its owner (joined eagerly) plus tags and
/// comments (fetched on demand).
pub async fn image_details(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(id) = ImageId::parse_str(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let (image, owner) = match state.images.image_with_owner(id).await {
        Ok(Some(found)) => found,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("fetching image failed: {e}");
            return error_page();
        }
    };

    let tags = match state.images.tags_for(&image).await {
        Ok(tags) => tags,
        Err(e) => {
            tracing::error!("fetching tags failed: {e}");
            return error_page();
        }
    };
    let comments = match state.images.comments_for(&image).await {
        Ok(comments) => comments,
        Err(e) => {
            tracing::error!("fetching comments failed: {e}");
            return error_page();
        }
    };

    View::new(
        "images/image",
        json!({
            "image": image,
            "owner": owner,
            "tags": tags,
            "comments": comments,
        }),
    )
    .into_response()
}

/// GET /images/upload — the upload form, for logged-in users only.
pub async fn upload_form(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if logged_user(&state, &headers).await.is_none() {
        return Redirect::to("/users/login").into_response();
    }
    View::new("images/upload", json!({})).into_response()
}

#[derive(Debug, Deserialize)]
pub struct UploadForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// base64-encoded file content, submitted inline
    pub image_file: String,
    /// comma-separated tag names
    #[serde(default)]
    pub tags: String,
}

/// POST /images/upload
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<UploadForm>,
) -> Response {
    let Some(user) = logged_user(&state, &headers).await else {
        return Redirect::to("/users/login").into_response();
    };

    let new_image = NewImage {
        title: form.title,
        description: form.description,
        image_file: form.image_file,
        tags: form
            .tags
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
    };

    match state.images.create_image(user.id, new_image).await {
        Ok(image) => {
            tracing::info!(image_id = %image.id, username = %user.username, "uploaded image");
            Redirect::to("/images").into_response()
        }
        Err(e) => {
            tracing::error!("upload failed: {e}");
            error_page()
        }
    }
}

/// POST /images/{id}/delete — comments and tag links cascade, tags stay.
pub async fn delete_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if logged_user(&state, &headers).await.is_none() {
        return Redirect::to("/users/login").into_response();
    }
    let Ok(id) = ImageId::parse_str(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match state.images.delete_image(id).await {
        Ok(()) => Redirect::to("/images").into_response(),
        Err(e) => {
            tracing::error!("delete failed: {e}");
            error_page()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub comment: String,
}

/// POST /images/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Response {
    let Some(user) = logged_user(&state, &headers).await else {
        return Redirect::to("/users/login").into_response();
    };
    let Ok(id) = ImageId::parse_str(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match state.images.add_comment(id, user.id, form.comment).await {
        Ok(_) => Redirect::to(&format!("/images/{id}")).into_response(),
        Err(e) => {
            tracing::error!("comment failed: {e}");
            error_page()
        }
    }
}
