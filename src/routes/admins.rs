use crate::{
    data::{
        DataType,
        admin::{Admin, AdminForm},
    },
    error::{MissingRecordSnafu, RosterResult},
    routes::{MessageResponse, delete_one, get_one, parse_id},
    state::RosterState,
    uploads::{MultipartForm, read_multipart},
};
use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::StatusCode,
};

fn admin_form(fields: Vec<(String, String)>) -> AdminForm {
    let mut form = AdminForm::default();
    for (name, value) in fields {
        form.set_field(&name, value);
    }
    form
}

/// Multipart: `adminId`, `firstName`, `lastName`, `department`, and optionally `file`.
///
/// The file is only written once the text fields have validated.
pub async fn post_admin_form(
    State(state): State<RosterState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> RosterResult<(StatusCode, Json<Admin>)> {
    let MultipartForm { fields, file } = read_multipart(multipart).await?;
    let mut new_admin = admin_form(fields).into_new()?;

    if let Some(file) = file {
        new_admin.profile_image = Some(state.uploads().store(file).await?);
    }
    let profile_image = new_admin.profile_image.clone();

    let admin = match state.admins().insert_into_database(new_admin).await {
        Ok(admin) => admin,
        Err(e) => {
            if let Some(profile_image) = profile_image {
                state.uploads().discard(&profile_image).await;
            }
            return Err(e);
        }
    };
    info!(id = %admin.id, admin_id = admin.admin_id, profile_image = ?admin.profile_image, "created admin");

    Ok((StatusCode::CREATED, Json(admin)))
}

pub async fn get_admins(State(state): State<RosterState>) -> RosterResult<Json<Vec<Admin>>> {
    Ok(Json(state.admins().get_all().await?))
}

pub async fn get_admin(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<Json<Admin>> {
    get_one(state.admins(), &id).await
}

/// Same fields as [`post_admin_form`], any subset. `profileImage` is only replaced when a new file
/// is attached.
pub async fn put_admin(
    State(state): State<RosterState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> RosterResult<Json<Admin>> {
    let id = parse_id::<Admin>(&id)?;
    let MultipartForm { fields, file } = read_multipart(multipart).await?;
    let mut update = admin_form(fields).into_update()?;

    if let Some(file) = file {
        update.profile_image = Some(state.uploads().store(file).await?);
    }
    let new_profile_image = update.profile_image.clone();

    let updated = match state.admins().update_in_database(id, update).await {
        Ok(Some(admin)) => Ok(admin),
        Ok(None) => MissingRecordSnafu {
            entity: Admin::NAME,
            id,
        }
        .fail(),
        Err(e) => Err(e),
    };
    if let (Err(_), Some(new_profile_image)) = (&updated, &new_profile_image) {
        state.uploads().discard(new_profile_image).await;
    }
    let admin = updated?;
    info!(%id, profile_image = ?admin.profile_image, "updated admin");

    Ok(Json(admin))
}

pub async fn delete_admin(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<Json<MessageResponse>> {
    delete_one(state.admins(), &id).await
}
