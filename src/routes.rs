use crate::{
    data::{DataType, RecordStore},
    error::{MissingRecordSnafu, ParseUuidSnafu, RosterResult},
    state::RosterState,
    uploads::UPLOADS_URL_PREFIX,
};
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use serde::Serialize;
use snafu::{OptionExt, ResultExt};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer,
};
use uuid::Uuid;

pub mod admins;
pub mod index;
pub mod lists;
pub mod new_record_forms;
pub mod pages;
pub mod students;

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

/// The JSON API, nested under `/api` by [`app`].
pub fn api_router() -> Router<RosterState> {
    Router::new()
        .route("/studentForm", post(students::post_student_form))
        .route("/students", get(students::get_students))
        .route(
            "/students/{id}",
            get(students::get_student)
                .put(students::put_student)
                .delete(students::delete_student),
        )
        .route("/adminForm", post(admins::post_admin_form))
        .route("/admins", get(admins::get_admins))
        .route(
            "/admins/{id}",
            get(admins::get_admin)
                .put(admins::put_admin)
                .delete(admins::delete_admin),
        )
}

/// The whole app: API, pages, uploaded files, and the front-end bundle for anything else.
pub fn app(state: RosterState) -> Router {
    let server_config = state.server_config();

    Router::new()
        .nest("/api", api_router())
        .merge(pages::page_router())
        .nest_service(
            &format!("/{UPLOADS_URL_PREFIX}"),
            ServeDir::new(state.uploads().root()),
        )
        .fallback_service(ServeDir::new(&server_config.static_dir))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(server_config.upload_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn parse_id<T: DataType>(raw: &str) -> RosterResult<Uuid> {
    Uuid::try_parse(raw).context(ParseUuidSnafu {
        original: raw,
        entity: T::NAME,
    })
}

pub(crate) async fn get_one<T: DataType>(
    store: &dyn RecordStore<T>,
    raw_id: &str,
) -> RosterResult<Json<T>> {
    let id = parse_id::<T>(raw_id)?;
    let record = store
        .get_from_db_by_id(id)
        .await?
        .context(MissingRecordSnafu {
            entity: T::NAME,
            id,
        })?;
    Ok(Json(record))
}

pub(crate) async fn delete_one<T: DataType>(
    store: &dyn RecordStore<T>,
    raw_id: &str,
) -> RosterResult<Json<MessageResponse>> {
    let id = parse_id::<T>(raw_id)?;
    snafu::ensure!(
        store.remove_from_database(id).await?,
        MissingRecordSnafu {
            entity: T::NAME,
            id,
        }
    );

    info!(%id, entity = T::NAME, "deleted record");
    Ok(Json(MessageResponse {
        message: format!("{} deleted successfully", T::NAME),
    }))
}
