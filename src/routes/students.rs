use crate::{
    data::{
        DataType,
        student::{Student, StudentForm},
    },
    error::{JsonBodySnafu, MissingRecordSnafu, RosterResult},
    routes::{MessageResponse, delete_one, get_one, parse_id},
    state::RosterState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use snafu::{OptionExt, ResultExt};

/// A request with no JSON body reads as an empty form, which validation then deals with.
fn json_or_empty(body: Result<Json<StudentForm>, JsonRejection>) -> RosterResult<StudentForm> {
    match body {
        Ok(Json(form)) => Ok(form),
        Err(JsonRejection::MissingJsonContentType(e)) => {
            debug!(?e, "no JSON body, reading it as an empty form");
            Ok(StudentForm::default())
        }
        Err(e) => Err(e).context(JsonBodySnafu),
    }
}

pub async fn post_student_form(
    State(state): State<RosterState>,
    body: Result<Json<StudentForm>, JsonRejection>,
) -> RosterResult<(StatusCode, Json<Student>)> {
    let form = json_or_empty(body)?;
    let new_student = form.into_new()?;

    let student = state.students().insert_into_database(new_student).await?;
    info!(id = %student.id, student_id = student.student_id, "created student");

    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn get_students(State(state): State<RosterState>) -> RosterResult<Json<Vec<Student>>> {
    Ok(Json(state.students().get_all().await?))
}

pub async fn get_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<Json<Student>> {
    get_one(state.students(), &id).await
}

pub async fn put_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
    body: Result<Json<StudentForm>, JsonRejection>,
) -> RosterResult<Json<Student>> {
    let id = parse_id::<Student>(&id)?;
    let form = json_or_empty(body)?;
    let update = form.into_update()?;

    let student = state
        .students()
        .update_in_database(id, update)
        .await?
        .context(MissingRecordSnafu {
            entity: Student::NAME,
            id,
        })?;
    info!(%id, "updated student");

    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<Json<MessageResponse>> {
    delete_one(state.students(), &id).await
}
