use axum::{
    Json,
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use snafu::Snafu;
use std::{error::Error as _, io, net::SocketAddr, num::ParseIntError, path::PathBuf};
use uuid::Uuid;

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Error {}", action))]
    MakeQuery {
        source: sqlx::Error,
        action: &'static str,
    },
    #[snafu(display("`DATABASE_URL` is not set"))]
    MissingDatabaseUrl,
    #[snafu(display("Unable to parse env var `{}` as a number", name))]
    ParseEnvNumber {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("Unable to parse {} id {:?}", entity, original))]
    ParseUuid {
        source: uuid::Error,
        original: String,
        entity: &'static str,
    },
    #[snafu(display("{} not found", entity))]
    MissingRecord { entity: &'static str, id: Uuid },
    #[snafu(display("All fields are required, missing: {}", fields.join(", ")))]
    MissingFields {
        entity: &'static str,
        fields: Vec<&'static str>,
    },
    #[snafu(display("Field `{}` must be an integer, got {:?}", field, original))]
    InvalidInteger {
        source: ParseIntError,
        field: &'static str,
        original: String,
    },
    #[snafu(display("Field `{}` must be an integer, got {}", field, original))]
    NotAnInteger {
        field: &'static str,
        original: String,
    },
    #[snafu(display("Error reading JSON body"))]
    JsonBody { source: JsonRejection },
    #[snafu(display("Error with multipart form input"))]
    Multipart { source: MultipartError },
    #[snafu(display("Unexpected file in field {:?}, only a single `file` is accepted", name))]
    UnexpectedFile { name: String },
    #[snafu(display("Unable to create upload directory {}", path.display()))]
    CreateUploadDir { source: io::Error, path: PathBuf },
    #[snafu(display("Unable to write upload to {}", path.display()))]
    WriteUpload { source: io::Error, path: PathBuf },
    #[snafu(display("Unable to listen on {}", addr))]
    BindListener { source: io::Error, addr: SocketAddr },
    #[snafu(display("Error serving app"))]
    Serve { source: io::Error },
}

impl RosterError {
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        match self {
            Self::OpenDatabase { .. } | Self::MigrateError { .. } => ISE,
            Self::MakeQuery { source, .. } => match source {
                sqlx::Error::RowNotFound => NF,
                _ => ISE,
            },
            Self::MissingDatabaseUrl | Self::ParseEnvNumber { .. } => ISE,
            // a malformed id is reported like any other lookup failure, not as bad input
            Self::ParseUuid { .. } => ISE,
            Self::MissingRecord { .. } => NF,
            Self::MissingFields { .. }
            | Self::InvalidInteger { .. }
            | Self::NotAnInteger { .. }
            | Self::JsonBody { .. }
            | Self::Multipart { .. }
            | Self::UnexpectedFile { .. } => BI,
            Self::CreateUploadDir { .. } | Self::WriteUpload { .. } => ISE,
            Self::BindListener { .. } | Self::Serve { .. } => ISE,
        }
    }
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        error!(?self, %status_code, "Error!");

        let body = match self.source() {
            Some(source) => json!({ "message": self.to_string(), "error": source.to_string() }),
            None => json!({ "message": self.to_string() }),
        };
        (status_code, Json(body)).into_response()
    }
}
