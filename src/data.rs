use crate::error::{InvalidIntegerSnafu, NotAnIntegerSnafu, RosterResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::fmt::Debug;
use time::OffsetDateTime;
use uuid::Uuid;

pub mod admin;
pub mod memory;
pub mod postgres;
pub mod student;

/// A record kind owned by a [`RecordStore`].
///
/// The in-memory store builds and mutates records through this trait, the postgres store does the
/// same thing in SQL.
pub trait DataType: Clone + Debug + Serialize + Send + Sync + 'static {
    type FormForAdding: Debug + Send + 'static;
    type FormForUpdating: Debug + Send + 'static;

    /// Capitalised singular, used in user-facing messages.
    const NAME: &'static str;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> OffsetDateTime;

    fn from_form(to_be_added: Self::FormForAdding, id: Uuid, now: OffsetDateTime) -> Self;
    fn apply_update(&mut self, to_be_updated: Self::FormForUpdating, now: OffsetDateTime);
}

/// Storage for one [`DataType`]. Every call is a single independent operation, there are no
/// transactions spanning calls.
#[async_trait]
pub trait RecordStore<T: DataType>: Debug + Send + Sync {
    async fn insert_into_database(&self, to_be_added: T::FormForAdding) -> RosterResult<T>;
    /// newest-created first
    async fn get_all(&self) -> RosterResult<Vec<T>>;
    async fn get_from_db_by_id(&self, id: Uuid) -> RosterResult<Option<T>>;
    /// `None` if nothing has that id
    async fn update_in_database(
        &self,
        id: Uuid,
        to_be_updated: T::FormForUpdating,
    ) -> RosterResult<Option<T>>;
    /// `false` if nothing has that id
    async fn remove_from_database(&self, id: Uuid) -> RosterResult<bool>;
}

/// Integers arrive as JSON numbers from API clients and as strings from HTML forms.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum IntegerInput {
    Number(i64),
    Text(String),
    /// floats, booleans, arrays and objects, rejected by [`Self::parse`]
    Other(serde_json::Value),
}

impl IntegerInput {
    /// `Ok(None)` for a blank string, which counts as a missing field
    pub fn parse(self, field: &'static str) -> RosterResult<Option<i64>> {
        match self {
            Self::Number(n) => Ok(Some(n)),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse()
                    .map(Some)
                    .context(InvalidIntegerSnafu { field, original: s })
            }
            Self::Other(value) => NotAnIntegerSnafu {
                field,
                original: value.to_string(),
            }
            .fail(),
        }
    }
}

impl From<String> for IntegerInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

pub(crate) fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

/// Present-but-blank fields are an error on update, absent ones are left alone.
pub(crate) fn update_text(s: Option<String>, blank: &mut bool) -> Option<String> {
    match s {
        Some(s) if s.trim().is_empty() => {
            *blank = true;
            None
        }
        other => other,
    }
}

pub(crate) fn update_integer(
    i: Option<IntegerInput>,
    field: &'static str,
    blank: &mut bool,
) -> RosterResult<Option<i64>> {
    match i {
        None => Ok(None),
        Some(i) => {
            let parsed = i.parse(field)?;
            if parsed.is_none() {
                *blank = true;
            }
            Ok(parsed)
        }
    }
}
