use crate::{
    data::{DataType, IntegerInput, non_blank, update_integer, update_text},
    error::{MissingFieldsSnafu, RosterResult},
};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Serialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub section: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Request body for both creating and updating a student.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudentForm {
    pub student_id: Option<IntegerInput>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub section: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentUpdate {
    pub student_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub section: Option<String>,
}

bitflags! {
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct StudentFormError: u8 {
        const EMPTY_STUDENT_ID = 0b0001;
        const EMPTY_FIRST_NAME = 0b0010;
        const EMPTY_LAST_NAME =  0b0100;
        const EMPTY_SECTION =    0b1000;
    }
}

impl StudentFormError {
    pub fn field_names(&self) -> Vec<&'static str> {
        self.iter()
            .filter_map(|x| match x {
                Self::EMPTY_STUDENT_ID => Some("studentId"),
                Self::EMPTY_FIRST_NAME => Some("firstName"),
                Self::EMPTY_LAST_NAME => Some("lastName"),
                Self::EMPTY_SECTION => Some("section"),
                _ => None,
            })
            .collect()
    }
}

impl StudentForm {
    pub fn into_new(self) -> RosterResult<NewStudent> {
        let student_id = match self.student_id {
            Some(i) => i.parse("studentId")?,
            None => None,
        };
        let first_name = non_blank(self.first_name);
        let last_name = non_blank(self.last_name);
        let section = non_blank(self.section);

        let mut errors = StudentFormError::empty();
        errors.set(StudentFormError::EMPTY_STUDENT_ID, student_id.is_none());
        errors.set(StudentFormError::EMPTY_FIRST_NAME, first_name.is_none());
        errors.set(StudentFormError::EMPTY_LAST_NAME, last_name.is_none());
        errors.set(StudentFormError::EMPTY_SECTION, section.is_none());

        match (student_id, first_name, last_name, section) {
            (Some(student_id), Some(first_name), Some(last_name), Some(section)) => {
                Ok(NewStudent {
                    student_id,
                    first_name,
                    last_name,
                    section,
                })
            }
            _ => MissingFieldsSnafu {
                entity: Student::NAME,
                fields: errors.field_names(),
            }
            .fail(),
        }
    }

    pub fn into_update(self) -> RosterResult<StudentUpdate> {
        let mut errors = StudentFormError::empty();
        let mut blank = false;

        let student_id = update_integer(self.student_id, "studentId", &mut blank)?;
        errors.set(StudentFormError::EMPTY_STUDENT_ID, blank);

        let mut blank = false;
        let first_name = update_text(self.first_name, &mut blank);
        errors.set(StudentFormError::EMPTY_FIRST_NAME, blank);

        let mut blank = false;
        let last_name = update_text(self.last_name, &mut blank);
        errors.set(StudentFormError::EMPTY_LAST_NAME, blank);

        let mut blank = false;
        let section = update_text(self.section, &mut blank);
        errors.set(StudentFormError::EMPTY_SECTION, blank);

        snafu::ensure!(
            errors.is_empty(),
            MissingFieldsSnafu {
                entity: Student::NAME,
                fields: errors.field_names(),
            }
        );

        Ok(StudentUpdate {
            student_id,
            first_name,
            last_name,
            section,
        })
    }
}

impl DataType for Student {
    type FormForAdding = NewStudent;
    type FormForUpdating = StudentUpdate;

    const NAME: &'static str = "Student";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    fn from_form(
        NewStudent {
            student_id,
            first_name,
            last_name,
            section,
        }: Self::FormForAdding,
        id: Uuid,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            student_id,
            first_name,
            last_name,
            section,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, to_be_updated: Self::FormForUpdating, now: OffsetDateTime) {
        let StudentUpdate {
            student_id,
            first_name,
            last_name,
            section,
        } = to_be_updated;

        if let Some(student_id) = student_id {
            self.student_id = student_id;
        }
        if let Some(first_name) = first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            self.last_name = last_name;
        }
        if let Some(section) = section {
            self.section = section;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;

    fn full_form() -> StudentForm {
        StudentForm {
            student_id: Some(IntegerInput::Number(1)),
            first_name: Some("A".into()),
            last_name: Some("B".into()),
            section: Some("C".into()),
        }
    }

    #[test]
    fn complete_form_validates() {
        let new = full_form().into_new().unwrap();
        assert_eq!(
            new,
            NewStudent {
                student_id: 1,
                first_name: "A".into(),
                last_name: "B".into(),
                section: "C".into(),
            }
        );
    }

    #[test]
    fn every_missing_field_is_reported() {
        let form = StudentForm {
            first_name: Some("   ".into()),
            ..full_form()
        };
        let form = StudentForm {
            section: None,
            ..form
        };

        let Err(RosterError::MissingFields { entity, fields }) = form.into_new() else {
            panic!("expected missing fields");
        };
        assert_eq!(entity, "Student");
        assert_eq!(fields, vec!["firstName", "section"]);
    }

    #[test]
    fn update_keeps_absent_fields_and_rejects_blank_ones() {
        let update = StudentForm {
            section: Some("D".into()),
            ..StudentForm::default()
        }
        .into_update()
        .unwrap();
        assert_eq!(
            update,
            StudentUpdate {
                section: Some("D".into()),
                ..StudentUpdate::default()
            }
        );

        let blank = StudentForm {
            last_name: Some(String::new()),
            ..StudentForm::default()
        };
        assert!(matches!(
            blank.into_update(),
            Err(RosterError::MissingFields { .. })
        ));
    }

    #[test]
    fn applying_an_update_only_touches_given_fields() {
        let then = OffsetDateTime::UNIX_EPOCH;
        let now = then + time::Duration::seconds(5);
        let mut student =
            Student::from_form(full_form().into_new().unwrap(), Uuid::new_v4(), then);

        student.apply_update(
            StudentUpdate {
                first_name: Some("Z".into()),
                ..StudentUpdate::default()
            },
            now,
        );

        assert_eq!(student.first_name, "Z");
        assert_eq!(student.last_name, "B");
        assert_eq!(student.created_at, then);
        assert_eq!(student.updated_at, now);
    }

    #[test]
    fn serialises_with_document_style_keys() {
        let student = Student::from_form(
            full_form().into_new().unwrap(),
            Uuid::nil(),
            OffsetDateTime::UNIX_EPOCH,
        );
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["_id"], Uuid::nil().to_string());
        assert_eq!(json["studentId"], 1);
        assert_eq!(json["firstName"], "A");
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
    }
}
