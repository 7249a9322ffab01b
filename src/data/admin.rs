use crate::{
    data::{DataType, IntegerInput, non_blank, update_integer, update_text},
    error::{MissingFieldsSnafu, RosterResult},
};
use bitflags::bitflags;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Serialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub admin_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    /// storage path of the uploaded image, e.g. `uploads/<uuid>-me.png`
    pub profile_image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Text fields of the multipart admin form. The optional `file` part is handled by
/// [`crate::uploads`].
#[derive(Debug, Default)]
pub struct AdminForm {
    pub admin_id: Option<IntegerInput>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdmin {
    pub admin_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminUpdate {
    pub admin_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    /// only `Some` when a new file came with the request
    pub profile_image: Option<String>,
}

bitflags! {
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct AdminFormError: u8 {
        const EMPTY_ADMIN_ID =   0b0001;
        const EMPTY_FIRST_NAME = 0b0010;
        const EMPTY_LAST_NAME =  0b0100;
        const EMPTY_DEPARTMENT = 0b1000;
    }
}

impl AdminFormError {
    pub fn field_names(&self) -> Vec<&'static str> {
        self.iter()
            .filter_map(|x| match x {
                Self::EMPTY_ADMIN_ID => Some("adminId"),
                Self::EMPTY_FIRST_NAME => Some("firstName"),
                Self::EMPTY_LAST_NAME => Some("lastName"),
                Self::EMPTY_DEPARTMENT => Some("department"),
                _ => None,
            })
            .collect()
    }
}

impl AdminForm {
    /// Sets a text field by its form name, ignoring names the form doesn't have.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "adminId" => self.admin_id = Some(value.into()),
            "firstName" => self.first_name = Some(value),
            "lastName" => self.last_name = Some(value),
            "department" => self.department = Some(value),
            _ => debug!(?name, "ignoring unknown admin form field"),
        }
    }

    /// The profile image is attached afterwards, once the fields are known to be valid.
    pub fn into_new(self) -> RosterResult<NewAdmin> {
        let admin_id = match self.admin_id {
            Some(i) => i.parse("adminId")?,
            None => None,
        };
        let first_name = non_blank(self.first_name);
        let last_name = non_blank(self.last_name);
        let department = non_blank(self.department);

        let mut errors = AdminFormError::empty();
        errors.set(AdminFormError::EMPTY_ADMIN_ID, admin_id.is_none());
        errors.set(AdminFormError::EMPTY_FIRST_NAME, first_name.is_none());
        errors.set(AdminFormError::EMPTY_LAST_NAME, last_name.is_none());
        errors.set(AdminFormError::EMPTY_DEPARTMENT, department.is_none());

        match (admin_id, first_name, last_name, department) {
            (Some(admin_id), Some(first_name), Some(last_name), Some(department)) => {
                Ok(NewAdmin {
                    admin_id,
                    first_name,
                    last_name,
                    department,
                    profile_image: None,
                })
            }
            _ => MissingFieldsSnafu {
                entity: Admin::NAME,
                fields: errors.field_names(),
            }
            .fail(),
        }
    }

    pub fn into_update(self) -> RosterResult<AdminUpdate> {
        let mut errors = AdminFormError::empty();

        let mut blank = false;
        let admin_id = update_integer(self.admin_id, "adminId", &mut blank)?;
        errors.set(AdminFormError::EMPTY_ADMIN_ID, blank);

        let mut blank = false;
        let first_name = update_text(self.first_name, &mut blank);
        errors.set(AdminFormError::EMPTY_FIRST_NAME, blank);

        let mut blank = false;
        let last_name = update_text(self.last_name, &mut blank);
        errors.set(AdminFormError::EMPTY_LAST_NAME, blank);

        let mut blank = false;
        let department = update_text(self.department, &mut blank);
        errors.set(AdminFormError::EMPTY_DEPARTMENT, blank);

        snafu::ensure!(
            errors.is_empty(),
            MissingFieldsSnafu {
                entity: Admin::NAME,
                fields: errors.field_names(),
            }
        );

        Ok(AdminUpdate {
            admin_id,
            first_name,
            last_name,
            department,
            profile_image: None,
        })
    }
}

impl DataType for Admin {
    type FormForAdding = NewAdmin;
    type FormForUpdating = AdminUpdate;

    const NAME: &'static str = "Admin";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    fn from_form(
        NewAdmin {
            admin_id,
            first_name,
            last_name,
            department,
            profile_image,
        }: Self::FormForAdding,
        id: Uuid,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            admin_id,
            first_name,
            last_name,
            department,
            profile_image,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, to_be_updated: Self::FormForUpdating, now: OffsetDateTime) {
        let AdminUpdate {
            admin_id,
            first_name,
            last_name,
            department,
            profile_image,
        } = to_be_updated;

        if let Some(admin_id) = admin_id {
            self.admin_id = admin_id;
        }
        if let Some(first_name) = first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            self.last_name = last_name;
        }
        if let Some(department) = department {
            self.department = department;
        }
        if profile_image.is_some() {
            self.profile_image = profile_image;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;

    fn filled_form() -> AdminForm {
        let mut form = AdminForm::default();
        form.set_field("adminId", "12".into());
        form.set_field("firstName", "Grace".into());
        form.set_field("lastName", "Hopper".into());
        form.set_field("department", "Navy".into());
        form.set_field("favouriteColour", "blue".into());
        form
    }

    #[test]
    fn multipart_text_fields_validate() {
        let new = filled_form().into_new().unwrap();
        assert_eq!(new.admin_id, 12);
        assert_eq!(new.department, "Navy");
        assert_eq!(new.profile_image, None);
    }

    #[test]
    fn non_numeric_admin_id_is_rejected() {
        let mut form = filled_form();
        form.set_field("adminId", "twelve".into());
        assert!(matches!(
            form.into_new(),
            Err(RosterError::InvalidInteger { field: "adminId", .. })
        ));
    }

    #[test]
    fn empty_form_reports_all_four_fields() {
        let Err(RosterError::MissingFields { fields, .. }) = AdminForm::default().into_new()
        else {
            panic!("expected missing fields");
        };
        assert_eq!(fields, vec!["adminId", "firstName", "lastName", "department"]);
    }

    #[test]
    fn update_without_image_preserves_existing_one() {
        let then = OffsetDateTime::UNIX_EPOCH;
        let mut new = filled_form().into_new().unwrap();
        new.profile_image = Some("uploads/old.png".into());
        let mut admin = Admin::from_form(new, Uuid::new_v4(), then);

        let mut update = AdminForm::default();
        update.set_field("department", "Research".into());
        admin.apply_update(update.into_update().unwrap(), then);
        assert_eq!(admin.department, "Research");
        assert_eq!(admin.profile_image.as_deref(), Some("uploads/old.png"));

        admin.apply_update(
            AdminUpdate {
                profile_image: Some("uploads/new.png".into()),
                ..AdminUpdate::default()
            },
            then,
        );
        assert_eq!(admin.profile_image.as_deref(), Some("uploads/new.png"));
    }

    #[test]
    fn missing_image_serialises_as_null() {
        let admin = Admin::from_form(
            filled_form().into_new().unwrap(),
            Uuid::nil(),
            OffsetDateTime::UNIX_EPOCH,
        );
        let json = serde_json::to_value(&admin).unwrap();
        assert!(json["profileImage"].is_null());
        assert_eq!(json["adminId"], 12);
    }
}
