use crate::{
    data::{
        RecordStore,
        admin::{Admin, AdminUpdate, NewAdmin},
        student::{NewStudent, Student, StudentUpdate},
    },
    error::{MakeQuerySnafu, RosterResult},
};
use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Postgres-backed [`RecordStore`] for both record kinds. Ids and timestamps are assigned here and
/// by the column defaults in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub const fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<Student> for PgStore {
    async fn insert_into_database(&self, to_be_added: NewStudent) -> RosterResult<Student> {
        let NewStudent {
            student_id,
            first_name,
            last_name,
            section,
        } = to_be_added;

        sqlx::query_as::<_, Student>(
            "INSERT INTO public.students (id, student_id, first_name, last_name, section) VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(first_name)
        .bind(last_name)
        .bind(section)
        .fetch_one(&self.pool)
        .await
        .context(MakeQuerySnafu {
            action: "creating student",
        })
    }

    async fn get_all(&self) -> RosterResult<Vec<Student>> {
        sqlx::query_as::<_, Student>("SELECT * FROM public.students ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .context(MakeQuerySnafu {
                action: "fetching students",
            })
    }

    async fn get_from_db_by_id(&self, id: Uuid) -> RosterResult<Option<Student>> {
        sqlx::query_as::<_, Student>("SELECT * FROM public.students WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context(MakeQuerySnafu {
                action: "fetching student",
            })
    }

    async fn update_in_database(
        &self,
        id: Uuid,
        to_be_updated: StudentUpdate,
    ) -> RosterResult<Option<Student>> {
        let StudentUpdate {
            student_id,
            first_name,
            last_name,
            section,
        } = to_be_updated;

        sqlx::query_as::<_, Student>(
            "UPDATE public.students SET student_id = COALESCE($2, student_id), first_name = COALESCE($3, first_name), last_name = COALESCE($4, last_name), section = COALESCE($5, section), updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(student_id)
        .bind(first_name)
        .bind(last_name)
        .bind(section)
        .fetch_optional(&self.pool)
        .await
        .context(MakeQuerySnafu {
            action: "updating student",
        })
    }

    async fn remove_from_database(&self, id: Uuid) -> RosterResult<bool> {
        Ok(sqlx::query("DELETE FROM public.students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context(MakeQuerySnafu {
                action: "deleting student",
            })?
            .rows_affected()
            > 0)
    }
}

#[async_trait]
impl RecordStore<Admin> for PgStore {
    async fn insert_into_database(&self, to_be_added: NewAdmin) -> RosterResult<Admin> {
        let NewAdmin {
            admin_id,
            first_name,
            last_name,
            department,
            profile_image,
        } = to_be_added;

        sqlx::query_as::<_, Admin>(
            "INSERT INTO public.admins (id, admin_id, first_name, last_name, department, profile_image) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(admin_id)
        .bind(first_name)
        .bind(last_name)
        .bind(department)
        .bind(profile_image)
        .fetch_one(&self.pool)
        .await
        .context(MakeQuerySnafu {
            action: "creating admin",
        })
    }

    async fn get_all(&self) -> RosterResult<Vec<Admin>> {
        sqlx::query_as::<_, Admin>("SELECT * FROM public.admins ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .context(MakeQuerySnafu {
                action: "fetching admins",
            })
    }

    async fn get_from_db_by_id(&self, id: Uuid) -> RosterResult<Option<Admin>> {
        sqlx::query_as::<_, Admin>("SELECT * FROM public.admins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context(MakeQuerySnafu {
                action: "fetching admin",
            })
    }

    async fn update_in_database(
        &self,
        id: Uuid,
        to_be_updated: AdminUpdate,
    ) -> RosterResult<Option<Admin>> {
        let AdminUpdate {
            admin_id,
            first_name,
            last_name,
            department,
            profile_image,
        } = to_be_updated;

        //profile_image only changes when a new file came in, hence the COALESCE
        sqlx::query_as::<_, Admin>(
            "UPDATE public.admins SET admin_id = COALESCE($2, admin_id), first_name = COALESCE($3, first_name), last_name = COALESCE($4, last_name), department = COALESCE($5, department), profile_image = COALESCE($6, profile_image), updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(admin_id)
        .bind(first_name)
        .bind(last_name)
        .bind(department)
        .bind(profile_image)
        .fetch_optional(&self.pool)
        .await
        .context(MakeQuerySnafu {
            action: "updating admin",
        })
    }

    async fn remove_from_database(&self, id: Uuid) -> RosterResult<bool> {
        Ok(sqlx::query("DELETE FROM public.admins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context(MakeQuerySnafu {
                action: "deleting admin",
            })?
            .rows_affected()
            > 0)
    }
}
