use crate::{
    config::{DbConfig, RuntimeConfiguration, ServerConfig},
    data::{RecordStore, admin::Admin, memory::MemoryStore, postgres::PgStore, student::Student},
    error::{MigrateSnafu, OpenDatabaseSnafu, RosterResult},
    maud_conveniences::render_nav,
    uploads::UploadDir,
};
use maud::{DOCTYPE, Markup, html};
use snafu::ResultExt;
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use std::sync::Arc;

/// Everything a handler needs, cloned into every request.
#[derive(Clone, Debug)]
pub struct RosterState {
    students: Arc<dyn RecordStore<Student>>,
    admins: Arc<dyn RecordStore<Admin>>,
    uploads: UploadDir,
    server_config: Arc<ServerConfig>,
}

impl RosterState {
    /// Doesn't wait for the database, the first connection and migrations happen in the background
    /// and requests fail until they've succeeded.
    ///
    /// Without a usable `DATABASE_URL` the server still starts, keeping records in memory.
    pub async fn new(options: PgPoolOptions, config: &RuntimeConfiguration) -> RosterResult<Self> {
        let server_config = config.server_config();
        let uploads = UploadDir::create(&server_config.uploads_dir).await?;

        let (students, admins): (Arc<dyn RecordStore<Student>>, Arc<dyn RecordStore<Admin>>) =
            match open_pool(options, &config.db_config()) {
                Ok(pool) => {
                    tokio::spawn(connect_and_migrate(pool.clone()));
                    let store = Arc::new(PgStore::new(pool));
                    (store.clone(), store)
                }
                Err(e) => {
                    error!(?e, "Unable to use the database, records will only be kept in memory");
                    (
                        Arc::new(MemoryStore::<Student>::default()),
                        Arc::new(MemoryStore::<Admin>::default()),
                    )
                }
            };

        Ok(Self {
            students,
            admins,
            uploads,
            server_config,
        })
    }

    pub async fn in_memory(server_config: ServerConfig) -> RosterResult<Self> {
        let uploads = UploadDir::create(&server_config.uploads_dir).await?;

        Ok(Self {
            students: Arc::new(MemoryStore::<Student>::default()),
            admins: Arc::new(MemoryStore::<Admin>::default()),
            uploads,
            server_config: Arc::new(server_config),
        })
    }

    pub fn students(&self) -> &dyn RecordStore<Student> {
        self.students.as_ref()
    }

    pub fn admins(&self) -> &dyn RecordStore<Admin> {
        self.admins.as_ref()
    }

    pub const fn uploads(&self) -> &UploadDir {
        &self.uploads
    }

    pub fn server_config(&self) -> Arc<ServerConfig> {
        self.server_config.clone()
    }

    #[allow(clippy::unused_self, clippy::needless_pass_by_value)] //in case self is ever needed :), and to allow direct html! usage
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://unpkg.com/htmx-ext-json-enc@2.0.1/json-enc.js" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Roster" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center text-white" {
                    (render_nav())
                    main class="flex-1 flex flex-col items-center justify-center w-full p-4" {
                        (markup)
                    }
                }
            }
        }
    }
}

fn open_pool(options: PgPoolOptions, db_config: &DbConfig) -> RosterResult<Pool<Postgres>> {
    options
        .connect_lazy(db_config.get_db_path()?)
        .context(OpenDatabaseSnafu)
}

async fn connect_and_migrate(pool: Pool<Postgres>) {
    match sqlx::migrate!().run(&pool).await.context(MigrateSnafu) {
        Ok(()) => info!("Successfully connected to the database"),
        Err(e) => error!(?e, "Error connecting to the database"),
    }
}
