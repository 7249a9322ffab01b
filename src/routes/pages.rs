//! The browser-facing pages. One flat table of paths, no guards or nesting.

use crate::{
    error::RosterResult,
    routes::{index, lists, new_record_forms},
    state::RosterState,
};
use axum::{Router, extract::State, routing::get};
use maud::{Markup, html};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Page {
    Home,
    Admin,
    Student,
    AdminList,
    StudentList,
}

impl Page {
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Admin,
        Self::Student,
        Self::AdminList,
        Self::StudentList,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Admin => "/adminForm",
            Self::Student => "/studentForm",
            Self::AdminList => "/admins",
            Self::StudentList => "/students",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Admin => "Admin",
            Self::Student => "Student",
            Self::AdminList => "AdminList",
            Self::StudentList => "StudentList",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Admin => "New Admin",
            Self::Student => "New Student",
            Self::AdminList => "Admins",
            Self::StudentList => "Students",
        }
    }

    pub async fn render(self, state: &RosterState) -> RosterResult<Markup> {
        let content = match self {
            Self::Home => index::home(),
            Self::Admin => new_record_forms::new_admin_form(),
            Self::Student => new_record_forms::new_student_form(),
            Self::AdminList => lists::admin_list(state).await?,
            Self::StudentList => lists::student_list(state).await?,
        };
        Ok(state.render(html! {
            div id=(self.name()) class="w-full flex flex-col items-center" {
                (content)
            }
        }))
    }
}

pub fn page_router() -> Router<RosterState> {
    Page::ALL.into_iter().fold(Router::new(), |router, page| {
        router.route(
            page.path(),
            get(move |State(state): State<RosterState>| async move {
                page.render(&state).await
            }),
        )
    })
}
