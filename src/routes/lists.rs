use crate::{error::RosterResult, maud_conveniences::render_table, state::RosterState};
use maud::{Markup, PreEscaped, html};
use time::format_description::well_known::Rfc2822;
use uuid::Uuid;

fn delete_button(api_path: &'static str, id: Uuid) -> Markup {
    html! {
        button class="delete-record bg-red-600 hover:bg-red-800 font-bold py-1 px-3 rounded" hx-delete={(api_path) "/" (id)} hx-swap="none" {
            "Delete"
        }
    }
}

///every delete button reloads the list once its request has finished
fn reload_after_delete() -> Markup {
    html! {
        script {
            (PreEscaped("document.body.addEventListener('htmx:afterRequest', function (event) { if (event.target.classList.contains('delete-record')) { window.location.reload() } })"))
        }
    }
}

fn created(at: time::OffsetDateTime) -> String {
    at.format(&Rfc2822).unwrap_or_else(|_| at.to_string())
}

pub async fn student_list(state: &RosterState) -> RosterResult<Markup> {
    let students = state.students().get_all().await?;

    Ok(html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full" {
            @if students.is_empty() {
                p class="italic" {"No students yet."}
            } @else {
                (render_table(
                    "Students",
                    ["Student ID", "First Name", "Last Name", "Section", "Created", ""],
                    students.into_iter().map(|student| [
                        html! {(student.student_id)},
                        html! {(student.first_name)},
                        html! {(student.last_name)},
                        html! {(student.section)},
                        html! {(created(student.created_at))},
                        delete_button("/api/students", student.id),
                    ]).collect(),
                ))
            }
        }
        (reload_after_delete())
    })
}

pub async fn admin_list(state: &RosterState) -> RosterResult<Markup> {
    let admins = state.admins().get_all().await?;

    Ok(html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full" {
            @if admins.is_empty() {
                p class="italic" {"No admins yet."}
            } @else {
                (render_table(
                    "Admins",
                    ["", "Admin ID", "First Name", "Last Name", "Department", "Created", ""],
                    admins.into_iter().map(|admin| [
                        html! {
                            @if let Some(profile_image) = &admin.profile_image {
                                img src={"/" (profile_image)} alt="Profile image" class="h-12 w-12 rounded-full object-cover";
                            } @else {
                                p class="italic" {"None"}
                            }
                        },
                        html! {(admin.admin_id)},
                        html! {(admin.first_name)},
                        html! {(admin.last_name)},
                        html! {(admin.department)},
                        html! {(created(admin.created_at))},
                        delete_button("/api/admins", admin.id),
                    ]).collect(),
                ))
            }
        }
        (reload_after_delete())
    })
}
