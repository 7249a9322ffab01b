use crate::{
    maud_conveniences::{form_submit_button, simple_form_element, title},
    routes::pages::Page,
};
use maud::{Markup, PreEscaped, html};

///on success go to the matching list page, otherwise show the API's message
fn after_request(form_id: &'static str, list: Page) -> Markup {
    html! {
        script {
            (PreEscaped(format!(
                "document.getElementById('{form_id}').addEventListener('htmx:afterRequest', function (event) {{ if (event.detail.successful) {{ window.location.href = '{}' }} else {{ document.getElementById('form_result').textContent = JSON.parse(event.detail.xhr.responseText).message }} }})",
                list.path()
            )))
        }
    }
}

fn form_result() -> Markup {
    html! {
        p id="form_result" class="text-red-400 mb-4" {}
    }
}

pub fn new_student_form() -> Markup {
    html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full" {
            (title("Add New Student"))
            (form_result())

            form id="student_form" hx-post="/api/studentForm" hx-ext="json-enc" hx-swap="none" class="p-4" {
                (simple_form_element("studentId", "Student ID", true, Some("number")))
                (simple_form_element("firstName", "First Name", true, None))
                (simple_form_element("lastName", "Last Name", true, None))
                (simple_form_element("section", "Section", true, None))
                (form_submit_button(Some("Add Student")))
            }
            (after_request("student_form", Page::StudentList))
        }
    }
}

pub fn new_admin_form() -> Markup {
    html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full" {
            (title("Add New Admin"))
            (form_result())

            form id="admin_form" hx-post="/api/adminForm" hx-encoding="multipart/form-data" hx-swap="none" class="p-4" {
                (simple_form_element("adminId", "Admin ID", true, Some("number")))
                (simple_form_element("firstName", "First Name", true, None))
                (simple_form_element("lastName", "Last Name", true, None))
                (simple_form_element("department", "Department", true, None))

                div class="mb-4" {
                    label for="file" class="block text-sm font-medium text-gray-400 mb-2" {"Profile Image (optional)"}
                    input type="file" name="file" id="file" accept="image/*" class="block w-full text-sm text-gray-300 file:mr-4 file:py-2 file:px-4 file:rounded file:border-0 file:text-sm file:font-semibold file:bg-violet-50 file:text-violet-700 hover:file:bg-violet-100";
                }

                (form_submit_button(Some("Add Admin")))
            }
            (after_request("admin_form", Page::AdminList))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forms_post_to_the_api_with_the_right_encoding() {
        let student = new_student_form().into_string();
        assert!(student.contains(r#"hx-post="/api/studentForm""#));
        assert!(student.contains(r#"hx-ext="json-enc""#));
        assert!(student.contains(r#"name="section""#));

        let admin = new_admin_form().into_string();
        assert!(admin.contains(r#"hx-post="/api/adminForm""#));
        assert!(admin.contains(r#"hx-encoding="multipart/form-data""#));
        assert!(admin.contains(r#"type="file""#));
    }
}
