use crate::routes::pages::Page;
use maud::{Markup, html};

pub fn home() -> Markup {
    html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full" {
            h1 class="text-2xl font-semibold mb-6 text-center" {
                "Roster"
            }

            div class="grid grid-cols-2 gap-4" {
                @for page in Page::ALL.into_iter().filter(|page| *page != Page::Home) {
                    a href=(page.path()) class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded text-center" {
                        (page.label())
                    }
                }
            }
        }
    }
}
