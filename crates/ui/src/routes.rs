use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::{CompleteView, QuestionnaireView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", QuestionnaireView)] Questionnaire {},
        #[route("/complete", CompleteView)] Complete {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "app__header",
                h1 { "Questionnaire" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
