use classdesk_shared::Teacher;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::layout::{ListState, Shell};
use crate::data;

#[component]
pub fn TeachersPage() -> impl IntoView {
    let ctx = use_auth();

    let (rows, set_rows) = signal(Vec::<Teacher>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);

    Effect::new({
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            set_loading.set(true);
            spawn_local(async move {
                match data::teachers(&ctx).await {
                    Ok(page) => set_rows.set(page.items),
                    Err(e) => set_error.set(Some(e.message().to_string())),
                }
                set_loading.set(false);
            });
        }
    });

    view! {
        <Shell title="Teachers">
            <ListState loading=loading error=error>
                <div class="overflow-x-auto bg-base-100 rounded-box shadow-sm">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Name"</th>
                                <th>"Email"</th>
                                <th>"Subjects"</th>
                                <th>"Qualification"</th>
                                <th>"Experience"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For each=move || rows.get() key=|t| t.id.clone() let:teacher>
                                <tr>
                                    <td class="font-medium">{teacher.full_name.clone()}</td>
                                    <td>{teacher.email.clone()}</td>
                                    <td>{teacher.subjects.join(", ")}</td>
                                    <td>{teacher.qualification.clone()}</td>
                                    <td>{teacher.experience.clone()}</td>
                                </tr>
                            </For>
                        </tbody>
                    </table>
                </div>
            </ListState>
        </Shell>
    }
}
