use classdesk_shared::Subject;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::layout::{ListState, Shell};
use crate::data;

#[component]
pub fn SubjectsPage() -> impl IntoView {
    let ctx = use_auth();

    let (rows, set_rows) = signal(Vec::<Subject>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);

    Effect::new({
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            set_loading.set(true);
            spawn_local(async move {
                match data::subjects(&ctx).await {
                    Ok(page) => set_rows.set(page.items),
                    Err(e) => set_error.set(Some(e.message().to_string())),
                }
                set_loading.set(false);
            });
        }
    });

    view! {
        <Shell title="Subjects">
            <ListState loading=loading error=error>
                <div class="overflow-x-auto bg-base-100 rounded-box shadow-sm">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Code"</th>
                                <th>"Name"</th>
                                <th>"Grade"</th>
                                <th>"Teacher"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For each=move || rows.get() key=|s| s.id.clone() let:subject>
                                <tr>
                                    <td class="font-mono text-sm">{subject.code.clone()}</td>
                                    <td class="font-medium">{subject.name.clone()}</td>
                                    <td>{subject.grade.clone()}</td>
                                    <td>{subject.teacher.clone()}</td>
                                </tr>
                            </For>
                        </tbody>
                    </table>
                </div>
            </ListState>
        </Shell>
    }
}
