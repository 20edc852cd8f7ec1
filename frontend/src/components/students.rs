use classdesk_shared::Student;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::layout::{ListState, Shell};
use crate::data;

#[component]
pub fn StudentsPage() -> impl IntoView {
    let ctx = use_auth();

    let (rows, set_rows) = signal(Vec::<Student>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);

    Effect::new({
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            set_loading.set(true);
            spawn_local(async move {
                match data::students(&ctx).await {
                    Ok(page) => set_rows.set(page.items),
                    Err(e) => set_error.set(Some(e.message().to_string())),
                }
                set_loading.set(false);
            });
        }
    });

    view! {
        <Shell title="Students">
            <ListState loading=loading error=error>
                <div class="overflow-x-auto bg-base-100 rounded-box shadow-sm">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Roll No."</th>
                                <th>"Name"</th>
                                <th>"Email"</th>
                                <th>"Grade"</th>
                                <th>"Section"</th>
                                <th>"Status"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For each=move || rows.get() key=|s| s.id.clone() let:student>
                                <tr>
                                    <td class="font-mono text-sm">{student.roll_number.clone()}</td>
                                    <td class="font-medium">{student.full_name.clone()}</td>
                                    <td>{student.email.clone()}</td>
                                    <td>{student.grade.clone()}</td>
                                    <td>{student.section.clone()}</td>
                                    <td>
                                        <span class="badge badge-ghost badge-sm">
                                            {student.status.clone()}
                                        </span>
                                    </td>
                                </tr>
                            </For>
                        </tbody>
                    </table>
                </div>
            </ListState>
        </Shell>
    }
}
