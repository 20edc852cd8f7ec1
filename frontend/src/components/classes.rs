use classdesk_shared::SchoolClass;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::layout::{ListState, Shell};
use crate::data;

#[component]
pub fn ClassesPage() -> impl IntoView {
    let ctx = use_auth();

    let (rows, set_rows) = signal(Vec::<SchoolClass>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);

    Effect::new({
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            set_loading.set(true);
            spawn_local(async move {
                match data::classes(&ctx).await {
                    Ok(page) => set_rows.set(page.items),
                    Err(e) => set_error.set(Some(e.message().to_string())),
                }
                set_loading.set(false);
            });
        }
    });

    view! {
        <Shell title="Classes">
            <ListState loading=loading error=error>
                <div class="overflow-x-auto bg-base-100 rounded-box shadow-sm">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Name"</th>
                                <th>"Grade"</th>
                                <th>"Teacher"</th>
                                <th>"Room"</th>
                                <th>"Enrollment"</th>
                                <th>"Schedule"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For each=move || rows.get() key=|c| c.id.clone() let:class>
                                <tr>
                                    <td class="font-medium">{class.name.clone()}</td>
                                    <td>{class.grade.clone()}</td>
                                    <td>{class.teacher.clone()}</td>
                                    <td>{class.room.clone()}</td>
                                    <td>
                                        {format!("{} / {}", class.current_enrollment, class.capacity)}
                                    </td>
                                    <td class="text-sm text-base-content/70">
                                        {class.schedule.clone()}
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
