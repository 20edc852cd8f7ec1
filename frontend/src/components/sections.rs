use classdesk_shared::Section;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::layout::{ListState, Shell};
use crate::data;

#[component]
pub fn SectionsPage() -> impl IntoView {
    let ctx = use_auth();

    let (rows, set_rows) = signal(Vec::<Section>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);

    Effect::new({
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            set_loading.set(true);
            spawn_local(async move {
                match data::sections(&ctx).await {
                    Ok(page) => set_rows.set(page.items),
                    Err(e) => set_error.set(Some(e.message().to_string())),
                }
                set_loading.set(false);
            });
        }
    });

    view! {
        <Shell title="Sections">
            <ListState loading=loading error=error>
                <div class="overflow-x-auto bg-base-100 rounded-box shadow-sm">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Section"</th>
                                <th>"Grade"</th>
                                <th>"Enrollment"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For each=move || rows.get() key=|s| s.id.clone() let:section>
                                <tr>
                                    <td class="font-medium">{section.name.clone()}</td>
                                    <td>{section.grade.clone()}</td>
                                    <td>
                                        {format!(
                                            "{} / {}",
                                            section.current_enrollment,
                                            section.capacity,
                                        )}
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
