use classdesk_shared::{Announcement, Priority};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::layout::{ListState, Shell};
use crate::data;

fn priority_badge(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "badge badge-error",
        Priority::Medium => "badge badge-warning",
        Priority::Low => "badge badge-info",
    }
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

#[component]
pub fn AnnouncementsPage() -> impl IntoView {
    let ctx = use_auth();

    let (rows, set_rows) = signal(Vec::<Announcement>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);

    Effect::new({
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            set_loading.set(true);
            spawn_local(async move {
                match data::announcements(&ctx).await {
                    Ok(page) => set_rows.set(page.items),
                    Err(e) => set_error.set(Some(e.message().to_string())),
                }
                set_loading.set(false);
            });
        }
    });

    view! {
        <Shell title="Announcements">
            <ListState loading=loading error=error>
                <div class="space-y-4">
                    <For each=move || rows.get() key=|a| a.id.clone() let:announcement>
                        <div class="card bg-base-100 shadow-sm">
                            <div class="card-body py-4">
                                <div class="flex items-center justify-between">
                                    <h3 class="card-title text-base">
                                        {announcement.title.clone()}
                                    </h3>
                                    <span class=priority_badge(announcement.priority)>
                                        {priority_label(announcement.priority)}
                                    </span>
                                </div>
                                <p class="text-sm text-base-content/80">
                                    {announcement.content.clone()}
                                </p>
                                <div class="text-xs text-base-content/50">
                                    {announcement.author.clone()}
                                    " · "
                                    {announcement.created_at.format("%Y-%m-%d").to_string()}
                                </div>
                            </div>
                        </div>
                    </For>
                </div>
            </ListState>
        </Shell>
    }
}
