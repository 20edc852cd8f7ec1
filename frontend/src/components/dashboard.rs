use classdesk_shared::FeeStatus;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::layout::{ListState, Shell};
use crate::data;

/// 仪表盘聚合数据
#[derive(Clone, Default)]
struct DashboardStats {
    students: usize,
    teachers: usize,
    classes: usize,
    pending_fees: f64,
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = use_auth();
    let state = ctx.state;

    let (stats, set_stats) = signal(DashboardStats::default());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);

    // 初始加载
    Effect::new({
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            set_loading.set(true);
            spawn_local(async move {
                let result = async {
                    let students = data::students(&ctx).await?;
                    let teachers = data::teachers(&ctx).await?;
                    let classes = data::classes(&ctx).await?;
                    let fees = data::fees(&ctx).await?;
                    let pending_fees = fees
                        .items
                        .iter()
                        .filter(|f| f.status != FeeStatus::Paid)
                        .map(|f| f.amount)
                        .sum();
                    Ok::<_, classdesk_session::SessionError>(DashboardStats {
                        students: students.items.len(),
                        teachers: teachers.items.len(),
                        classes: classes.items.len(),
                        pending_fees,
                    })
                }
                .await;

                match result {
                    Ok(s) => set_stats.set(s),
                    Err(e) => set_error.set(Some(e.message().to_string())),
                }
                set_loading.set(false);
            });
        }
    });

    let welcome = move || {
        state
            .get()
            .user
            .map(|u| format!("Welcome back, {}", u.first_name))
            .unwrap_or_else(|| "Welcome back".to_string())
    };

    view! {
        <Shell title="Dashboard">
            <h2 class="text-2xl font-semibold mb-6">{welcome}</h2>

            <ListState loading=loading error=error>
                <div class="grid grid-cols-1 md:grid-cols-4 gap-4">
                    <div class="stat bg-base-100 rounded-box shadow-sm">
                        <div class="stat-title">"Students"</div>
                        <div class="stat-value text-primary">
                            {move || stats.get().students}
                        </div>
                    </div>
                    <div class="stat bg-base-100 rounded-box shadow-sm">
                        <div class="stat-title">"Teachers"</div>
                        <div class="stat-value text-secondary">
                            {move || stats.get().teachers}
                        </div>
                    </div>
                    <div class="stat bg-base-100 rounded-box shadow-sm">
                        <div class="stat-title">"Classes"</div>
                        <div class="stat-value">{move || stats.get().classes}</div>
                    </div>
                    <div class="stat bg-base-100 rounded-box shadow-sm">
                        <div class="stat-title">"Fees Outstanding"</div>
                        <div class="stat-value text-warning">
                            {move || format!("${:.0}", stats.get().pending_fees)}
                        </div>
                    </div>
                </div>
            </ListState>
        </Shell>
    }
}
