use chrono::NaiveDate;
use classdesk_shared::{Fee, FeeStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::layout::{ListState, Shell};
use crate::data;

/// 当前日期（浏览器本地时区）
fn today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
}

fn status_badge(status: FeeStatus) -> &'static str {
    match status {
        FeeStatus::Paid => "badge badge-success badge-sm",
        FeeStatus::Pending => "badge badge-warning badge-sm",
        FeeStatus::Overdue => "badge badge-error badge-sm",
    }
}

fn status_label(status: FeeStatus) -> &'static str {
    match status {
        FeeStatus::Paid => "paid",
        FeeStatus::Pending => "pending",
        FeeStatus::Overdue => "overdue",
    }
}

#[component]
pub fn FeesPage() -> impl IntoView {
    let ctx = use_auth();

    let (rows, set_rows) = signal(Vec::<Fee>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);

    Effect::new({
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            set_loading.set(true);
            spawn_local(async move {
                match data::fees(&ctx).await {
                    Ok(page) => set_rows.set(page.items),
                    Err(e) => set_error.set(Some(e.message().to_string())),
                }
                set_loading.set(false);
            });
        }
    });

    // 仅内存变更，不回写任何数据源
    let mark_paid = move |id: String| {
        set_rows.update(|list| {
            if let Some(fee) = list.iter_mut().find(|f| f.id == id) {
                fee.status = FeeStatus::Paid;
                fee.paid_date = today();
            }
        });
    };

    view! {
        <Shell title="Fees">
            <ListState loading=loading error=error>
                <div class="overflow-x-auto bg-base-100 rounded-box shadow-sm">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Student"</th>
                                <th>"Type"</th>
                                <th>"Amount"</th>
                                <th>"Due Date"</th>
                                <th>"Status"</th>
                                <th>"Paid On"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For each=move || rows.get() key=|f| f.id.clone() let:fee>
                                <tr>
                                    <td class="font-medium">{fee.student_name.clone()}</td>
                                    <td>{fee.fee_type.clone()}</td>
                                    <td>{format!("${:.2}", fee.amount)}</td>
                                    <td>{fee.due_date.to_string()}</td>
                                    <td>
                                        <span class=status_badge(fee.status)>
                                            {status_label(fee.status)}
                                        </span>
                                    </td>
                                    <td>
                                        {fee.paid_date.map(|d| d.to_string()).unwrap_or_default()}
                                    </td>
                                    <td>
                                        <Show when={
                                            let status = fee.status;
                                            move || status != FeeStatus::Paid
                                        }>
                                            <button
                                                class="btn btn-xs btn-outline btn-success"
                                                on:click={
                                                    let id = fee.id.clone();
                                                    move |_| mark_paid(id.clone())
                                                }
                                            >
                                                "Mark Paid"
                                            </button>
                                        </Show>
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
