//! 应用外壳
//!
//! 受保护页面的公共布局：顶栏（标题、用户名、登出）、侧边导航、
//! 演示横幅。布局刻意保持轻量，页面内容经 children 注入。

use leptos::prelude::*;

use crate::auth::{logout, use_auth};
use crate::components::demo::DemoBanner;
use crate::web::router::{use_navigate, use_router};

/// 侧边导航项
#[component]
fn NavLink(label: &'static str, path: &'static str) -> impl IntoView {
    let navigate = use_navigate();
    let current = use_router().current_route();
    let is_active = move || current.get().to_path() == path;

    view! {
        <li>
            <a
                class=move || if is_active() { "active" } else { "" }
                on:click=move |_| navigate(path)
            >
                {label}
            </a>
        </li>
    }
}

/// 受保护页面的外壳组件
#[component]
pub fn Shell(
    /// 页面标题（顶栏显示）
    title: &'static str,
    children: Children,
) -> impl IntoView {
    let ctx = use_auth();
    let state = ctx.state;

    let user_name = move || {
        state
            .get()
            .user
            .map(|u| u.full_name)
            .unwrap_or_default()
    };
    // 费用入口仅对 admin 暴露（路由守卫仍是最终裁决）
    let shows_fees = move || {
        state
            .get()
            .user
            .map(|u| u.has_any_role(&["admin"]))
            .unwrap_or(false)
    };

    let on_logout = {
        let ctx = ctx.clone();
        move |_| logout(&ctx)
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <DemoBanner />
            <div class="navbar bg-base-100 shadow-sm px-4">
                <div class="flex-1">
                    <span class="text-lg font-bold">"ClassDesk"</span>
                    <span class="mx-2 text-base-content/40">"/"</span>
                    <span class="text-base-content/80">{title}</span>
                </div>
                <div class="flex-none gap-3">
                    <span class="text-sm text-base-content/70">{user_name}</span>
                    <button class="btn btn-sm btn-outline" on:click=on_logout>
                        "Logout"
                    </button>
                </div>
            </div>

            <div class="flex">
                <aside class="w-56 min-h-screen bg-base-100 border-r border-base-300">
                    <ul class="menu p-3 gap-1">
                        <NavLink label="Dashboard" path="/app/dashboard" />
                        <li class="menu-title">"School"</li>
                        <NavLink label="Classes" path="/app/school/classes" />
                        <NavLink label="Sections" path="/app/school/sections" />
                        <NavLink label="Subjects" path="/app/school/subjects" />
                        <NavLink label="Students" path="/app/school/students" />
                        <NavLink label="Teachers" path="/app/school/teachers" />
                        <Show when=shows_fees>
                            <li class="menu-title">"Finance"</li>
                            <NavLink label="Fees" path="/app/finance/fees" />
                        </Show>
                        <li class="menu-title">"Communication"</li>
                        <NavLink label="Announcements" path="/app/communication/announcements" />
                    </ul>
                </aside>

                <main class="flex-1 p-6">{children()}</main>
            </div>
        </div>
    }
}

/// 列表页通用的加载 / 错误 / 内容三态容器
#[component]
pub fn ListState(
    loading: ReadSignal<bool>,
    error: ReadSignal<Option<String>>,
    children: ChildrenFn,
) -> impl IntoView {
    let children = StoredValue::new(children);
    view! {
        <Show
            when=move || !loading.get()
            fallback=|| view! {
                <div class="flex justify-center py-16">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
        >
            {move || match error.get() {
                Some(msg) => view! {
                    <div role="alert" class="alert alert-error">
                        <span>{msg}</span>
                    </div>
                }
                .into_any(),
                None => children.read_value()().into_any(),
            }}
        </Show>
    }
}
