//! 演示模式 UI
//!
//! 入口页、顶部横幅与开关。横幅只在演示会话中出现，
//! 退出按钮做同步清场，导航由认证监听自动完成。

use classdesk_shared::{DEMO_EMAIL, DEMO_PASSWORD};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{login, use_auth};

/// 演示模式横幅
///
/// 仅在 `is_demo_mode` 时渲染。
#[component]
pub fn DemoBanner() -> impl IntoView {
    let ctx = use_auth();
    let state = ctx.state;

    let on_exit = {
        let ctx = ctx.clone();
        move |_| {
            // 同步清场回到匿名基线，重定向交给路由层
            ctx.engine().disable_demo_mode();
        }
    };

    view! {
        <Show when=move || state.get().is_demo_mode>
            <div class="alert alert-warning rounded-none py-2 flex justify-between">
                <span class="text-sm font-medium">
                    "Demo Mode - You are viewing sample data. Changes will not be saved."
                </span>
                <button class="btn btn-xs btn-ghost" on:click=on_exit.clone()>
                    "Exit Demo"
                </button>
            </div>
        </Show>
    }
}

/// 演示模式开关（登录页底部）
#[component]
pub fn DemoModeToggle() -> impl IntoView {
    let ctx = use_auth();
    let state = ctx.state;

    let on_toggle = {
        let ctx = ctx.clone();
        move |_| {
            if state.get_untracked().is_demo_mode {
                ctx.engine().disable_demo_mode();
            } else if let Err(e) = ctx.engine().enable_demo_mode() {
                web_sys::console::warn_1(
                    &format!("[Demo] Failed to enable demo mode: {e}").into(),
                );
            }
        }
    };

    view! {
        <label class="label cursor-pointer justify-center gap-2">
            <span class="label-text text-sm">"Try demo mode"</span>
            <input
                type="checkbox"
                class="toggle toggle-sm toggle-warning"
                prop:checked=move || state.get().is_demo_mode
                on:change=on_toggle
            />
        </label>
    }
}

/// 演示模式入口页
///
/// 一键用内置演示凭据走完整登录流程。
#[component]
pub fn DemoEntryPage() -> impl IntoView {
    let ctx = use_auth();
    let (is_submitting, set_is_submitting) = signal(false);

    let on_enter = {
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            set_is_submitting.set(true);
            spawn_local(async move {
                // 走与表单登录相同的路径，命中演示凭据旁路
                login(&ctx, DEMO_EMAIL.to_string(), DEMO_PASSWORD.to_string()).await;
                set_is_submitting.set(false);
            });
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="card w-full shadow-2xl bg-base-100">
                    <div class="card-body text-center">
                        <h1 class="text-2xl font-bold">"ClassDesk Demo"</h1>
                        <p class="text-base-content/70">
                            "Explore the school ERP with sample data. No account needed - "
                            "nothing you do here is saved."
                        </p>
                        <div class="card-actions justify-center mt-4">
                            <button
                                class="btn btn-warning btn-wide"
                                disabled=move || is_submitting.get()
                                on:click=on_enter
                            >
                                {move || if is_submitting.get() {
                                    view! {
                                        <span class="loading loading-spinner"></span>
                                        "Entering..."
                                    }
                                    .into_any()
                                } else {
                                    "Enter Demo Mode".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-xs text-base-content/50 mt-2">
                            "Signs you in as " {DEMO_EMAIL}
                        </p>
                    </div>
                </div>
            </div>
        </div>
    }
}
