use classdesk_shared::{DEMO_EMAIL, DEMO_PASSWORD};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{login, use_auth};
use crate::components::demo::DemoModeToggle;
use crate::web::router::use_navigate;

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_auth();
    let navigate = use_navigate();
    let state = ctx.state;

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (local_error, set_local_error) = signal(Option::<String>::None);

    // 表单级校验错误优先，其次是会话错误
    let error_msg = move || local_error.get().or_else(|| state.get().error);

    let clear_errors = {
        let ctx = ctx.clone();
        move || {
            set_local_error.set(None);
            if state.get_untracked().error.is_some() {
                ctx.engine().clear_error();
            }
        }
    };

    let on_submit = {
        let ctx = ctx.clone();
        let clear_errors = clear_errors.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            clear_errors();
            if email.get().is_empty() || password.get().is_empty() {
                set_local_error.set(Some("Please fill in all fields".to_string()));
                return;
            }

            set_is_submitting.set(true);
            let ctx = ctx.clone();
            spawn_local(async move {
                // 失败消息经由会话状态信号显示；成功后由路由层重定向
                login(&ctx, email.get_untracked(), password.get_untracked()).await;
                set_is_submitting.set(false);
            });
        }
    };

    let on_email = {
        let clear_errors = clear_errors.clone();
        move |ev: leptos::web_sys::Event| {
            clear_errors();
            set_email.set(event_target_value(&ev));
        }
    };
    let on_password = move |ev: leptos::web_sys::Event| {
        clear_errors();
        set_password.set(event_target_value(&ev));
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"ClassDesk"</h1>
                    <p class="text-base-content/70">"Sign in to your school workspace"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@school.com"
                                on:input=on_email
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=on_password
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <div class="flex justify-between text-sm mt-1">
                            <a class="link link-hover" on:click={
                                let navigate = navigate.clone();
                                move |_| navigate("/forgot-password")
                            }>
                                "Forgot password?"
                            </a>
                            <a class="link link-hover" on:click={
                                let navigate = navigate.clone();
                                move |_| navigate("/register")
                            }>
                                "Create account"
                            </a>
                        </div>

                        <div class="form-control mt-4">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! {
                                        <span class="loading loading-spinner"></span>
                                        "Signing in..."
                                    }
                                    .into_any()
                                } else {
                                    "Sign In".into_any()
                                }}
                            </button>
                        </div>

                        <div class="divider text-xs">"OR"</div>
                        <DemoModeToggle />
                        <p class="text-center text-xs text-base-content/50">
                            "Demo credentials: " {DEMO_EMAIL} " / " {DEMO_PASSWORD}
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
