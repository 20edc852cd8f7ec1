use classdesk_shared::RegisterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{register, use_auth};
use crate::web::router::use_navigate;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_auth();
    let navigate = use_navigate();
    let state = ctx.state;

    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (local_error, set_local_error) = signal(Option::<String>::None);
    // 注册成功不建立会话，改为引导去登录
    let (registered, set_registered) = signal(false);

    let error_msg = move || local_error.get().or_else(|| state.get().error);

    let on_submit = {
        let ctx = ctx.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            set_local_error.set(None);
            ctx.engine().clear_error();

            if first_name.get().is_empty()
                || last_name.get().is_empty()
                || email.get().is_empty()
                || password.get().is_empty()
            {
                set_local_error.set(Some("Please fill in all fields".to_string()));
                return;
            }
            if password.get() != confirm.get() {
                set_local_error.set(Some("Passwords do not match".to_string()));
                return;
            }

            set_is_submitting.set(true);
            let ctx = ctx.clone();
            spawn_local(async move {
                let data = RegisterRequest {
                    first_name: first_name.get_untracked(),
                    last_name: last_name.get_untracked(),
                    email: email.get_untracked(),
                    password: password.get_untracked(),
                    role: None,
                };
                if register(&ctx, data).await {
                    set_registered.set(true);
                }
                set_is_submitting.set(false);
            });
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Create Account"</h1>
                    <p class="text-base-content/70">"Join your school workspace"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <Show
                        when=move || !registered.get()
                        fallback={
                            let navigate = navigate.clone();
                            move || {
                                let navigate = navigate.clone();
                                view! {
                                    <div class="card-body text-center">
                                        <h2 class="text-xl font-semibold">"Account created"</h2>
                                        <p class="text-base-content/70">
                                            "You can now sign in with your new credentials."
                                        </p>
                                        <button
                                            class="btn btn-primary mt-2"
                                            on:click=move |_| navigate("/login")
                                        >
                                            "Go to Sign In"
                                        </button>
                                    </div>
                                }
                            }
                        }
                    >
                        <form class="card-body" on:submit=on_submit.clone()>
                            <Show when=move || error_msg().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || error_msg().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="grid grid-cols-2 gap-2">
                                <div class="form-control">
                                    <label class="label" for="first-name">
                                        <span class="label-text">"First name"</span>
                                    </label>
                                    <input
                                        id="first-name"
                                        type="text"
                                        on:input=move |ev| set_first_name.set(event_target_value(&ev))
                                        prop:value=first_name
                                        class="input input-bordered"
                                        required
                                    />
                                </div>
                                <div class="form-control">
                                    <label class="label" for="last-name">
                                        <span class="label-text">"Last name"</span>
                                    </label>
                                    <input
                                        id="last-name"
                                        type="text"
                                        on:input=move |ev| set_last_name.set(event_target_value(&ev))
                                        prop:value=last_name
                                        class="input input-bordered"
                                        required
                                    />
                                </div>
                            </div>

                            <div class="form-control">
                                <label class="label" for="reg-email">
                                    <span class="label-text">"Email"</span>
                                </label>
                                <input
                                    id="reg-email"
                                    type="email"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="reg-password">
                                    <span class="label-text">"Password"</span>
                                </label>
                                <input
                                    id="reg-password"
                                    type="password"
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                    prop:value=password
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="reg-confirm">
                                    <span class="label-text">"Confirm password"</span>
                                </label>
                                <input
                                    id="reg-confirm"
                                    type="password"
                                    on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                    prop:value=confirm
                                    class="input input-bordered"
                                    required
                                />
                            </div>

                            <div class="form-control mt-4">
                                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                    {move || if is_submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "Creating..."
                                        }
                                        .into_any()
                                    } else {
                                        "Create Account".into_any()
                                    }}
                                </button>
                            </div>

                            <p class="text-center text-sm mt-2">
                                "Already have an account? "
                                <a class="link link-primary" on:click={
                                    let navigate = navigate.clone();
                                    move |_| navigate("/login")
                                }>
                                    "Sign in"
                                </a>
                            </p>
                        </form>
                    </Show>
                </div>
            </div>
        </div>
    }
}
