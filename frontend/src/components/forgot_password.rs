use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::web::router::use_navigate;

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let ctx = use_auth();
    let navigate = use_navigate();

    let (email, set_email) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (sent_message, set_sent_message) = signal(Option::<String>::None);

    let on_submit = {
        let ctx = ctx.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            set_error_msg.set(None);
            if email.get().is_empty() {
                set_error_msg.set(Some("Please enter your email".to_string()));
                return;
            }

            set_is_submitting.set(true);
            let api = ctx.api.clone();
            spawn_local(async move {
                match api.forgot_password(&email.get_untracked()).await {
                    Ok(res) => set_sent_message.set(Some(res.message)),
                    Err(e) => set_error_msg.set(Some(e.message().to_string())),
                }
                set_is_submitting.set(false);
            });
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Reset Password"</h1>
                    <p class="text-base-content/70">
                        "We'll email you a link to reset your password"
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>
                        <Show when=move || sent_message.get().is_some()>
                            <div role="alert" class="alert alert-success text-sm py-2">
                                <span>{move || sent_message.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="fp-email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="fp-email"
                                type="email"
                                placeholder="you@school.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <div class="form-control mt-4">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! {
                                        <span class="loading loading-spinner"></span>
                                        "Sending..."
                                    }
                                    .into_any()
                                } else {
                                    "Send Reset Link".into_any()
                                }}
                            </button>
                        </div>

                        <p class="text-center text-sm mt-2">
                            <a class="link link-hover" on:click={
                                let navigate = navigate.clone();
                                move |_| navigate("/login")
                            }>
                                "Back to sign in"
                            </a>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
