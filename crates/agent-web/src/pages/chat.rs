//! Chat Page

use leptos::prelude::*;
use crate::api;
use crate::components::{ErrorBanner, MessageBubble};
use crate::transcript::Transcript;

#[component]
pub fn ChatPage() -> impl IntoView {
    let (transcript, set_transcript) = signal(Transcript::new());
    let (input, set_input) = signal(String::new());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);

    let send = move |_| {
        let msg = input.get();
        if msg.trim().is_empty() || loading.get() {
            return;
        }

        set_transcript.update(|t| t.push_user(msg.clone()));
        set_input.set(String::new());
        set_error.set(None);
        set_loading.set(true);

        leptos::task::spawn_local(async move {
            match api::send_ask(&msg).await {
                Ok(reply) => {
                    set_transcript.update(|t| {
                        t.push_assistant(&reply.response, &reply.tool_called);
                    });
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="chat">
            <header>
                <h1>"SafeSpace – AI Mental Health Therapist"</h1>
            </header>

            <main class="chat-main">
                <div class="messages">
                    <For
                        each=move || transcript.get().turns().to_vec()
                        key=|turn| turn.id
                        children=move |turn| view! { <MessageBubble turn=turn /> }
                    />
                    <Show when=move || loading.get()>
                        <div class="message loading">"..."</div>
                    </Show>
                </div>

                {move || error.get().map(|message| view! {
                    <ErrorBanner message=message set_error=set_error />
                })}

                <div class="input-area">
                    <textarea
                        placeholder="What's on your mind today?"
                        prop:value=move || input.get()
                        on:input=move |ev| set_input.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                send(());
                            }
                        }
                    />
                    <button on:click=move |_| send(()) disabled=move || loading.get()>
                        {move || if loading.get() { "..." } else { "Send" }}
                    </button>
                </div>
            </main>
        </div>
    }
}
