//! UI Components

use leptos::prelude::*;
use crate::transcript::ChatTurn;

/// Message bubble component
#[component]
pub fn MessageBubble(turn: ChatTurn) -> impl IntoView {
    let role = turn.role.as_str();
    let class = format!("message message-{role}");
    
    view! {
        <div class=class>
            <span class="role">{role}</span>
            <p class="content">{turn.content}</p>
        </div>
    }
}

/// Dismissable error banner
#[component]
pub fn ErrorBanner(message: String, set_error: WriteSignal<Option<String>>) -> impl IntoView {
    view! {
        <div class="error-banner" role="alert">
            <span>{message}</span>
            <button on:click=move |_| set_error.set(None)>"×"</button>
        </div>
    }
}
