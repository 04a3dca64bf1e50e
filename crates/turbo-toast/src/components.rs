//! Notification components.

use leptos::prelude::*;
use turbo_notify::{
    ActionView, ItemPhase, NotificationConfig, NotificationId, NotificationKind, Position,
    ToastView,
};

use crate::context::{provide_notification_center, use_notifications};

/// Icon glyph shown next to a notification.
pub fn icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "✓",
        NotificationKind::Error => "✕",
        NotificationKind::Warning => "⚠",
        NotificationKind::Info => "ℹ",
        NotificationKind::Loading => "",
    }
}

/// Provides a notification center to `children` and renders its toasts.
#[component]
pub fn NotificationProvider(
    #[prop(optional)] config: Option<NotificationConfig>,
    children: Children,
) -> impl IntoView {
    provide_notification_center(config.unwrap_or_default());

    view! {
        {children()}
        <NotificationViewport/>
    }
}

/// One container per screen position.
#[component]
pub fn NotificationViewport() -> impl IntoView {
    Position::ALL
        .into_iter()
        .map(|position| view! { <NotificationContainer position=position/> })
        .collect::<Vec<_>>()
}

/// Toasts at one position, in insertion order. Renders nothing when empty.
#[component]
pub fn NotificationContainer(position: Position) -> impl IntoView {
    let views = use_notifications().views;
    let ids = Memo::new(move |_| {
        views.with(|all| {
            all.iter()
                .filter(|view| view.position == position)
                .map(|view| view.id.clone())
                .collect::<Vec<_>>()
        })
    });
    let occupied = Memo::new(move |_| ids.with(|ids| !ids.is_empty()));

    move || {
        occupied.get().then(|| {
            view! {
                <div class=format!("notification-container notification-container-{}", position)>
                    <For
                        each=move || ids.get()
                        key=|id| id.clone()
                        children=|id| view! { <NotificationToast id=id/> }
                    />
                </div>
            }
        })
    }
}

/// One toast's fields as separate memos.
///
/// The snapshot for a toast changes whenever its progress is recomputed,
/// which happens on every change anywhere in the center. Reading fields
/// through these memos confines such a change to the bindings it touches.
#[derive(Debug, Clone, Copy)]
pub struct ToastBindings {
    pub kind: Memo<Option<NotificationKind>>,
    pub title: Memo<String>,
    pub message: Memo<String>,
    pub class: Memo<String>,
    pub phase: Memo<Option<ItemPhase>>,
    pub progress: Memo<Option<f32>>,
    pub actions: Memo<Vec<ActionView>>,
}

impl ToastBindings {
    pub fn new(views: RwSignal<Vec<ToastView>>, id: NotificationId) -> Self {
        let toast = Memo::new(move |_| views.with(|all| all.iter().find(|view| view.id == id).cloned()));

        Self {
            kind: Memo::new(move |_| toast.with(|toast| toast.as_ref().map(|toast| toast.kind))),
            title: field(toast, |toast| toast.title.clone()),
            message: field(toast, |toast| toast.message.clone()),
            class: field(toast, ToastView::class_name),
            phase: Memo::new(move |_| toast.with(|toast| toast.as_ref().map(|toast| toast.phase))),
            progress: Memo::new(move |_| {
                toast.with(|toast| toast.as_ref().and_then(|toast| toast.progress))
            }),
            actions: field(toast, |toast| toast.actions.clone()),
        }
    }
}

fn field<T>(
    toast: Memo<Option<ToastView>>,
    read: impl Fn(&ToastView) -> T + Send + Sync + 'static,
) -> Memo<T>
where
    T: Default + PartialEq + Send + Sync + 'static,
{
    Memo::new(move |_| toast.with(|toast| toast.as_ref().map(&read).unwrap_or_default()))
}

/// A single toast. The element is built once for its id.
#[component]
pub fn NotificationToast(id: NotificationId) -> impl IntoView {
    let context = use_notifications();
    let center = context.center.clone();
    let ToastBindings {
        kind,
        title,
        message,
        class,
        phase,
        progress,
        actions,
    } = ToastBindings::new(context.views, id.clone());
    let has_progress = Memo::new(move |_| progress.get().is_some());

    let on_enter = {
        let (center, id) = (center.clone(), id.clone());
        move |_: leptos::ev::MouseEvent| {
            center.pointer_enter(&id);
        }
    };
    let on_leave = {
        let (center, id) = (center.clone(), id.clone());
        move |_: leptos::ev::MouseEvent| {
            center.pointer_leave(&id);
        }
    };
    let on_key = {
        let (center, id) = (center.clone(), id.clone());
        move |ev: leptos::ev::KeyboardEvent| {
            center.key_down(&id, &ev.key());
        }
    };
    let on_close = {
        let (center, id) = (center.clone(), id.clone());
        move |_: leptos::ev::MouseEvent| {
            center.close(&id);
        }
    };

    let action_buttons = move || {
        let actions = actions.get();
        (!actions.is_empty()).then(|| {
            let buttons = actions
                .into_iter()
                .enumerate()
                .map(|(index, action)| {
                    let (center, id) = (center.clone(), id.clone());
                    let button_class = action.class_name();
                    view! {
                        <button
                            class=button_class
                            on:click=move |_| {
                                center.trigger_action(&id, index);
                            }
                        >
                            {action.label}
                        </button>
                    }
                })
                .collect::<Vec<_>>();
            view! { <div class="notification-actions">{buttons}</div> }
        })
    };

    let progress_bar = move || {
        has_progress.get().then(|| {
            view! {
                <div class="notification-progress">
                    <div
                        class="notification-progress-bar"
                        style=move || format!("width: {:.1}%", progress.get().unwrap_or_default())
                    ></div>
                </div>
            }
        })
    };

    let spinner = move || {
        (kind.get() == Some(NotificationKind::Loading))
            .then(|| view! { <span class="notification-spinner"></span> })
    };

    view! {
        <div
            class=move || class.get()
            role=ToastView::ROLE
            aria-live=ToastView::ARIA_LIVE
            tabindex=ToastView::TAB_INDEX.to_string()
            data-phase=move || phase.get().map(|phase| phase.as_str())
            on:mouseenter=on_enter
            on:mouseleave=on_leave
            on:keydown=on_key
        >
            <div class="notification-icon">{move || kind.get().map(icon)}{spinner}</div>
            <div class="notification-content">
                <div class="notification-title">{move || title.get()}</div>
                <div class="notification-message">{move || message.get()}</div>
                {action_buttons}
            </div>
            <button
                class="notification-close"
                aria-label="Close notification"
                on:click=on_close
            >
                "×"
            </button>
            {progress_bar}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use turbo_notify::{ManualScheduler, NotificationCenter, NotificationOptions};

    use crate::context::ToastContext;

    #[test]
    fn test_icons() {
        assert_eq!(icon(NotificationKind::Success), "✓");
        assert_eq!(icon(NotificationKind::Error), "✕");
        assert!(icon(NotificationKind::Loading).is_empty());
    }

    // === Binding Tests ===

    #[test]
    fn test_unrelated_add_only_moves_progress() {
        let owner = Owner::new();
        owner.with(|| {
            let clock = ManualScheduler::new();
            let center = NotificationCenter::with_scheduler(
                NotificationConfig::default(),
                Arc::new(clock.clone()),
            );
            let context = ToastContext::new(center.clone());

            let id = center.info("first");
            clock.advance(Duration::from_millis(1000));
            let bindings = ToastBindings::new(context.views, id);

            let title = bindings.title.get_untracked();
            let message = bindings.message.get_untracked();
            let class = bindings.class.get_untracked();
            let phase = bindings.phase.get_untracked();
            let actions = bindings.actions.get_untracked();
            assert_eq!(bindings.progress.get_untracked(), Some(80.0));

            center.info(("elsewhere", NotificationOptions::new().position(Position::BottomLeft)));
            clock.advance(Duration::from_millis(500));
            center.info("another");

            assert_eq!(bindings.progress.get_untracked(), Some(70.0));
            assert_eq!(bindings.title.get_untracked(), title);
            assert_eq!(bindings.message.get_untracked(), message);
            assert_eq!(bindings.class.get_untracked(), class);
            assert_eq!(bindings.phase.get_untracked(), phase);
            assert_eq!(bindings.actions.get_untracked(), actions);
            assert_eq!(bindings.kind.get_untracked(), Some(NotificationKind::Info));
        });
    }

    #[test]
    fn test_bindings_follow_own_changes() {
        let owner = Owner::new();
        owner.with(|| {
            let clock = ManualScheduler::new();
            let center = NotificationCenter::with_scheduler(
                NotificationConfig::default(),
                Arc::new(clock.clone()),
            );
            let context = ToastContext::new(center.clone());

            let handle = center.loading("Saving");
            let bindings = ToastBindings::new(context.views, handle.id().clone());
            assert_eq!(bindings.kind.get_untracked(), Some(NotificationKind::Loading));
            assert_eq!(bindings.progress.get_untracked(), None);

            handle.success_with("Saved");
            assert_eq!(bindings.kind.get_untracked(), Some(NotificationKind::Success));
            assert_eq!(bindings.message.get_untracked(), "Saved");
            assert_eq!(bindings.progress.get_untracked(), Some(100.0));

            center.close(handle.id());
            assert!(bindings.class.get_untracked().ends_with("exit"));

            clock.advance(Duration::from_millis(300));
            assert_eq!(bindings.kind.get_untracked(), None);
            assert!(bindings.title.get_untracked().is_empty());
        });
    }
}
