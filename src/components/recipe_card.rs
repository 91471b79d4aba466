//! Recipe Card Component
//!
//! One full-height reel: looping video (or gradient), narration audio,
//! caption overlay and the card controls. Playback decisions are made by
//! the card's controller; this component only wires DOM events to it.

use gloo_timers::callback::Interval;
use leptos::html;
use leptos::prelude::*;

use super::detail_panel::DetailPanel;
use super::recipe_feed::LikeControls;
use crate::commands::BridgeAssistant;
use crate::context::use_app_context;
use crate::dom::{now_ms, DomMedia, MediaNode};
use crate::playback::{
    Backdrop, CardController, CardMedia, CardOrigin, CardStatus, FavoriteOutcome, PlayRejection, RecipeCard,
};

#[component]
pub fn ReelCard(
    /// Position in the mounted list
    index: usize,
    card: RecipeCard,
    /// Index the list currently considers visible
    active: ReadSignal<Option<usize>>,
    #[prop(optional_no_strip)] likes: Option<LikeControls>,
) -> impl IntoView {
    let ctx = use_app_context();
    let config = ctx.config();

    let audio_ref = NodeRef::<html::Audio>::new();
    let video_ref = NodeRef::<html::Video>::new();
    let (rejected, set_rejected) = signal(None::<PlayRejection>);
    let (clip, set_clip) = signal(0usize);

    let clips: Vec<String> = card.video_urls().to_vec();
    // A clip sequence plays through with the narration running on its own;
    // the controller only rewinds it.
    let single_clip = clips.len() == 1;
    let media = CardMedia {
        audio: DomMedia::new(MediaNode::Audio(audio_ref), set_rejected),
        video: (!clips.is_empty()).then(|| DomMedia::new(MediaNode::Video(video_ref), set_rejected)),
    };

    let controller = CardController::new(index, card.clone(), Some(media), &ctx.bus.get_value(), &config);
    let (status, set_status) = signal(controller.status());
    controller.set_observer(move |s: CardStatus| set_status.set(s));
    let controller = StoredValue::new_local(controller);

    // Visible card: back to the first clip, announce and start
    Effect::new(move |_| {
        if active.get() == Some(index) {
            if clip.get_untracked() != 0 {
                set_clip.set(0);
            }
            controller.with_value(|c| {
                c.activate(now_ms());
            });
        }
    });

    // Asynchronous play() rejections
    Effect::new(move |_| {
        if let Some(rejection) = rejected.get() {
            controller.with_value(|c| c.on_play_rejected(&rejection));
        }
    });

    // Drift check timer, alive as long as the card
    let ticker = StoredValue::new_local(card.is_narrated().then(|| {
        Interval::new(config.drift_check_interval_ms, move || {
            let _ = controller.try_with_value(|c| c.on_drift_tick(now_ms()));
        })
    }));

    on_cleanup(move || {
        let _ = ticker.try_update_value(|t| t.take());
        let _ = controller.try_with_value(|c| c.unmount());
    });

    let on_canplay = move |_| {
        controller.with_value(|c| c.on_data_ready(now_ms()));
    };

    let on_timeupdate = move |_| {
        if !single_clip {
            return;
        }
        if let Some(video) = video_ref.get_untracked() {
            let t = video.current_time();
            controller.with_value(|c| {
                c.on_video_time(t);
            });
        }
    };

    let clip_count = clips.len();
    let on_ended = move |_| {
        if clip_count > 1 {
            set_clip.update(|i| *i = (*i + 1) % clip_count);
        }
    };

    let toggle_play = move |_| {
        controller.with_value(|c| {
            c.toggle_play(now_ms());
        });
    };

    let toggle_mute = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        controller.with_value(|c| {
            c.toggle_mute();
        });
    };

    let toggle_details = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        controller.with_value(|c| {
            c.toggle_details();
        });
    };

    let toggle_favorite = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let outcome = controller.try_update_value(|c| {
            ctx.session.with_value(|session| {
                ctx.favorites.with_value(|store| c.toggle_favorite(session, store))
            })
        });
        if let Some(FavoriteOutcome::Failed(e)) = outcome {
            log::error!("[CARD {}] could not update favorites: {}", index, e);
        }
    };

    let open_assistant = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        controller.with_value(|c| c.open_assistant(&BridgeAssistant));
    };

    let backdrop = match &card.backdrop {
        Backdrop::Video(_) => {
            let clips = clips.clone();
            view! {
                <video
                    class="reel-video"
                    node_ref=video_ref
                    src=move || clips.get(clip.get()).cloned().unwrap_or_default()
                    autoplay=true
                    muted=true
                    prop:muted=true
                    playsinline=true
                    loop=single_clip
                    preload="auto"
                    on:timeupdate=on_timeupdate
                    on:ended=on_ended
                />
            }
            .into_any()
        }
        Backdrop::Gradient(gradient) => view! {
            <div class="reel-gradient" style=format!("background: {}", gradient) />
        }
        .into_any(),
    };

    let narrated = card.is_narrated();
    let like_view = likes.map(|controls| {
        let id = card.id.clone();
        let id_for_click = id.clone();
        let initial = match card.origin {
            CardOrigin::Feed { likes, liked } => (likes, liked),
            _ => (0, false),
        };
        let state = Signal::derive(move || {
            controls
                .lookup
                .with(|map| map.get(&id).map(|s| (s.likes, s.liked)))
                .unwrap_or(initial)
        });
        view! {
            <button
                class=move || if state.get().1 { "reel-btn like liked" } else { "reel-btn like" }
                on:click=move |ev: web_sys::MouseEvent| {
                    ev.stop_propagation();
                    controls.on_toggle.run(id_for_click.clone());
                }
            >
                "♥ " {move || state.get().0}
            </button>
        }
    });

    let recipe = card.recipe.clone();
    let ingredients = card.ingredients.clone();

    view! {
        <section class="reel-card" data-index=index.to_string() on:click=toggle_play>
            {backdrop}
            <audio node_ref=audio_ref preload="auto" on:canplay=on_canplay />

            <div class="reel-overlay">
                <p class="reel-hook">{card.caption.hook.clone()}</p>
                <h2 class="reel-title">{card.recipe.title.clone()}</h2>
                <p class="reel-meta">
                    {format!("{} min · {}", card.recipe.time_minutes, card.recipe.difficulty)}
                </p>
                <p class="reel-caption">{card.caption.caption.clone()}</p>
            </div>

            <div class="reel-controls">
                <button
                    class=move || if status.get().favorited { "reel-btn favorite on" } else { "reel-btn favorite" }
                    on:click=toggle_favorite
                >
                    {move || if status.get().favorited { "★" } else { "☆" }}
                </button>
                {like_view}
                <Show when=move || narrated>
                    <button class="reel-btn mute" on:click=toggle_mute>
                        {move || if status.get().muted { "🔇" } else { "🔊" }}
                    </button>
                </Show>
                <button class="reel-btn details" on:click=toggle_details>"Recipe"</button>
                <button class="reel-btn assistant" on:click=open_assistant>"Ask"</button>
            </div>

            <Show when=move || narrated && !status.get().playing && status.get().phase.is_some() && active.get() == Some(index)>
                <div class="reel-paused">"▶"</div>
            </Show>

            <Show when=move || status.get().details_open>
                <DetailPanel
                    recipe=recipe.clone()
                    ingredients=ingredients.clone()
                    on_close=Callback::new(move |_| {
                        controller.with_value(|c| {
                            c.toggle_details();
                        });
                    })
                />
            </Show>
        </section>
    }
}
