//! Spin & Decide UI using Yew.
//! Wires the stage, the frame driver, option editing and the history list.

use gloo_timers::callback::Timeout;
use log::{info, warn};
use spin_decide::config::{
    DEFAULT_DICE, DEFAULT_DIGITS, DEFAULT_OPTIONS, DEFAULT_TEMPLATE_TITLE, DEFAULT_THEME,
    DRIVER_FRAME_MS, MAX_DICE, MAX_DIGITS, MIN_DICE, MIN_DIGITS,
};
use spin_decide::feedback::VisualizerKind;
use spin_decide::history;
use spin_decide::stage::Stages;
use spin_decide::theme::THEMES;
use spin_decide::utils::{options_to_text, parse_options, validate_dice_count, validate_digit_count};
use spin_decide::TemplateOptionSet;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

mod audio;
mod components;
mod hooks;

use audio::BrowserFeedback;
use components::{
    CoinView, DiceView, DomExtentProbe, GridView, HistoryList, NumberView, PulseView, ResultBanner,
    RollerView, WheelView,
};
use hooks::{commit_on_enter, use_validated_input};

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

fn default_option_set() -> TemplateOptionSet {
    TemplateOptionSet::new(DEFAULT_OPTIONS, Some(DEFAULT_THEME))
        .expect("built-in options are valid")
}

/// High-resolution page clock in milliseconds.
fn frame_now() -> f64 {
    gloo_utils::window()
        .performance()
        .map(|perf| perf.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Advance `kind` on a chain of timeouts until its spin has finished,
/// re-rendering after every frame.
fn drive_frames(
    stages: Rc<RefCell<Stages>>,
    kind: VisualizerKind,
    redraw: UseForceUpdateHandle,
    last_ms: f64,
) {
    Timeout::new(DRIVER_FRAME_MS, move || {
        let now = frame_now();
        let still_active = {
            let mut stages = stages.borrow_mut();
            stages.advance(kind, now - last_ms, &mut rand::rng(), &mut BrowserFeedback);
            stages.is_active(kind)
        };
        redraw.force_update();
        if still_active {
            drive_frames(stages, kind, redraw, now);
        }
    })
    .forget();
}

/// Helper to bump a version counter and trigger a re-render
fn bump_version(version: &UseStateHandle<usize>) {
    version.set(version.wrapping_add(1));
}

// ──────────────────────────────────────────────────────────────────────────────

#[function_component(App)]
fn app() -> Html {
    let redraw = use_force_update();
    let viewport_ref = use_node_ref();
    let item_ref = use_node_ref();
    let stages = {
        let probe = DomExtentProbe {
            viewport: viewport_ref.clone(),
            item: item_ref.clone(),
        };
        use_mut_ref(move || Stages::new(default_option_set(), Box::new(probe)))
    };

    let kind = use_state(|| VisualizerKind::Wheel);
    let title = use_state(|| DEFAULT_TEMPLATE_TITLE.to_string());
    let options_text = use_state(|| options_to_text(&default_option_set()));
    let options_error = use_state(|| None::<String>);
    let result = use_state(|| None::<String>);
    // Entry the result banner annotates
    let last_entry = use_state(|| None::<u64>);
    // Bumped whenever the thread-local history changes
    let history_version = use_state(|| 0usize);

    let dice = use_validated_input(DEFAULT_DICE, validate_dice_count);
    let digits = use_validated_input(DEFAULT_DIGITS, validate_digit_count);

    // Push committed counts into the stage
    {
        let stages = stages.clone();
        let redraw = redraw.clone();
        use_effect_with(dice.value, move |&count| {
            if let Err(e) = stages.borrow_mut().set_dice_count(count) {
                warn!("{}", e);
            }
            redraw.force_update();
            || ()
        });
    }
    {
        let stages = stages.clone();
        let redraw = redraw.clone();
        use_effect_with(digits.value, move |&count| {
            if let Err(e) = stages.borrow_mut().set_digit_count(count) {
                warn!("{}", e);
            }
            redraw.force_update();
            || ()
        });
    }

    let on_options_input = {
        let options_text = options_text.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            options_text.set(area.value());
        })
    };

    let apply_options = {
        let stages = stages.clone();
        let options_text = options_text.clone();
        let options_error = options_error.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: Event| {
            let theme = stages.borrow().options().color_theme().map(str::to_string);
            match parse_options(&options_text, theme.as_deref()) {
                Ok(set) => {
                    if stages.borrow_mut().set_options(set) {
                        options_error.set(None);
                        redraw.force_update();
                    }
                }
                Err(e) => options_error.set(Some(e.to_string())),
            }
        })
    };

    let on_title_input = {
        let title = title.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            title.set(input.value());
        })
    };

    let on_theme_change = {
        let stages = stages.clone();
        let redraw = redraw.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let theme_id = select.value();
            let themed = {
                let stages = stages.borrow();
                TemplateOptionSet::new(stages.options().options(), Some(theme_id.as_str()))
            };
            match themed {
                Ok(set) => {
                    stages.borrow_mut().set_options(set);
                    redraw.force_update();
                }
                Err(e) => warn!("Theme change rejected: {}", e),
            }
        })
    };

    let on_spin = {
        let stages = stages.clone();
        let kind = kind.clone();
        let title = title.clone();
        let result = result.clone();
        let last_entry = last_entry.clone();
        let options_error = options_error.clone();
        let history_version = history_version.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            audio::resume_audio();
            let kind = *kind;
            let spun = stages
                .borrow_mut()
                .spin(kind, &mut rand::rng(), &mut BrowserFeedback);
            match spun {
                Ok(Some(ticket)) => {
                    result.set(None);
                    let label = if kind.uses_options() {
                        (*title).clone()
                    } else {
                        kind.title().to_string()
                    };
                    let result = result.clone();
                    let last_entry = last_entry.clone();
                    let history_version = history_version.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        if let Some(outcome) = ticket.await {
                            let entry = history::record(&outcome, kind, &label);
                            last_entry.set(Some(entry.id));
                            result.set(Some(outcome.value));
                            bump_version(&history_version);
                        }
                    });
                    drive_frames(stages.clone(), kind, redraw.clone(), frame_now());
                }
                Ok(None) => info!("Spin request ignored while another spin runs"),
                Err(e) => options_error.set(Some(e.to_string())),
            }
            redraw.force_update();
        })
    };

    let on_clear_history = {
        let last_entry = last_entry.clone();
        let history_version = history_version.clone();
        Callback::from(move |_: ()| {
            history::clear();
            last_entry.set(None);
            bump_version(&history_version);
        })
    };

    let on_save_note = {
        let last_entry = last_entry.clone();
        let history_version = history_version.clone();
        Callback::from(move |note: String| {
            let Some(id) = *last_entry else {
                return;
            };
            match history::annotate(id, &note) {
                Some(_) => bump_version(&history_version),
                None => warn!("History entry {} is gone; note dropped", id),
            }
        })
    };

    let stage = stages.borrow();
    let spinning = stage.any_active();
    let current = *kind;
    let options = stage.options().clone();
    let active_theme = options.theme().id;

    let visualizer = match current {
        VisualizerKind::Wheel => html! {
            <WheelView options={options.clone()} rotation={stage.wheel().rotation()} />
        },
        VisualizerKind::DigitalRoller => {
            let roller = stage.roller();
            let labels: Vec<String> = (0..roller.slot_count())
                .map(|slot| roller.slot_label(slot).to_string())
                .collect();
            html! {
                <RollerView
                    labels={labels}
                    offset={roller.offset()}
                    viewport_ref={viewport_ref.clone()}
                    item_ref={item_ref.clone()}
                />
            }
        }
        VisualizerKind::Grid => html! {
            <GridView options={options.clone()} active={stage.grid().active_index()} />
        },
        VisualizerKind::Pulse => html! {
            <PulseView
                label={stage.pulse().shown_label().to_string()}
                highlight={stage.pulse().is_highlighted()}
                accent={options.theme().accent()}
            />
        },
        VisualizerKind::Dice => html! {
            <DiceView faces={stage.dice().faces().to_vec()} rolling={stage.dice().is_rolling()} />
        },
        VisualizerKind::Coin => html! {
            <CoinView
                rotation={stage.coin().rotation()}
                heads_label={stage.coin().heads_label().to_string()}
                tails_label={stage.coin().tails_label().to_string()}
            />
        },
        VisualizerKind::Number => html! {
            <NumberView digits={stage.number().digits().to_vec()} shuffling={stage.number().is_shuffling()} />
        },
    };

    let history_entries = history::entries();
    let shown_note = (*last_entry)
        .and_then(|id| history_entries.iter().find(|entry| entry.id == id))
        .and_then(|entry| entry.note.clone());
    let history_count = history::len();
    let history_json = history::export_json().unwrap_or_else(|e| {
        warn!("History export failed: {}", e);
        String::from("[]")
    });

    html! {
        <div class="container">
            <h1>{ "Spin & Decide" }</h1>

            <div class="visualizer-picker">
                { VisualizerKind::ALL.into_iter().map(|k| {
                    let kind = kind.clone();
                    html! {
                        <button
                            key={k.as_str()}
                            class={classes!("picker-button", (k == current).then_some("selected"))}
                            disabled={spinning}
                            onclick={Callback::from(move |_: MouseEvent| kind.set(k))}
                        >
                            { k.title() }
                        </button>
                    }
                }).collect::<Html>() }
            </div>

            if current.uses_options() {
                <div class="template-controls">
                    <div class="form-group">
                        <label for="template_title">{ "Title:" }</label>
                        <input
                            type="text"
                            id="template_title"
                            value={(*title).clone()}
                            oninput={on_title_input}
                        />
                    </div>
                    <div class="form-group">
                        <label for="options_text">{ "Options (one per line or comma separated):" }</label>
                        <textarea
                            id="options_text"
                            rows="6"
                            value={(*options_text).clone()}
                            class={if options_error.is_some() { "invalid" } else { "" }}
                            disabled={spinning}
                            oninput={on_options_input}
                            onchange={apply_options}
                        />
                        if let Some(err) = (*options_error).clone() {
                            <div class="error-message">{ err }</div>
                        }
                    </div>
                    <div class="form-group">
                        <label for="theme_select">{ "Theme:" }</label>
                        <select id="theme_select" disabled={spinning} onchange={on_theme_change}>
                            { THEMES.iter().map(|theme| html! {
                                <option
                                    key={theme.id}
                                    value={theme.id}
                                    selected={theme.id == active_theme}
                                >
                                    { theme.name }
                                </option>
                            }).collect::<Html>() }
                        </select>
                    </div>
                </div>
            }

            if current == VisualizerKind::Dice {
                <div class="form-group">
                    <label for="dice_count">{ "Dice:" }</label>
                    <input
                        type="number"
                        id="dice_count"
                        min={MIN_DICE.to_string()}
                        max={MAX_DICE.to_string()}
                        value={dice.text.clone()}
                        class={if dice.error.is_some() { "invalid" } else { "" }}
                        disabled={spinning}
                        oninput={dice.on_input.clone()}
                        onchange={dice.on_commit.reform(|_: Event| ())}
                        onkeydown={commit_on_enter(dice.on_commit.clone())}
                    />
                    if let Some(err) = dice.error.clone() {
                        <div class="error-message">{ err }</div>
                    }
                </div>
            }

            if current == VisualizerKind::Number {
                <div class="form-group">
                    <label for="digit_count">{ "Digits:" }</label>
                    <input
                        type="number"
                        id="digit_count"
                        min={MIN_DIGITS.to_string()}
                        max={MAX_DIGITS.to_string()}
                        value={digits.text.clone()}
                        class={if digits.error.is_some() { "invalid" } else { "" }}
                        disabled={spinning}
                        oninput={digits.on_input.clone()}
                        onchange={digits.on_commit.reform(|_: Event| ())}
                        onkeydown={commit_on_enter(digits.on_commit.clone())}
                    />
                    if let Some(err) = digits.error.clone() {
                        <div class="error-message">{ err }</div>
                    }
                </div>
            }

            <div class="stage">
                { visualizer }
            </div>

            <button class="spin-button" disabled={spinning} onclick={on_spin}>
                { if spinning { "Spinning…" } else { "Spin" } }
            </button>

            <ResultBanner
                key={(*last_entry).map(|id| id.to_string()).unwrap_or_default()}
                value={(*result).clone()}
                spinning={spinning}
                note={shown_note}
                on_save_note={on_save_note}
            />

            <HistoryList entries={history_entries} on_clear={on_clear_history} />
            <details class="history-export">
                <summary>{ format!("Export history ({} entries, JSON)", history_count) }</summary>
                <pre>{ history_json }</pre>
            </details>
        </div>
    }
}

/// Entry point: installs the panic hook and mounts the app.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
