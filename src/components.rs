//! Yew views for the randomizers, the result banner and the history list.
//!
//! Views only render state owned by `Stages`; none of them decide anything.

use spin_decide::config::{
    COIN_FLIP_MS, TRACK_FALLBACK_ITEM_PX, TRACK_FALLBACK_VIEWPORT_PX, WHEEL_LABEL_MAX_CHARS,
};
use spin_decide::history::HistoryEntry;
use spin_decide::track::ExtentProbe;
use spin_decide::utils::truncate_label;
use spin_decide::visualizers::coin_shows_heads;
use spin_decide::TemplateOptionSet;
use web_sys::{Element, HtmlTextAreaElement};
use yew::prelude::*;

/// Live roller measurements read from the rendered DOM. Falls back to the
/// stylesheet sizes before the first layout.
#[derive(Clone, Default)]
pub struct DomExtentProbe {
    pub viewport: NodeRef,
    pub item: NodeRef,
}

fn measured_height(node: &NodeRef, fallback: f64) -> f64 {
    node.cast::<Element>()
        .map(|el| el.client_height() as f64)
        .filter(|&height| height > 0.0)
        .unwrap_or(fallback)
}

impl ExtentProbe for DomExtentProbe {
    fn item_extent(&self) -> f64 {
        measured_height(&self.item, TRACK_FALLBACK_ITEM_PX)
    }

    fn viewport_extent(&self) -> f64 {
        measured_height(&self.viewport, TRACK_FALLBACK_VIEWPORT_PX)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Wheel

const WHEEL_RADIUS: f64 = 150.0;

fn polar(angle_deg: f64, radius: f64) -> (f64, f64) {
    // 0° is the pointer at the top, angles grow clockwise
    let rad = (angle_deg - 90.0).to_radians();
    (radius * rad.cos(), radius * rad.sin())
}

fn segment_path(start_deg: f64, end_deg: f64) -> String {
    let (x0, y0) = polar(start_deg, WHEEL_RADIUS);
    let (x1, y1) = polar(end_deg, WHEEL_RADIUS);
    let large_arc = if end_deg - start_deg > 180.0 { 1 } else { 0 };
    format!(
        "M 0 0 L {:.3} {:.3} A {r} {r} 0 {} 1 {:.3} {:.3} Z",
        x0,
        y0,
        large_arc,
        x1,
        y1,
        r = WHEEL_RADIUS
    )
}

#[derive(Properties, PartialEq)]
pub struct WheelViewProps {
    pub options: TemplateOptionSet,
    pub rotation: f64,
}

#[function_component(WheelView)]
pub fn wheel_view(props: &WheelViewProps) -> Html {
    let n = props.options.len().max(1);
    let angle = 360.0 / n as f64;
    let theme = props.options.theme();

    let segments = props
        .options
        .options()
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let start = i as f64 * angle;
            let middle = start + angle / 2.0;
            let (tx, ty) = polar(middle, WHEEL_RADIUS * 0.65);
            html! {
                <g key={i}>
                    <path d={segment_path(start, start + angle)} fill={theme.segment_color(i)} />
                    <text
                        x={format!("{:.2}", tx)}
                        y={format!("{:.2}", ty)}
                        transform={format!("rotate({:.2} {:.2} {:.2})", middle, tx, ty)}
                        text-anchor="middle"
                        dominant-baseline="middle"
                        class="wheel-label"
                    >
                        { truncate_label(label, WHEEL_LABEL_MAX_CHARS) }
                    </text>
                </g>
            }
        })
        .collect::<Html>();

    html! {
        <div class="wheel-container">
            <div class="wheel-pointer"></div>
            <svg class="wheel" viewBox="-160 -160 320 320">
                <g style={format!("transform: rotate({:.3}deg)", props.rotation)}>
                    { segments }
                </g>
            </svg>
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Roller

#[derive(Properties, PartialEq)]
pub struct RollerViewProps {
    pub labels: Vec<String>,
    pub offset: f64,
    pub viewport_ref: NodeRef,
    pub item_ref: NodeRef,
}

#[function_component(RollerView)]
pub fn roller_view(props: &RollerViewProps) -> Html {
    html! {
        <div class="roller-viewport" ref={props.viewport_ref.clone()}>
            <div class="roller-marker"></div>
            <div class="roller-track" style={format!("transform: translateY({:.3}px)", -props.offset)}>
                { props.labels.iter().enumerate().map(|(slot, label)| {
                    // The first slot doubles as the measuring stick
                    let node = if slot == 0 { props.item_ref.clone() } else { NodeRef::default() };
                    html! { <div class="roller-item" key={slot} ref={node}>{ label.clone() }</div> }
                }).collect::<Html>() }
            </div>
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Grid and pulse

#[derive(Properties, PartialEq)]
pub struct GridViewProps {
    pub options: TemplateOptionSet,
    pub active: Option<usize>,
}

#[function_component(GridView)]
pub fn grid_view(props: &GridViewProps) -> Html {
    let accent = props.options.theme().accent();
    html! {
        <div class="grid-board">
            { props.options.options().iter().enumerate().map(|(i, label)| {
                let active = props.active == Some(i);
                let style = if active { format!("background: {}", accent) } else { String::new() };
                html! {
                    <div key={i} class={classes!("grid-tile", active.then_some("active"))} style={style}>
                        { label.clone() }
                    </div>
                }
            }).collect::<Html>() }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PulseViewProps {
    pub label: String,
    pub highlight: bool,
    pub accent: &'static str,
}

#[function_component(PulseView)]
pub fn pulse_view(props: &PulseViewProps) -> Html {
    let style = if props.highlight {
        format!("border-color: {}", props.accent)
    } else {
        String::new()
    };
    html! {
        <div class={classes!("pulse-display", props.highlight.then_some("winner"))} style={style}>
            { props.label.clone() }
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Dice, coin, number

fn die_glyph(face: u8) -> char {
    match face {
        1 => '⚀',
        2 => '⚁',
        3 => '⚂',
        4 => '⚃',
        5 => '⚄',
        _ => '⚅',
    }
}

#[derive(Properties, PartialEq)]
pub struct DiceViewProps {
    pub faces: Vec<u8>,
    pub rolling: bool,
}

#[function_component(DiceView)]
pub fn dice_view(props: &DiceViewProps) -> Html {
    html! {
        <div class={classes!("dice-tray", props.rolling.then_some("rolling"))}>
            { props.faces.iter().enumerate().map(|(i, &face)| html! {
                <span key={i} class="die">{ die_glyph(face).to_string() }</span>
            }).collect::<Html>() }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct CoinViewProps {
    pub rotation: f64,
    pub heads_label: String,
    pub tails_label: String,
}

#[function_component(CoinView)]
pub fn coin_view(props: &CoinViewProps) -> Html {
    let style = format!(
        "transform: rotateY({:.1}deg); transition: transform {}ms cubic-bezier(0.2, 0.8, 0.3, 1)",
        props.rotation, COIN_FLIP_MS
    );
    let facing = if coin_shows_heads(props.rotation) {
        "heads"
    } else {
        "tails"
    };
    html! {
        <div class="coin-stage" data-facing={facing}>
            <div class="coin" style={style}>
                <div class="coin-face heads">{ props.heads_label.clone() }</div>
                <div class="coin-face tails">{ props.tails_label.clone() }</div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct NumberViewProps {
    pub digits: Vec<u8>,
    pub shuffling: bool,
}

#[function_component(NumberView)]
pub fn number_view(props: &NumberViewProps) -> Html {
    html! {
        <div class={classes!("digit-row", props.shuffling.then_some("shuffling"))}>
            { props.digits.iter().enumerate().map(|(i, digit)| html! {
                <span key={i} class="digit">{ digit.to_string() }</span>
            }).collect::<Html>() }
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Result and history

#[derive(Properties, PartialEq)]
pub struct ResultBannerProps {
    pub value: Option<String>,
    pub spinning: bool,
    /// Note stored for the shown outcome.
    #[prop_or_default]
    pub note: Option<String>,
    pub on_save_note: Callback<String>,
}

#[function_component(ResultBanner)]
pub fn result_banner(props: &ResultBannerProps) -> Html {
    let note_ref = use_node_ref();
    let on_save = {
        let note_ref = note_ref.clone();
        let on_save_note = props.on_save_note.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(area) = note_ref.cast::<HtmlTextAreaElement>() {
                on_save_note.emit(area.value());
            }
        })
    };

    match (&props.value, props.spinning) {
        (_, true) => html! { <div class="result-banner pending">{ "…" }</div> },
        (Some(value), false) => html! {
            <div class="result-banner">
                <span class="result-caption">{ "Result" }</span>
                <span class="result-value">{ value.clone() }</span>
                <div class="result-note">
                    <textarea
                        ref={note_ref}
                        rows="2"
                        placeholder="Add a note about this result…"
                        value={props.note.clone().unwrap_or_default()}
                    />
                    <button class="note-save" onclick={on_save}>{ "Save note" }</button>
                </div>
            </div>
        },
        (None, false) => html! {},
    }
}

#[derive(Properties, PartialEq)]
pub struct HistoryListProps {
    pub entries: Vec<HistoryEntry>,
    pub on_clear: Callback<()>,
}

#[function_component(HistoryList)]
pub fn history_list(props: &HistoryListProps) -> Html {
    if props.entries.is_empty() {
        return html! {
            <div class="history">
                <p class="no-history-message">{ "No spins yet" }</p>
            </div>
        };
    }

    let on_clear = props.on_clear.reform(|_: MouseEvent| ());
    html! {
        <div class="history">
            <div class="history-header">
                <h3>{ "History" }</h3>
                <button class="history-clear" onclick={on_clear}>{ "Clear" }</button>
            </div>
            <ul class="history-list">
                { props.entries.iter().map(|entry| {
                    let when = js_sys::Date::new(&entry.timestamp.into());
                    html! {
                        <li key={entry.id}>
                            <span class="history-value">{ entry.value.clone() }</span>
                            if let Some(note) = entry.note.clone() {
                                <span class="history-note">{ note }</span>
                            }
                            <span class="history-meta">
                                { format!("{} · {} · {}",
                                    entry.visualizer,
                                    entry.template_title,
                                    String::from(when.to_locale_time_string("default"))) }
                            </span>
                        </li>
                    }
                }).collect::<Html>() }
            </ul>
        </div>
    }
}
