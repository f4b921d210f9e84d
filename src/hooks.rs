use web_sys::HtmlInputElement;
use yew::prelude::*;

/// State and callbacks for a numeric text field that only commits values
/// passing its validator.
#[derive(Clone)]
pub struct ValidatedInput<T: Clone + PartialEq + 'static> {
    /// Raw text as typed.
    pub text: String,
    /// Last committed value.
    pub value: T,
    pub error: Option<String>,
    /// Wire to `oninput`.
    pub on_input: Callback<InputEvent>,
    /// Wire to `onchange` or Enter; validates `text` and commits on success.
    pub on_commit: Callback<()>,
}

#[hook]
pub fn use_validated_input<T>(
    initial: T,
    validate: fn(&str) -> Result<T, String>,
) -> ValidatedInput<T>
where
    T: Clone + PartialEq + std::fmt::Display + 'static,
{
    let value = use_state(|| initial.clone());
    let text = use_state(|| initial.to_string());
    let error = use_state(|| None::<String>);

    let on_input = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text.set(input.value());
        })
    };

    let on_commit = {
        let value = value.clone();
        let text = text.clone();
        let error = error.clone();
        Callback::from(move |_| match validate(&text) {
            Ok(parsed) => {
                // Normalize " 3 " to "3"
                text.set(parsed.to_string());
                value.set(parsed);
                error.set(None);
            }
            Err(message) => error.set(Some(message)),
        })
    };

    ValidatedInput {
        text: (*text).clone(),
        value: (*value).clone(),
        error: (*error).clone(),
        on_input,
        on_commit,
    }
}

/// Enter-key handler that fires `on_commit`.
pub fn commit_on_enter(on_commit: Callback<()>) -> Callback<KeyboardEvent> {
    Callback::from(move |e: KeyboardEvent| {
        if e.key() == "Enter" {
            on_commit.emit(());
        }
    })
}
