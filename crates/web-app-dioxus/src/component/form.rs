use chrono::NaiveDate;
use dioxus::prelude::*;

use effort_domain as domain;

#[component]
pub fn InputField(
    label: Option<String>,
    help: Option<String>,
    left_icon: Option<Element>,
    r#type: Option<String>,
    inputmode: Option<String>,
    autocomplete: Option<String>,
    placeholder: Option<String>,
    value: String,
    error: Option<String>,
    is_disabled: Option<bool>,
    oninput: EventHandler<FormEvent>,
) -> Element {
    let error = error.and_then(|error| if error.is_empty() { None } else { Some(error) });
    let has_error = error.is_some();
    rsx! {
        div {
            class: "field",
            if let Some(label) = label { label { class: "label", "{label}" } }
            div {
                class: "control",
                class: if left_icon.is_some() { "has-icons-left" },
                input {
                    class: "input",
                    class: if has_error { "is-danger" },
                    disabled: if let Some(is_disabled) = is_disabled { is_disabled },
                    r#type: if let Some(r#type) = r#type { r#type } else { "text" },
                    inputmode: if let Some(inputmode) = inputmode { inputmode },
                    autocomplete: if let Some(autocomplete) = autocomplete { autocomplete },
                    placeholder: if let Some(placeholder) = placeholder { placeholder },
                    value: "{value}",
                    oninput: move |evt| oninput.call(evt),
                }
                if let Some(ref left_icon) = left_icon {
                    span {
                        class: "icon is-left",
                        {left_icon}
                    }
                }
            }
            if let Some(ref error) = error {
                p { class: "help is-danger", "{error}" }
            } else if let Some(ref help) = help {
                p { class: "help", "{help}" }
            }
        }
    }
}

#[component]
pub fn TextareaField(
    label: String,
    placeholder: Option<String>,
    value: String,
    is_disabled: bool,
    oninput: EventHandler<FormEvent>,
) -> Element {
    rsx! {
        div {
            class: "field",
            label { class: "label", "{label}" }
            div {
                class: "control",
                textarea {
                    class: "textarea",
                    rows: "2",
                    disabled: is_disabled,
                    placeholder: if let Some(placeholder) = placeholder { placeholder },
                    value: "{value}",
                    oninput: move |evt| oninput.call(evt),
                }
            }
        }
    }
}

/// A date entered as `dd/mm/aaaa`, masked while typing.
#[component]
pub fn DateField(label: String, mut value: Signal<FieldValue<NaiveDate>>) -> Element {
    rsx! {
        InputField {
            label,
            left_icon: rsx! { i { class: "fas fa-calendar" } },
            inputmode: "numeric".to_string(),
            placeholder: "dd/mm/aaaa".to_string(),
            value: value.read().input.clone(),
            error: value.read().error(),
            oninput: move |event: FormEvent| value.write().update_date(&event.value()),
        }
    }
}

/// The raw input of a form field together with the result of its validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue<T> {
    pub input: String,
    pub validated: Result<T, String>,
    pub orig: String,
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        Self {
            input: String::new(),
            validated: Err(String::new()),
            orig: String::new(),
        }
    }
}

impl<T> FieldValue<T> {
    pub fn new<E: ToString>(input: String, validate: impl FnOnce(&str) -> Result<T, E>) -> Self {
        let validated = validate(&input).map_err(|err| err.to_string());
        Self {
            orig: input.clone(),
            input,
            validated,
        }
    }

    pub fn update<E: ToString>(
        &mut self,
        input: String,
        validate: impl FnOnce(&str) -> Result<T, E>,
    ) {
        self.validated = validate(&input).map_err(|err| err.to_string());
        self.input = input;
    }

    /// The validation error, once the field has been edited.
    pub fn error(&self) -> Option<String> {
        match &self.validated {
            Err(err) if self.changed() => Some(err.clone()),
            _ => None,
        }
    }
}

impl FieldValue<NaiveDate> {
    pub fn from_date(date: Option<NaiveDate>) -> Self {
        Self::new(date.map(domain::format_date).unwrap_or_default(), domain::parse_date)
    }

    /// Applies the date mask to the typed input. When characters were removed, a separator
    /// added by the mask is dropped again, so that it can be deleted.
    pub fn update_date(&mut self, input: &str) {
        let mut masked = domain::mask_date_input(input);
        if input.len() < self.input.len() && !input.ends_with('/') && masked.ends_with('/') {
            masked.pop();
        }
        self.update(masked, domain::parse_date);
    }
}

impl FieldValue<()> {
    pub fn all_valid(values: &[&dyn FieldValueState]) -> bool {
        values.iter().all(|v| v.valid())
    }
}

pub trait FieldValueState {
    fn valid(&self) -> bool;
    fn changed(&self) -> bool;
}

impl<T> FieldValueState for FieldValue<T> {
    fn valid(&self) -> bool {
        self.validated.is_ok()
    }

    fn changed(&self) -> bool {
        self.input.trim() != self.orig.trim()
    }
}
