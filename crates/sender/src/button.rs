use reqwest::Url;
use teloxide::types::{InlineKeyboardButton, KeyboardButton};

use crate::{payload::MAX_PAYLOAD_LEN, ButtonError, SEP};

pub const BACK_BUTTON_TEXT: &str = "Назад";
pub const BACK_BUTTON_CALLBACK: &str = "back";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardKind {
    Inline,
    Reply,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Callback(String),
    Link(String),
}

/// Ready to send keyboard button
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Inline(InlineKeyboardButton),
    Reply(KeyboardButton),
}

impl Control {
    pub fn kind(&self) -> KeyboardKind {
        match self {
            Self::Inline(_) => KeyboardKind::Inline,
            Self::Reply(_) => KeyboardKind::Reply,
        }
    }
    pub fn text(&self) -> &str {
        match self {
            Self::Inline(b) => &b.text,
            Self::Reply(b) => &b.text,
        }
    }
}

impl From<InlineKeyboardButton> for Control {
    fn from(value: InlineKeyboardButton) -> Self {
        Self::Inline(value)
    }
}

impl From<KeyboardButton> for Control {
    fn from(value: KeyboardButton) -> Self {
        Self::Reply(value)
    }
}

/// Declarative button, turns into one [`Control`] with [`Button::create`],
/// or into many with [`Button::expand`]
///
/// ```
/// # use sender::{Button, Control, KeyboardConfig};
/// let button = Button::inline("Item").callback("item").expandable();
/// let config = KeyboardConfig::builder()
///     .data(vec!["a".to_string(), "b".to_string()])
///     .in_text(true)
///     .in_callback(true)
///     .build();
///
/// let controls = button.expand(&config).unwrap();
/// assert_eq!(controls.len(), 2);
/// assert_eq!(controls[0].text(), "Item - a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    kind: KeyboardKind,
    text: String,
    action: Option<Action>,
    expandable: bool,
    prefix: Option<String>,
    postfix: Option<String>,
}

impl Button {
    fn new(kind: KeyboardKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            action: None,
            expandable: false,
            prefix: None,
            postfix: None,
        }
    }
    pub fn inline(text: impl Into<String>) -> Self {
        Self::new(KeyboardKind::Inline, text)
    }
    pub fn reply(text: impl Into<String>) -> Self {
        Self::new(KeyboardKind::Reply, text)
    }
    pub fn callback(mut self, data: impl Into<String>) -> Self {
        self.action = Some(Action::Callback(data.into()));
        self
    }
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.action = Some(Action::Link(url.into()));
        self
    }
    /// Allow expanding this button over [`KeyboardConfig`] data
    pub fn expandable(mut self) -> Self {
        self.expandable = true;
        self
    }
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
    pub fn postfix(mut self, postfix: impl Into<String>) -> Self {
        self.postfix = Some(postfix.into());
        self
    }
    pub fn kind(&self) -> KeyboardKind {
        self.kind
    }
    pub fn is_expandable(&self) -> bool {
        self.expandable
    }
    /// Text with prefix and postfix, separated by spaces
    pub fn label(&self) -> String {
        [self.prefix.as_deref(), Some(self.text.as_str()), self.postfix.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
    pub fn create(&self) -> Result<Control, ButtonError> {
        make_control(self.kind, self.label(), self.action.as_ref())
    }
    /// Make one control per data item, plus back button if requested. With
    /// empty data only back button is returned
    pub fn expand(&self, config: &KeyboardConfig) -> Result<Vec<Control>, ButtonError> {
        let back = || {
            make_control(
                self.kind,
                config.back_button_text.clone(),
                Some(&Action::Callback(config.back_button_callback.clone())),
            )
        };

        if config.data.is_empty() {
            return Ok(vec![back()?]);
        }
        if !self.expandable {
            return Err(ButtonError::NotExpandable(self.text.clone()));
        }

        let label = self.label();
        let mut controls = Vec::with_capacity(config.data.len() + 1);
        for item in &config.data {
            let text = match (config.in_text, config.start) {
                (false, _) => label.clone(),
                (true, true) => format!("{item} {} {label}", config.sep),
                (true, false) => format!("{label} {} {item}", config.sep),
            };
            let action = if config.in_callback {
                match &self.action {
                    Some(Action::Callback(base)) => Some(Action::Callback(format!("{base}{SEP}{item}"))),
                    _ => return Err(ButtonError::MissingCallback(self.text.clone())),
                }
            } else {
                self.action.clone()
            };
            controls.push(make_control(self.kind, text, action.as_ref())?);
        }
        if config.include_back_button {
            controls.push(back()?);
        }

        Ok(controls)
    }
}

fn make_control(kind: KeyboardKind, text: String, action: Option<&Action>) -> Result<Control, ButtonError> {
    if kind == KeyboardKind::Reply {
        if action.is_some() {
            log::debug!("reply button {text:?} can't carry action, ignoring it");
        }
        return Ok(Control::Reply(KeyboardButton::new(text)));
    }

    let button = match action {
        None => return Err(ButtonError::MissingAction(text)),
        Some(Action::Callback(data)) => {
            check_callback(data)?;
            InlineKeyboardButton::callback(text, data)
        }
        Some(Action::Link(url)) => InlineKeyboardButton::url(text, parse_link(url)?),
    };
    Ok(Control::Inline(button))
}

fn check_callback(data: &str) -> Result<(), ButtonError> {
    if data.len() > MAX_PAYLOAD_LEN {
        return Err(ButtonError::CallbackTooLong {
            data: data.to_owned(),
            len: data.len(),
            max: MAX_PAYLOAD_LEN,
        });
    }
    Ok(())
}

fn parse_link(url: &str) -> Result<Url, ButtonError> {
    if !url.starts_with("https://") {
        return Err(ButtonError::InsecureUrl(url.to_owned()));
    }
    Url::parse(url).map_err(|e| ButtonError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })
}

/// How to expand buttons and lay out the keyboard
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct KeyboardConfig {
    /// Items to expand over
    #[builder(default)]
    data: Vec<String>,
    /// Put item into button text
    #[builder(default)]
    in_text: bool,
    /// Append item to callback data, as `{callback}:{item}`
    #[builder(default)]
    in_callback: bool,
    /// Put item before button text instead of after
    #[builder(default)]
    start: bool,
    #[builder(into, default = "-".to_string())]
    sep: String,
    #[builder(default)]
    include_back_button: bool,
    #[builder(into, default = BACK_BUTTON_TEXT.to_string())]
    back_button_text: String,
    #[builder(into, default = BACK_BUTTON_CALLBACK.to_string())]
    back_button_callback: String,
    /// Row sizes for expanded buttons
    #[builder(default = vec![1])]
    sizes: Vec<usize>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl KeyboardConfig {
    pub fn data(&self) -> &[String] {
        &self.data
    }
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }
}
