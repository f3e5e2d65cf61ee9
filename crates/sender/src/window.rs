use teloxide::types::{InlineKeyboardButton, KeyboardButton, ReplyMarkup};

use crate::{render, Button, Control, KeyboardBuilder, KeyboardConfig, Params, SendError};

/// Keyboard entry of a window: declarative button or ready control
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Button(Button),
    Control(Control),
}

impl From<Button> for Entry {
    fn from(value: Button) -> Self {
        Self::Button(value)
    }
}

impl From<Control> for Entry {
    fn from(value: Control) -> Self {
        Self::Control(value)
    }
}

impl From<InlineKeyboardButton> for Entry {
    fn from(value: InlineKeyboardButton) -> Self {
        Self::Control(value.into())
    }
}

impl From<KeyboardButton> for Entry {
    fn from(value: KeyboardButton) -> Self {
        Self::Control(value.into())
    }
}

/// A screen: message template plus keyboard
pub trait Window {
    /// Text with `{name}` placeholders
    fn template(&self) -> &str;

    fn entries(&self) -> Vec<Entry> {
        Vec::new()
    }

    /// Row sizes of the keyboard
    fn sizes(&self) -> Vec<usize> {
        vec![1]
    }

    /// Produce text and keyboard. The first expandable button replaces the
    /// whole keyboard with its expansion, laid out by `config` sizes
    fn render(&self, params: &Params, config: &KeyboardConfig) -> Result<(String, Option<ReplyMarkup>), SendError> {
        let text = render(self.template(), params)?;

        let entries = self.entries();
        let expandable = entries.iter().find_map(|e| match e {
            Entry::Button(b) if b.is_expandable() => Some(b),
            _ => None,
        });
        let keyboard = if let Some(button) = expandable {
            KeyboardBuilder::with_layout(config.sizes()).controls(button.expand(config)?)
        } else {
            let mut keyboard = KeyboardBuilder::with_layout(self.sizes());
            for entry in entries {
                keyboard = match entry {
                    Entry::Button(b) => keyboard.control(b.create()?),
                    Entry::Control(c) => keyboard.control(c),
                };
            }
            keyboard
        };

        Ok((text, keyboard.build()?))
    }
}

impl Window for str {
    fn template(&self) -> &str {
        self
    }
}

impl Window for String {
    fn template(&self) -> &str {
        self
    }
}

/// Window assembled at runtime
///
/// ```
/// # use sender::{Button, DynamicWindow, KeyboardConfig, Window, params};
/// let window = DynamicWindow::new("Balance: {balance}")
///     .entry(Button::inline("Top up").callback("top_up"))
///     .entry(Button::inline("Back").callback("back"))
///     .with_sizes([2]);
///
/// let (text, markup) = window
///     .render(&params! { "balance" => 10 }, &KeyboardConfig::default())
///     .unwrap();
/// assert_eq!(text, "Balance: 10");
/// assert!(markup.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicWindow {
    template: String,
    entries: Vec<Entry>,
    sizes: Vec<usize>,
}

impl DynamicWindow {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            entries: Vec::new(),
            sizes: vec![1],
        }
    }
    pub fn entry(mut self, entry: impl Into<Entry>) -> Self {
        self.entries.push(entry.into());
        self
    }
    pub fn with_sizes(mut self, sizes: impl Into<Vec<usize>>) -> Self {
        self.sizes = sizes.into();
        self
    }
}

impl Window for DynamicWindow {
    fn template(&self) -> &str {
        &self.template
    }
    fn entries(&self) -> Vec<Entry> {
        self.entries.clone()
    }
    fn sizes(&self) -> Vec<usize> {
        self.sizes.clone()
    }
}
