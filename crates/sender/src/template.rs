use std::{collections::HashMap, fmt::Display};

use crate::RenderError;

/// Named values for window template placeholders
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params(HashMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        self.0.insert(key.into(), value.to_string());
        self
    }
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// Build [`Params`] from `key => value` pairs
///
/// ```
/// # use sender::{params, Params};
/// let p = params! { "name" => "Bob", "balance" => 10 };
/// assert_eq!(p.get("balance"), Some("10"));
/// assert_eq!(params! {}, Params::new());
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $(params.insert($key, $value);)+
        params
    }};
}

/// Substitute `{name}` placeholders in `template`. Use `{{` and `}}` for
/// literal braces. Every placeholder should have a value
pub fn render(template: &str, params: &Params) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '{' if chars.next_if(|&(_, c)| c == '{').is_some() => out.push('{'),
            '}' if chars.next_if(|&(_, c)| c == '}').is_some() => out.push('}'),
            '}' => return Err(RenderError::UnmatchedClose(i)),
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) | None => return Err(RenderError::Unclosed(i)),
                        Some((_, c)) => name.push(c),
                    }
                }

                let name = name.trim();
                if name.is_empty() {
                    return Err(RenderError::Positional(i));
                }
                let value = params
                    .get(name)
                    .ok_or_else(|| RenderError::MissingParam(name.to_owned()))?;
                out.push_str(value);
            }
            c => out.push(c),
        }
    }

    Ok(out)
}
