use std::{fmt::Display, str::FromStr};

/// Max size of callback data accepted by telegram, in bytes
pub const MAX_PAYLOAD_LEN: usize = 64;

pub const SEP: char = ':';

pub trait PayloadData {
    type Error;

    fn to_payload(&self) -> String;
    fn try_from_payload(payload: &str) -> Result<Self, Self::Error>
    where
        Self: Sized;
}

/// Callback payload in form `{prefix}:{value}`, value is optional
///
/// Prefix can't contain separator, value can. Length is checked when a
/// button with the payload is created
///
/// ```
/// # use sender::{CallbackPayload, PayloadData};
/// let payload = CallbackPayload::new("item").with_value("a:b");
///
/// let s = payload.to_payload();
/// assert_eq!(s, "item:a:b");
///
/// assert_eq!(CallbackPayload::parse(&s).unwrap(), payload);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackPayload {
    prefix: String,
    value: Option<String>,
}

impl CallbackPayload {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            value: None,
        }
    }
    pub fn with_value(mut self, value: impl Display) -> Self {
        self.value = Some(value.to_string());
        self
    }
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
    pub fn value_as<T: FromStr>(&self) -> Option<T> {
        self.value.as_deref().and_then(|v| v.parse().ok())
    }
    pub fn parse(payload: &str) -> Result<Self, PayloadParseError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(PayloadParseError::TooLong(payload.len()));
        }

        let (prefix, value) = match payload.split_once(SEP) {
            Some((prefix, value)) => (prefix, Some(value.to_owned())),
            None => (payload, None),
        };
        if prefix.is_empty() {
            return Err(PayloadParseError::EmptyPrefix);
        }
        Ok(Self {
            prefix: prefix.to_owned(),
            value,
        })
    }
}

impl PayloadData for CallbackPayload {
    type Error = PayloadParseError;

    fn to_payload(&self) -> String {
        match &self.value {
            Some(value) => format!("{}{SEP}{value}", self.prefix),
            None => self.prefix.clone(),
        }
    }

    fn try_from_payload(payload: &str) -> Result<Self, Self::Error> {
        Self::parse(payload)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PayloadParseError {
    #[error("payload prefix is empty")]
    EmptyPrefix,
    #[error("payload is {0} bytes long, it doesn't fit into callback data")]
    TooLong(usize),
}
