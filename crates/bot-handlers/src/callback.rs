use sender::{CallbackPayload, PayloadData, PayloadParseError, BACK_BUTTON_CALLBACK};

// prefix is at the start of callback data: {prefix}:{value}
pub(crate) const BALANCE_PREFIX: &str = "balance";
pub(crate) const TOP_UP_PREFIX: &str = "top_up";
pub(crate) const TARIFFS_PREFIX: &str = "tariffs";
pub(crate) const TARIFF_PREFIX: &str = "tariff";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Callback {
    Balance,
    TopUp { amount: f64 },
    Tariffs,
    Tariff { name: String },
    Back,
}

impl PayloadData for Callback {
    type Error = CallbackParseError;

    fn to_payload(&self) -> String {
        let payload = match self {
            Self::Balance => CallbackPayload::new(BALANCE_PREFIX),
            Self::TopUp { amount } => CallbackPayload::new(TOP_UP_PREFIX).with_value(amount),
            Self::Tariffs => CallbackPayload::new(TARIFFS_PREFIX),
            Self::Tariff { name } => CallbackPayload::new(TARIFF_PREFIX).with_value(name),
            Self::Back => CallbackPayload::new(BACK_BUTTON_CALLBACK),
        };
        payload.to_payload()
    }

    fn try_from_payload(payload: &str) -> Result<Self, Self::Error> {
        let payload = CallbackPayload::parse(payload)?;
        let res = match (payload.prefix(), payload.value()) {
            (BALANCE_PREFIX, None) => Self::Balance,
            (TOP_UP_PREFIX, Some(_)) => {
                let amount = payload
                    .value_as::<f64>()
                    .filter(|a| a.is_finite() && *a > 0.0)
                    .ok_or(CallbackParseError::InvalidValue)?;
                Self::TopUp { amount }
            }
            (TARIFFS_PREFIX, None) => Self::Tariffs,
            (TARIFF_PREFIX, Some(name)) if !name.is_empty() => Self::Tariff {
                name: name.to_owned(),
            },
            (BACK_BUTTON_CALLBACK, None) => Self::Back,
            (BALANCE_PREFIX | TOP_UP_PREFIX | TARIFFS_PREFIX | TARIFF_PREFIX | BACK_BUTTON_CALLBACK, _) => {
                return Err(CallbackParseError::InvalidValue)
            }
            (prefix, _) => return Err(CallbackParseError::UnknownCallbackType(prefix.to_owned())),
        };
        Ok(res)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum CallbackParseError {
    #[error(transparent)]
    Payload(#[from] PayloadParseError),
    #[error("unknown callback type {0:?}")]
    UnknownCallbackType(String),
    #[error("invalid callback value")]
    InvalidValue,
}
