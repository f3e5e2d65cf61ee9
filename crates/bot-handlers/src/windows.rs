use sender::{Button, Entry, KeyboardConfig, PayloadData, Window};

use crate::callback::{Callback, TARIFF_PREFIX};

const CURRENCY: &str = "₽";
const TOP_UP_AMOUNTS: [f64; 2] = [100.0, 500.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Tariff {
    pub(crate) name: &'static str,
    pub(crate) price: f64,
}

pub(crate) const TARIFFS: &[Tariff] = &[
    Tariff {
        name: "basic",
        price: 100.0,
    },
    Tariff {
        name: "pro",
        price: 300.0,
    },
    Tariff {
        name: "team",
        price: 900.0,
    },
];

pub(crate) fn find_tariff(name: &str) -> Option<Tariff> {
    TARIFFS.iter().find(|t| t.name == name).copied()
}

pub(crate) struct StartWindow;

impl Window for StartWindow {
    fn template(&self) -> &str {
        "Hi, <b>{name}</b>!\n\nCheck your balance or pick a tariff below"
    }
    fn entries(&self) -> Vec<Entry> {
        vec![
            Button::inline("Balance")
                .prefix("💰")
                .callback(Callback::Balance.to_payload())
                .into(),
            Button::inline("Tariffs")
                .prefix("📋")
                .callback(Callback::Tariffs.to_payload())
                .into(),
            Button::inline("Bot API")
                .url("https://core.telegram.org/bots/api")
                .into(),
        ]
    }
    fn sizes(&self) -> Vec<usize> {
        vec![2, 1]
    }
}

pub(crate) struct BalanceWindow;

impl Window for BalanceWindow {
    fn template(&self) -> &str {
        "Your balance: <b>{balance} ₽</b>"
    }
    fn entries(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = TOP_UP_AMOUNTS
            .iter()
            .map(|&amount| {
                Button::inline(format!("{amount} {CURRENCY}"))
                    .prefix("+")
                    .callback(Callback::TopUp { amount }.to_payload())
                    .into()
            })
            .collect();
        entries.push(
            Button::inline("Tariffs")
                .prefix("📋")
                .callback(Callback::Tariffs.to_payload())
                .into(),
        );
        entries
    }
    fn sizes(&self) -> Vec<usize> {
        vec![TOP_UP_AMOUNTS.len(), 1]
    }
}

pub(crate) struct NotRegisteredWindow;

impl Window for NotRegisteredWindow {
    fn template(&self) -> &str {
        "You are not registered yet, press /start"
    }
}

/// Tariff list, expanded over [`tariffs_config`]
pub(crate) struct TariffsWindow;

impl Window for TariffsWindow {
    fn template(&self) -> &str {
        "Tariffs, your balance is <b>{balance} ₽</b>:\n{list}"
    }
    fn entries(&self) -> Vec<Entry> {
        vec![Button::inline("Tariff")
            .callback(TARIFF_PREFIX)
            .expandable()
            .into()]
    }
}

pub(crate) fn tariffs_config() -> KeyboardConfig {
    KeyboardConfig::builder()
        .data(TARIFFS.iter().map(|t| t.name.to_string()).collect())
        .in_text(true)
        .in_callback(true)
        .start(true)
        .include_back_button(true)
        .back_button_text("⬅️ Back")
        .back_button_callback(Callback::Back.to_payload())
        .sizes(vec![TARIFFS.len(), 1])
        .build()
}

pub(crate) fn tariffs_list() -> String {
    TARIFFS
        .iter()
        .map(|t| format!("• <b>{}</b>: {} {CURRENCY}", t.name, t.price))
        .collect::<Vec<_>>()
        .join("\n")
}
