mod api;
mod button;
mod error;
mod event;
mod keyboard;
mod middleware;
mod payload;
mod send;
mod template;
mod window;

#[cfg(test)]
mod tests;

pub use api::{ChatApi, PhotoSource};
pub use button::{Action, Button, Control, KeyboardConfig, KeyboardKind, BACK_BUTTON_CALLBACK, BACK_BUTTON_TEXT};
pub use error::{ButtonError, LayoutError, RenderError, SendError};
pub use event::{CallbackMessage, ChatEvent, EventKind};
pub use keyboard::{layout, KeyboardBuilder};
pub use middleware::WindowMiddleware;
pub use payload::{CallbackPayload, PayloadData, PayloadParseError, MAX_PAYLOAD_LEN, SEP};
pub use send::{Delivery, Photo, Sender};
pub use template::{render, Params};
pub use window::{DynamicWindow, Entry, Window};
