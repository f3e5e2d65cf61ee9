use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use teloxide::{
    types::{
        ChatId, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, MessageId, ReplyMarkup,
        UserId,
    },
    ApiError, RequestError,
};

use super::*;

const CHAT_ID: ChatId = ChatId(42);
const USER_ID: UserId = UserId(42);
const MESSAGE_ID: MessageId = MessageId(7);
const FIRST_NEW_ID: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Op {
    Text,
    Photo,
    EditCaption,
    EditText,
    Delete,
    Answer,
    ProfilePhoto,
}

#[derive(Debug, Clone, Copy)]
enum Failure {
    Rejected,
    NotModified,
}

impl Failure {
    fn error(self) -> RequestError {
        match self {
            Self::Rejected => RequestError::Api(ApiError::Unknown("Bad Request: rejected".to_string())),
            Self::NotModified => RequestError::Api(ApiError::MessageNotModified),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Text {
        text: String,
        markup: Option<ReplyMarkup>,
    },
    Photo {
        photo: PhotoSource,
        caption: String,
    },
    EditCaption(MessageId),
    EditText {
        text: String,
        markup: Option<InlineKeyboardMarkup>,
    },
    Delete(MessageId),
    Answer {
        query_id: String,
        alert: Option<String>,
    },
    ProfilePhoto(UserId),
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    failures: HashMap<Op, Failure>,
    profile_photo: Option<String>,
    sent: i32,
}

/// Records calls, fails operations it was told to
#[derive(Debug, Clone, Default)]
struct MockApi {
    state: Arc<Mutex<State>>,
}

impl MockApi {
    fn failing(failures: &[(Op, Failure)]) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().failures.extend(failures.iter().copied());
        api
    }
    fn with_profile_photo(self, file_id: &str) -> Self {
        self.state.lock().unwrap().profile_photo = Some(file_id.to_string());
        self
    }
    fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }
    fn record(&self, op: Op, call: Call) -> Result<(), RequestError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failures.get(&op) {
            Some(failure) => Err(failure.error()),
            None => Ok(()),
        }
    }
    fn new_message(&self) -> MessageId {
        let mut state = self.state.lock().unwrap();
        state.sent += 1;
        MessageId(FIRST_NEW_ID + state.sent - 1)
    }
}

#[async_trait]
impl ChatApi for MockApi {
    async fn answer_text(
        &self,
        _chat_id: ChatId,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> Result<MessageId, RequestError> {
        let text = text.to_string();
        self.record(Op::Text, Call::Text { text, markup })?;
        Ok(self.new_message())
    }
    async fn answer_photo(
        &self,
        _chat_id: ChatId,
        photo: PhotoSource,
        caption: &str,
        _markup: Option<ReplyMarkup>,
    ) -> Result<MessageId, RequestError> {
        let caption = caption.to_string();
        self.record(Op::Photo, Call::Photo { photo, caption })?;
        Ok(self.new_message())
    }
    async fn edit_caption(
        &self,
        _chat_id: ChatId,
        message_id: MessageId,
        _caption: &str,
        _markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError> {
        self.record(Op::EditCaption, Call::EditCaption(message_id))
    }
    async fn edit_text(
        &self,
        _chat_id: ChatId,
        _message_id: MessageId,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError> {
        let text = text.to_string();
        self.record(Op::EditText, Call::EditText { text, markup })
    }
    async fn delete(&self, _chat_id: ChatId, message_id: MessageId) -> Result<(), RequestError> {
        self.record(Op::Delete, Call::Delete(message_id))
    }
    async fn answer_callback(&self, query_id: &str, alert: Option<&str>) -> Result<(), RequestError> {
        let call = Call::Answer {
            query_id: query_id.to_string(),
            alert: alert.map(ToString::to_string),
        };
        self.record(Op::Answer, call)
    }
    async fn profile_photo(&self, user_id: UserId) -> Result<Option<String>, RequestError> {
        self.record(Op::ProfilePhoto, Call::ProfilePhoto(user_id))?;
        Ok(self.state.lock().unwrap().profile_photo.clone())
    }
}

struct Menu;

impl Window for Menu {
    fn template(&self) -> &str {
        "Balance: {balance}"
    }
    fn entries(&self) -> Vec<Entry> {
        vec![Button::inline("Top up").callback("top_up").into()]
    }
}

struct ReplyMenu;

impl Window for ReplyMenu {
    fn template(&self) -> &str {
        "Choose"
    }
    fn entries(&self) -> Vec<Entry> {
        vec![Button::reply("Profile").into()]
    }
}

fn menu_markup() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[InlineKeyboardButton::callback("Top up", "top_up")]])
}

fn message_event() -> ChatEvent {
    ChatEvent::message(CHAT_ID, Some(USER_ID))
}

fn callback_event(has_caption: bool) -> ChatEvent {
    let message = CallbackMessage {
        id: MESSAGE_ID,
        has_caption,
    };
    ChatEvent::callback("q1", CHAT_ID, USER_ID, Some(message))
}

fn answer() -> Call {
    Call::Answer {
        query_id: "q1".to_string(),
        alert: None,
    }
}

fn text_call(text: &str) -> Call {
    Call::Text {
        text: text.to_string(),
        markup: Some(ReplyMarkup::InlineKeyboard(menu_markup())),
    }
}

fn sender(api: &MockApi, event: ChatEvent) -> Sender<MockApi> {
    common::init_test_logger();

    let mut sender = Sender::new(api.clone(), event);
    sender.add_window(&Menu, &crate::params! { "balance" => 10 }).unwrap();
    sender
}

#[tokio::test]
async fn test_send_message() {
    let api = MockApi::default();
    let res = sender(&api, message_event()).send().await.unwrap();

    assert_eq!(res, Delivery::Sent(MessageId(FIRST_NEW_ID)));
    similar_asserts::assert_eq!(api.calls(), vec![text_call("Balance: 10")]);
}

#[tokio::test]
async fn test_send_without_window() {
    let api = MockApi::default();

    let res = Sender::new(api.clone(), message_event()).send().await;
    assert!(matches!(res, Err(SendError::EmptyText)));

    let mut sender = Sender::new(api.clone(), message_event());
    sender.add_text(" \n ");
    assert!(matches!(sender.send().await, Err(SendError::EmptyText)));

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_send_photo() {
    let api = MockApi::default();
    let mut sender = sender(&api, message_event());
    sender.photo(Photo::FileId("file".to_string()));

    assert_eq!(sender.send().await.unwrap(), Delivery::Sent(MessageId(FIRST_NEW_ID)));
    assert_eq!(
        api.calls(),
        vec![Call::Photo {
            photo: PhotoSource::FileId("file".to_string()),
            caption: "Balance: 10".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_send_photo_rejected() {
    let api = MockApi::failing(&[(Op::Photo, Failure::Rejected)]);
    let mut sender = sender(&api, message_event());
    sender.photo(Photo::Url("https://example.com/a.png".parse().unwrap()));

    assert_eq!(sender.send().await.unwrap(), Delivery::Sent(MessageId(FIRST_NEW_ID)));

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], Call::Photo { .. }));
    assert_eq!(calls[1], text_call("Balance: 10"));
}

#[tokio::test]
async fn test_send_photo_from_path() {
    let api = MockApi::default();

    let mut sender = sender(&api, message_event());
    sender.photo(Photo::Path("/definitely/missing/photo.png".into()));
    sender.send().await.unwrap();
    assert_eq!(api.calls(), vec![text_call("Balance: 10")]);

    let path = std::env::temp_dir().join(format!("sender-photo-{}.png", std::process::id()));
    std::fs::write(&path, b"png").unwrap();

    let api = MockApi::default();
    let mut sender = self::sender(&api, message_event());
    sender.photo(Photo::Path(path.clone()));
    sender.send().await.unwrap();
    std::fs::remove_file(&path).unwrap();

    let Call::Photo { photo, .. } = &api.calls()[0] else {
        panic!("photo should be sent first");
    };
    assert_eq!(
        *photo,
        PhotoSource::Bytes {
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            bytes: b"png".to_vec(),
        }
    );
}

#[tokio::test]
async fn test_send_profile_photo() {
    let api = MockApi::default().with_profile_photo("avatar");
    let mut sender = sender(&api, message_event());
    sender.photo(Photo::UserProfile);
    sender.send().await.unwrap();

    assert_eq!(
        api.calls(),
        vec![
            Call::ProfilePhoto(USER_ID),
            Call::Photo {
                photo: PhotoSource::FileId("avatar".to_string()),
                caption: "Balance: 10".to_string(),
            },
        ]
    );

    // no photo in profile
    let api = MockApi::default();
    let mut sender = self::sender(&api, message_event());
    sender.photo(Photo::UserProfile);
    sender.send().await.unwrap();

    assert_eq!(
        api.calls(),
        vec![Call::ProfilePhoto(USER_ID), text_call("Balance: 10")]
    );
}

#[tokio::test]
async fn test_callback_edit_ladder() {
    use Failure::*;
    use Op::*;

    let new_message = Delivery::Sent(MessageId(FIRST_NEW_ID));
    let edit_text = Call::EditText {
        text: "Balance: 10".to_string(),
        markup: Some(menu_markup()),
    };

    let table = vec![
        (
            vec![],
            Delivery::Edited(MESSAGE_ID),
            vec![answer(), Call::EditCaption(MESSAGE_ID)],
        ),
        (
            vec![(EditCaption, Rejected)],
            Delivery::Edited(MESSAGE_ID),
            vec![answer(), Call::EditCaption(MESSAGE_ID), edit_text.clone()],
        ),
        (
            vec![(EditCaption, NotModified)],
            Delivery::Unchanged,
            vec![answer(), Call::EditCaption(MESSAGE_ID)],
        ),
        (
            vec![(EditCaption, Rejected), (EditText, NotModified)],
            Delivery::Unchanged,
            vec![answer(), Call::EditCaption(MESSAGE_ID), edit_text.clone()],
        ),
        (
            vec![(EditCaption, Rejected), (EditText, Rejected)],
            new_message,
            vec![
                answer(),
                Call::EditCaption(MESSAGE_ID),
                edit_text.clone(),
                Call::Delete(MESSAGE_ID),
                text_call("Balance: 10"),
            ],
        ),
        (
            // failed answer and delete don't stop delivery
            vec![(Answer, Rejected), (EditCaption, Rejected), (EditText, Rejected), (Delete, Rejected)],
            new_message,
            vec![
                answer(),
                Call::EditCaption(MESSAGE_ID),
                edit_text.clone(),
                Call::Delete(MESSAGE_ID),
                text_call("Balance: 10"),
            ],
        ),
        (
            vec![(EditCaption, Rejected), (EditText, Rejected), (Text, Rejected)],
            Delivery::Failed,
            vec![
                answer(),
                Call::EditCaption(MESSAGE_ID),
                edit_text.clone(),
                Call::Delete(MESSAGE_ID),
                text_call("Balance: 10"),
            ],
        ),
    ];
    for (failures, expected, expected_calls) in table {
        eprintln!("running with failures {failures:?}");

        let api = MockApi::failing(&failures);
        let res = sender(&api, callback_event(true)).send().await.unwrap();

        assert_eq!(res, expected);
        similar_asserts::assert_eq!(api.calls(), expected_calls);
    }
}

#[tokio::test]
async fn test_callback_with_alert() {
    let api = MockApi::default();
    let res = sender(&api, callback_event(true))
        .send_with_alert("Not enough money")
        .await
        .unwrap();

    assert_eq!(res, Delivery::Edited(MESSAGE_ID));
    assert_eq!(
        api.calls()[0],
        Call::Answer {
            query_id: "q1".to_string(),
            alert: Some("Not enough money".to_string()),
        }
    );
}

#[tokio::test]
async fn test_callback_reply_keyboard_resends() {
    let api = MockApi::default();
    let mut sender = Sender::new(api.clone(), callback_event(true));
    sender.add_window(&ReplyMenu, &Params::new()).unwrap();

    assert_eq!(sender.send().await.unwrap(), Delivery::Sent(MessageId(FIRST_NEW_ID)));

    let markup = KeyboardMarkup::new([[KeyboardButton::new("Profile")]]).resize_keyboard();
    similar_asserts::assert_eq!(
        api.calls(),
        vec![
            answer(),
            Call::Delete(MESSAGE_ID),
            Call::Text {
                text: "Choose".to_string(),
                markup: Some(ReplyMarkup::Keyboard(markup)),
            },
        ]
    );
}

#[tokio::test]
async fn test_callback_photo_over_text_message_resends() {
    let api = MockApi::default();
    let mut sender = sender(&api, callback_event(false));
    sender.photo(Photo::FileId("file".to_string()));

    assert_eq!(sender.send().await.unwrap(), Delivery::Sent(MessageId(FIRST_NEW_ID)));
    assert_eq!(
        api.calls(),
        vec![
            answer(),
            Call::Delete(MESSAGE_ID),
            Call::Photo {
                photo: PhotoSource::FileId("file".to_string()),
                caption: "Balance: 10".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_callback_inaccessible_message() {
    let api = MockApi::default();
    let event = ChatEvent::callback("q1", CHAT_ID, USER_ID, None);

    let res = sender(&api, event).send().await.unwrap();
    assert_eq!(res, Delivery::Sent(MessageId(FIRST_NEW_ID)));
    assert_eq!(api.calls(), vec![answer(), text_call("Balance: 10")]);
}
