use teloxide::types::{ChatId as TgChatId, UserId as TgUserId};

/// Database integer id
pub type Id = i64;

/// Platform user id, stored in db as [`Id`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

macro_rules! cast {
    ($($from:ty => $to:ty : $value:ident => $convert:expr),* $(,)?) => {
        $(impl From<$from> for $to {
            fn from($value: $from) -> Self {
                $convert
            }
        })*
    };
}

cast!(
    UserId => TgUserId: v => Self(v.0),
    TgUserId => UserId: v => Self(v.0),

    UserId => TgChatId: v => Self(v.0 as _),

    Id => UserId: v => Self(v as _),
    UserId => Id: v => v.0 as _,
);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
