use common::types::Id;

pub const DEFAULT_USERNAME: &str = "___";
pub const DEFAULT_BALANCE: f64 = 0.0;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, bon::Builder)]
pub struct User {
    /// Row id, assigned by db on insert
    #[builder(default)]
    id: Id,

    /// Telegram user id
    user_id: Id,

    #[builder(into, default = DEFAULT_USERNAME.to_string())]
    username: String,

    /// Stored as [`DEFAULT_BALANCE`] when not set
    balance: Option<f64>,
}

impl User {
    pub fn new(user_id: Id) -> Self {
        Self::builder().user_id(user_id).build()
    }
    pub fn id(&self) -> Id {
        self.id
    }
    pub fn user_id(&self) -> Id {
        self.user_id
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn balance(&self) -> Option<f64> {
        self.balance
    }
}

/// Filter for user lookups. Unset fields match everything
#[derive(Debug, Default, Clone, bon::Builder)]
pub struct UserFilter {
    user_id: Option<Id>,
    #[builder(into)]
    username: Option<String>,
}

impl UserFilter {
    pub fn by_user_id(user_id: Id) -> Self {
        Self::builder().user_id(user_id).build()
    }
    pub fn user_id(&self) -> Option<Id> {
        self.user_id
    }
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

/// Fields to update. Unset fields are left as is
#[derive(Debug, Default, Clone, bon::Builder)]
pub struct UserChanges {
    #[builder(into)]
    username: Option<String>,
    balance: Option<f64>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.balance.is_none()
    }
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
    pub fn balance(&self) -> Option<f64> {
        self.balance
    }
}
