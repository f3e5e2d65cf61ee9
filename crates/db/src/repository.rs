use async_trait::async_trait;

use common::types::Id;

use crate::Result;

/// Data access for one mapped entity type. Implementations borrow the
/// connection of the current [`crate::Session`], so every call takes part in
/// its transaction
#[async_trait]
pub trait Repository: Send {
    type Entity: Send + Sync;
    type Filter: Send + Sync;
    type Changes: Send;

    async fn get_by_id(&mut self, id: Id) -> Result<Option<Self::Entity>>;
    /// First entity matching `filter`
    async fn get_by_filter(&mut self, filter: &Self::Filter) -> Result<Option<Self::Entity>>;
    async fn get_all(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Entity>>;
    /// Insert entity, returns id of the new row
    async fn add_one(&mut self, entity: &Self::Entity) -> Result<Id>;
    async fn edit_one(&mut self, id: Id, changes: Self::Changes) -> Result<()>;
}
