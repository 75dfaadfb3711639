use tracing::debug;

use crate::domain::{HobbyItem, StableId};

use super::{error::ListError, store::FieldStore};

impl FieldStore {
    /// Appends a row at the end with a freshly allocated id.
    pub fn append_hobby(&mut self, name: impl Into<String>) -> StableId {
        let id = self.ids.allocate();
        self.record_mut().hobbies.push(HobbyItem {
            id,
            name: name.into(),
        });
        debug!(%id, len = self.hobbies().len(), "hobby appended");
        id
    }

    /// Removes the row with `id`, shifting later rows up. Returns the
    /// position the row had. The last remaining row cannot be removed.
    pub fn remove_hobby(&mut self, id: StableId) -> Result<usize, ListError> {
        if self.hobbies().get(id).is_none() {
            return Err(ListError::UnknownItem(id));
        }
        if !self.can_remove_hobby() {
            return Err(ListError::RemovalRejected(id));
        }
        let (index, _) = self
            .record_mut()
            .hobbies
            .shift_remove(id)
            .ok_or(ListError::UnknownItem(id))?;
        debug!(%id, index, len = self.hobbies().len(), "hobby removed");
        Ok(index)
    }

    pub fn can_remove_hobby(&self) -> bool {
        self.hobbies().len() > 1
    }
}
