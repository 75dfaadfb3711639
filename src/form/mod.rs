mod actions;
mod convert;
mod error;
mod errors;
mod list;
mod store;

pub use actions::{CommandError, FormCommand};
pub use error::{FieldCoercionError, InputError, ListError, StoreError};
pub use errors::ErrorMap;
pub use store::{FieldStore, RecordDefaults};
