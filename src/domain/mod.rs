mod path;
mod record;
mod schema;
mod value;

pub use path::{FieldPath, SCALAR_PATHS, UnknownPath};
pub use record::{
    Address, AddressDocument, Gender, HobbyDocument, HobbyItem, HobbyList, IdAllocator, Record,
    RecordDocument, StableId,
};
pub use schema::{Check, Condition, FieldRule, FormSchema, Target, VisibilityRule};
pub use value::{FieldValue, ValueKind};
