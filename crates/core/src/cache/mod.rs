mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{task_key, TASK_KEY_PREFIX};
pub use serialization::{deserialize_task, serialize_task, SerializationError};
pub use traits::Cache;
