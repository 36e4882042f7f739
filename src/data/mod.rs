pub mod serializer;
pub mod value;

pub use serializer::{to_data, to_value};
pub use value::{Data, Value};
