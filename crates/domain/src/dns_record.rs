mod record;
mod record_class;
mod record_type;

pub use record::{RData, ResourceRecord};
pub use record_class::RecordClass;
pub use record_type::RecordType;
