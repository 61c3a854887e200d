mod resolve_name;

pub use resolve_name::{build_query, ResolveNameUseCase};
