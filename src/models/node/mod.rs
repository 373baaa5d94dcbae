mod merge;
mod methods;
mod transitions;
mod types;
mod update;


pub use merge::{merge_properties, record_delta, PropertyChange};
pub use transitions::Trigger;
pub use types::{Node, NodeState, Properties, QuietedReason, Status};
pub use update::{ACK_KEY, ERROR_KEY};
