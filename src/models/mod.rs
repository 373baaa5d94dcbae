pub mod ack;
pub mod constants;
pub mod criteria;
pub mod dependency;
pub mod event;
pub mod node;
pub mod subscription;

pub use ack::Ack;
pub use criteria::Criteria;
pub use dependency::{Behavior, Dependency};
pub use event::{Event, EventKind, NodeSnapshot};
pub use node::{Node, NodeState, Properties, QuietedReason, Status};
pub use subscription::{Callback, Sink, Subscription};
