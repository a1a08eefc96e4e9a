pub mod alloc;
pub mod config;
pub mod error;
mod invariants;
pub mod list;
pub use list::c_list as other_c_list;
pub use list::list as other_list;
pub mod list_utils;
pub use list_utils::list_utils as other_list_utils;

pub use alloc::{Bounded, Global, NodeAllocator, PAYLOAD_ALIGN, Payload};
pub use config::ListConfig;
pub use error::{AllocError, InvariantError, ListError};
pub use other_list::{ByteList, NodeId};
pub use other_list_utils::{for_each, sort};
