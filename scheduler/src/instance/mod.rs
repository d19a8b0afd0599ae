mod active_instance;
mod instance_pool;

pub use active_instance::{ActiveInstance, InstanceKey, InstancePhase};
pub use instance_pool::InstancePool;
