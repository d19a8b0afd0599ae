
pub use fixtures::{register_built, wait_then_emit};
pub use test_host::{Reaction, TestHost, TraceEntry};

/// Assert that the manager's wait index mirrors itself and matches its instances
#[macro_export]
macro_rules! assert_index_consistent {
    ($manager:expr) => {
        assert!(
            $manager.wait_index().is_consistent(),
            "Wait index sides are out of sync"
        );
    };
}
