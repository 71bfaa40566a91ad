use std::sync::Once;

/// Install the test logger once per test binary.
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(relay_logging::initialize_for_tests);
}
