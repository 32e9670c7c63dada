//! RAII guard for call-hierarchy frames

use super::Logger;

/// One frame on the logger's call stack.
///
/// Returned by [`Logger::enter`]; the frame stays active for the guard's
/// lifetime and is popped when it drops.
#[must_use = "the frame is popped as soon as the guard is dropped"]
pub struct CallScope<'a> {
    logger: &'a Logger,
}

impl<'a> CallScope<'a> {
    pub(crate) fn new(logger: &'a Logger) -> Self {
        Self { logger }
    }
}

impl Drop for CallScope<'_> {
    fn drop(&mut self) {
        self.logger.pop_frame();
    }
}
