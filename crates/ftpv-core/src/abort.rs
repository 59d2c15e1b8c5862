//! Abort signaling for cancellable verification.
//!
//! The abortable verify entry points take an `AbortToken`; the controller
//! (e.g. a UI cancel button or a shutdown path) sets it, and the
//! verification observes it at its next check point and stops with
//! `VerifyError::Aborted`. Partial results are discarded, never compared.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clonable abort flag shared between a verification call and whoever may
/// cancel it. All clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct AbortToken {
    flag: Arc<AtomicBool>,
}

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request abort. The verification sees the flag at its next check
    /// point (between remote fetches, or between digest read chunks).
    pub fn request_abort(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = AbortToken::new();
        let clone = token.clone();
        assert!(!clone.is_aborted());
        token.request_abort();
        assert!(clone.is_aborted());
    }
}
