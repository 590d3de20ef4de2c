/// Lifecycle of the connection pool manager.
///
/// `Uninitialized -> Ready -> Disposed`; sessions are only handed out in `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Ready,
    Disposed,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Uninitialized => write!(f, "uninitialized"),
            LifecycleState::Ready => write!(f, "ready"),
            LifecycleState::Disposed => write!(f, "disposed"),
        }
    }
}
