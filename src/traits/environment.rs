/// Host-environment capabilities the session calls through, injected so the
/// core is testable without a real display or navigation stack.
pub trait HostEnvironment: Send + Sync {
    /// Arm or disarm the destructive-navigation confirmation guard.
    ///
    /// Armed while the session holds uncleared state; disarmed on clear.
    fn set_unload_guard(&self, armed: bool);
}

/// External save routine for the recorded artifact.
///
/// The session only supplies bytes and a filename; formatting of the
/// downloadable artifact is entirely the service's concern.
pub trait ArtifactSaver: Send + Sync {
    fn save(&self, bytes: &[u8], filename: &str);
}
