/// One amplitude snapshot read from the analysis graph.
///
/// Regenerated on every sampling tick with overwrite semantics: no history is
/// retained here. Visualization consumers that want a scrolling view must
/// capture each published frame themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleFrame {
    bytes: Vec<u8>,
}

impl SampleFrame {
    /// The empty frame published before any capture has started.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame() {
        let frame = SampleFrame::empty();
        assert!(frame.is_empty());
        assert_eq!(frame.len(), 0);
    }

    #[test]
    fn carries_bytes() {
        let frame = SampleFrame::new(vec![128, 130, 126]);
        assert_eq!(frame.as_bytes(), &[128, 130, 126]);
        assert_eq!(frame.len(), 3);
    }
}
