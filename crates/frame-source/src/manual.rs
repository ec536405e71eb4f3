//! Manually driven frame source

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::{FrameSource, SourceState, VideoFrame};

#[derive(Debug, Default)]
struct Inner {
    state: SourceState,
    frame: Option<VideoFrame>,
    sequence: u64,
}

/// Frame source whose state is set by the host.
///
/// Clones share the same underlying state, so one handle can be given to
/// the monitor while another is kept to drive playback.
#[derive(Debug, Clone, Default)]
pub struct ManualSource {
    inner: Arc<Mutex<Inner>>,
}

impl ManualSource {
    /// Create a source that has not started playing
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source that is already playing at the given size
    pub fn playing(width: u32, height: u32) -> Self {
        let source = Self::new();
        source.set_state(SourceState::playing(width, height));
        source
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the playback state
    pub fn set_state(&self, state: SourceState) {
        debug!("Source state changed: ready={}", state.is_ready());
        self.lock().state = state;
    }

    /// Current playback state
    pub fn state(&self) -> SourceState {
        self.lock().state.clone()
    }

    /// Pause playback
    pub fn pause(&self) {
        self.lock().state.playing = false;
    }

    /// Resume playback
    pub fn resume(&self) {
        self.lock().state.playing = true;
    }

    /// Set the frame returned by `current_frame`
    pub fn push_frame(&self, frame: VideoFrame) {
        let mut inner = self.lock();
        inner.sequence = frame.sequence;
        inner.frame = Some(frame);
    }
}

impl FrameSource for ManualSource {
    fn is_ready(&self) -> bool {
        self.lock().state.is_ready()
    }

    fn current_frame(&self) -> Option<VideoFrame> {
        let mut inner = self.lock();
        if !inner.state.is_ready() {
            return None;
        }
        if let Some(frame) = &inner.frame {
            return Some(frame.clone());
        }
        // No pushed frame: hand out a blank one at the current size
        inner.sequence += 1;
        Some(VideoFrame::blank(
            inner.state.width,
            inner.state.height,
            0,
            inner.sequence,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_source_is_not_ready() {
        let source = ManualSource::new();
        assert!(!source.is_ready());
        assert!(source.current_frame().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let source = ManualSource::playing(64, 48);
        let handle = source.clone();

        handle.pause();
        assert!(!source.is_ready());

        handle.resume();
        assert!(source.is_ready());
    }

    #[test]
    fn test_blank_frames_follow_source_size() {
        let source = ManualSource::playing(8, 6);
        let first = source.current_frame().unwrap();
        let second = source.current_frame().unwrap();

        assert_eq!(first.dimensions(), (8, 6));
        assert!(second.sequence > first.sequence);
    }

    #[test]
    fn test_pushed_frame_is_returned() {
        let source = ManualSource::playing(2, 2);
        source.push_frame(VideoFrame::new(vec![7; 12], 2, 2, 100, 42));

        let frame = source.current_frame().unwrap();
        assert_eq!(frame.sequence, 42);
        assert_eq!(frame.data[0], 7);
    }
}
