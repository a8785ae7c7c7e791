//! Coalesces bursts of resize notifications into one regeneration per frame.

use bevy::math::Vec2;

/// Handle of a scheduled regeneration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegenToken(u64);

#[derive(Clone, Copy, Debug)]
struct Pending {
    token: RegenToken,
    size: Vec2,
    due_frame: u64,
}

/// Cancel-and-reschedule debouncer keyed on display frames.
///
/// Each [`request`](Self::request) cancels whatever is pending and schedules
/// a fresh regeneration for the next frame, so any number of requests between
/// two frames collapse into one.
#[derive(Debug, Default)]
pub struct ResizeCoalescer {
    frame: u64,
    next_token: u64,
    pending: Option<Pending>,
}

impl ResizeCoalescer {
    /// Schedules a regeneration at `size` for the next frame, replacing any
    /// pending one.
    pub fn request(&mut self, size: Vec2) -> RegenToken {
        self.cancel();
        let token = RegenToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(Pending {
            token,
            size,
            due_frame: self.frame + 1,
        });
        token
    }

    /// Cancels the pending regeneration, returning its token.
    pub fn cancel(&mut self) -> Option<RegenToken> {
        self.pending.take().map(|p| p.token)
    }

    /// Token of the pending regeneration.
    pub fn pending(&self) -> Option<RegenToken> {
        self.pending.map(|p| p.token)
    }

    /// Advances to the next display frame and releases the regeneration due
    /// on it, with the size it was requested at.
    pub fn on_frame(&mut self) -> Option<Vec2> {
        self.frame += 1;
        match self.pending {
            Some(p) if p.due_frame <= self.frame => {
                self.pending = None;
                Some(p.size)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_into_one_with_latest_size() {
        let mut c = ResizeCoalescer::default();
        for w in 1..=10 {
            c.request(Vec2::new(w as f32 * 100.0, 600.0));
        }
        assert_eq!(c.on_frame(), Some(Vec2::new(1000.0, 600.0)));
        assert_eq!(c.on_frame(), None);
    }

    #[test]
    fn request_replaces_pending_token() {
        let mut c = ResizeCoalescer::default();
        let first = c.request(Vec2::ONE);
        let second = c.request(Vec2::ONE);
        assert_ne!(first, second);
        assert_eq!(c.pending(), Some(second));
    }

    #[test]
    fn cancelled_request_never_runs() {
        let mut c = ResizeCoalescer::default();
        let token = c.request(Vec2::ONE);
        assert_eq!(c.cancel(), Some(token));
        assert_eq!(c.on_frame(), None);
    }

    #[test]
    fn requests_in_separate_frames_each_run() {
        let mut c = ResizeCoalescer::default();
        c.request(Vec2::new(1.0, 1.0));
        assert!(c.on_frame().is_some());
        c.request(Vec2::new(2.0, 2.0));
        assert_eq!(c.on_frame(), Some(Vec2::new(2.0, 2.0)));
    }
}
