use crate::notation::timeline::{EventPosition, Timeline};

/// How the active element is brought into view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollConfig {
    /// Pixels kept above the active element
    pub offset: f64,
    pub auto_scroll: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            offset: 100.0,
            auto_scroll: true,
        }
    }
}

/// Active and upcoming events resolved for one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPosition {
    pub current: EventPosition,
    pub next: Option<EventPosition>,
    /// True only when the resolved index moved since the last resolution
    pub changed: bool,
}

impl ResolvedPosition {
    /// Scroll target for the active element's container.
    ///
    /// Only produced when auto-scroll is on and the resolved index
    /// actually moved, so a scroll is never requested on every tick.
    pub fn scroll_target(&self, element_top: f64, config: &ScrollConfig) -> Option<f64> {
        if config.auto_scroll && self.changed {
            Some(element_top - config.offset)
        } else {
            None
        }
    }
}

/// Resolves the highlight position from the media time, memoized on the
/// resolved index rather than the raw time.
#[derive(Debug, Default)]
pub struct PositionResolver {
    last: Option<EventPosition>,
}

impl PositionResolver {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Forget the memoized position, e.g. when the timeline is replaced.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn resolve(&mut self, timeline: &Timeline, seconds: f64) -> Option<ResolvedPosition> {
        let current = timeline.current_event_at(seconds)?;
        let changed = self.last != Some(current);
        if changed {
            log::debug!(
                "active event moved to section {} event {} at {seconds:.2}s",
                current.section,
                current.event
            );
        }
        self.last = Some(current);
        let next = timeline.next_event(current);
        Some(ResolvedPosition {
            current,
            next,
            changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::timeline::{Section, TimedEvent};

    fn timeline() -> Timeline {
        Timeline::new(vec![Section {
            name: "Verse".to_string(),
            start_time: 0.0,
            events: vec![
                TimedEvent {
                    chord: "G".to_string(),
                    lyric: "one".to_string(),
                    timestamp: 2.0,
                },
                TimedEvent {
                    chord: "C".to_string(),
                    lyric: "two".to_string(),
                    timestamp: 6.0,
                },
            ],
        }])
    }

    #[test]
    fn test_changed_only_when_index_moves() {
        let timeline = timeline();
        let mut resolver = PositionResolver::new();
        let first = resolver.resolve(&timeline, 2.1).unwrap();
        assert!(first.changed);
        // further ticks inside the same event keep the flag down
        let second = resolver.resolve(&timeline, 3.0).unwrap();
        assert!(!second.changed);
        assert_eq!(second.current, first.current);
        let third = resolver.resolve(&timeline, 6.5).unwrap();
        assert!(third.changed);
    }

    #[test]
    fn test_next_event_reported() {
        let timeline = timeline();
        let mut resolver = PositionResolver::new();
        let resolved = resolver.resolve(&timeline, 2.0).unwrap();
        assert_eq!(resolved.next.unwrap().event, 1);
        let resolved = resolver.resolve(&timeline, 6.0).unwrap();
        assert_eq!(resolved.next, None);
    }

    #[test]
    fn test_no_position_before_timeline() {
        let timeline = timeline();
        let mut resolver = PositionResolver::new();
        assert!(resolver.resolve(&timeline, -1.0).is_none());
    }

    #[test]
    fn test_scroll_only_on_change_with_auto_scroll() {
        let timeline = timeline();
        let mut resolver = PositionResolver::new();
        let config = ScrollConfig::default();
        let first = resolver.resolve(&timeline, 2.0).unwrap();
        assert_eq!(first.scroll_target(400.0, &config), Some(300.0));
        let second = resolver.resolve(&timeline, 2.5).unwrap();
        assert_eq!(second.scroll_target(400.0, &config), None);

        let disabled = ScrollConfig {
            auto_scroll: false,
            ..ScrollConfig::default()
        };
        resolver.reset();
        let third = resolver.resolve(&timeline, 2.0).unwrap();
        assert!(third.changed);
        assert_eq!(third.scroll_target(400.0, &disabled), None);
    }

    #[test]
    fn test_backward_seek_re_resolves() {
        let timeline = timeline();
        let mut resolver = PositionResolver::new();
        resolver.resolve(&timeline, 7.0).unwrap();
        let back = resolver.resolve(&timeline, 2.0).unwrap();
        assert!(back.changed);
        assert_eq!(back.current.event, 0);
    }
}
