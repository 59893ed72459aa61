/// A time-stamped chord/lyric event.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    pub chord: String,
    pub lyric: String,
    /// Seconds on the media clock
    pub timestamp: f64,
}

/// A named run of events, e.g. a verse or chorus.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    /// Seconds at which the section begins
    pub start_time: f64,
    pub events: Vec<TimedEvent>,
}

/// Location of one event inside a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventPosition {
    pub section: usize,
    pub event: usize,
}

/// Ordered sections of timed events; owns all of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    sections: Vec<Section>,
}

impl Timeline {
    /// Build a timeline, sorting each section's events by timestamp.
    ///
    /// Out-of-order timestamps are a data-quality problem in the chart,
    /// reported as a warning rather than an error.
    pub fn new(mut sections: Vec<Section>) -> Self {
        for section in &mut sections {
            let ordered = section
                .events
                .windows(2)
                .all(|w| w[0].timestamp <= w[1].timestamp);
            if !ordered {
                log::warn!(
                    "events out of order in section {:?}, sorting by timestamp",
                    section.name
                );
                section
                    .events
                    .sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
            }
        }
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.events.is_empty())
    }

    pub fn event(&self, position: EventPosition) -> Option<&TimedEvent> {
        self.sections.get(position.section)?.events.get(position.event)
    }

    /// Latest event whose timestamp is not after `t`.
    ///
    /// Sections and events are scanned in reverse so that shared
    /// timestamps and backward seeks resolve to the correct state. A
    /// section already begun but still ahead of its first tagged event
    /// answers with that first event.
    pub fn current_event_at(&self, t: f64) -> Option<EventPosition> {
        for (section_index, section) in self.sections.iter().enumerate().rev() {
            for (event_index, event) in section.events.iter().enumerate().rev() {
                if event.timestamp <= t {
                    return Some(EventPosition {
                        section: section_index,
                        event: event_index,
                    });
                }
            }
            if section.start_time <= t && !section.events.is_empty() {
                return Some(EventPosition {
                    section: section_index,
                    event: 0,
                });
            }
        }
        None
    }

    /// Event following `position`, crossing into the next non-empty
    /// section when needed.
    pub fn next_event(&self, position: EventPosition) -> Option<EventPosition> {
        let section = self.sections.get(position.section)?;
        if position.event + 1 < section.events.len() {
            return Some(EventPosition {
                section: position.section,
                event: position.event + 1,
            });
        }
        self.sections
            .iter()
            .enumerate()
            .skip(position.section + 1)
            .find(|(_, section)| !section.events.is_empty())
            .map(|(section_index, _)| EventPosition {
                section: section_index,
                event: 0,
            })
    }
}
