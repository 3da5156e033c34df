use crate::range::RangeModel;

/// What the owner of a gesture recognizer should do after feeding it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Nothing changed.
    Ignored,
    /// The drag started too far from the current value. The recognizer must be
    /// reset so no further samples arrive for this gesture.
    Rejected,
    /// Uncommitted value to show while a drag is in flight.
    Live(i64),
    /// The selection was committed; fire the "value changed" notification.
    Committed(Option<i64>),
}

impl GestureOutcome {
    pub fn is_commit(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Dragging {
        origin: i64,
    },
}

/// The current selection and the gesture transitions that move it.
///
/// Candidates arrive as offsets produced by the geometry; they are turned
/// into values of `range` and clamped before being stored, so a held value is
/// always inside the range it was last checked against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    value: Option<i64>,
    phase: Phase,
}

impl SelectionState {
    pub fn new(value: Option<i64>, range: &RangeModel) -> Self {
        Self {
            value: value.map(|v| range.clamp(v)),
            phase: Phase::Idle,
        }
    }

    pub fn value(&self) -> Option<i64> {
        self.value
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Programmatic change. Returns whether the stored value moved.
    pub fn set(&mut self, value: Option<i64>, range: &RangeModel) -> bool {
        let value = value.map(|v| range.clamp(v));
        let changed = self.value != value;
        self.value = value;
        changed
    }

    /// Pulls the held value (and a drag's origin) back inside `range`.
    pub fn rebound(&mut self, range: &RangeModel) {
        self.value = self.value.map(|v| range.clamp(v));
        if let Phase::Dragging { origin } = &mut self.phase {
            *origin = range.clamp(*origin);
        }
    }

    pub fn tap(&mut self, candidate: Option<u64>, range: &RangeModel) -> GestureOutcome {
        match resolve(candidate, range) {
            Some(value) if self.value != Some(value) => {
                self.value = Some(value);
                GestureOutcome::Committed(self.value)
            }
            _ => GestureOutcome::Ignored,
        }
    }

    /// Starts a drag. A drag already in flight is abandoned first, so the new
    /// start is judged against the value it started from.
    pub fn drag_began(&mut self, candidate: Option<u64>, range: &RangeModel) -> GestureOutcome {
        if let Phase::Dragging { origin } = std::mem::take(&mut self.phase) {
            log::debug!("drag restarted, restoring {origin}");
            self.value = Some(origin);
        }

        let (Some(current), Some(value)) = (self.value, resolve(candidate, range)) else {
            log::debug!("drag rejected: no selection or no candidate");
            return GestureOutcome::Rejected;
        };
        if current.abs_diff(value) > 1 {
            log::debug!("drag rejected: starts at {value}, selection is {current}");
            return GestureOutcome::Rejected;
        }

        self.phase = Phase::Dragging { origin: current };
        self.value = Some(value);
        GestureOutcome::Live(value)
    }

    /// Follows the pointer. After a drag is accepted there is no distance gate.
    pub fn drag_moved(&mut self, candidate: Option<u64>, range: &RangeModel) -> GestureOutcome {
        if !self.is_dragging() {
            return GestureOutcome::Ignored;
        }
        match resolve(candidate, range) {
            Some(value) => {
                self.value = Some(value);
                GestureOutcome::Live(value)
            }
            None => GestureOutcome::Ignored,
        }
    }

    pub fn drag_ended(&mut self, candidate: Option<u64>, range: &RangeModel) -> GestureOutcome {
        if !self.is_dragging() {
            return GestureOutcome::Ignored;
        }
        if let Some(value) = resolve(candidate, range) {
            self.value = Some(value);
        }
        self.phase = Phase::Idle;
        GestureOutcome::Committed(self.value)
    }

    /// Abandons a drag, restoring the value it started from.
    pub fn drag_cancelled(&mut self) -> GestureOutcome {
        match std::mem::take(&mut self.phase) {
            Phase::Dragging { origin } => {
                self.value = Some(origin);
                GestureOutcome::Live(origin)
            }
            Phase::Idle => GestureOutcome::Ignored,
        }
    }
}

fn resolve(candidate: Option<u64>, range: &RangeModel) -> Option<i64> {
    candidate.map(|offset| range.value_at(offset).unwrap_or(range.upper()))
}
