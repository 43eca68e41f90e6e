use remote_protocol::{JumpMode, MarkerId};

/// Highlight of one section button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionState {
    #[default]
    Idle,
    /// A deferred jump to this section has been requested but not reached.
    Pending,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingJump {
    pub section: MarkerId,
    pub mode: JumpMode,
}

/// Which section is pending and which is active.
///
/// At most one section is pending and at most one is active. While nothing is
/// pending the active highlight follows the playhead. A pending section
/// becomes active when playback arrives at it: the playhead enters it from
/// another section, or jumps backwards within it (a deferred jump to the
/// section already playing).
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    pending: Option<PendingJump>,
    active: Option<MarkerId>,
    last_observed: Option<(Option<MarkerId>, f64)>,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<PendingJump> {
        self.pending
    }

    pub fn active(&self) -> Option<MarkerId> {
        self.active
    }

    pub fn state_of(&self, section: MarkerId) -> SectionState {
        if self.pending.is_some_and(|pending| pending.section == section) {
            SectionState::Pending
        } else if self.active == Some(section) {
            SectionState::Active
        } else {
            SectionState::Idle
        }
    }

    /// Record a click. Returns true when the jump is deferred.
    pub fn click(&mut self, section: MarkerId, mode: JumpMode) -> bool {
        if mode.is_deferred() {
            self.pending = Some(PendingJump { section, mode });
            true
        } else {
            self.pending = None;
            self.active = Some(section);
            false
        }
    }

    /// Feed the section under the playhead after a transport update.
    ///
    /// Returns the section that just went from pending to active, if any.
    pub fn observe(&mut self, playhead: Option<MarkerId>, pos: f64) -> Option<MarkerId> {
        let previous = self.last_observed.replace((playhead, pos));

        let Some(pending) = self.pending else {
            self.active = playhead;
            return None;
        };

        let arrived = playhead == Some(pending.section)
            && match previous {
                Some((previous_section, previous_pos)) => {
                    previous_section != playhead || pos < previous_pos
                }
                None => true,
            };

        if arrived {
            self.pending = None;
            self.active = Some(pending.section);
            Some(pending.section)
        } else {
            self.active = playhead;
            None
        }
    }

    /// Drop the pending jump, e.g. after the scheduled jump was cancelled.
    pub fn cancel(&mut self) -> Option<PendingJump> {
        self.pending.take()
    }

    /// Undo a click on `section` whose jump never reached the DAW.
    ///
    /// The active highlight goes back to the section last seen under the
    /// playhead. Clicks made since on other sections are left alone.
    pub fn revert(&mut self, section: MarkerId) {
        if self.pending.is_some_and(|pending| pending.section == section) {
            self.pending = None;
        }
        if self.active == Some(section) {
            self.active = self.last_observed.and_then(|(playhead, _)| playhead);
        }
    }

    /// Forget everything, e.g. after the section list was replaced.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
