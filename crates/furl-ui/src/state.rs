//! Tagged states of the header machine and their cell encodings.

/// Focus of the search field. `Unset` means "never interacted with" and is
/// also restored once the header finished expanding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FocusState {
    #[default]
    Unset,
    Blurred,
    Focused,
}

impl FocusState {
    pub fn code(self) -> f32 {
        match self {
            FocusState::Unset => -1.0,
            FocusState::Blurred => 0.0,
            FocusState::Focused => 1.0,
        }
    }

    /// Anything that is not an exact code decodes as `Unset`.
    pub fn from_code(v: f32) -> Self {
        if v == 1.0 {
            FocusState::Focused
        } else if v == 0.0 {
            FocusState::Blurred
        } else {
            FocusState::Unset
        }
    }
}

/// Which half of the height machine may run next. A single value replaces
/// two direction flags, so both can never be set at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Armed {
    /// The collapse may run on the next focus.
    #[default]
    Forward,
    /// The header is collapsed; the expand may run on the next blur.
    Back,
}

impl Armed {
    pub fn code(self) -> f32 {
        match self {
            Armed::Forward => 0.0,
            Armed::Back => 1.0,
        }
    }

    pub fn from_code(v: f32) -> Self {
        if v == 1.0 { Armed::Back } else { Armed::Forward }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeaderPhase {
    /// Focused and taller than the floor: animating down to the floor.
    Collapsing,
    /// Focused after the collapse finished: pinned at the floor.
    Collapsed,
    /// Blurred after a collapse: animating back to the scroll-derived height.
    Expanding,
    /// Following `max(big - scroll, floor)` with no animation.
    Tracking,
}

impl HeaderPhase {
    /// Position of the phase's arm in the height switch.
    pub fn index(self) -> usize {
        match self {
            HeaderPhase::Collapsing => 0,
            HeaderPhase::Collapsed => 1,
            HeaderPhase::Expanding => 2,
            HeaderPhase::Tracking => 3,
        }
    }

    pub fn from_index(i: usize) -> Self {
        match i {
            0 => HeaderPhase::Collapsing,
            1 => HeaderPhase::Collapsed,
            2 => HeaderPhase::Expanding,
            _ => HeaderPhase::Tracking,
        }
    }

    pub fn classify(focus: FocusState, current_height: f32, armed: Armed, floor: f32) -> Self {
        match (focus, armed) {
            (FocusState::Focused, Armed::Forward) if current_height > floor => {
                HeaderPhase::Collapsing
            }
            (FocusState::Focused, Armed::Back) if current_height > floor => HeaderPhase::Collapsed,
            (FocusState::Blurred, Armed::Back) => HeaderPhase::Expanding,
            _ => HeaderPhase::Tracking,
        }
    }
}

/// [`HeaderPhase::classify`] over cell values `[focus, current, armed, floor]`,
/// for use in a `map` node.
pub(crate) fn phase_index(v: &[f32]) -> f32 {
    let &[focus, current, armed, floor] = v else {
        return HeaderPhase::Tracking.index() as f32;
    };
    let phase = HeaderPhase::classify(
        FocusState::from_code(focus),
        current,
        Armed::from_code(armed),
        floor,
    );
    phase.index() as f32
}
