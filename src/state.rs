use bitflags::bitflags;

/// Lifecycle phase of a widget or dialog. Exactly one is current, so
/// entering a phase implicitly leaves the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Construct,
    Active,
    Suspended,
    Closed,
}

bitflags! {
    /// State bits that may be combined freely with any [`Phase`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateFlags: u8 {
        const VISIBLE = 1 << 0;
        const DISABLED = 1 << 1;
        const FOCUSED = 1 << 2;
        const MODAL = 1 << 3;
        const IDLE = 1 << 4;
    }
}

bitflags! {
    /// Behavioural options a widget kind declares up front.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WidgetOptions: u8 {
        /// Can receive keyboard focus.
        const SELECTABLE = 1 << 0;
        /// Offered hotkeys even while another sibling is current.
        const WANT_HOTKEY = 1 << 1;
        /// Positions the terminal cursor while current.
        const WANT_CURSOR = 1 << 2;
        /// Receives raw Tab/BackTab instead of using them to cycle focus.
        const WANT_TAB = 1 << 3;
        /// Raised to the front of its owner's Z-order when selected.
        const TOP_SELECT = 1 << 4;
        /// Text entry: printable keys are never stolen as sibling hotkeys.
        const IS_INPUT = 1 << 5;
    }
}

/// Phase plus independent flags, as stored on every widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WidgetState {
    phase: Phase,
    flags: StateFlags,
}

impl WidgetState {
    /// State of a freshly constructed widget: `Construct | Visible`.
    pub fn new() -> Self {
        Self {
            phase: Phase::Construct,
            flags: StateFlags::VISIBLE,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn flags(&self) -> StateFlags {
        self.flags
    }

    pub fn contains(&self, flags: StateFlags) -> bool {
        self.flags.contains(flags)
    }

    pub fn set(&mut self, flags: StateFlags, enable: bool) {
        self.flags.set(flags, enable);
    }
}
