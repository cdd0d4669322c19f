/// Booking wizard step definitions
///
/// The linear path runs Branch → Service → Date → Time → Staff →
/// Confirmation → Success. MyBookings hangs off BranchSelection and returns
/// to it. Transitions are spelled out per variant rather than derived from
/// step numbers.

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    /// Choose a branch, or jump to booking history
    BranchSelection,

    /// Choose a service, optionally with an advisor suggestion
    ServiceSelection,

    /// Choose a date inside the booking window
    DateSelection,

    /// Choose a start time
    TimeSelection,

    /// Choose a therapist qualified for the service
    StaffSelection,

    /// Enter contact details and submit
    Confirmation,

    /// Ticket issued; only a reset leaves this step
    Success,

    /// Look up existing bookings by phone
    MyBookings,
}

impl WizardStep {
    /// Get step title
    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::BranchSelection => "Select a branch",
            WizardStep::ServiceSelection => "Select a service",
            WizardStep::DateSelection => "Select a date",
            WizardStep::TimeSelection => "Select a time",
            WizardStep::StaffSelection => "Select a therapist",
            WizardStep::Confirmation => "Confirm your booking",
            WizardStep::Success => "Booking confirmed",
            WizardStep::MyBookings => "My bookings",
        }
    }

    /// Short label under the step indicator
    pub fn label(&self) -> Option<&'static str> {
        match self {
            WizardStep::BranchSelection => Some("สาขา"),
            WizardStep::ServiceSelection => Some("บริการ"),
            WizardStep::DateSelection => Some("วันที่"),
            WizardStep::TimeSelection => Some("เวลา"),
            WizardStep::StaffSelection => Some("พนักงาน"),
            WizardStep::Confirmation => Some("ยืนยัน"),
            WizardStep::Success | WizardStep::MyBookings => None,
        }
    }

    /// Indicator number (1-indexed); None hides the indicator
    pub fn number(&self) -> Option<usize> {
        match self {
            WizardStep::BranchSelection => Some(1),
            WizardStep::ServiceSelection => Some(2),
            WizardStep::DateSelection => Some(3),
            WizardStep::TimeSelection => Some(4),
            WizardStep::StaffSelection => Some(5),
            WizardStep::Confirmation => Some(6),
            WizardStep::Success | WizardStep::MyBookings => None,
        }
    }

    /// Number of steps shown on the indicator
    pub fn total_steps() -> usize {
        6
    }

    /// Check if this is the first step
    pub fn is_first(&self) -> bool {
        matches!(self, WizardStep::BranchSelection)
    }

    /// Check if this step ends the session
    pub fn is_terminal(&self) -> bool {
        matches!(self, WizardStep::Success)
    }

    /// Draft field this step fills in
    pub fn field(&self) -> Option<&'static str> {
        match self {
            WizardStep::BranchSelection => Some("branch"),
            WizardStep::ServiceSelection => Some("service"),
            WizardStep::DateSelection => Some("date"),
            WizardStep::TimeSelection => Some("time slot"),
            WizardStep::StaffSelection => Some("staff"),
            WizardStep::Confirmation => Some("contact"),
            WizardStep::Success | WizardStep::MyBookings => None,
        }
    }

    /// Get next step on the booking path
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::BranchSelection => Some(WizardStep::ServiceSelection),
            WizardStep::ServiceSelection => Some(WizardStep::DateSelection),
            WizardStep::DateSelection => Some(WizardStep::TimeSelection),
            WizardStep::TimeSelection => Some(WizardStep::StaffSelection),
            WizardStep::StaffSelection => Some(WizardStep::Confirmation),
            WizardStep::Confirmation => Some(WizardStep::Success),
            WizardStep::Success => None,
            WizardStep::MyBookings => None,
        }
    }

    /// Get previous step
    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::BranchSelection => None,
            WizardStep::ServiceSelection => Some(WizardStep::BranchSelection),
            WizardStep::DateSelection => Some(WizardStep::ServiceSelection),
            WizardStep::TimeSelection => Some(WizardStep::DateSelection),
            WizardStep::StaffSelection => Some(WizardStep::TimeSelection),
            WizardStep::Confirmation => Some(WizardStep::StaffSelection),
            WizardStep::Success => None,
            WizardStep::MyBookings => Some(WizardStep::BranchSelection),
        }
    }

    /// Whether the indicator shows this step as done while on `current`
    pub fn is_done_at(&self, current: WizardStep) -> bool {
        match (self.number(), current.number()) {
            (Some(step), Some(now)) => step < now,
            _ => false,
        }
    }

    /// Whether the sticky footer summary is shown on this step
    pub fn shows_summary(&self) -> bool {
        matches!(
            self,
            WizardStep::ServiceSelection
                | WizardStep::DateSelection
                | WizardStep::TimeSelection
                | WizardStep::StaffSelection
        )
    }

    /// Steps shown on the indicator, in order
    pub fn indicator_steps() -> Vec<WizardStep> {
        vec![
            WizardStep::BranchSelection,
            WizardStep::ServiceSelection,
            WizardStep::DateSelection,
            WizardStep::TimeSelection,
            WizardStep::StaffSelection,
            WizardStep::Confirmation,
        ]
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        WizardStep::BranchSelection
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}
