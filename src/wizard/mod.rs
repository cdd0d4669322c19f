/// Booking wizard module
///
/// Walks a customer from branch choice to an issued ticket, one selection per
/// step.
///
/// ## Architecture
///
/// ```text
/// BookingWizard
///   ├── WizardStep (enum of all steps, explicit next/previous table)
///   ├── BookingDraft (selections so far + contact form)
///   ├── Catalog / AppConfig (immutable, passed in at construction)
///   └── Navigation (select_*, next, go_back, confirm, reset)
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use spa_booking::wizard::{BookingWizard, WizardStep};
///
/// let mut wizard = BookingWizard::new(catalog, config);
///
/// wizard.select_branch("b-siam")?;
/// wizard.select_service("thai-traditional")?;
/// wizard.select_date(date)?;
/// wizard.select_time_slot("10:00")?;
/// wizard.select_staff("s04")?;
/// wizard.confirm("Somchai", "0812345678")?;
///
/// assert_eq!(wizard.step(), WizardStep::Success);
/// ```
///
/// ## Steps
///
/// 1. **BranchSelection** - Pick a branch, or open **MyBookings**
/// 2. **ServiceSelection** - Pick a service; the advisor may flag one
/// 3. **DateSelection** - Pick a non-holiday date in the booking window
/// 4. **TimeSelection** - Pick an available start time
/// 5. **StaffSelection** - Pick a qualified, free therapist
/// 6. **Confirmation** - Enter name and phone, then submit
/// 7. **Success** - Ticket issued; reset to book again

pub mod steps;
pub mod state;
pub mod flow;

// Re-export commonly used types
pub use steps::WizardStep;
pub use state::{BookingDraft, ConfirmedBooking};
pub use flow::{BookingWizard, NavigationResult, ServiceOption};
