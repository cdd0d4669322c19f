/// Booking wizard flow
///
/// Owns the catalog, the draft and the current step, and applies one
/// transition per user action. A rejected action leaves every field as it was.
use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use std::thread;

use super::state::{BookingDraft, ConfirmedBooking};
use super::steps::WizardStep;
use crate::advisor::{AdvisorOutcome, Recommendation, RecommendationRequest, ServiceAdvisor};
use crate::availability::{any_staff_available, check_availability, staff_options, Availability, StaffOption};
use crate::calendar::{self, within_window, DateOption};
use crate::catalog::{Branch, Catalog, Service};
use crate::config::AppConfig;
use crate::error::TransitionError;
use crate::history::{search_by_phone, search_ready, BookingRecord};
use crate::slots::{generate_time_slots, SlotStrategy, TimeSlot};
use crate::ticket::issue_ticket;

/// Navigation result
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationResult {
    /// Navigation succeeded, now on new step
    Success(WizardStep),

    /// Navigation blocked (at boundary or submission in flight)
    Blocked { reason: String },

    /// Booking completed; only a reset leaves the Success step
    Completed,
}

/// A service card, flagged when the advisor suggested it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceOption<'a> {
    pub service: &'a Service,
    pub recommended: bool,
}

/// One booking session
pub struct BookingWizard {
    catalog: Catalog,
    config: AppConfig,
    step: WizardStep,
    draft: BookingDraft,
    slots: Vec<TimeSlot>,
    recommendation: Option<Recommendation>,
    pending: Option<RecommendationRequest>,
    receipt: Option<ConfirmedBooking>,
    submitting: bool,
    today: NaiveDate,
    rng: StdRng,
}

impl BookingWizard {
    /// Start a session dated with the local calendar day
    pub fn new(catalog: Catalog, config: AppConfig) -> Self {
        Self {
            catalog,
            config,
            step: WizardStep::default(),
            draft: BookingDraft::new(),
            slots: Vec::new(),
            recommendation: None,
            pending: None,
            receipt: None,
            submitting: false,
            today: Local::now().date_naive(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Pin the session date (booking window and ticket stamp)
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Make randomized slots and ticket suffixes reproducible
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn receipt(&self) -> Option<&ConfirmedBooking> {
        self.receipt.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.recommendation.as_ref()
    }

    // ---- read model ----

    pub fn branches(&self) -> &[Branch] {
        &self.catalog.branches
    }

    pub fn service_options(&self) -> Vec<ServiceOption<'_>> {
        let recommended = self.recommendation.as_ref().map(|r| r.service_id.as_str());
        self.catalog
            .services
            .iter()
            .map(|service| ServiceOption {
                service,
                recommended: recommended == Some(service.id.as_str()),
            })
            .collect()
    }

    pub fn date_options(&self) -> Vec<DateOption> {
        calendar::date_options(self.today, self.config.booking_window_days, &self.catalog.shop)
    }

    /// Slots for the selected date, generated once per date selection
    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Qualified staff for the selected service and slot; empty until both
    /// are chosen
    pub fn staff_options(&self) -> Vec<StaffOption<'_>> {
        match (&self.draft.service, self.draft.date, &self.draft.time_slot) {
            (Some(service), Some(date), Some(slot)) => staff_options(&self.catalog, &service.id, date, &slot.time),
            _ => Vec::new(),
        }
    }

    /// Footer summary, shown from service selection through staff selection
    pub fn summary(&self) -> Option<String> {
        if self.step.shows_summary() {
            Some(self.draft.summary())
        } else {
            None
        }
    }

    // ---- transitions ----

    pub fn select_branch(&mut self, branch_id: &str) -> Result<WizardStep, TransitionError> {
        self.ensure_step(WizardStep::BranchSelection)?;

        let branch = self
            .catalog
            .branch(branch_id)
            .cloned()
            .ok_or_else(|| TransitionError::UnknownBranch(branch_id.to_string()))?;

        self.draft.branch = Some(branch);
        self.draft.clear_after(WizardStep::BranchSelection);
        Ok(self.advance_to(WizardStep::ServiceSelection))
    }

    pub fn select_service(&mut self, service_id: &str) -> Result<WizardStep, TransitionError> {
        self.ensure_step(WizardStep::ServiceSelection)?;

        let service = self
            .catalog
            .service(service_id)
            .cloned()
            .ok_or_else(|| TransitionError::UnknownService(service_id.to_string()))?;

        let changed = self.draft.service.as_ref().map(|s| s.id.as_str()) != Some(service_id);
        self.draft.service = Some(service);

        if changed {
            self.draft.clear_after(WizardStep::ServiceSelection);
            // Staffed availability depends on the service
            if self.config.slot_strategy == SlotStrategy::Staffed {
                if let Some(date) = self.draft.date {
                    self.draft.time_slot = None;
                    self.slots = self.build_slots(date);
                }
            }
        }

        Ok(self.advance_to(WizardStep::DateSelection))
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<WizardStep, TransitionError> {
        self.ensure_step(WizardStep::DateSelection)?;

        if self.catalog.shop.is_holiday(date) {
            return Err(self.reject(TransitionError::Holiday(date)));
        }
        if !within_window(date, self.today, self.config.booking_window_days) {
            return Err(self.reject(TransitionError::OutsideWindow(date)));
        }

        if self.draft.date != Some(date) || self.slots.is_empty() {
            self.draft.date = Some(date);
            self.draft.clear_after(WizardStep::DateSelection);
            self.slots = self.build_slots(date);
        }

        Ok(self.advance_to(WizardStep::TimeSelection))
    }

    pub fn select_time_slot(&mut self, time: &str) -> Result<WizardStep, TransitionError> {
        self.ensure_step(WizardStep::TimeSelection)?;

        let slot = self
            .slots
            .iter()
            .find(|slot| slot.time == time || slot.id == time)
            .cloned()
            .ok_or_else(|| TransitionError::UnknownTimeSlot(time.to_string()))?;

        if !slot.available {
            return Err(self.reject(TransitionError::SlotUnavailable(slot.time)));
        }

        if self.draft.time_slot.as_ref() != Some(&slot) {
            self.draft.time_slot = Some(slot);
            self.draft.clear_after(WizardStep::TimeSelection);
        }

        Ok(self.advance_to(WizardStep::StaffSelection))
    }

    pub fn select_staff(&mut self, staff_id: &str) -> Result<WizardStep, TransitionError> {
        self.ensure_step(WizardStep::StaffSelection)?;

        let staff = self
            .catalog
            .staff_member(staff_id)
            .cloned()
            .ok_or_else(|| TransitionError::UnknownStaff(staff_id.to_string()))?;

        let (service, date, slot) = match (&self.draft.service, self.draft.date, &self.draft.time_slot) {
            (Some(service), Some(date), Some(slot)) => (service, date, slot),
            _ => {
                let field = self.draft.missing_selection().unwrap_or("time slot");
                return Err(TransitionError::MissingSelection(field));
            }
        };

        if !staff.performs(&service.id) {
            let err = TransitionError::MissingSpecialty {
                staff: staff.name.clone(),
                service: service.name.clone(),
            };
            return Err(self.reject(err));
        }

        if let Availability::Unavailable(reason) = check_availability(&self.catalog, &staff.id, date, &slot.time) {
            let err = TransitionError::StaffUnavailable {
                staff: staff.name.clone(),
                reason,
            };
            return Err(self.reject(err));
        }

        self.draft.staff = Some(staff);
        Ok(self.advance_to(WizardStep::Confirmation))
    }

    /// Move forward keeping the value already selected on this step.
    /// On Confirmation this submits the booking.
    pub fn next(&mut self) -> Result<WizardStep, TransitionError> {
        self.ensure_active()?;

        let current = self.step;
        if current == WizardStep::Confirmation {
            return self.submit();
        }

        let next = current.next().ok_or(TransitionError::NoNextStep(current))?;
        if !self.draft.has_field_for(current) {
            let field = current.field().unwrap_or("value");
            return Err(self.reject(TransitionError::MissingSelection(field)));
        }

        Ok(self.advance_to(next))
    }

    pub fn update_name(&mut self, name: &str) -> Result<(), TransitionError> {
        self.ensure_step(WizardStep::Confirmation)?;
        self.draft.contact.set_name(name);
        Ok(())
    }

    pub fn update_phone(&mut self, phone: &str) -> Result<(), TransitionError> {
        self.ensure_step(WizardStep::Confirmation)?;
        self.draft.contact.set_phone(phone);
        Ok(())
    }

    /// Enter contact details and submit
    pub fn confirm(&mut self, name: &str, phone: &str) -> Result<WizardStep, TransitionError> {
        self.update_name(name)?;
        self.update_phone(phone)?;
        self.submit()
    }

    /// Validate the draft and mark the submission in flight. Every other
    /// transition is rejected until `finish_submission`.
    pub fn begin_submission(&mut self) -> Result<(), TransitionError> {
        self.ensure_step(WizardStep::Confirmation)?;

        if let Some(field) = self.draft.missing_selection() {
            return Err(self.reject(TransitionError::MissingSelection(field)));
        }
        if let Err(errors) = self.draft.contact.validate() {
            return Err(self.reject(TransitionError::InvalidContact(errors)));
        }

        self.submitting = true;
        tracing::debug!("[wizard] Submitting booking");
        Ok(())
    }

    /// Issue the ticket, stamped with the session date, and enter Success
    pub fn finish_submission(&mut self) -> Result<WizardStep, TransitionError> {
        if !self.submitting {
            return Err(TransitionError::NotSubmitting);
        }
        self.submitting = false;

        let (name, phone) = self
            .draft
            .contact
            .validate()
            .map_err(TransitionError::InvalidContact)?;

        let ticket = issue_ticket(&self.config.ticket_prefix, self.today, &mut self.rng);
        let receipt = ConfirmedBooking::from_draft(ticket, &self.draft, name, phone).ok_or_else(|| {
            TransitionError::MissingSelection(self.draft.missing_selection().unwrap_or("booking"))
        })?;

        tracing::info!("[wizard] Booking confirmed: {}", receipt.ticket);
        self.receipt = Some(receipt);
        Ok(self.advance_to(WizardStep::Success))
    }

    fn submit(&mut self) -> Result<WizardStep, TransitionError> {
        self.begin_submission()?;

        let delay = self.config.submit_delay();
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        self.finish_submission()
    }

    pub fn go_back(&mut self) -> NavigationResult {
        if self.submitting {
            return NavigationResult::Blocked {
                reason: "Submission in progress".to_string(),
            };
        }
        if self.step == WizardStep::Success {
            return NavigationResult::Completed;
        }

        match self.step.previous() {
            Some(prev) => NavigationResult::Success(self.advance_to(prev)),
            None => NavigationResult::Blocked {
                reason: "Already at first step".to_string(),
            },
        }
    }

    /// Discard the draft and start over
    pub fn reset(&mut self) {
        self.step = WizardStep::default();
        self.draft = BookingDraft::new();
        self.slots.clear();
        self.recommendation = None;
        self.pending = None;
        self.receipt = None;
        self.submitting = false;
        tracing::debug!("[wizard] Reset");
    }

    // ---- booking history ----

    pub fn open_history(&mut self) -> Result<WizardStep, TransitionError> {
        self.ensure_step(WizardStep::BranchSelection)?;
        Ok(self.advance_to(WizardStep::MyBookings))
    }

    pub fn history_search_ready(&self, phone: &str) -> bool {
        search_ready(phone)
    }

    pub fn search_history(&self, phone: &str) -> Result<Vec<&BookingRecord>, TransitionError> {
        self.ensure_step(WizardStep::MyBookings)?;
        Ok(search_by_phone(&self.catalog.history, phone))
    }

    // ---- advisor ----

    /// Ask `advisor` in the background. Any previous request is dropped.
    pub fn request_recommendation(&mut self, advisor: Arc<dyn ServiceAdvisor>, prompt: &str) -> bool {
        if self.step != WizardStep::ServiceSelection || self.submitting {
            return false;
        }

        self.recommendation = None;
        self.pending = RecommendationRequest::spawn(advisor, prompt, &self.catalog.services);
        self.pending.is_some()
    }

    /// Pick up a finished background request
    pub fn poll_recommendation(&mut self) -> AdvisorOutcome {
        let Some(request) = self.pending.as_mut() else {
            return match &self.recommendation {
                Some(r) => AdvisorOutcome::Recommended(r.clone()),
                None => AdvisorOutcome::NoRecommendation,
            };
        };

        let outcome = request.poll();
        if !outcome.is_pending() {
            self.pending = None;
            self.apply_recommendation(outcome.clone().into_recommendation());
        }
        outcome
    }

    /// Annotate the service list. Ignored off the service step or for
    /// services not in the catalog.
    pub fn apply_recommendation(&mut self, recommendation: Option<Recommendation>) -> bool {
        if self.step != WizardStep::ServiceSelection {
            return false;
        }

        match recommendation {
            Some(r) if self.catalog.service(&r.service_id).is_some() => {
                self.recommendation = Some(r);
                true
            }
            _ => {
                self.recommendation = None;
                false
            }
        }
    }

    // ---- helpers ----

    fn ensure_active(&self) -> Result<(), TransitionError> {
        if self.submitting {
            return Err(TransitionError::SubmissionInFlight);
        }
        if self.step == WizardStep::Success {
            return Err(TransitionError::AlreadyCompleted);
        }
        Ok(())
    }

    fn ensure_step(&self, expected: WizardStep) -> Result<(), TransitionError> {
        self.ensure_active()?;
        if self.step != expected {
            return Err(TransitionError::WrongStep {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }

    fn advance_to(&mut self, step: WizardStep) -> WizardStep {
        if self.step == WizardStep::ServiceSelection && step != WizardStep::ServiceSelection {
            // Leaving the service step cancels the advisor
            self.pending = None;
            self.recommendation = None;
        }

        tracing::debug!("[wizard] {} -> {}", self.step, step);
        self.step = step;
        step
    }

    fn reject(&self, err: TransitionError) -> TransitionError {
        tracing::debug!("[wizard] Rejected on {}: {}", self.step, err);
        err
    }

    fn build_slots(&mut self, date: NaiveDate) -> Vec<TimeSlot> {
        let mut slots = generate_time_slots(&self.catalog.shop);

        match self.config.slot_strategy {
            SlotStrategy::Fixed => {}
            SlotStrategy::Randomized { .. } => self.config.slot_strategy.randomize(&mut slots, &mut self.rng),
            SlotStrategy::Staffed => {
                if let Some(service) = &self.draft.service {
                    for slot in slots.iter_mut() {
                        slot.available = any_staff_available(&self.catalog, &service.id, date, &slot.time);
                    }
                }
            }
        }

        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::UnavailableReason;
    use crate::error::ContactError;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn wizard_with(strategy: SlotStrategy) -> BookingWizard {
        let config = AppConfig {
            slot_strategy: strategy,
            submit_delay_ms: 0,
            ..AppConfig::default()
        };
        BookingWizard::new(Catalog::embedded().unwrap(), config)
            .with_today(date(2025, 12, 8))
            .with_rng_seed(7)
    }

    fn wizard() -> BookingWizard {
        wizard_with(SlotStrategy::Fixed)
    }

    fn at_staff_step(wizard: &mut BookingWizard) {
        wizard.select_branch("b-siam").unwrap();
        wizard.select_service("thai-traditional").unwrap();
        wizard.select_date(date(2025, 12, 9)).unwrap();
        wizard.select_time_slot("10:00").unwrap();
    }

    #[test]
    fn test_new_wizard() {
        let wizard = wizard();
        assert_eq!(wizard.step(), WizardStep::BranchSelection);
        assert_eq!(wizard.branches().len(), 3);
        assert!(wizard.time_slots().is_empty());
        assert!(wizard.receipt().is_none());
        assert!(wizard.summary().is_none());
    }

    #[test]
    fn test_full_booking() {
        let mut wizard = wizard();
        at_staff_step(&mut wizard);

        assert_eq!(wizard.select_staff("s04"), Ok(WizardStep::Confirmation));
        assert_eq!(wizard.confirm("Somchai", "081-234-5678"), Ok(WizardStep::Success));

        let receipt = wizard.receipt().unwrap();
        assert!(receipt.ticket.starts_with("SS-251208-"), "{}", receipt.ticket);
        assert_eq!(receipt.staff_name, "Napa");
        assert_eq!(receipt.customer_phone, "0812345678");
        assert_eq!(receipt.time, "10:00");
    }

    #[test]
    fn test_back_at_first_step() {
        let mut wizard = wizard();

        let result = wizard.go_back();
        assert!(matches!(result, NavigationResult::Blocked { .. }));
        assert_eq!(wizard.step(), WizardStep::BranchSelection);
        assert!(wizard.draft().branch.is_none());
    }

    #[test]
    fn test_back_keeps_selections() {
        let mut wizard = wizard();
        wizard.select_branch("b-siam").unwrap();
        wizard.select_service("aroma-oil").unwrap();

        assert_eq!(wizard.go_back(), NavigationResult::Success(WizardStep::ServiceSelection));
        assert_eq!(wizard.draft().service.as_ref().unwrap().id, "aroma-oil");

        assert_eq!(wizard.next(), Ok(WizardStep::DateSelection));
    }

    #[test]
    fn test_next_without_selection_rejected() {
        let mut wizard = wizard();

        let err = wizard.next().unwrap_err();
        assert_eq!(err, TransitionError::MissingSelection("branch"));
        assert_eq!(wizard.step(), WizardStep::BranchSelection);

        wizard.select_branch("b-siam").unwrap();
        assert_eq!(wizard.next(), Err(TransitionError::MissingSelection("service")));
        assert_eq!(wizard.step(), WizardStep::ServiceSelection);
    }

    #[test]
    fn test_wrong_step_rejected() {
        let mut wizard = wizard();
        let err = wizard.select_service("thai-traditional").unwrap_err();
        assert_eq!(
            err,
            TransitionError::WrongStep {
                expected: WizardStep::ServiceSelection,
                actual: WizardStep::BranchSelection,
            }
        );
    }

    #[test]
    fn test_unknown_ids_rejected() {
        let mut wizard = wizard();
        assert_eq!(
            wizard.select_branch("b-nowhere"),
            Err(TransitionError::UnknownBranch("b-nowhere".to_string()))
        );
        wizard.select_branch("b-siam").unwrap();
        assert!(matches!(
            wizard.select_service("hot-stone"),
            Err(TransitionError::UnknownService(_))
        ));
    }

    #[test]
    fn test_holiday_and_window() {
        let mut wizard = wizard();
        wizard.select_branch("b-siam").unwrap();
        wizard.select_service("thai-traditional").unwrap();

        let holiday = date(2025, 12, 12);
        assert_eq!(wizard.select_date(holiday), Err(TransitionError::Holiday(holiday)));

        let past = date(2025, 12, 1);
        assert_eq!(wizard.select_date(past), Err(TransitionError::OutsideWindow(past)));

        let far = date(2026, 1, 30);
        assert_eq!(wizard.select_date(far), Err(TransitionError::OutsideWindow(far)));

        assert_eq!(wizard.step(), WizardStep::DateSelection);
        assert!(wizard.date_options().iter().any(|d| d.date == holiday && !d.selectable()));
    }

    #[test]
    fn test_fixed_slots_all_available() {
        let mut wizard = wizard();
        wizard.select_branch("b-siam").unwrap();
        wizard.select_service("thai-traditional").unwrap();
        wizard.select_date(date(2025, 12, 9)).unwrap();

        let slots = wizard.time_slots();
        assert_eq!(slots.len(), 20);
        assert_eq!(slots[0].time, "10:00");
        assert!(slots.iter().all(|s| s.available));
        assert!(matches!(
            wizard.select_time_slot("09:30"),
            Err(TransitionError::UnknownTimeSlot(_))
        ));
    }

    #[test]
    fn test_staffed_slots_follow_schedules() {
        let mut wizard = wizard_with(SlotStrategy::Staffed);
        wizard.select_branch("b-siam").unwrap();
        wizard.select_service("aroma-oil").unwrap();
        wizard.select_date(date(2025, 12, 9)).unwrap();

        // Napa is free all day, so every aroma slot stays open
        assert!(wizard.time_slots().iter().all(|s| s.available));
    }

    #[test]
    fn test_staffed_slots_rebuilt_on_service_change() {
        let catalog = Catalog::from_json(
            r#"{
              "branches": [{ "id": "b1", "name": "Branch", "location": "Here" }],
              "services": [
                { "id": "x", "name": "Service X", "description": "", "duration": 60, "price": 100 },
                { "id": "y", "name": "Service Y", "description": "", "duration": 60, "price": 100 }
              ],
              "staff": [
                { "id": "tx", "name": "Only X", "role": "Therapist", "specialty": ["x"] },
                { "id": "ty", "name": "Only Y", "role": "Therapist", "specialty": ["y"] }
              ],
              "schedules": [
                { "staff_id": "tx", "off_days": [], "busy_slots": { "2030-01-02": ["09:00"] } },
                { "staff_id": "ty", "off_days": [], "busy_slots": { "2030-01-02": ["10:00"] } }
              ],
              "shop": { "open_hour": 9, "close_hour": 11, "slot_interval": 60, "holidays": [] }
            }"#,
            "<test>",
        )
        .unwrap();
        let config = AppConfig {
            slot_strategy: SlotStrategy::Staffed,
            submit_delay_ms: 0,
            ..AppConfig::default()
        };
        let mut wizard = BookingWizard::new(catalog, config).with_today(date(2030, 1, 1));

        let availability = |wizard: &BookingWizard| -> Vec<(String, bool)> {
            wizard.time_slots().iter().map(|s| (s.time.clone(), s.available)).collect()
        };

        wizard.select_branch("b1").unwrap();
        wizard.select_service("x").unwrap();
        wizard.select_date(date(2030, 1, 2)).unwrap();
        assert_eq!(
            availability(&wizard),
            vec![("09:00".to_string(), false), ("10:00".to_string(), true)]
        );
        wizard.select_time_slot("10:00").unwrap();

        wizard.go_back();
        wizard.go_back();
        wizard.go_back();
        assert_eq!(wizard.step(), WizardStep::ServiceSelection);

        wizard.select_service("y").unwrap();
        assert_eq!(
            availability(&wizard),
            vec![("09:00".to_string(), true), ("10:00".to_string(), false)]
        );
        assert!(wizard.draft().time_slot.is_none());

        wizard.select_date(date(2030, 1, 2)).unwrap();
        assert_eq!(
            wizard.select_time_slot("10:00"),
            Err(TransitionError::SlotUnavailable("10:00".to_string()))
        );
    }

    #[test]
    fn test_randomized_slots_unavailable_when_zero() {
        let mut wizard = wizard_with(SlotStrategy::Randomized { availability: 0.0 });
        wizard.select_branch("b-siam").unwrap();
        wizard.select_service("thai-traditional").unwrap();
        wizard.select_date(date(2025, 12, 9)).unwrap();

        assert!(wizard.time_slots().iter().all(|s| !s.available));
        assert_eq!(
            wizard.select_time_slot("10:00"),
            Err(TransitionError::SlotUnavailable("10:00".to_string()))
        );
    }

    #[test]
    fn test_randomized_slots_are_stable_per_date() {
        let mut wizard = wizard_with(SlotStrategy::Randomized { availability: 0.5 });
        let flags = |wizard: &BookingWizard| -> Vec<bool> { wizard.time_slots().iter().map(|s| s.available).collect() };

        wizard.select_branch("b-siam").unwrap();
        wizard.select_service("thai-traditional").unwrap();
        wizard.select_date(date(2025, 12, 9)).unwrap();
        let first = flags(&wizard);

        wizard.go_back();
        wizard.select_date(date(2025, 12, 9)).unwrap();
        assert_eq!(flags(&wizard), first);

        // Book a slot, then pick another date and come back
        let open = wizard.time_slots().iter().find(|s| s.available).unwrap().time.clone();
        wizard.select_time_slot(&open).unwrap();
        wizard.select_staff("s04").unwrap();
        assert!(wizard.draft().staff.is_some());

        wizard.go_back();
        wizard.go_back();
        wizard.go_back();
        assert_eq!(wizard.step(), WizardStep::DateSelection);

        wizard.select_date(date(2025, 12, 11)).unwrap();
        assert!(wizard.draft().time_slot.is_none());
        assert!(wizard.draft().staff.is_none());

        wizard.go_back();
        wizard.select_date(date(2025, 12, 9)).unwrap();
        assert_eq!(wizard.draft().date, Some(date(2025, 12, 9)));
        assert!(wizard.draft().time_slot.is_none());
        assert!(wizard.draft().staff.is_none());
    }

    #[test]
    fn test_staff_rejections() {
        let mut wizard = wizard();
        at_staff_step(&mut wizard);

        assert_eq!(
            wizard.select_staff("s01"),
            Err(TransitionError::StaffUnavailable {
                staff: "Somsri".to_string(),
                reason: UnavailableReason::Busy,
            })
        );
        assert!(matches!(
            wizard.select_staff("s03"),
            Err(TransitionError::MissingSpecialty { .. })
        ));
        assert_eq!(wizard.step(), WizardStep::StaffSelection);

        let options = wizard.staff_options();
        let ids: Vec<&str> = options.iter().map(|o| o.staff.id.as_str()).collect();
        assert_eq!(ids, vec!["s01", "s02", "s04"]);
        assert!(!options[0].selectable());
    }

    #[test]
    fn test_new_date_clears_downstream() {
        let mut wizard = wizard();
        at_staff_step(&mut wizard);
        wizard.select_staff("s04").unwrap();

        wizard.go_back();
        wizard.go_back();
        wizard.go_back();
        assert_eq!(wizard.step(), WizardStep::DateSelection);

        wizard.select_date(date(2025, 12, 11)).unwrap();
        assert!(wizard.draft().time_slot.is_none());
        assert!(wizard.draft().staff.is_none());
    }

    #[test]
    fn test_invalid_contact_blocks_submit() {
        let mut wizard = wizard();
        at_staff_step(&mut wizard);
        wizard.select_staff("s04").unwrap();

        let err = wizard.confirm("  ", "0712345678").unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidContact(vec![ContactError::EmptyName, ContactError::InvalidPhone])
        );
        assert_eq!(wizard.step(), WizardStep::Confirmation);
        assert!(!wizard.is_submitting());

        // Going back is still allowed
        assert_eq!(wizard.go_back(), NavigationResult::Success(WizardStep::StaffSelection));
    }

    #[test]
    fn test_submission_in_flight_blocks_everything() {
        let mut wizard = wizard();
        at_staff_step(&mut wizard);
        wizard.select_staff("s04").unwrap();
        wizard.update_name("Somchai").unwrap();
        wizard.update_phone("0812345678").unwrap();

        wizard.begin_submission().unwrap();
        assert!(wizard.is_submitting());
        assert_eq!(wizard.begin_submission(), Err(TransitionError::SubmissionInFlight));
        assert_eq!(wizard.next(), Err(TransitionError::SubmissionInFlight));
        assert!(matches!(wizard.go_back(), NavigationResult::Blocked { .. }));

        assert_eq!(wizard.finish_submission(), Ok(WizardStep::Success));
        assert_eq!(wizard.finish_submission(), Err(TransitionError::NotSubmitting));
    }

    #[test]
    fn test_success_is_terminal_until_reset() {
        let mut wizard = wizard();
        at_staff_step(&mut wizard);
        wizard.select_staff("s04").unwrap();
        wizard.confirm("Somchai", "0812345678").unwrap();

        assert_eq!(wizard.go_back(), NavigationResult::Completed);
        assert_eq!(wizard.next(), Err(TransitionError::AlreadyCompleted));
        assert_eq!(wizard.step(), WizardStep::Success);

        wizard.reset();
        assert_eq!(wizard.step(), WizardStep::BranchSelection);
        assert_eq!(wizard.draft(), &BookingDraft::new());
        assert!(wizard.receipt().is_none());
    }

    #[test]
    fn test_history_branch() {
        let mut wizard = wizard();
        assert!(wizard.search_history("0812345678").is_err());

        assert_eq!(wizard.open_history(), Ok(WizardStep::MyBookings));
        let found = wizard.search_history("0812345678").unwrap();
        assert_eq!(found.len(), 2);
        assert!(wizard.history_search_ready("081-234-5678"));
        assert_eq!(wizard.next(), Err(TransitionError::NoNextStep(WizardStep::MyBookings)));

        assert_eq!(wizard.go_back(), NavigationResult::Success(WizardStep::BranchSelection));
    }

    #[test]
    fn test_recommendation_only_on_service_step() {
        let mut wizard = wizard();
        let suggestion = Recommendation {
            service_id: "office-syndrome".to_string(),
            reasoning: "Desk work".to_string(),
        };

        assert!(!wizard.apply_recommendation(Some(suggestion.clone())));

        wizard.select_branch("b-siam").unwrap();
        assert!(wizard.apply_recommendation(Some(suggestion)));
        let flagged: Vec<&str> = wizard
            .service_options()
            .iter()
            .filter(|o| o.recommended)
            .map(|o| o.service.id.as_str())
            .collect();
        assert_eq!(flagged, vec!["office-syndrome"]);

        wizard.select_service("thai-traditional").unwrap();
        assert!(wizard.recommendation().is_none());
    }

    #[test]
    fn test_background_recommendation() {
        let mut wizard = wizard();
        wizard.select_branch("b-siam").unwrap();

        let advisor: Arc<dyn ServiceAdvisor> = Arc::new(crate::advisor::KeywordAdvisor::default());
        assert!(!wizard.request_recommendation(advisor.clone(), "   "));
        assert!(wizard.request_recommendation(advisor, "my feet hurt"));

        let mut outcome = wizard.poll_recommendation();
        for _ in 0..200 {
            if !outcome.is_pending() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
            outcome = wizard.poll_recommendation();
        }

        assert_eq!(wizard.recommendation().map(|r| r.service_id.as_str()), Some("foot-massage"));
    }
}
