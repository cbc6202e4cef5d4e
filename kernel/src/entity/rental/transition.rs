use error_stack::Report;
use time::Date;

use crate::entity::{
    CancellationReason, Cents, CounterProposal, CreatedAt, DateChangeRequest, Party, PickupNote,
    RejectionReason, Rental, RentalId, RentalOperation, RentalPeriod, RentalStatus, ReturnReport,
    Tool, UpdatedAt, UserId, Version,
};
use crate::pricing::calculate_rental_cost;
use crate::KernelError;

/// Postings owed when a rental is returned.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Settlement {
    /// Credit to the owner.
    pub payout: Cents,
    /// Charge (negative) or credit to the renter; zero when nothing is owed.
    pub adjustment: Cents,
}

/// Money consequence of cancelling a rental.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Cancellation {
    /// Nothing was charged yet.
    Free,
    /// The renter was already debited this amount and is owed it back; the
    /// tool had been reserved and must be released.
    Refund(Cents),
}

impl Rental {
    /// Opens a new request for `tool`, pricing it from a snapshot of the
    /// tool's current price sheet.
    pub fn request(
        id: RentalId,
        tool: &Tool,
        renter_id: UserId,
        period: RentalPeriod,
    ) -> error_stack::Result<Self, KernelError> {
        if !tool.is_available() {
            return Err(Report::new(KernelError::InvalidState).attach_printable(format!(
                "Tool {} is {} and cannot be requested",
                tool.id(),
                tool.status()
            )));
        }
        if tool.owner_id() == &renter_id {
            return Err(Report::new(KernelError::InvalidInput)
                .attach_printable("Owners cannot rent their own tool"));
        }
        let price = tool.price_snapshot();
        let total_cost = calculate_rental_cost(period.start(), period.end(), &price)?;
        Ok(Self::new(
            id,
            tool.org_id().clone(),
            tool.id().clone(),
            renter_id,
            tool.owner_id().clone(),
            period,
            None,
            price,
            total_cost,
            RentalStatus::Pending,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            Version::initial(),
            CreatedAt::now(),
            UpdatedAt::now(),
        ))
    }

    fn authorize(
        &self,
        actor: &UserId,
        operation: RentalOperation,
    ) -> error_stack::Result<(), KernelError> {
        let permitted = match operation.party() {
            Party::Renter => actor == &self.renter_id,
            Party::Owner => actor == &self.owner_id,
            Party::Either => self.is_party(actor),
        };
        if !permitted {
            return Err(Report::new(KernelError::Unauthorized).attach_printable(format!(
                "User {actor} may not {operation} rental {}",
                self.id
            )));
        }
        if !operation.permits(self.status) {
            return Err(Report::new(KernelError::InvalidState).attach_printable(format!(
                "Cannot {operation} rental {} while it is {}",
                self.id, self.status
            )));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.version = self.version.next();
        self.updated_at = UpdatedAt::now();
    }

    pub fn approve(
        &mut self,
        actor: &UserId,
        pickup_note: Option<PickupNote>,
    ) -> error_stack::Result<(), KernelError> {
        self.authorize(actor, RentalOperation::Approve)?;
        self.pickup_note = pickup_note;
        self.status = RentalStatus::Approved;
        self.touch();
        Ok(())
    }

    pub fn reject(
        &mut self,
        actor: &UserId,
        reason: Option<RejectionReason>,
    ) -> error_stack::Result<(), KernelError> {
        self.authorize(actor, RentalOperation::Reject)?;
        self.rejection_reason = reason;
        self.status = RentalStatus::Rejected;
        self.touch();
        Ok(())
    }

    /// Commits the renter to the booking. `tool` must be the locked, current
    /// row of the rented tool. Returns the amount to debit from the renter.
    pub fn finalize(
        &mut self,
        actor: &UserId,
        tool: &Tool,
    ) -> error_stack::Result<Cents, KernelError> {
        self.authorize(actor, RentalOperation::Finalize)?;
        if tool.id() != &self.tool_id {
            return Err(Report::new(KernelError::Internal).attach_printable(format!(
                "Rental {} is for tool {}, not {}",
                self.id,
                self.tool_id,
                tool.id()
            )));
        }
        if !tool.is_available() {
            return Err(Report::new(KernelError::InvalidState).attach_printable(format!(
                "Tool {} is {}; another rental was finalized first",
                tool.id(),
                tool.status()
            )));
        }
        self.last_agreed_end_date = Some(self.period.end());
        self.status = RentalStatus::Scheduled;
        self.touch();
        Ok(self.total_cost)
    }

    pub fn activate(&mut self, actor: &UserId) -> error_stack::Result<(), KernelError> {
        self.authorize(actor, RentalOperation::Activate)?;
        self.status = RentalStatus::Active;
        self.touch();
        Ok(())
    }

    /// Closes the rental. Returns the amount owed to the owner, which is the
    /// agreed cost adjusted by the surcharge or credit in `report`, and the
    /// matching adjustment for the renter.
    pub fn complete(
        &mut self,
        actor: &UserId,
        report: ReturnReport,
    ) -> error_stack::Result<Settlement, KernelError> {
        self.authorize(actor, RentalOperation::Complete)?;
        let surcharge = *report.surcharge_or_credit();
        let settlement = Settlement {
            payout: self.total_cost.checked_add(surcharge)?,
            adjustment: surcharge.checked_neg()?,
        };
        self.completed_by = Some(actor.clone());
        self.return_report = Some(report);
        self.status = RentalStatus::Completed;
        self.touch();
        Ok(settlement)
    }

    pub fn cancel(
        &mut self,
        actor: &UserId,
        reason: Option<CancellationReason>,
    ) -> error_stack::Result<Cancellation, KernelError> {
        self.authorize(actor, RentalOperation::Cancel)?;
        let cancellation = match self.status {
            RentalStatus::Scheduled => Cancellation::Refund(self.total_cost),
            _ => Cancellation::Free,
        };
        self.cancellation_reason = reason;
        self.status = RentalStatus::Cancelled;
        self.touch();
        Ok(cancellation)
    }

    /// Records a proposal to move the rental to `proposed`. `current` is the
    /// range the caller believes is committed and must match it.
    pub fn request_date_change(
        &mut self,
        actor: &UserId,
        current: RentalPeriod,
        proposed: RentalPeriod,
    ) -> error_stack::Result<(), KernelError> {
        self.authorize(actor, RentalOperation::ChangeDates)?;
        if current != self.period {
            return Err(Report::new(KernelError::InvalidInput).attach_printable(format!(
                "Rental {} runs {} to {}, not {} to {}",
                self.id,
                self.period.start(),
                self.period.end(),
                current.start(),
                current.end()
            )));
        }
        if proposed == self.period {
            return Err(Report::new(KernelError::InvalidInput)
                .attach_printable("Proposed dates are the same as the current dates"));
        }
        if self.status == RentalStatus::Active && proposed.start() != self.period.start() {
            return Err(Report::new(KernelError::InvalidInput)
                .attach_printable("The start date of a picked-up rental cannot move"));
        }
        let total_cost = calculate_rental_cost(proposed.start(), proposed.end(), &self.price)?;
        self.date_change = Some(DateChangeRequest::new(
            proposed,
            total_cost,
            actor.clone(),
            self.status,
        ));
        self.counter_proposal = None;
        self.status = RentalStatus::ReturnDateChanged;
        self.touch();
        Ok(())
    }

    fn pending_date_change(&self) -> error_stack::Result<&DateChangeRequest, KernelError> {
        self.date_change.as_ref().ok_or_else(|| {
            Report::new(KernelError::Internal).attach_printable(format!(
                "Rental {} is {} but has no pending date change",
                self.id, self.status
            ))
        })
    }

    /// Makes `period` and `total_cost` the agreed terms. Returns how much the
    /// cost moved, positive when the renter owes more.
    fn commit_dates(
        &mut self,
        period: RentalPeriod,
        total_cost: Cents,
        prior_status: RentalStatus,
        today: Date,
    ) -> error_stack::Result<Cents, KernelError> {
        let delta = total_cost.checked_sub(self.total_cost)?;
        self.period = period;
        self.last_agreed_end_date = Some(period.end());
        self.total_cost = total_cost;
        self.status = match prior_status {
            RentalStatus::Scheduled => RentalStatus::Scheduled,
            _ if period.end() < today => RentalStatus::Overdue,
            _ => RentalStatus::Active,
        };
        self.date_change = None;
        self.counter_proposal = None;
        self.touch();
        Ok(delta)
    }

    pub fn approve_date_change(
        &mut self,
        actor: &UserId,
        today: Date,
    ) -> error_stack::Result<Cents, KernelError> {
        self.authorize(actor, RentalOperation::ApproveDateChange)?;
        let request = self.pending_date_change()?.clone();
        self.commit_dates(
            *request.period(),
            *request.total_cost(),
            *request.prior_status(),
            today,
        )
    }

    pub fn reject_date_change(
        &mut self,
        actor: &UserId,
        reason: Option<RejectionReason>,
        counter_end_date: Date,
    ) -> error_stack::Result<(), KernelError> {
        self.authorize(actor, RentalOperation::RejectDateChange)?;
        let request = self.pending_date_change()?;
        if counter_end_date == request.period().end() {
            return Err(Report::new(KernelError::InvalidInput).attach_printable(format!(
                "Counter-proposal {counter_end_date} is the date that was requested"
            )));
        }
        let counter_period = RentalPeriod::new(request.period().start(), counter_end_date)?;
        let total_cost = calculate_rental_cost(
            counter_period.start(),
            counter_period.end(),
            &self.price,
        )?;
        self.counter_proposal = Some(CounterProposal::new(counter_end_date, total_cost, reason));
        self.status = RentalStatus::ReturnDateChangeRejected;
        self.touch();
        Ok(())
    }

    pub fn acknowledge_date_change_rejection(
        &mut self,
        actor: &UserId,
        today: Date,
    ) -> error_stack::Result<Cents, KernelError> {
        self.authorize(actor, RentalOperation::AcknowledgeDateChangeRejection)?;
        let request = self.pending_date_change()?.clone();
        let counter = self.counter_proposal.clone().ok_or_else(|| {
            Report::new(KernelError::Internal).attach_printable(format!(
                "Rental {} has no counter-proposal to acknowledge",
                self.id
            ))
        })?;
        let period = RentalPeriod::new(request.period().start(), *counter.end_date())?;
        self.commit_dates(
            period,
            *counter.total_cost(),
            *request.prior_status(),
            today,
        )
    }

    /// Withdraws the pending proposal; the committed terms were never touched.
    pub fn cancel_date_change(&mut self, actor: &UserId) -> error_stack::Result<(), KernelError> {
        self.authorize(actor, RentalOperation::CancelDateChange)?;
        let prior_status = *self.pending_date_change()?.prior_status();
        self.status = prior_status;
        self.date_change = None;
        self.counter_proposal = None;
        self.touch();
        Ok(())
    }

    /// Flips an active rental whose due date has passed. Returns whether
    /// anything changed so sweeps stay idempotent.
    pub fn mark_overdue(&mut self, today: Date) -> bool {
        if self.status == RentalStatus::Active && self.period.end() < today {
            self.status = RentalStatus::Overdue;
            self.touch();
            true
        } else {
            false
        }
    }
}
