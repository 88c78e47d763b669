//! Generic staged flows
//!
//! `RemitAdapter<P>` runs stage-create, stage-disburse, process and search for
//! any partner profile `P`. The cached payload is persisted with the partner
//! code so only the adapter of the same partner will replay it.
//!
//! Process claims the cached row with a CAS `Staged -> Processing` before the
//! partner call. The row moves to `Failed` only on an explicit partner
//! rejection; on a timeout or transport failure the outcome is unknown and the
//! row stays in `Processing` for manual reconciliation.

use async_trait::async_trait;
use chrono::Utc;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::PartnerAdapter;
use super::common::{
    accept_currency, call_partner, echo_fields, ensure_new_order, new_reference_number,
    parse_amount, require_order_id, status_matches, strip_internal_fields,
};
use super::profile::PartnerProfile;
use crate::client::{
    InquireRequest, LocationContext, PartnerClient, PartnerError, PayoutRequest,
    SendMoneyRequest, SendValidateRequest,
};
use crate::money::{Currency, Money};
use crate::remit::error::RemitError;
use crate::remit::history::HistoryGuard;
use crate::remit::records::{
    CachedTxn, DisburseStaged, SendStaged, StagedPayload, TransactionHistory,
};
use crate::remit::state::{HistoryStatus, Step, TxnKind};
use crate::remit::types::{
    Agent, ProcessRemit, RemitResponse, Remittance, SearchRemit, TransactionId,
};
use crate::store::TransactionStore;

/// Confirm call rebuilt from a cached payload
enum ConfirmCall {
    Send(SendMoneyRequest),
    Payout(PayoutRequest),
}

pub struct RemitAdapter<P: PartnerProfile> {
    client: Arc<dyn PartnerClient>,
    store: Arc<dyn TransactionStore>,
    defaults: LocationContext,
    timeout: Duration,
    _profile: PhantomData<fn() -> P>,
}

impl<P: PartnerProfile> RemitAdapter<P> {
    pub fn new(
        client: Arc<dyn PartnerClient>,
        store: Arc<dyn TransactionStore>,
        defaults: LocationContext,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            store,
            defaults,
            timeout,
            _profile: PhantomData,
        }
    }

    /// Start a remittance for this partner with a fresh transaction id
    fn begin(&self, remittance: &mut Remittance) -> TransactionId {
        let id = TransactionId::new();
        remittance.transaction_id = Some(id);
        remittance.partner_code = P::CODE.to_string();
        id
    }

    fn draft(&self, id: TransactionId, kind: TxnKind, remittance: &Remittance) -> HistoryGuard {
        HistoryGuard::new(
            self.store.clone(),
            TransactionHistory::draft(id, P::CODE, kind, remittance),
        )
    }

    // ========================================================================
    // Send
    // ========================================================================

    async fn stage_send(
        &self,
        remittance: &mut Remittance,
        id: TransactionId,
    ) -> Result<RemitResponse, RemitError> {
        require_order_id(remittance)?;
        P::check_send(remittance)?;
        ensure_new_order(self.store.as_ref(), &remittance.order_id).await?;

        let principal = remittance
            .source_amount
            .ok_or_else(|| RemitError::invalid_argument("source amount is required"))?;
        if principal.minor() <= 0 {
            return Err(RemitError::invalid_argument("source amount must be positive"));
        }
        let currency = accept_currency(principal.currency().as_str(), P::ACCEPTED_CURRENCIES)?;

        let request = SendValidateRequest {
            reference_number: new_reference_number(P::CODE),
            order_id: remittance.order_id.clone(),
            location: self.defaults.clone(),
            principal_amount: principal.to_decimal().to_string(),
            currency: currency.to_string(),
            dest_country: remittance.dest_country.clone(),
            remit_type: remittance.remit_type.clone(),
            purpose: remittance.purpose.clone(),
            remitter: remittance.remitter.clone(),
            receiver: remittance.receiver.clone(),
            agent: remittance.agent.clone(),
        };

        let quote = call_partner(
            P::CODE,
            "validate_send",
            self.timeout,
            self.client.validate_send(&request),
        )
        .await
        .map_err(|e| P::handle_error(&e))?;

        if !status_matches(&quote.status, P::QUOTE_ACCEPTED) {
            return Err(RemitError::invalid_argument("quote was not accepted by partner"));
        }
        if !quote.currency.trim().is_empty() && Currency::new(&quote.currency)? != currency {
            return Err(RemitError::invalid_argument(
                "partner quoted in a different currency",
            ));
        }

        let charge = parse_amount(&quote.service_charge, currency)?;
        let tax = parse_amount(&quote.tax, currency)?;
        let gross_total = Money::sum(principal, [charge, tax])?;

        remittance.charge = Some(charge);
        remittance.tax = Some(tax);
        remittance.gross_total = Some(gross_total);
        if !quote.dest_amount.trim().is_empty() {
            let dest_currency = if quote.dest_currency.trim().is_empty() {
                currency
            } else {
                Currency::new(&quote.dest_currency)?
            };
            remittance.dest_amount = Some(parse_amount(&quote.dest_amount, dest_currency)?);
        }
        if !quote.control_number.is_empty() {
            remittance.control_number = quote.control_number.clone();
        }

        let payload = StagedPayload::Send(SendStaged {
            remittance: remittance.clone(),
            request,
            quote,
        });
        let txn = CachedTxn::staged(id, P::CODE, &remittance.agent.user_id, payload);
        self.store.create_cached_txn(&txn).await?;

        info!(
            transaction_id = %id,
            partner = P::CODE,
            order_id = %remittance.order_id,
            gross_total = %gross_total,
            "Send staged"
        );

        Ok(RemitResponse {
            transaction_id: id,
            principal,
            charge,
            tax,
            gross_total,
        })
    }

    // ========================================================================
    // Disburse
    // ========================================================================

    async fn stage_payout(
        &self,
        remittance: &mut Remittance,
        id: TransactionId,
    ) -> Result<(), RemitError> {
        require_order_id(remittance)?;
        if remittance.control_number.trim().is_empty() {
            return Err(RemitError::invalid_argument("control number is required"));
        }
        P::check_disburse(remittance)?;
        ensure_new_order(self.store.as_ref(), &remittance.order_id).await?;

        let request = InquireRequest {
            control_number: remittance.control_number.trim().to_string(),
            reference_number: new_reference_number(P::CODE),
            location: self.defaults.clone(),
        };

        let inquiry = call_partner(
            P::CODE,
            "inquire",
            self.timeout,
            self.client.inquire(&request),
        )
        .await
        .map_err(|e| P::handle_error(&e))?;

        if !status_matches(&inquiry.status, P::AWAITING_PAYMENT) {
            return Err(RemitError::invalid_argument(
                "transaction is not awaiting payment",
            ));
        }
        let currency = accept_currency(&inquiry.currency, P::ACCEPTED_CURRENCIES)?;
        let principal = parse_amount(&inquiry.principal_amount, currency)?;
        if principal.is_zero() {
            return Err(RemitError::invalid_argument("partner reported a zero principal"));
        }

        remittance.source_amount = Some(principal);
        remittance.dest_amount = Some(Money::zero(currency));
        remittance.charge = Some(Money::zero(currency));
        remittance.tax = Some(Money::zero(currency));
        remittance.gross_total = Some(principal);
        if remittance.remitter.name.is_empty() {
            remittance.remitter.name = inquiry.sender_name.clone();
        }
        if remittance.receiver.name.is_empty() {
            remittance.receiver.name = inquiry.receiver_name.clone();
        }
        if remittance.origin_country.is_empty() {
            remittance.origin_country = inquiry.origin_country.clone();
        }
        if remittance.dest_country.is_empty() {
            remittance.dest_country = inquiry.dest_country.clone();
        }

        let payload = StagedPayload::Disburse(DisburseStaged {
            remittance: remittance.clone(),
            request,
            inquiry,
        });
        let txn = CachedTxn::staged(id, P::CODE, &remittance.agent.user_id, payload);
        self.store.create_cached_txn(&txn).await?;

        info!(
            transaction_id = %id,
            partner = P::CODE,
            control_number = %remittance.control_number,
            principal = %principal,
            "Disburse staged"
        );
        Ok(())
    }

    // ========================================================================
    // Process
    // ========================================================================

    fn confirm_call(&self, txn: &CachedTxn, req: &ProcessRemit) -> ConfirmCall {
        // The confirming caller wins over whoever staged the transaction
        let confirming_agent = |staged: &Agent| {
            if req.agent == Agent::default() {
                staged.clone()
            } else {
                req.agent.clone()
            }
        };
        let caller_id = if req.caller_id.is_empty() {
            txn.caller_id.clone()
        } else {
            req.caller_id.clone()
        };

        match &txn.payload {
            StagedPayload::Send(staged) => {
                let mut request = staged.request.clone();
                request.agent = confirming_agent(&staged.request.agent);
                ConfirmCall::Send(SendMoneyRequest {
                    request,
                    quote: staged.quote.clone(),
                    caller_id,
                })
            }
            StagedPayload::Disburse(staged) => {
                let rem = &staged.remittance;
                let inquiry = &staged.inquiry;
                let control_number = if inquiry.control_number.is_empty() {
                    rem.control_number.clone()
                } else {
                    inquiry.control_number.clone()
                };
                let receiver_name = if inquiry.receiver_name.is_empty() {
                    rem.receiver.name.clone()
                } else {
                    inquiry.receiver_name.clone()
                };
                let agent = confirming_agent(&rem.agent);

                ConfirmCall::Payout(PayoutRequest {
                    reference_number: new_reference_number(P::CODE),
                    control_number,
                    location: staged.request.location.clone(),
                    principal_amount: inquiry.principal_amount.clone(),
                    currency: inquiry.currency.clone(),
                    sender_name: inquiry.sender_name.clone(),
                    receiver_name,
                    receiver: rem.receiver.clone(),
                    agent,
                    caller_id,
                    remit_type: rem.remit_type.clone(),
                    purpose: rem.purpose.clone(),
                    echo: echo_fields(&inquiry.extra, P::ECHO_FIELDS),
                })
            }
        }
    }

    /// Call the partner's confirm operation; returns the final control number
    async fn dispatch(&self, call: &ConfirmCall) -> Result<String, PartnerError> {
        match call {
            ConfirmCall::Send(req) => {
                let ack = call_partner(
                    P::CODE,
                    "send_money",
                    self.timeout,
                    self.client.send_money(req),
                )
                .await?;
                [
                    ack.control_number.as_str(),
                    req.quote.control_number.as_str(),
                ]
                .into_iter()
                .find(|c| !c.is_empty())
                .map(str::to_string)
                .ok_or_else(|| PartnerError::internal("partner returned no control number"))
            }
            ConfirmCall::Payout(req) => {
                let ack = call_partner(P::CODE, "payout", self.timeout, self.client.payout(req))
                    .await?;
                if ack.control_number.is_empty() {
                    Ok(req.control_number.clone())
                } else {
                    Ok(ack.control_number)
                }
            }
        }
    }

    async fn confirm(
        &self,
        req: &mut ProcessRemit,
        id: TransactionId,
        loaded: &mut Option<CachedTxn>,
    ) -> Result<(), RemitError> {
        let txn = self
            .store
            .get_cached_txn(id)
            .await?
            .ok_or_else(|| RemitError::not_found("transaction not found"))?;
        *loaded = Some(txn.clone());

        if !txn.partner_code.eq_ignore_ascii_case(P::CODE) {
            return Err(RemitError::invalid_argument(
                "transaction belongs to another partner",
            ));
        }
        if txn.step != Step::Staged {
            return Err(RemitError::invalid_argument(format!(
                "transaction is not staged (step {})",
                txn.step
            )));
        }

        let call = self.confirm_call(&txn, req);

        // Claim before calling the partner
        if !self
            .store
            .update_step_if(id, Step::Staged, Step::Processing)
            .await?
        {
            return Err(RemitError::invalid_argument(
                "transaction is already being processed",
            ));
        }

        match self.dispatch(&call).await {
            Ok(control_number) => {
                if let Err(e) = self
                    .store
                    .update_step_if(id, Step::Processing, Step::Completed)
                    .await
                {
                    error!(
                        transaction_id = %id,
                        error = %e,
                        "Partner confirmed but step update failed"
                    );
                }
                req.control_number = control_number;
                req.processed_at = Some(Utc::now());
                info!(
                    transaction_id = %id,
                    partner = P::CODE,
                    control_number = %req.control_number,
                    "Remittance processed"
                );
                Ok(())
            }
            Err(e) if e.is_partner() => {
                if let Err(store_err) = self
                    .store
                    .update_step_if(id, Step::Processing, Step::Failed)
                    .await
                {
                    error!(
                        transaction_id = %id,
                        error = %store_err,
                        "Failed to mark transaction failed"
                    );
                }
                Err(P::handle_error(&e))
            }
            Err(e) => {
                warn!(
                    transaction_id = %id,
                    partner = P::CODE,
                    class = %e.class,
                    "Confirm outcome unknown, transaction left in PROCESSING"
                );
                Err(P::handle_error(&e))
            }
        }
    }
}

#[async_trait]
impl<P: PartnerProfile> PartnerAdapter for RemitAdapter<P> {
    fn kind(&self) -> &str {
        P::CODE
    }

    fn supports_send(&self) -> bool {
        P::SUPPORTS_SEND
    }

    async fn stage_create_remit(
        &self,
        mut remittance: Remittance,
    ) -> Result<RemitResponse, RemitError> {
        if !P::SUPPORTS_SEND {
            return Err(RemitError::unavailable(format!(
                "{} does not support creating remittances",
                P::NAME
            )));
        }

        let id = self.begin(&mut remittance);
        let mut guard = self.draft(id, TxnKind::Create, &remittance);

        let result = self.stage_send(&mut remittance, id).await;
        if let Err(e) = &result {
            warn!(transaction_id = %id, partner = P::CODE, error = %e, "Send staging failed");
        }

        if let Some(row) = guard.row_mut() {
            row.set_remittance(&remittance);
        }
        guard.finish(&result, HistoryStatus::Staged).await;
        result
    }

    async fn stage_disburse_remit(
        &self,
        mut remittance: Remittance,
    ) -> Result<Remittance, RemitError> {
        let id = self.begin(&mut remittance);
        let mut guard = self.draft(id, TxnKind::Disburse, &remittance);

        let result = self.stage_payout(&mut remittance, id).await;
        if let Err(e) = &result {
            warn!(transaction_id = %id, partner = P::CODE, error = %e, "Disburse staging failed");
        }

        if let Some(row) = guard.row_mut() {
            row.set_remittance(&remittance);
        }
        guard.finish_failure_only(&result).await;
        result.map(|_| remittance)
    }

    async fn process_remit(&self, mut req: ProcessRemit) -> Result<ProcessRemit, RemitError> {
        let id = req
            .transaction_id
            .ok_or_else(|| RemitError::invalid_argument("transaction id is required"))?;

        let mut guard = self.draft(id, TxnKind::Disburse, &Remittance::default());
        let mut loaded = None;

        let result = self.confirm(&mut req, id, &mut loaded).await;
        if let Err(e) = &result {
            warn!(transaction_id = %id, partner = P::CODE, error = %e, "Process failed");
        }

        if let Some(row) = guard.row_mut() {
            if let Some(txn) = &loaded {
                let mut snapshot = txn.payload.remittance().clone();
                if result.is_ok() {
                    snapshot.control_number = req.control_number.clone();
                }
                row.partner_code = txn.partner_code.clone();
                row.kind = txn.kind;
                row.staged_at = txn.created_at;
                row.set_remittance(&snapshot);
            } else {
                row.org_id = req.agent.org_id;
            }
        }
        guard.finish(&result, HistoryStatus::Success).await;
        result.map(|_| req)
    }

    async fn search(&self, mut req: SearchRemit) -> Result<SearchRemit, RemitError> {
        let control_number = req.control_number.trim().to_string();
        if control_number.is_empty() {
            return Err(RemitError::invalid_argument("control number is required"));
        }

        let request = InquireRequest {
            control_number,
            reference_number: new_reference_number(P::CODE),
            location: self.defaults.clone(),
        };
        let inquiry = call_partner(
            P::CODE,
            "inquire",
            self.timeout,
            self.client.inquire(&request),
        )
        .await
        .map_err(|e| P::handle_error(&e))?;

        let currency = Currency::new(&inquiry.currency)?;
        req.principal = Some(parse_amount(&inquiry.principal_amount, currency)?);
        req.other_info = strip_internal_fields(&inquiry)?;
        req.status = inquiry.status;
        if !inquiry.control_number.is_empty() {
            req.control_number = inquiry.control_number;
        }
        req.remitter = inquiry.sender_name;
        req.receiver = inquiry.receiver_name;
        req.origin_country = inquiry.origin_country;
        req.dest_country = inquiry.dest_country;

        info!(
            partner = P::CODE,
            control_number = %req.control_number,
            status = %req.status,
            "Remittance searched"
        );
        Ok(req)
    }
}
