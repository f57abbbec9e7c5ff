//! The customer-profile workspace: one domain session's page state and the
//! operations a user can trigger against it.
//!
//! RULES:
//!   - Exactly one domain is active per session; switching discards the
//!     directory, the selection and the profile.
//!   - Operations never return errors. Failures become notifications and
//!     existing state is left as it was.
//!   - Each request is attempted once. No retry, no deduplication.
//!   - A profile response is applied only if its selection is still the
//!     current one (generation counter).

use crate::{
    adapter::DomainAdapter,
    client::PredictionClient,
    config::DeskConfig,
    creation::NewCustomerForm,
    directory::{Customer, CustomerDirectory},
    domain::Domain,
    editor::{self, ProfileField},
    error::ChurnResult,
    estimator,
    gauge::{self, RiskBand},
    notification::{describe_failure, Notification, Operation},
    profile::ProfileData,
    rng::PlaceholderIds,
    transport::Transport,
    types::{CustomerId, RiskScore},
};
use serde::{Deserialize, Serialize};

/// Where the current risk score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSource {
    Reset,
    Backend,
    Estimate,
}

/// Handle for one in-flight profile fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTicket {
    generation:      u64,
    pub customer_id: CustomerId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    pub domain:          Domain,
    pub domain_label:    &'static str,
    pub base_url:        String,
    pub customers:       Vec<Customer>,
    pub selected:        Option<Customer>,
    pub profile:         ProfileData,
    pub risk:            RiskScore,
    pub risk_source:     RiskSource,
    pub band:            RiskBand,
    pub band_label:      &'static str,
    pub prediction_date: String,
    pub notifications:   Vec<Notification>,
}

pub struct Workspace<T: Transport> {
    config:        DeskConfig,
    domain:        Domain,
    client:        PredictionClient<T>,
    directory:     CustomerDirectory,
    selected:      Option<Customer>,
    profile:       ProfileData,
    risk:          RiskScore,
    risk_source:   RiskSource,
    ids:           PlaceholderIds,
    generation:    u64,
    notifications: Vec<Notification>,
}

impl<T: Transport> Workspace<T> {
    pub fn new(domain: Domain, config: DeskConfig, transport: T) -> Self {
        let base = config.base_url(domain);
        log::info!("workspace: domain={domain} base={base}");
        Self {
            client:        PredictionClient::new(transport, DomainAdapter::for_domain(domain), base),
            ids:           PlaceholderIds::from_seed_option(config.id_seed),
            config,
            domain,
            directory:     CustomerDirectory::new(),
            selected:      None,
            profile:       ProfileData::default(),
            risk:          RiskScore::RESET,
            risk_source:   RiskSource::Reset,
            generation:    0,
            notifications: Vec::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────

    pub fn domain(&self) -> Domain              { self.domain }
    pub fn base_url(&self) -> &str              { self.client.base() }
    pub fn directory(&self) -> &CustomerDirectory { &self.directory }
    pub fn selected(&self) -> Option<&Customer> { self.selected.as_ref() }
    pub fn profile(&self) -> &ProfileData       { &self.profile }
    pub fn risk(&self) -> RiskScore             { self.risk }
    pub fn risk_source(&self) -> RiskSource     { self.risk_source }
    pub fn band(&self) -> RiskBand              { gauge::band(self.risk) }
    pub fn notifications(&self) -> &[Notification] { &self.notifications }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // ── Domain ────────────────────────────────────────────────────

    /// Start a fresh session on `domain`. Everything tied to the previous
    /// domain is dropped.
    pub fn switch_domain(&mut self, domain: Domain) {
        let base = self.config.base_url(domain);
        log::info!("workspace: switching {} -> {domain} ({base})", self.domain);
        self.domain = domain;
        self.client.retarget(DomainAdapter::for_domain(domain), base);
        self.directory = CustomerDirectory::new();
        self.clear_selection();
    }

    // ── Directory ─────────────────────────────────────────────────

    /// Fetch the customer list. On failure the current list is kept.
    pub fn load_customers(&mut self) -> bool {
        match self.client.fetch_customer_ids() {
            Ok(ids) => {
                if ids.is_empty() {
                    log::info!("workspace: no customers in {} backend", self.domain);
                }
                log::debug!("workspace: fetched {} customer ids", ids.len());
                self.directory.replace_all(CustomerDirectory::from_ids(ids));
                true
            }
            Err(e) => {
                log::error!("workspace: loading customers failed: {e}");
                self.fail(Operation::LoadCustomers, &e);
                false
            }
        }
    }

    pub fn search(&self, query: &str) -> Vec<Customer> {
        self.directory.search(query)
    }

    // ── Selection ─────────────────────────────────────────────────

    /// Select `id` and load its profile.
    pub fn select_customer(&mut self, id: &str) -> bool {
        let Some(ticket) = self.begin_selection(id) else {
            return false;
        };
        let result = self.fetch_selection(&ticket);
        self.finish_selection(ticket, result)
    }

    /// First half of a selection: mark `id` selected and hand out a ticket
    /// for the profile fetch. Unknown ids raise a notification.
    pub fn begin_selection(&mut self, id: &str) -> Option<SelectionTicket> {
        let Some(customer) = self.directory.get(id).cloned() else {
            self.notify(Notification::destructive(
                "Unknown customer",
                format!("Customer {id} is not in the {} list.", self.domain.label()),
            ));
            return None;
        };
        self.generation += 1;
        log::info!("workspace: selected {} (generation {})", customer.id, self.generation);
        self.selected = Some(customer.clone());
        Some(SelectionTicket { generation: self.generation, customer_id: customer.id })
    }

    pub fn fetch_selection(&self, ticket: &SelectionTicket) -> ChurnResult<ProfileData> {
        self.client.fetch_profile(&ticket.customer_id)
    }

    /// Second half of a selection. Results for a superseded ticket are
    /// dropped. Returns whether the profile was replaced.
    pub fn finish_selection(&mut self, ticket: SelectionTicket, result: ChurnResult<ProfileData>) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "workspace: dropping stale profile for {} (generation {} < {})",
                ticket.customer_id, ticket.generation, self.generation,
            );
            return false;
        }
        match result {
            Ok(profile) => {
                self.profile = profile;
                true
            }
            Err(e) => {
                log::error!("workspace: loading profile {} failed: {e}", ticket.customer_id);
                self.fail(Operation::LoadProfile, &e);
                false
            }
        }
    }

    pub fn deselect(&mut self) {
        self.clear_selection();
    }

    // ── Editing ───────────────────────────────────────────────────

    pub fn set_field(&mut self, field: ProfileField, raw: &str) -> bool {
        match editor::set_field(&mut self.profile, field, raw) {
            Ok(()) => true,
            Err(e) => {
                self.fail(Operation::Edit, &e);
                false
            }
        }
    }

    /// Back to default profile and the reset risk score.
    pub fn reset(&mut self) {
        self.profile = ProfileData::default();
        self.set_risk(RiskScore::RESET, RiskSource::Reset);
        self.notify(Notification::info("Reset Complete", "Profile data has been reset to defaults."));
    }

    // ── Scoring ───────────────────────────────────────────────────

    /// Ask the backend for the selected customer's churn risk.
    pub fn run_prediction(&mut self) -> Option<RiskScore> {
        let Some(customer) = self.selected.clone() else {
            self.notify(Notification::info(
                "Select a customer",
                "Choose a customer from the list before running prediction.",
            ));
            return None;
        };
        if customer.id.trim().parse::<f64>().map(|v| !v.is_finite()).unwrap_or(true) {
            self.notify(Notification::destructive("Invalid customer", "Selected customer has an invalid ID."));
            return None;
        }

        match self.client.predict(&customer.id) {
            Ok(score) => {
                log::info!("workspace: prediction for {} = {score}", customer.id);
                self.set_risk(score, RiskSource::Backend);
                self.notify(Notification::info(
                    "Prediction Complete",
                    format!("Churn risk calculated: {}%", score.value()),
                ));
                Some(score)
            }
            Err(e) => {
                log::error!("workspace: prediction for {} failed: {e}", customer.id);
                self.fail(Operation::Predict, &e);
                None
            }
        }
    }

    /// Score the current profile with the offline heuristic.
    pub fn estimate_offline(&mut self) -> RiskScore {
        let score = estimator::estimate(&self.profile);
        self.set_risk(score, RiskSource::Estimate);
        self.notify(Notification::info(
            "Offline Estimate",
            format!("Heuristic churn risk: {}%", score.value()),
        ));
        score
    }

    // ── Creation ──────────────────────────────────────────────────

    /// Submit the new-customer form. On success the customer is listed
    /// once, selected, and scored if the backend returned a prediction.
    pub fn create_customer(&mut self, form: &NewCustomerForm) -> Option<Customer> {
        let payload = match form.to_payload() {
            Ok(p) => p,
            Err(e) => {
                self.fail(Operation::Create, &e);
                return None;
            }
        };

        let placeholder = self.ids.next_id().to_string();
        let ticket = self.directory.begin_creation(placeholder.clone());
        log::info!("workspace: creating customer (placeholder {placeholder})");

        let created = match self.client.create_customer(&payload, &placeholder) {
            Ok(c) => c,
            Err(e) => {
                self.directory.abort_creation(ticket);
                log::error!("workspace: create failed: {e}");
                self.fail(Operation::Create, &e);
                return None;
            }
        };

        let customer = self.directory.commit_creation(ticket, created.id.clone())?;
        self.refresh_after_create(&customer);

        if let Some(ticket) = self.begin_selection(&customer.id) {
            let result = self.fetch_selection(&ticket);
            self.finish_selection(ticket, result);
        }

        if created.recovered {
            self.set_risk(RiskScore::MIN, RiskSource::Reset);
            self.notify(Notification::info(
                "Customer Created",
                format!(
                    "Customer {} was created successfully. Prediction failed - you can run prediction manually.",
                    customer.id
                ),
            ));
        } else {
            if let Some(risk) = created.risk {
                self.set_risk(risk, RiskSource::Backend);
            }
            self.notify(Notification::info(
                "Customer Created Successfully",
                format!("New customer {} has been created and churn risk calculated.", customer.id),
            ));
        }
        Some(customer)
    }

    /// Re-read the list after a creation. A failed refresh is only logged,
    /// and the new customer stays listed either way.
    fn refresh_after_create(&mut self, created: &Customer) {
        match self.client.fetch_customer_ids() {
            Ok(ids) => self.directory.replace_all(CustomerDirectory::from_ids(ids)),
            Err(e) => log::warn!("workspace: refreshing customers after create failed: {e}"),
        }
        self.directory.insert(created.clone());
    }

    // ── Snapshot ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> WorkspaceSnapshot {
        let band = self.band();
        WorkspaceSnapshot {
            domain:          self.domain,
            domain_label:    self.domain.label(),
            base_url:        self.client.base().to_string(),
            customers:       self.directory.to_vec(),
            selected:        self.selected.clone(),
            profile:         self.profile.clone(),
            risk:            self.risk,
            risk_source:     self.risk_source,
            band,
            band_label:      band.label(),
            prediction_date: chrono::Local::now().format("%b %-d, %Y").to_string(),
            notifications:   self.notifications.clone(),
        }
    }

    // ── Internals ─────────────────────────────────────────────────

    fn clear_selection(&mut self) {
        // invalidates any in-flight profile fetch
        self.generation += 1;
        self.selected = None;
        self.profile = ProfileData::default();
        self.set_risk(RiskScore::RESET, RiskSource::Reset);
    }

    fn set_risk(&mut self, score: RiskScore, source: RiskSource) {
        self.risk = score;
        self.risk_source = source;
    }

    fn fail(&mut self, op: Operation, err: &crate::error::ChurnError) {
        let note = describe_failure(self.domain, op, err);
        self.notify(note);
    }

    fn notify(&mut self, note: Notification) {
        log::debug!("workspace: notify [{}] {}", note.title, note.description);
        self.notifications.push(note);
    }
}
