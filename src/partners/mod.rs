//! Partner Adapters
//!
//! One adapter per money-transfer partner, all implementing [`PartnerAdapter`].
//! The four staged operations are shared by [`RemitAdapter`]; each partner
//! module only supplies a [`PartnerProfile`] with its policy and error table.

pub mod adapter;
pub mod common;
pub mod profile;

pub mod bpi;
pub mod cebuana;
pub mod iremit;
pub mod japanremit;
pub mod metrobank;
pub mod ria;
pub mod transfast;
pub mod uniteller;
pub mod ussc;
pub mod wu;

pub use adapter::RemitAdapter;
pub use profile::PartnerProfile;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::client::{HttpPartnerClient, LocationContext, PartnerClient};
use crate::config::AppConfig;
use crate::remit::error::RemitError;
use crate::remit::orchestrator::RegistryError;
use crate::remit::types::{ProcessRemit, RemitResponse, Remittance, SearchRemit};
use crate::store::TransactionStore;

/// Every partner code this build knows how to adapt
pub const ALL_PARTNER_CODES: &[&str] = &[
    wu::WesternUnion::CODE,
    ussc::Ussc::CODE,
    cebuana::Cebuana::CODE,
    ria::Ria::CODE,
    metrobank::Metrobank::CODE,
    bpi::Bpi::CODE,
    iremit::IRemit::CODE,
    transfast::Transfast::CODE,
    uniteller::Uniteller::CODE,
    japanremit::JapanRemit::CODE,
];

/// Four-operation contract of one partner
///
/// Implementations translate partner errors into [`RemitError`] before
/// returning; nothing above this trait sees a partner-specific code.
#[async_trait]
pub trait PartnerAdapter: Send + Sync {
    /// Partner code (constant identity)
    fn kind(&self) -> &str;

    /// Whether `stage_create_remit` can succeed for this partner
    fn supports_send(&self) -> bool;

    async fn stage_create_remit(&self, remittance: Remittance)
    -> Result<RemitResponse, RemitError>;

    async fn stage_disburse_remit(&self, remittance: Remittance)
    -> Result<Remittance, RemitError>;

    async fn process_remit(&self, req: ProcessRemit) -> Result<ProcessRemit, RemitError>;

    async fn search(&self, req: SearchRemit) -> Result<SearchRemit, RemitError>;
}

/// Build the adapter for a partner code
pub fn build_adapter(
    code: &str,
    client: Arc<dyn PartnerClient>,
    store: Arc<dyn TransactionStore>,
    defaults: LocationContext,
    timeout: Duration,
) -> Result<Arc<dyn PartnerAdapter>, RegistryError> {
    fn make<P: PartnerProfile>(
        client: Arc<dyn PartnerClient>,
        store: Arc<dyn TransactionStore>,
        defaults: LocationContext,
        timeout: Duration,
    ) -> Arc<dyn PartnerAdapter> {
        Arc::new(RemitAdapter::<P>::new(client, store, defaults, timeout))
    }

    let code = code.trim().to_ascii_uppercase();
    let adapter = match code.as_str() {
        wu::WesternUnion::CODE => make::<wu::WesternUnion>(client, store, defaults, timeout),
        ussc::Ussc::CODE => make::<ussc::Ussc>(client, store, defaults, timeout),
        cebuana::Cebuana::CODE => make::<cebuana::Cebuana>(client, store, defaults, timeout),
        ria::Ria::CODE => make::<ria::Ria>(client, store, defaults, timeout),
        metrobank::Metrobank::CODE => make::<metrobank::Metrobank>(client, store, defaults, timeout),
        bpi::Bpi::CODE => make::<bpi::Bpi>(client, store, defaults, timeout),
        iremit::IRemit::CODE => make::<iremit::IRemit>(client, store, defaults, timeout),
        transfast::Transfast::CODE => make::<transfast::Transfast>(client, store, defaults, timeout),
        uniteller::Uniteller::CODE => make::<uniteller::Uniteller>(client, store, defaults, timeout),
        japanremit::JapanRemit::CODE => {
            make::<japanremit::JapanRemit>(client, store, defaults, timeout)
        }
        _ => return Err(RegistryError::UnknownPartner(code)),
    };
    Ok(adapter)
}

/// Build the partner client for one configured partner
///
/// `mock://` URLs select the in-process simulator when the `mock-partners`
/// feature is enabled.
fn build_client(
    code: &str,
    base_url: &str,
    timeout: Duration,
) -> Result<Arc<dyn PartnerClient>, RegistryError> {
    if base_url.starts_with("mock://") {
        #[cfg(feature = "mock-partners")]
        {
            return Ok(Arc::new(crate::client::MockPartnerClient::new(code)));
        }
        #[cfg(not(feature = "mock-partners"))]
        {
            return Err(RegistryError::Client(format!(
                "{}: mock partners are disabled in this build",
                code
            )));
        }
    }
    let client = HttpPartnerClient::new(code, base_url, timeout)
        .map_err(|e| RegistryError::Client(format!("{}: {}", code, e)))?;
    Ok(Arc::new(client))
}

/// Build adapters for every enabled partner in the configuration
pub fn build_from_config(
    config: &AppConfig,
    store: Arc<dyn TransactionStore>,
) -> Result<Vec<Arc<dyn PartnerAdapter>>, RegistryError> {
    let mut adapters = Vec::new();
    for partner in config.partners.iter().filter(|p| p.enabled) {
        let timeout = config.partner_timeout(partner);
        let client = build_client(&partner.code, &partner.base_url, timeout)?;
        adapters.push(build_adapter(
            &partner.code,
            client,
            store.clone(),
            partner.defaults.clone(),
            timeout,
        )?);
    }
    Ok(adapters)
}
