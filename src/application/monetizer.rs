use crate::application::identity::IdentityIssuer;
use crate::application::ledger::BalanceLedger;
use crate::config::MonetizerConfig;
use crate::domain::balance::{Amount, Balance};
use crate::domain::notification::PaymentChunk;
use crate::domain::payer::PayerId;
use crate::domain::ports::{PaymentHandler, PaymentTransportBox};
use crate::domain::receiver::{EndpointPattern, SpspResponse, accepts_spsp};
use crate::error::{MonetizerError, Result};
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// The main entry point for gating resources behind streamed payments.
///
/// `Monetizer` owns the balance ledger and the payment transport. The
/// transport reports incoming chunks through [`PaymentHandler`]; request
/// handlers use [`await_balance`](Monetizer::await_balance) and
/// [`spend`](Monetizer::spend) before releasing a protected resource.
///
/// The ledger does not depend on the transport being connected: balances
/// already accumulated can still be read and spent if connecting fails.
pub struct Monetizer {
    ledger: BalanceLedger,
    transport: PaymentTransportBox,
    identity: IdentityIssuer,
    endpoint: EndpointPattern,
    connected: OnceCell<()>,
}

impl Monetizer {
    /// Creates a new `Monetizer`.
    ///
    /// # Arguments
    ///
    /// * `config` - Balance cap, identity token and endpoint settings.
    /// * `transport` - Connection to the payment network.
    pub fn new(config: &MonetizerConfig, transport: PaymentTransportBox) -> Result<Self> {
        Ok(Self {
            ledger: BalanceLedger::new(config.cap()),
            transport,
            identity: IdentityIssuer::from_config(config),
            endpoint: config.endpoint_pattern()?,
            connected: OnceCell::new(),
        })
    }

    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    pub fn identity(&self) -> &IdentityIssuer {
        &self.identity
    }

    pub fn endpoint(&self) -> &EndpointPattern {
        &self.endpoint
    }

    pub fn is_connected(&self) -> bool {
        self.connected.initialized()
    }

    /// Connects the transport once. Concurrent callers share one attempt; a
    /// failed attempt leaves the monetizer unconnected so a later call retries.
    pub async fn connect(&self) -> Result<()> {
        self.connected
            .get_or_try_init(|| async {
                self.transport.connect().await.inspect_err(|e| {
                    warn!(error = %e, "failed to connect payment transport");
                })?;
                info!("payment transport connected");
                Ok::<(), MonetizerError>(())
            })
            .await
            .map(|_| ())
    }

    /// Answers an SPSP handshake for `payer_id`.
    ///
    /// The returned destination account embeds the payer id, so every chunk
    /// paid to it is credited to that payer.
    pub async fn receive(&self, payer_id: &PayerId, accept: Option<&str>) -> Result<SpspResponse> {
        if !accepts_spsp(accept) {
            return Err(MonetizerError::WrongAcceptHeader(accept.map(str::to_string)));
        }
        self.connect().await?;

        let address = self.transport.generate_address_and_secret()?;
        let destination = address.for_payer(payer_id)?;
        info!(payer = %payer_id, %destination, "issued payment address");
        Ok(SpspResponse::new(destination, &address.shared_secret))
    }

    /// Same as [`receive`](Self::receive), taking the request path and
    /// matching it against the configured endpoint pattern.
    pub async fn receive_path(&self, path: &str, accept: Option<&str>) -> Result<SpspResponse> {
        let payer_id = self
            .endpoint
            .match_path(path)
            .ok_or_else(|| MonetizerError::InvalidPayerId(path.to_string()))?;
        self.receive(&payer_id, accept).await
    }

    pub fn balance_of(&self, payer_id: &PayerId) -> Balance {
        self.ledger.balance_of(payer_id)
    }

    pub async fn await_balance(&self, payer_id: &PayerId, threshold: Amount) -> Result<Balance> {
        self.ledger.await_balance(payer_id, threshold.into()).await
    }

    /// Debits `price`. Call immediately before releasing the resource and
    /// deny access on [`MonetizerError::InsufficientBalance`].
    pub fn spend(&self, payer_id: &PayerId, price: Amount) -> Result<Balance> {
        self.ledger.debit(payer_id, price)
    }
}

impl PaymentHandler for Monetizer {
    fn on_payment(&self, chunk: &PaymentChunk) -> Result<Balance> {
        let payer_id = chunk.payer_id().inspect_err(|e| {
            warn!(destination = %chunk.destination, error = %e, "dropping payment");
        })?;
        self.ledger.credit_raw(&payer_id, &chunk.amount)
    }
}
