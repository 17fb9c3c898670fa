//! Remote backend proxy.
//!
//! [`RemoteBackend`] is the seam between the sync core and whatever actually
//! applies mutations server-side. [`HttpBackend`] is the shipped proxy: one
//! JSON `POST` per call, named after the action type.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::action::{ActionType, QueuedAction};
use crate::config::BackendConfig;
use crate::domain::{Bill, BillId, Customer, CustomerId, Expense, ExpenseId, Product, ProductId};
use crate::error::BackendError;

/// One method per replayable mutation. Every failure (network,
/// authorization, validation) is a rejection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    async fn create_product(&self, product: &Product) -> Result<(), BackendError>;
    async fn update_product(&self, product: &Product) -> Result<(), BackendError>;
    async fn delete_product(&self, id: ProductId) -> Result<(), BackendError>;
    async fn create_customer(&self, customer: &Customer) -> Result<(), BackendError>;
    async fn update_customer(&self, customer: &Customer) -> Result<(), BackendError>;
    async fn delete_customer(&self, id: CustomerId) -> Result<(), BackendError>;
    async fn create_bill(&self, bill: &Bill) -> Result<(), BackendError>;
    async fn delete_bill(&self, id: BillId) -> Result<(), BackendError>;
    async fn create_expense(&self, expense: &Expense) -> Result<(), BackendError>;
    async fn delete_expense(&self, id: ExpenseId) -> Result<(), BackendError>;
    async fn sync_expenses(&self, expenses: &[Expense]) -> Result<(), BackendError>;
}

/// What happened to a dispatched action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// The backend accepted the mutation.
    Applied,
    /// The action type has no backend call; nothing was sent.
    UnknownType,
}

/// Replay a queued action against `backend`.
///
/// # Errors
///
/// Returns the backend's rejection, or `InvalidPayload` if the payload does
/// not decode into what the action type expects.
pub async fn dispatch(
    backend: &dyn RemoteBackend,
    action: &QueuedAction,
) -> Result<Dispatched, BackendError> {
    let payload = &action.payload;
    let kind = &action.action_type;

    match kind {
        ActionType::CreateProduct => backend.create_product(&decode(kind, payload)?).await?,
        ActionType::UpdateProduct => backend.update_product(&decode(kind, payload)?).await?,
        ActionType::DeleteProduct => backend.delete_product(decode_id(kind, payload)?).await?,
        ActionType::CreateCustomer => backend.create_customer(&decode(kind, payload)?).await?,
        ActionType::UpdateCustomer => backend.update_customer(&decode(kind, payload)?).await?,
        ActionType::DeleteCustomer => backend.delete_customer(decode_id(kind, payload)?).await?,
        ActionType::CreateBill => backend.create_bill(&decode(kind, payload)?).await?,
        ActionType::DeleteBill => backend.delete_bill(decode_id(kind, payload)?).await?,
        ActionType::CreateExpense => backend.create_expense(&decode(kind, payload)?).await?,
        ActionType::DeleteExpense => backend.delete_expense(decode_id(kind, payload)?).await?,
        ActionType::SyncExpenses => {
            let expenses: Vec<Expense> = decode(kind, payload)?;
            backend.sync_expenses(&expenses).await?;
        },
        ActionType::Unknown(_) => return Ok(Dispatched::UnknownType),
    }

    Ok(Dispatched::Applied)
}

/// Check that `payload` decodes into what `kind` expects, without calling
/// anything.
///
/// # Errors
///
/// Returns `InvalidPayload` on a mismatch, including for unknown types.
pub fn validate_payload(kind: &ActionType, payload: &Value) -> Result<(), BackendError> {
    if kind.takes_id() {
        return decode_id(kind, payload).map(drop);
    }

    match kind {
        ActionType::CreateProduct | ActionType::UpdateProduct => {
            decode::<Product>(kind, payload).map(drop)
        },
        ActionType::CreateCustomer | ActionType::UpdateCustomer => {
            decode::<Customer>(kind, payload).map(drop)
        },
        ActionType::CreateBill => decode::<Bill>(kind, payload).map(drop),
        ActionType::CreateExpense => decode::<Expense>(kind, payload).map(drop),
        ActionType::SyncExpenses => decode::<Vec<Expense>>(kind, payload).map(drop),
        ActionType::Unknown(name) => Err(BackendError::InvalidPayload {
            action: name.clone(),
            reason: "unknown action type".to_string(),
        }),
        // id-only types returned above
        _ => Ok(()),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(
    kind: &ActionType,
    payload: &Value,
) -> Result<T, BackendError> {
    serde_json::from_value(payload.clone()).map_err(|e| BackendError::InvalidPayload {
        action: kind.to_string(),
        reason: e.to_string(),
    })
}

/// Ids are big naturals upstream and may have been stored as strings.
pub(crate) fn decode_id(kind: &ActionType, payload: &Value) -> Result<u64, BackendError> {
    let id = match payload {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    id.ok_or_else(|| BackendError::InvalidPayload {
        action: kind.to_string(),
        reason: format!("expected an identifier, got {payload}"),
    })
}

/// JSON-over-HTTP backend proxy.
///
/// `POST <base_url>/<actionType>` with the payload as the body; any 2xx is
/// success.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a proxy for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a proxy from configuration.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` if no base URL is set.
    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or(BackendError::NotConfigured)?;
        Self::new(base_url, config.timeout())
    }

    async fn call<T: Serialize + ?Sized + Sync>(
        &self,
        action: ActionType,
        body: &T,
    ) -> Result<(), BackendError> {
        let url = format!("{}/{}", self.base_url, action.as_str());
        debug!(%url, "calling backend");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(BackendError::rejected(status.as_u16(), message))
    }
}

#[async_trait]
impl RemoteBackend for HttpBackend {
    async fn create_product(&self, product: &Product) -> Result<(), BackendError> {
        self.call(ActionType::CreateProduct, product).await
    }

    async fn update_product(&self, product: &Product) -> Result<(), BackendError> {
        self.call(ActionType::UpdateProduct, product).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), BackendError> {
        self.call(ActionType::DeleteProduct, &id).await
    }

    async fn create_customer(&self, customer: &Customer) -> Result<(), BackendError> {
        self.call(ActionType::CreateCustomer, customer).await
    }

    async fn update_customer(&self, customer: &Customer) -> Result<(), BackendError> {
        self.call(ActionType::UpdateCustomer, customer).await
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<(), BackendError> {
        self.call(ActionType::DeleteCustomer, &id).await
    }

    async fn create_bill(&self, bill: &Bill) -> Result<(), BackendError> {
        self.call(ActionType::CreateBill, bill).await
    }

    async fn delete_bill(&self, id: BillId) -> Result<(), BackendError> {
        self.call(ActionType::DeleteBill, &id).await
    }

    async fn create_expense(&self, expense: &Expense) -> Result<(), BackendError> {
        self.call(ActionType::CreateExpense, expense).await
    }

    async fn delete_expense(&self, id: ExpenseId) -> Result<(), BackendError> {
        self.call(ActionType::DeleteExpense, &id).await
    }

    async fn sync_expenses(&self, expenses: &[Expense]) -> Result<(), BackendError> {
        self.call(ActionType::SyncExpenses, expenses).await
    }
}
