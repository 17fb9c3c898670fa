//! Queued action types.
//!
//! Defines the mutation kinds that can be replayed against the backend and
//! the record persisted for each one.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::{Bill, BillId, Customer, CustomerId, Expense, ExpenseId, Product, ProductId};

/// Mutation kinds understood by the remote backend.
///
/// Serialized as the backend method name (`createProduct`, ...). A stored
/// action whose type is not one of these is kept verbatim as `Unknown` so a
/// drain can log it and move on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    CreateCustomer,
    UpdateCustomer,
    DeleteCustomer,
    CreateBill,
    DeleteBill,
    CreateExpense,
    DeleteExpense,
    SyncExpenses,
    Unknown(String),
}

impl ActionType {
    /// Every known action type, in declaration order.
    pub const KNOWN: [Self; 11] = [
        Self::CreateProduct,
        Self::UpdateProduct,
        Self::DeleteProduct,
        Self::CreateCustomer,
        Self::UpdateCustomer,
        Self::DeleteCustomer,
        Self::CreateBill,
        Self::DeleteBill,
        Self::CreateExpense,
        Self::DeleteExpense,
        Self::SyncExpenses,
    ];

    /// Wire name, which doubles as the backend method name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CreateProduct => "createProduct",
            Self::UpdateProduct => "updateProduct",
            Self::DeleteProduct => "deleteProduct",
            Self::CreateCustomer => "createCustomer",
            Self::UpdateCustomer => "updateCustomer",
            Self::DeleteCustomer => "deleteCustomer",
            Self::CreateBill => "createBill",
            Self::DeleteBill => "deleteBill",
            Self::CreateExpense => "createExpense",
            Self::DeleteExpense => "deleteExpense",
            Self::SyncExpenses => "syncExpenses",
            Self::Unknown(name) => name,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::CreateProduct => "Create Product",
            Self::UpdateProduct => "Update Product",
            Self::DeleteProduct => "Delete Product",
            Self::CreateCustomer => "Create Customer",
            Self::UpdateCustomer => "Update Customer",
            Self::DeleteCustomer => "Delete Customer",
            Self::CreateBill => "Create Bill",
            Self::DeleteBill => "Delete Bill",
            Self::CreateExpense => "Create Expense",
            Self::DeleteExpense => "Delete Expense",
            Self::SyncExpenses => "Sync Expenses",
            Self::Unknown(name) => name,
        }
    }

    /// Parse a known wire name. Unknown names are rejected rather than
    /// wrapped, since nothing should create new unknown actions.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::KNOWN.into_iter().find(|t| t.as_str() == name)
    }

    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Whether the payload is a bare identifier rather than an entity.
    #[must_use]
    pub const fn takes_id(&self) -> bool {
        matches!(
            self,
            Self::DeleteProduct | Self::DeleteCustomer | Self::DeleteBill | Self::DeleteExpense
        )
    }
}

impl From<String> for ActionType {
    fn from(name: String) -> Self {
        Self::parse(&name).unwrap_or(Self::Unknown(name))
    }
}

impl From<ActionType> for String {
    fn from(action_type: ActionType) -> Self {
        action_type.as_str().to_string()
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutation that has not been confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedAction {
    /// `<epochMillis>_<random base36>`, unique within the queue.
    pub id: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    /// Full entity for create/update, bare id for delete.
    pub payload: Value,
    /// Enqueue time, milliseconds since epoch.
    pub timestamp: i64,
    /// Failed replay attempts so far.
    #[serde(default)]
    pub retry_count: u32,
}

impl QueuedAction {
    /// Enqueue time as a date.
    #[must_use]
    pub fn queued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

/// A mutation before the queue assigns its id, timestamp and retry count.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAction {
    pub action_type: ActionType,
    pub payload: Value,
}

impl NewAction {
    #[must_use]
    pub const fn new(action_type: ActionType, payload: Value) -> Self {
        Self {
            action_type,
            payload,
        }
    }

    fn entity<T: Serialize>(action_type: ActionType, entity: &T) -> Self {
        let payload = serde_json::to_value(entity).unwrap_or_else(|e| {
            warn!(action = %action_type, error = %e, "failed to encode payload");
            Value::Null
        });
        Self::new(action_type, payload)
    }

    #[must_use]
    pub fn create_product(product: &Product) -> Self {
        Self::entity(ActionType::CreateProduct, product)
    }

    #[must_use]
    pub fn update_product(product: &Product) -> Self {
        Self::entity(ActionType::UpdateProduct, product)
    }

    #[must_use]
    pub fn delete_product(id: ProductId) -> Self {
        Self::new(ActionType::DeleteProduct, Value::from(id))
    }

    #[must_use]
    pub fn create_customer(customer: &Customer) -> Self {
        Self::entity(ActionType::CreateCustomer, customer)
    }

    #[must_use]
    pub fn update_customer(customer: &Customer) -> Self {
        Self::entity(ActionType::UpdateCustomer, customer)
    }

    #[must_use]
    pub fn delete_customer(id: CustomerId) -> Self {
        Self::new(ActionType::DeleteCustomer, Value::from(id))
    }

    #[must_use]
    pub fn create_bill(bill: &Bill) -> Self {
        Self::entity(ActionType::CreateBill, bill)
    }

    #[must_use]
    pub fn delete_bill(id: BillId) -> Self {
        Self::new(ActionType::DeleteBill, Value::from(id))
    }

    #[must_use]
    pub fn create_expense(expense: &Expense) -> Self {
        Self::entity(ActionType::CreateExpense, expense)
    }

    #[must_use]
    pub fn delete_expense(id: ExpenseId) -> Self {
        Self::new(ActionType::DeleteExpense, Value::from(id))
    }

    #[must_use]
    pub fn sync_expenses(expenses: &[Expense]) -> Self {
        Self::entity(ActionType::SyncExpenses, &expenses)
    }
}
