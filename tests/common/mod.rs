//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use frontline::domain::{Bill, BillId, Customer, CustomerId, Expense, ExpenseId, Product, ProductId};
use frontline::error::BackendError;
use frontline::features::sync::RemoteBackend;
use frontline::storage::{MemoryKv, PersistentStore};

/// In-process backend whose behavior each test scripts.
///
/// Records every applied call as `<actionType>:<id>` in arrival order.
#[derive(Default)]
pub struct ScriptedBackend {
    applied: Mutex<Vec<String>>,
    attempts: AtomicUsize,
    offline: AtomicBool,
    rejected: Mutex<HashSet<String>>,
    delay: Mutex<Duration>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Reject every call of `action` until [`accept`](Self::accept).
    pub fn reject(&self, action: &str) {
        self.rejected.lock().unwrap().insert(action.to_string());
    }

    pub fn accept(&self, action: &str) {
        self.rejected.lock().unwrap().remove(action);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn applied(&self) -> Vec<String> {
        self.applied.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    async fn handle(&self, action: &str, id: u64) -> Result<(), BackendError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Network("network error".to_string()));
        }
        if self.rejected.lock().unwrap().contains(action) {
            return Err(BackendError::rejected(422, format!("{action} rejected")));
        }

        self.applied.lock().unwrap().push(format!("{action}:{id}"));
        Ok(())
    }
}

#[async_trait]
impl RemoteBackend for ScriptedBackend {
    async fn create_product(&self, product: &Product) -> Result<(), BackendError> {
        self.handle("createProduct", product.id).await
    }

    async fn update_product(&self, product: &Product) -> Result<(), BackendError> {
        self.handle("updateProduct", product.id).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), BackendError> {
        self.handle("deleteProduct", id).await
    }

    async fn create_customer(&self, customer: &Customer) -> Result<(), BackendError> {
        self.handle("createCustomer", customer.id).await
    }

    async fn update_customer(&self, customer: &Customer) -> Result<(), BackendError> {
        self.handle("updateCustomer", customer.id).await
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<(), BackendError> {
        self.handle("deleteCustomer", id).await
    }

    async fn create_bill(&self, bill: &Bill) -> Result<(), BackendError> {
        self.handle("createBill", bill.id).await
    }

    async fn delete_bill(&self, id: BillId) -> Result<(), BackendError> {
        self.handle("deleteBill", id).await
    }

    async fn create_expense(&self, expense: &Expense) -> Result<(), BackendError> {
        self.handle("createExpense", expense.id).await
    }

    async fn delete_expense(&self, id: ExpenseId) -> Result<(), BackendError> {
        self.handle("deleteExpense", id).await
    }

    async fn sync_expenses(&self, expenses: &[Expense]) -> Result<(), BackendError> {
        self.handle("syncExpenses", expenses.len() as u64).await
    }
}

pub fn memory_store() -> PersistentStore {
    PersistentStore::new(Arc::new(MemoryKv::new()))
}

pub fn product(id: ProductId) -> Product {
    Product {
        id,
        name: format!("Product {id}"),
        price: 120,
        cost: 100,
        available_inventory: 24,
        pieces_per_case: 12,
    }
}

pub fn bill(id: BillId, customer_id: CustomerId) -> Bill {
    Bill {
        id,
        customer_id,
        products: vec![product(1)],
        discount: 0,
        credit_amount: 120,
        timestamp: 1_700_000_000_000,
        gst_applied: false,
        gst_rate: 0,
        gst_amount: 0,
    }
}
