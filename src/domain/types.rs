use serde::{Deserialize, Serialize};

pub type ProductId = u64;
pub type CustomerId = u64;
pub type BillId = u64;
pub type ExpenseId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
    pub cost: u64,
    pub available_inventory: u64,
    pub pieces_per_case: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone_number: String,
}

/// An invoice. `products` carries the line items as product snapshots at
/// billing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: BillId,
    pub customer_id: CustomerId,
    pub products: Vec<Product>,
    #[serde(default)]
    pub discount: u64,
    #[serde(default)]
    pub credit_amount: u64,
    pub timestamp: u64,
    #[serde(default)]
    pub gst_applied: bool,
    #[serde(default)]
    pub gst_rate: u64,
    #[serde(default)]
    pub gst_amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub timestamp: u64,
    pub category: String,
    pub amount: u64,
}
