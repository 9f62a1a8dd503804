//! Fine payment and invoicing service

use rust_decimal::Decimal;

use crate::{
    error::AppResult,
    models::transaction::{Invoice, Transaction},
    repository::Repository,
};

#[derive(Clone)]
pub struct PaymentsService {
    repository: Repository,
}

impl PaymentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Pay off the recorded fine on one of the caller's borrow records.
    /// Clearing the fine and recording the payment commit together.
    pub async fn pay_fine(
        &self,
        user_id: i32,
        borrowed_book_id: i32,
        amount: Decimal,
    ) -> AppResult<Transaction> {
        self.repository
            .transactions
            .settle_fine(user_id, borrowed_book_id, amount)
            .await
    }

    /// Build an invoice for a past transaction
    pub async fn generate_invoice(&self, transaction_id: i32) -> AppResult<Invoice> {
        self.repository.transactions.get_invoice(transaction_id).await
    }
}
