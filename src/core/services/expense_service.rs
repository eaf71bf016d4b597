use tracing::debug;

use crate::domain::{Expense, RecordId};
use crate::store::RecordStore;

use super::{require_name, require_non_negative, ServiceError, ServiceResult};

pub struct ExpenseService;

impl ExpenseService {
    pub fn add(store: &mut RecordStore, mut expense: Expense) -> ServiceResult<RecordId> {
        require_name("Expense item", &expense.item)?;
        require_non_negative("Amount", expense.amount)?;
        expense.item = expense.item.trim().to_string();
        let id = store.add_expense(expense);
        debug!(expense_id = id, "expense added");
        Ok(id)
    }

    pub fn remove(store: &mut RecordStore, id: RecordId) -> ServiceResult<Expense> {
        let removed = store
            .remove_expense(id)
            .ok_or_else(|| ServiceError::not_found("Expense", id))?;
        debug!(expense_id = id, "expense removed");
        Ok(removed)
    }

    pub fn list(store: &RecordStore) -> Vec<&Expense> {
        store.expenses.iter().collect()
    }
}
