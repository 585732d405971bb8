// SPDX-License-Identifier: GPL-3.0-only

use chrono::NaiveDate;
use posada_utils::pagination::{PaginationAction, PaginationConfig};
use tracing::{debug, warn};

use crate::error::{ApiError, Invalid};
use crate::models::transaction::{
    AppStatus, Transaction, TransactionPage, TransactionQuery, TransactionType,
};

use super::reconcile::{Reconcile, Reconciled, Refetch};
use super::sequence::{Applied, RequestSequence, Ticket};

/// Filters of the ledger, an unset date means "today"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilters {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub transaction_type: Option<TransactionType>,
}

impl TransactionFilters {
    pub fn query(&self, page: u32, today: NaiveDate) -> TransactionQuery {
        TransactionQuery {
            from_date: self.from_date.unwrap_or(today),
            to_date: self.to_date.unwrap_or(today),
            page,
            transaction_type: self.transaction_type,
        }
    }
}

/// A page request the screen has to run, hand the result back with its ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub ticket: Ticket,
    pub query: TransactionQuery,
}

/// Paginated, filterable list of bank transactions
#[derive(Debug, Default)]
pub struct TransactionList {
    filters: TransactionFilters,
    pagination: PaginationConfig,
    transactions: Vec<Transaction>,
    sequence: RequestSequence,
    loading: bool,
    cancelling: Option<i32>,
    page_size: Option<usize>,
}

impl TransactionList {
    pub fn new(page_size: Option<usize>) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn filters(&self) -> &TransactionFilters {
        &self.filters
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Transaction whose cancellation is in flight
    pub fn cancelling(&self) -> Option<i32> {
        self.cancelling
    }

    /// Issues a request for the current filters and page
    pub fn refresh(&mut self, today: NaiveDate) -> ListRequest {
        self.loading = true;
        let request = ListRequest {
            ticket: self.sequence.issue(),
            query: self.filters.query(self.pagination.current_page, today),
        };
        debug!(?request, "transaction list request issued");
        request
    }

    pub fn set_from_date(
        &mut self,
        from_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Option<ListRequest> {
        if self.filters.from_date == from_date {
            return None;
        }
        self.filters.from_date = from_date;
        Some(self.refresh(today))
    }

    pub fn set_to_date(
        &mut self,
        to_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Option<ListRequest> {
        if self.filters.to_date == to_date {
            return None;
        }
        self.filters.to_date = to_date;
        Some(self.refresh(today))
    }

    pub fn set_transaction_type(
        &mut self,
        transaction_type: Option<TransactionType>,
        today: NaiveDate,
    ) -> Option<ListRequest> {
        if self.filters.transaction_type == transaction_type {
            return None;
        }
        self.filters.transaction_type = transaction_type;
        Some(self.refresh(today))
    }

    pub fn paginate(&mut self, action: PaginationAction, today: NaiveDate) -> Option<ListRequest> {
        if self.pagination.apply(action) {
            Some(self.refresh(today))
        } else {
            None
        }
    }

    /// Takes back the answer of a page request.
    ///
    /// Answers to superseded requests are dropped, a failure leaves the
    /// displayed list as it was.
    pub fn apply(
        &mut self,
        ticket: Ticket,
        result: Result<TransactionPage, ApiError>,
    ) -> Result<Applied, ApiError> {
        if !self.sequence.is_latest(ticket) {
            warn!(?ticket, "dropping a stale transaction page");
            return Ok(Applied::Stale);
        }
        self.loading = false;

        let mut page = result?;
        if let Some(page_size) = self.page_size {
            if page.transactions.len() > page_size {
                warn!(
                    received = page.transactions.len(),
                    page_size, "backend sent more rows than a page holds"
                );
                page.transactions.truncate(page_size);
            }
        }

        self.pagination.set_total_pages(page.total_pages);
        self.transactions = page.transactions;
        Ok(Applied::Current)
    }

    /// Validates a cancellation and marks it in flight
    pub fn begin_cancel(&mut self, transaction_id: i32) -> Result<i32, ApiError> {
        if self.cancelling.is_some() {
            return Err(ApiError::Validation(Invalid::MutationInProgress));
        }

        let transaction = self
            .transactions
            .iter()
            .find(|transaction| transaction.id == transaction_id)
            .ok_or(ApiError::Validation(Invalid::UnknownTransaction(
                transaction_id,
            )))?;

        if !transaction.is_cancellable() {
            return Err(ApiError::Validation(Invalid::AlreadyCancelled(
                transaction_id,
            )));
        }

        self.cancelling = Some(transaction_id);
        Ok(transaction_id)
    }

    /// Takes back the answer of a cancellation, a success asks for a fresh page
    pub fn finish_cancel(
        &mut self,
        transaction_id: i32,
        result: Result<AppStatus, ApiError>,
        today: NaiveDate,
    ) -> Result<Option<ListRequest>, ApiError> {
        if self.cancelling == Some(transaction_id) {
            self.cancelling = None;
        }
        result?;

        match Refetch.reconcile(self.transactions.as_mut_slice()) {
            Reconciled::Refetch => Ok(Some(self.refresh(today))),
            Reconciled::Patched => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::TransactionStatus;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn transaction(id: i32, transaction_type: TransactionType) -> Transaction {
        Transaction {
            id,
            code: format!("PT{id:03}"),
            amount: 100_000.0,
            content: String::new(),
            date: day(2).and_hms_opt(9, 0, 0).unwrap(),
            receiver_account: "0123".to_string(),
            status: TransactionStatus::Completed,
            transaction_type,
        }
    }

    fn page(transactions: Vec<Transaction>, total_pages: u32) -> TransactionPage {
        TransactionPage {
            transactions,
            total_pages,
        }
    }

    /// A list filtered on january income, showing page 1 of 3 with two rows
    fn loaded_list() -> TransactionList {
        let mut list = TransactionList::new(None);
        list.set_from_date(Some(day(1)), day(15));
        list.set_to_date(Some(day(31)), day(15));
        let request = list
            .set_transaction_type(Some(TransactionType::Income), day(15))
            .unwrap();
        let rows = vec![
            transaction(1, TransactionType::Income),
            transaction(2, TransactionType::Income),
        ];
        list.apply(request.ticket, Ok(page(rows, 3))).unwrap();
        list
    }

    #[test]
    fn unset_dates_default_to_today() {
        let mut list = TransactionList::new(None);
        let request = list.refresh(day(15));

        assert_eq!(request.query.from_date, day(15));
        assert_eq!(request.query.to_date, day(15));
        assert_eq!(request.query.page, 1);
        assert_eq!(request.query.transaction_type, None);
        assert!(list.is_loading());
    }

    #[test]
    fn every_change_issues_exactly_one_request() {
        let mut list = TransactionList::new(None);

        assert!(list.set_from_date(Some(day(1)), day(15)).is_some());
        assert!(list.set_from_date(Some(day(1)), day(15)).is_none());
        assert!(list.set_to_date(Some(day(31)), day(15)).is_some());
        assert!(list
            .set_transaction_type(Some(TransactionType::Expense), day(15))
            .is_some());
        assert!(list
            .set_transaction_type(Some(TransactionType::Expense), day(15))
            .is_none());
        // single page, nowhere to go
        assert!(list.paginate(PaginationAction::Forward, day(15)).is_none());
        assert!(list.paginate(PaginationAction::Back, day(15)).is_none());
    }

    #[test]
    fn scenario_income_then_expense() {
        let mut list = loaded_list();
        assert_eq!(list.transactions().len(), 2);
        assert_eq!(list.pagination().total_pages, 3);
        assert_eq!(list.pagination().pages().count(), 3);
        assert!(!list.is_loading());

        let request = list
            .set_transaction_type(Some(TransactionType::Expense), day(15))
            .unwrap();
        assert_eq!(
            request.query,
            TransactionQuery {
                from_date: day(1),
                to_date: day(31),
                page: 1,
                transaction_type: Some(TransactionType::Expense),
            }
        );

        let rows = vec![transaction(7, TransactionType::Expense)];
        assert_eq!(
            list.apply(request.ticket, Ok(page(rows, 1))),
            Ok(Applied::Current)
        );
        assert_eq!(list.transactions().len(), 1);
        assert_eq!(list.transactions()[0].id, 7);
        assert_eq!(list.pagination().total_pages, 1);
    }

    #[test]
    fn page_links_move_the_cursor() {
        let mut list = loaded_list();

        let request = list.paginate(PaginationAction::GoTo(3), day(15)).unwrap();
        assert_eq!(request.query.page, 3);
        assert_eq!(list.pagination().current_page, 3);
        assert!(list.paginate(PaginationAction::Forward, day(15)).is_none());

        let request = list.paginate(PaginationAction::Back, day(15)).unwrap();
        assert_eq!(request.query.page, 2);
        assert_eq!(request.query.transaction_type, Some(TransactionType::Income));
    }

    #[test]
    fn filter_change_that_shrinks_the_list_keeps_the_cursor_in_range() {
        let mut list = loaded_list();
        let request = list.paginate(PaginationAction::GoTo(3), day(15)).unwrap();
        list.apply(request.ticket, Ok(page(vec![], 3))).unwrap();

        let request = list
            .set_transaction_type(Some(TransactionType::Expense), day(15))
            .unwrap();
        assert_eq!(request.query.page, 3);
        let rows = vec![transaction(7, TransactionType::Expense)];
        list.apply(request.ticket, Ok(page(rows, 1))).unwrap();

        assert_eq!(list.pagination().current_page, 1);
        assert!(list.pagination().pages().contains(&1));
        assert!(list.paginate(PaginationAction::Back, day(15)).is_none());
        assert!(list.paginate(PaginationAction::Forward, day(15)).is_none());
    }

    #[test]
    fn stale_answers_never_overwrite_newer_state() {
        let mut list = loaded_list();
        let older = list
            .set_transaction_type(Some(TransactionType::Expense), day(15))
            .unwrap();
        let newer = list.set_transaction_type(None, day(15)).unwrap();

        let all_rows = vec![
            transaction(1, TransactionType::Income),
            transaction(7, TransactionType::Expense),
        ];
        assert_eq!(
            list.apply(newer.ticket, Ok(page(all_rows, 1))),
            Ok(Applied::Current)
        );

        let late_rows = vec![transaction(7, TransactionType::Expense)];
        assert_eq!(
            list.apply(older.ticket, Ok(page(late_rows, 5))),
            Ok(Applied::Stale)
        );
        assert_eq!(list.transactions().len(), 2);
        assert_eq!(list.pagination().total_pages, 1);

        // a stale failure is not reported either
        assert_eq!(
            list.apply(older.ticket, Err(ApiError::NoResponse("timeout".into()))),
            Ok(Applied::Stale)
        );
    }

    #[test]
    fn failures_keep_the_displayed_list() {
        let mut list = loaded_list();
        let before = list.transactions().to_vec();
        let request = list.paginate(PaginationAction::Forward, day(15)).unwrap();

        let err = list
            .apply(request.ticket, Err(ApiError::NoResponse("refused".into())))
            .unwrap_err();

        assert_eq!(err.kind(), crate::error::FailureKind::NoResponse);
        assert_eq!(list.transactions(), before.as_slice());
        assert!(!list.is_loading());
    }

    #[test]
    fn page_size_caps_displayed_rows() {
        let mut list = TransactionList::new(Some(2));
        let request = list.refresh(day(15));
        let rows = (1..=5)
            .map(|id| transaction(id, TransactionType::Income))
            .collect();

        list.apply(request.ticket, Ok(page(rows, 3))).unwrap();
        assert_eq!(list.transactions().len(), 2);
    }

    #[test]
    fn successful_cancel_refreshes_the_page() {
        let mut list = loaded_list();
        assert_eq!(list.begin_cancel(2), Ok(2));
        assert_eq!(list.cancelling(), Some(2));

        let status = AppStatus {
            status_code: 200,
            message: Some("ok".to_string()),
        };
        let request = list.finish_cancel(2, Ok(status), day(15)).unwrap().unwrap();
        assert_eq!(list.cancelling(), None);
        assert_eq!(request.query.transaction_type, Some(TransactionType::Income));

        let mut rows = vec![
            transaction(1, TransactionType::Income),
            transaction(2, TransactionType::Income),
        ];
        rows[1].status = TransactionStatus::Cancelled;
        list.apply(request.ticket, Ok(page(rows, 3))).unwrap();
        assert!(!list.transactions()[1].is_cancellable());
    }

    #[test]
    fn failed_cancel_can_be_retried() {
        let mut list = loaded_list();
        list.begin_cancel(1).unwrap();
        assert_eq!(
            list.begin_cancel(2),
            Err(ApiError::Validation(Invalid::MutationInProgress))
        );

        let err = ApiError::Application {
            status_code: 404,
            message: Some("Transaction not found".to_string()),
        };
        assert_eq!(list.finish_cancel(1, Err(err.clone()), day(15)), Err(err));
        assert_eq!(list.cancelling(), None);
        assert_eq!(list.begin_cancel(1), Ok(1));
    }

    #[test]
    fn cancel_is_validated_locally() {
        let mut list = loaded_list();
        assert_eq!(
            list.begin_cancel(99),
            Err(ApiError::Validation(Invalid::UnknownTransaction(99)))
        );

        let request = list.refresh(day(15));
        let mut cancelled = transaction(1, TransactionType::Income);
        cancelled.status = TransactionStatus::Cancelled;
        list.apply(request.ticket, Ok(page(vec![cancelled], 1)))
            .unwrap();
        assert_eq!(
            list.begin_cancel(1),
            Err(ApiError::Validation(Invalid::AlreadyCancelled(1)))
        );
    }
}
