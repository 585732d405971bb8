// SPDX-License-Identifier: GPL-3.0-only

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;

use super::timestamp;

/// Application level code the backend puts in the body of a successful mutation
pub const APP_STATUS_OK: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i32,
    #[serde(default)]
    pub code: String,
    pub amount: f64,
    #[serde(default)]
    pub content: String,
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    #[serde(default)]
    pub receiver_account: String,
    pub status: TransactionStatus,
    pub transaction_type: TransactionType,
}

/// Query of the bank transactions endpoint, both ends of the range are always sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub page: u32,
    pub transaction_type: Option<TransactionType>,
}

impl TransactionQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("fromDate", self.from_date.format("%Y-%m-%d").to_string()),
            ("toDate", self.to_date.format("%Y-%m-%d").to_string()),
            ("page", self.page.to_string()),
            (
                "type",
                self.transaction_type
                    .map(|t| t.as_str().to_string())
                    .unwrap_or_default(),
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct TransactionPageBody {
    #[serde(default)]
    data: Option<TransactionPageData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionPageData {
    #[serde(default)]
    transactions: Option<Vec<Transaction>>,
    #[serde(default)]
    total_pages: Option<u32>,
}

impl From<TransactionPageBody> for TransactionPage {
    fn from(body: TransactionPageBody) -> Self {
        let data = body.data.unwrap_or(TransactionPageData {
            transactions: None,
            total_pages: None,
        });

        TransactionPage {
            transactions: data.transactions.unwrap_or_default(),
            total_pages: data.total_pages.unwrap_or(1).max(1),
        }
    }
}

/// Status the backend reports after a mutation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStatus {
    pub status_code: i64,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AppStatusBody {
    Wrapped { data: AppStatus },
    Bare(AppStatus),
}

impl From<AppStatusBody> for AppStatus {
    fn from(body: AppStatusBody) -> Self {
        match body {
            AppStatusBody::Wrapped { data } => data,
            AppStatusBody::Bare(status) => status,
        }
    }
}

impl AppStatus {
    /// Success is decided by the code in the body, not by the transport status
    pub fn into_result(self) -> Result<AppStatus, ApiError> {
        if self.status_code == APP_STATUS_OK {
            Ok(self)
        } else {
            Err(ApiError::Application {
                status_code: self.status_code,
                message: self.message,
            })
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusChange {
    status: TransactionStatus,
}

impl Transaction {
    pub fn is_cancellable(&self) -> bool {
        self.status != TransactionStatus::Cancelled
    }

    pub(crate) fn page_request(
        client: &ApiClient,
        query: &TransactionQuery,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        Ok(client
            .request(Method::GET, "/api/transaction/bank")?
            .query(&query.params()))
    }

    pub(crate) fn cancel_request(
        client: &ApiClient,
        transaction_id: i32,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        Ok(client
            .request(Method::PUT, &format!("/api/transaction/{transaction_id}"))?
            .json(&StatusChange {
                status: TransactionStatus::Cancelled,
            }))
    }

    /// Retrieves one page of bank transactions matching the query
    pub async fn get_page(
        client: Arc<ApiClient>,
        query: TransactionQuery,
    ) -> Result<TransactionPage, ApiError> {
        let request = Self::page_request(&client, &query)?;
        let body: TransactionPageBody = client.fetch_json(request).await?;

        Ok(body.into())
    }

    /// Asks the backend to move the transaction to the cancelled status
    pub async fn cancel(
        client: Arc<ApiClient>,
        transaction_id: i32,
    ) -> Result<AppStatus, ApiError> {
        let request = Self::cancel_request(&client, transaction_id)?;
        let body: AppStatusBody = client.fetch_json(request).await?;
        let status = AppStatus::from(body).into_result()?;

        info!(transaction_id, "transaction cancelled");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client;

    fn query() -> TransactionQuery {
        TransactionQuery {
            from_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            to_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            page: 1,
            transaction_type: Some(TransactionType::Income),
        }
    }

    #[test]
    fn page_request_sends_all_filters() {
        let request = Transaction::page_request(&client(Some("tok")), &query())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.url().path(), "/api/transaction/bank");
        let pairs: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("fromDate".to_string(), "2024-01-01".to_string()),
                ("toDate".to_string(), "2024-01-31".to_string()),
                ("page".to_string(), "1".to_string()),
                ("type".to_string(), "income".to_string()),
            ]
        );
    }

    #[test]
    fn all_types_is_sent_as_an_empty_type() {
        let mut query = query();
        query.transaction_type = None;
        assert!(query.params().contains(&("type", String::new())));
    }

    #[test]
    fn cancel_request_body() {
        let request = Transaction::cancel_request(&client(Some("tok")), 42)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::PUT);
        assert_eq!(request.url().path(), "/api/transaction/42");
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, br#"{"status":"cancelled"}"#);
    }

    #[test]
    fn page_body_is_read_from_the_data_envelope() {
        let body: TransactionPageBody = serde_json::from_str(
            r#"{"data":{"totalPages":3,"transactions":[
                {"id":1,"code":"PT001","amount":150000,"content":"Deposit","date":"2024-01-02T09:30:00",
                 "receiverAccount":"0123","status":"completed","transactionType":"income"},
                {"id":2,"code":"PT002","amount":50000,"content":"","date":"2024-01-03T10:00:00",
                 "receiverAccount":"0123","status":"pending","transactionType":"income"}
            ]}}"#,
        )
        .unwrap();
        let page = TransactionPage::from(body);

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.transactions.len(), 2);
        assert_eq!(page.transactions[0].code, "PT001");
        assert_eq!(page.transactions[0].transaction_type, TransactionType::Income);
        assert_eq!(page.transactions[1].status, TransactionStatus::Pending);
    }

    #[test]
    fn missing_page_fields_fall_back() {
        let page = TransactionPage::from(
            serde_json::from_str::<TransactionPageBody>(r#"{"data":{}}"#).unwrap(),
        );
        assert_eq!(
            page,
            TransactionPage {
                transactions: Vec::new(),
                total_pages: 1
            }
        );
    }

    #[test]
    fn app_status_decides_success() {
        let wrapped: AppStatusBody =
            serde_json::from_str(r#"{"data":{"statusCode":200,"message":"ok"}}"#).unwrap();
        assert!(AppStatus::from(wrapped).into_result().is_ok());

        let bare: AppStatusBody =
            serde_json::from_str(r#"{"statusCode":404,"message":"Transaction not found"}"#)
                .unwrap();
        assert_eq!(
            AppStatus::from(bare).into_result(),
            Err(ApiError::Application {
                status_code: 404,
                message: Some("Transaction not found".to_string())
            })
        );
    }
}
