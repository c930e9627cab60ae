//! Payment Service
//!
//! Payment register, new payment form and the billing summary cards.

use chrono::{Datelike, Duration};
use serde::{Deserialize, Serialize};

use crate::database::CrmData;
use crate::logging;
use crate::models::payment::invoice_number;
use crate::models::{new_id, Payment, PaymentStatus, Record, StatusVariant};
use crate::services::schedule_service::student_name;
use crate::services::store::CrmStore;
use crate::services::{ServiceError, ServiceResult};

/// Days a payment that is not settled on the spot has before it falls due
pub const PAYMENT_TERM_DAYS: i64 = 15;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    pub student_id: String,
    pub amount: f64,
    pub concept: String,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRow {
    #[serde(flatten)]
    pub payment: Payment,
    pub student_name: String,
    pub status_label: &'static str,
    pub status_variant: StatusVariant,
}

/// Slice of the billing pie chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub name: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub total_paid: f64,
    /// Pending and partially paid
    pub total_pending: f64,
    pub total_overdue: f64,
    pub total_amount: f64,
    /// Non-empty buckets only
    pub chart: Vec<ChartSlice>,
    pub pending_count: usize,
    pub overdue_count: usize,
    pub overdue: Vec<PaymentRow>,
}

/// Payment service
#[derive(Debug, Clone)]
pub struct PaymentService {
    store: CrmStore,
}

impl PaymentService {
    pub fn new(store: CrmStore) -> Self {
        Self { store }
    }

    /// Newest first, optionally filtered by concept or invoice number
    pub async fn rows(&self, search: Option<&str>) -> Vec<PaymentRow> {
        self.store
            .read(|data| {
                data.payments
                    .iter()
                    .filter(|p| search.map_or(true, |q| matches_search(p, q)))
                    .map(|p| row(data, p))
                    .collect()
            })
            .await
    }

    pub async fn summary(&self) -> PaymentSummary {
        self.store.read(summarize).await
    }

    /// Record a payment dated today, numbered after the current register size
    pub async fn create(&self, form: PaymentForm) -> ServiceResult<Payment> {
        let today = self.store.clock().today();

        let payment = self
            .store
            .mutate(|data| {
                let payment = Payment {
                    id: new_id(),
                    student_id: form.student_id,
                    amount: form.amount,
                    concept: form.concept.trim().to_string(),
                    date: today,
                    status: form.status,
                    due_date: (!form.status.is_paid())
                        .then(|| today + Duration::days(PAYMENT_TERM_DAYS)),
                    invoice_number: Some(invoice_number(today.year(), data.payments.len() + 1)),
                };
                payment.validate()?;
                data.payments.insert(0, payment.clone());
                Ok::<_, ServiceError>(payment)
            })
            .await?;

        logging::log_record_saved(Payment::KIND, &payment.id, true);
        Ok(payment)
    }
}

fn row(data: &CrmData, payment: &Payment) -> PaymentRow {
    PaymentRow {
        student_name: student_name(data, &payment.student_id),
        status_label: payment.status.label(),
        status_variant: payment.status.variant(),
        payment: payment.clone(),
    }
}

fn matches_search(payment: &Payment, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || payment.concept.to_lowercase().contains(&query)
        || payment
            .invoice_number
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&query))
}

fn total(payments: &[Payment], statuses: &[PaymentStatus]) -> f64 {
    payments
        .iter()
        .filter(|p| statuses.contains(&p.status))
        .map(|p| p.amount)
        .sum()
}

pub fn summarize(data: &CrmData) -> PaymentSummary {
    let payments = &data.payments;
    let total_paid = total(payments, &[PaymentStatus::Pagado]);
    let total_pending = total(payments, &[PaymentStatus::Pendiente, PaymentStatus::Parcial]);
    let total_overdue = total(payments, &[PaymentStatus::Vencido]);

    let chart = [
        ("Pagado", total_paid),
        ("Pendiente", total_pending),
        ("Vencido", total_overdue),
    ]
    .into_iter()
    .filter(|(_, value)| *value > 0.0)
    .map(|(name, value)| ChartSlice { name, value })
    .collect();

    let count = |status: PaymentStatus| payments.iter().filter(|p| p.status == status).count();

    PaymentSummary {
        total_paid,
        total_pending,
        total_overdue,
        total_amount: total_paid + total_pending + total_overdue,
        chart,
        pending_count: count(PaymentStatus::Pendiente),
        overdue_count: count(PaymentStatus::Vencido),
        overdue: payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Vencido)
            .map(|p| row(data, p))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{demo_store, wednesday};
    use chrono::NaiveDate;

    fn form(amount: f64, status: PaymentStatus) -> PaymentForm {
        PaymentForm {
            student_id: "1".to_string(),
            amount,
            concept: "Bono 10 prácticas".to_string(),
            status,
        }
    }

    #[tokio::test]
    async fn test_new_payment_is_numbered_and_prepended() {
        let dir = tempfile::tempdir().unwrap();
        let service = PaymentService::new(demo_store(&dir, &wednesday()).await);

        let payment = service
            .create(form(300.0, PaymentStatus::Pendiente))
            .await
            .unwrap();

        assert_eq!(payment.invoice_number.as_deref(), Some("F-2025-0002"));
        assert_eq!(payment.date, NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
        assert_eq!(payment.due_date, NaiveDate::from_ymd_opt(2025, 1, 23));

        let rows = service.rows(None).await;
        assert_eq!(rows[0].payment.id, payment.id);
        assert_eq!(rows[0].student_name, "Ana Martínez");
    }

    #[tokio::test]
    async fn test_paid_payment_has_no_due_date() {
        let dir = tempfile::tempdir().unwrap();
        let service = PaymentService::new(demo_store(&dir, &wednesday()).await);

        let payment = service.create(form(45.0, PaymentStatus::Pagado)).await.unwrap();
        assert_eq!(payment.due_date, None);
    }

    #[tokio::test]
    async fn test_invalid_amount_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let service = PaymentService::new(demo_store(&dir, &wednesday()).await);

        assert!(matches!(
            service.create(form(0.0, PaymentStatus::Pagado)).await,
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(service.rows(None).await.len(), 1);
    }

    #[tokio::test]
    async fn test_summary_buckets() {
        let dir = tempfile::tempdir().unwrap();
        let service = PaymentService::new(demo_store(&dir, &wednesday()).await);

        service.create(form(100.0, PaymentStatus::Pendiente)).await.unwrap();
        service.create(form(50.0, PaymentStatus::Parcial)).await.unwrap();

        let summary = service.summary().await;
        assert_eq!(summary.total_paid, 150.0);
        assert_eq!(summary.total_pending, 150.0);
        assert_eq!(summary.total_overdue, 0.0);
        assert_eq!(summary.total_amount, 300.0);
        assert_eq!(summary.pending_count, 1);
        assert_eq!(summary.overdue_count, 0);
        assert!(summary.overdue.is_empty());

        let names: Vec<_> = summary.chart.iter().map(|s| s.name).collect();
        assert_eq!(names, ["Pagado", "Pendiente"]);
    }

    #[tokio::test]
    async fn test_overdue_payments_are_listed_with_student() {
        let dir = tempfile::tempdir().unwrap();
        let service = PaymentService::new(demo_store(&dir, &wednesday()).await);

        service.create(form(100.0, PaymentStatus::Pendiente)).await.unwrap();
        let overdue = service
            .create(form(80.0, PaymentStatus::Vencido))
            .await
            .unwrap();

        let summary = service.summary().await;
        assert_eq!(summary.total_overdue, 80.0);
        assert_eq!(summary.total_amount, 330.0);
        assert_eq!(summary.overdue_count, 1);
        assert_eq!(summary.overdue.len(), 1);
        assert_eq!(summary.overdue[0].payment.id, overdue.id);
        assert_eq!(summary.overdue[0].student_name, "Ana Martínez");
        assert_eq!(summary.overdue[0].status_variant, StatusVariant::Error);

        let chart: Vec<_> = summary
            .chart
            .iter()
            .map(|s| (s.name, s.value))
            .collect();
        assert_eq!(
            chart,
            [("Pagado", 150.0), ("Pendiente", 100.0), ("Vencido", 80.0)]
        );
    }

    #[tokio::test]
    async fn test_search() {
        let dir = tempfile::tempdir().unwrap();
        let service = PaymentService::new(demo_store(&dir, &wednesday()).await);

        assert_eq!(service.rows(Some("matrícula")).await.len(), 1);
        assert_eq!(service.rows(Some("fe-2024")).await.len(), 1);
        assert!(service.rows(Some("bono")).await.is_empty());
    }
}
