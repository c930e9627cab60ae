//! Vehicle Service
//!
//! Fleet table, vehicle form and ITV deadline alerts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::vehicle::ITV_ALERT_DAYS;
use crate::models::{new_id, ItvStatus, StatusVariant, Vehicle};
use crate::services::store::CrmStore;
use crate::services::ServiceResult;

/// Fields editable from the vehicle form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleForm {
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub year: i32,
    pub itv_date: NaiveDate,
    pub insurance_date: NaiveDate,
    pub active: bool,
}

impl VehicleForm {
    fn into_vehicle(self, id: String) -> Vehicle {
        Vehicle {
            id,
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            plate: self.plate.trim().to_uppercase(),
            year: self.year,
            itv_date: self.itv_date,
            insurance_date: self.insurance_date,
            active: self.active,
        }
    }
}

/// Vehicle with its deadlines evaluated for today
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRow {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub days_until_itv: i64,
    pub days_until_insurance: i64,
    pub itv_status: ItvStatus,
    pub itv_label: &'static str,
    pub itv_variant: StatusVariant,
}

impl VehicleRow {
    fn new(vehicle: Vehicle, today: NaiveDate) -> Self {
        let itv_status = vehicle.itv_status(today);
        Self {
            days_until_itv: vehicle.days_until_itv(today),
            days_until_insurance: vehicle.days_until_insurance(today),
            itv_label: itv_status.label(),
            itv_variant: itv_status.variant(),
            itv_status,
            vehicle,
        }
    }
}

/// Fleet page payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetOverview {
    pub active_count: usize,
    pub vehicles: Vec<VehicleRow>,
}

/// Vehicle service
#[derive(Debug, Clone)]
pub struct VehicleService {
    store: CrmStore,
}

impl VehicleService {
    pub fn new(store: CrmStore) -> Self {
        Self { store }
    }

    pub async fn overview(&self) -> FleetOverview {
        let today = self.store.clock().today();
        let vehicles = self.store.list::<Vehicle>().await;

        FleetOverview {
            active_count: vehicles.iter().filter(|v| v.active).count(),
            vehicles: vehicles
                .into_iter()
                .map(|v| VehicleRow::new(v, today))
                .collect(),
        }
    }

    /// Vehicles with fewer than 60 days to their ITV, expired ones included
    pub async fn itv_alerts(&self) -> Vec<VehicleRow> {
        let today = self.store.clock().today();
        self.store
            .list::<Vehicle>()
            .await
            .into_iter()
            .filter(|v| v.days_until_itv(today) < ITV_ALERT_DAYS)
            .map(|v| VehicleRow::new(v, today))
            .collect()
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Vehicle> {
        self.store.get(id).await
    }

    pub async fn create(&self, form: VehicleForm) -> ServiceResult<Vehicle> {
        let (vehicle, _) = self.store.upsert(form.into_vehicle(new_id())).await?;
        Ok(vehicle)
    }

    pub async fn update(&self, id: &str, form: VehicleForm) -> ServiceResult<Vehicle> {
        self.store
            .replace(id, |existing: &Vehicle| Ok(form.into_vehicle(existing.id.clone())))
            .await
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<Vehicle> {
        self.store.remove(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{demo_store, wednesday};
    use crate::services::ServiceError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn form(plate: &str, itv_date: NaiveDate) -> VehicleForm {
        VehicleForm {
            brand: "Seat".to_string(),
            model: "Ibiza".to_string(),
            plate: plate.to_string(),
            year: 2021,
            itv_date,
            insurance_date: date(2025, 6, 1),
            active: true,
        }
    }

    #[tokio::test]
    async fn test_overview_evaluates_deadlines() {
        let dir = tempfile::tempdir().unwrap();
        let service = VehicleService::new(demo_store(&dir, &wednesday()).await);

        let overview = service.overview().await;
        assert_eq!(overview.active_count, 1);

        let golf = &overview.vehicles[0];
        assert_eq!(golf.itv_status, ItvStatus::Vigente);
        assert_eq!(golf.days_until_insurance, 7);
    }

    #[tokio::test]
    async fn test_itv_alerts() {
        let dir = tempfile::tempdir().unwrap();
        let service = VehicleService::new(demo_store(&dir, &wednesday()).await);

        service.create(form("1111 aaa", date(2025, 1, 20))).await.unwrap();
        service.create(form("2222 BBB", date(2024, 12, 31))).await.unwrap();
        service.create(form("3333 CCC", date(2025, 3, 1))).await.unwrap();
        service.create(form("4444 DDD", date(2025, 3, 9))).await.unwrap();

        let alerts = service.itv_alerts().await;
        let plates: Vec<_> = alerts.iter().map(|r| r.vehicle.plate.as_str()).collect();
        assert_eq!(plates, ["1111 AAA", "2222 BBB", "3333 CCC"]);

        assert_eq!(alerts[0].itv_status, ItvStatus::Proxima);
        assert_eq!(alerts[1].itv_status, ItvStatus::Vencida);
        assert_eq!(alerts[1].itv_label, "Vencida");
        assert_eq!(alerts[2].itv_status, ItvStatus::Vigente);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let service = VehicleService::new(demo_store(&dir, &wednesday()).await);

        let mut update = form("8899 LLR", date(2027, 1, 15));
        update.active = false;
        let vehicle = service.update("1", update).await.unwrap();
        assert_eq!(vehicle.id, "1");
        assert_eq!(service.overview().await.active_count, 0);

        let mut invalid = form("8899 LLR", date(2027, 1, 15));
        invalid.year = 1950;
        assert!(matches!(
            service.update("1", invalid).await,
            Err(ServiceError::Validation(_))
        ));

        service.delete("1").await.unwrap();
        assert!(service.overview().await.vehicles.is_empty());
    }
}
