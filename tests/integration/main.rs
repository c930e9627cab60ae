//! HTTP tests for the back office API
//!
//! One binary for every page; shared setup lives in `crm_integration_utils`.

mod crm_integration_utils;

mod test_auth_api;
mod test_records_api;
mod test_schedule_api;
