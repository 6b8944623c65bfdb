//! Domain layer health check functionality
//! This module reports whether the repositories behind the dashboard answer

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use prenatal_watch_data::models::SessionContext;
use prenatal_watch_data::repository::PatientDirectoryTrait;

/// System health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;
}

/// Health service probing the patient directory
pub struct HealthService<D> {
    directory: D,
}

impl<D: PatientDirectoryTrait> HealthService<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    async fn check_repositories(&self) -> HealthComponent {
        // The check needs clinician visibility to see the whole directory
        let checker = SessionContext::clinician("health-check");
        match self.directory.list_patients(&checker).await {
            Ok(patients) if patients.is_empty() => HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some("Patient directory is empty".to_string()),
            },
            Ok(_) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
            Err(err) => {
                warn!("Repository health check failed: {}", err);
                HealthComponent {
                    status: ComponentStatus::Unhealthy,
                    details: Some(err.to_string()),
                }
            }
        }
    }
}

/// Fold component states into the overall status
pub fn overall_status<'a>(components: impl IntoIterator<Item = &'a HealthComponent>) -> SystemStatus {
    let mut status = SystemStatus::Healthy;
    for component in components {
        match component.status {
            ComponentStatus::Unhealthy => return SystemStatus::Unhealthy,
            ComponentStatus::Degraded => status = SystemStatus::Degraded,
            ComponentStatus::Healthy => {}
        }
    }
    status
}

#[async_trait]
impl<D: PatientDirectoryTrait> HealthServiceTrait for HealthService<D> {
    async fn get_system_health(&self) -> SystemHealth {
        let components: HashMap<String, HealthComponent> =
            vec![("repositories".to_string(), self.check_repositories().await)]
                .into_iter()
                .collect();

        SystemHealth {
            status: overall_status(components.values()),
            components,
        }
    }
}
