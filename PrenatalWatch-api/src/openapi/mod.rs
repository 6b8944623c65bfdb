use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Roster and patient endpoints
        crate::api::handlers::patients::get_roster,
        crate::api::handlers::patients::get_patient_summary,
        crate::api::handlers::patients::get_patient_detail,
        crate::api::handlers::patients::get_symptom_ranking,
        crate::api::handlers::patients::get_symptom_vocabulary,

        // Report endpoints
        crate::api::handlers::reports::list_reports,
        crate::api::handlers::reports::create_report,

        // Medication endpoints
        crate::api::handlers::medications::list_medications,
        crate::api::handlers::medications::prescribe_medication,
        crate::api::handlers::medications::toggle_medication,

        // Clinical record and guidance endpoints
        crate::api::handlers::clinical::list_clinical_records,
        crate::api::handlers::clinical::create_clinical_record,
        crate::api::handlers::clinical::list_guidance,
        crate::api::handlers::clinical::send_guidance
    ),
    components(
        schemas(
            crate::entities::ErrorResponse,
            crate::entities::summary::PublicVitals,
            crate::entities::summary::PublicSymptomCount,
            crate::entities::summary::PublicPatientSummary,
            crate::entities::summary::PublicRosterOverview,
            crate::entities::summary::PublicRoster,
            crate::entities::summary::PublicPatientDetail,
            crate::entities::summary::SymptomRankingQuery,
            crate::entities::summary::SymptomVocabulary,
            crate::entities::report::PublicReport,
            crate::entities::report::CreateReportBody,
            crate::entities::medication::PublicMedication,
            crate::entities::medication::PublicMedicationList,
            crate::entities::medication::PrescribeMedicationBody,
            crate::entities::medication::ToggleMedicationBody,
            crate::entities::clinical::PublicClinicalEntry,
            crate::entities::clinical::CreateClinicalEntryBody,
            crate::entities::clinical::PublicGuidanceMessage,
            crate::entities::clinical::SendGuidanceBody,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "roster", description = "Caregiver roster"),
        (name = "patients", description = "Patient summaries and symptom analysis"),
        (name = "reports", description = "Diary reports"),
        (name = "medications", description = "Medication management"),
        (name = "records", description = "Clinician encounter notes"),
        (name = "guidance", description = "Guidance messages to patients")
    ),
    info(
        title = "PrenatalWatch API",
        version = "0.1.0",
        description = "Risk triage and clinical summaries for pregnancy monitoring",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
