use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::Modify;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShiftSwap API",
        version = "1.0.0",
        description = "Backend API for part-time shift scheduling and swap requests"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::health_check,

        // Members
        crate::handlers::members_handler::get_me,
        crate::handlers::members_handler::get_company_members,

        // Companies
        crate::handlers::companies_handler::get_my_companies,
        crate::handlers::companies_handler::get_company,
        crate::handlers::companies_handler::create_company,

        // Schedules
        crate::handlers::schedules_handler::get_schedules,
        crate::handlers::schedules_handler::create_schedule,
        crate::handlers::schedules_handler::assign_worker,
        crate::handlers::schedules_handler::remove_assignment,

        // Notices
        crate::handlers::notices_handler::get_notices,
        crate::handlers::notices_handler::create_notice,
        crate::handlers::notices_handler::update_notice,
        crate::handlers::notices_handler::delete_notice,

        // Fixed shifts
        crate::handlers::fixed_shifts_handler::get_fixed_shifts,
        crate::handlers::fixed_shifts_handler::update_fixed_shifts,

        // Swap requests
        crate::handlers::swaps_handler::create_swap_request,
        crate::handlers::swaps_handler::accept_swap_request,
        crate::handlers::swaps_handler::approve_swap_request,
        crate::handlers::swaps_handler::decline_swap_request,
        crate::handlers::swaps_handler::get_my_swap_requests,
        crate::handlers::swaps_handler::get_company_swap_requests,
    ),
    components(
        schemas(
            // Core models
            crate::models::Member,
            crate::models::Company,
            crate::models::Schedule,
            crate::models::ScheduleAssignment,
            crate::models::ScheduleWithWorkers,
            crate::models::Notice,
            crate::models::NoticeWithWriter,
            crate::models::FixedShift,
            crate::models::FixedShiftEntry,
            crate::models::FixedShiftConfig,
            crate::models::SwapRequest,
            crate::models::SwapType,
            crate::models::SwapStatus,
            crate::models::SwapRequestSummary,

            // Input models
            crate::models::CreateCompanyInput,
            crate::models::CreateScheduleInput,
            crate::models::AssignWorkerInput,
            crate::models::ScheduleMutationResponse,
            crate::models::CreateNoticeInput,
            crate::models::UpdateNoticeInput,
            crate::models::NoticeMutationResponse,
            crate::models::UpdateFixedShiftsInput,
            crate::models::CreateSwapRequestInput,
            crate::models::CreateSwapRequestResponse,
            crate::models::SwapMutationResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "members", description = "Member profiles"),
        (name = "companies", description = "Company management"),
        (name = "schedules", description = "Schedule slots and worker assignments"),
        (name = "notices", description = "Company notices"),
        (name = "fixed-shifts", description = "Weekly fixed-shift preferences"),
        (name = "swaps", description = "Shift swap and give-away requests"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
