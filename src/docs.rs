use crate::api::leave::{ApplyLeaveForm, LeaveApprovedResponse};
use crate::api::profile::{ProfileResponse, UpdateSalary};
use crate::api::timetable::AddScheduleEntry;
use crate::leave::report::{DayReport, SlotReport};
use crate::model::day_of_week::DayOfWeek;
use crate::model::department::Department;
use crate::model::role::Role;
use crate::model::leave_application::LeaveApplication;
use crate::model::schedule::ScheduleEntry;
use crate::models::{LoginForm, SignupForm};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Faculty Management System API",
        version = "1.0.0",
        description = r#"
## Faculty Management System

Backend for managing faculty accounts, weekly timetables, salaries, and leave
applications with automatic replacement-availability checking.

### Key Features
- **Accounts**
  - Signup with department/role validation, login, token refresh, logout
- **Timetable Management**
  - Add, list, and delete weekly class slots
- **Salary**
  - Self-service salary update
- **Leave Management**
  - Apply for leave; each class slot on every requested day is checked for a
    replacement candidate before the application is auto-approved

### Security
Protected endpoints use **JWT Bearer authentication**.

### Response Format
- JSON-based RESTful responses

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave::apply_leave,
        crate::api::leave::list_leave_applications,

        crate::api::profile::get_profile,
        crate::api::profile::update_salary,

        crate::api::timetable::list_timetable,
        crate::api::timetable::add_timetable_entry,
        crate::api::timetable::delete_timetable_entry,
    ),
    components(
        schemas(
            SignupForm,
            LoginForm,
            Department,
            Role,
            DayOfWeek,
            ScheduleEntry,
            AddScheduleEntry,
            ProfileResponse,
            UpdateSalary,
            ApplyLeaveForm,
            LeaveApprovedResponse,
            LeaveApplication,
            DayReport,
            SlotReport
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Profile", description = "Account profile APIs"),
        (name = "Timetable", description = "Weekly timetable APIs"),
        (name = "Leave", description = "Leave application APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
