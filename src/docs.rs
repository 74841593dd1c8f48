use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use rentree_models::{
    ClassRoster, ClassRosterWithStudents, EnrolledStudent, GradeLevel, ImportFailure,
    ImportOutcome, ImportStudentsDto, LineError, LoginRequest, LoginResponse, PromotionOutcome,
    PromotionRequest, PromotionResponse, PromotionRun, RepeatingValidation, ResolvedRepeating,
    Student, StudentFailure, StudentIdentity, StudentWithGrade, UploadOutcome, UserInfo,
    ValidateRepeatingRequest,
};

use crate::modules::auth::model::ErrorResponse;
use crate::modules::preinscrits::model::PreinscritsUploadForm;
use crate::modules::promotion::model::PromotionUploadForm;
use crate::modules::students::model::StudentsUploadForm;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::current_user,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::import_students,
        crate::modules::students::controller::upload_students,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::preinscrits::controller::get_preinscrits,
        crate::modules::preinscrits::controller::upload_preinscrits,
        crate::modules::promotion::controller::run_promotion,
        crate::modules::promotion::controller::upload_promotion,
        crate::modules::promotion::controller::validate_repeating,
        crate::modules::promotion::controller::get_runs,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            UserInfo,
            ErrorResponse,
            GradeLevel,
            Student,
            StudentWithGrade,
            StudentIdentity,
            ImportStudentsDto,
            StudentsUploadForm,
            PreinscritsUploadForm,
            ImportOutcome,
            EnrolledStudent,
            ImportFailure,
            UploadOutcome,
            LineError,
            ClassRoster,
            ClassRosterWithStudents,
            PromotionRequest,
            PromotionUploadForm,
            PromotionResponse,
            PromotionOutcome,
            PromotionRun,
            StudentFailure,
            ValidateRepeatingRequest,
            RepeatingValidation,
            ResolvedRepeating,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Staff login"),
        (name = "Students", description = "Student registration and class placement"),
        (name = "Classes", description = "Class rosters by grade level"),
        (name = "Preinscrits", description = "Children registered ahead of school age"),
        (name = "Promotion", description = "Year-end move to the next grade level")
    ),
    info(
        title = "Rentree API",
        version = "0.1.0",
        description = "Primary school rosters: placement by birth date and year-end promotion.",
        license(
            name = "MIT"
        )
    )
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_promotion_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/api/promotion"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/classes/{grade}"));
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("bearer_auth"))
        );
    }

    #[test]
    fn test_upload_forms_are_documented() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;

        for name in ["StudentsUploadForm", "PreinscritsUploadForm", "PromotionUploadForm"] {
            assert!(schemas.contains_key(name), "{name} missing");
        }
    }
}
