//! Capability strings embedded in access tokens.
//!
//! Scopes are derived from the server-side role of a staff account when the
//! token is issued and checked on every request; nothing here is read from
//! client-supplied state.
//!
//! # Example
//!
//! ```ignore
//! use rentree_core::scopes;
//!
//! if auth_user.has_scope(scopes::ROSTER_PROMOTE) {
//!     // Run the year-end promotion
//! }
//! ```

// =============================================================================
// Students
// =============================================================================

/// List students and pre-registered children
pub const STUDENTS_READ: &str = "students:read";
/// Import students from JSON or uploaded files
pub const STUDENTS_IMPORT: &str = "students:import";

// =============================================================================
// Classes
// =============================================================================

/// View class rosters
pub const CLASSES_READ: &str = "classes:read";

// =============================================================================
// Year-end promotion
// =============================================================================

/// Trigger the promotion of every roster to the next grade level
pub const ROSTER_PROMOTE: &str = "roster:promote";

/// Every scope known to the service.
pub const ALL: &[&str] = &[STUDENTS_READ, STUDENTS_IMPORT, CLASSES_READ, ROSTER_PROMOTE];

/// Scopes granted to a staff role.
///
/// Unknown roles get no scope at all.
pub fn for_role(role: &str) -> Vec<String> {
    let granted: &[&str] = match role {
        "admin" => ALL,
        "secretary" => &[STUDENTS_READ, STUDENTS_IMPORT, CLASSES_READ],
        _ => &[],
    };
    granted.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_every_scope() {
        let scopes = for_role("admin");
        assert_eq!(scopes.len(), ALL.len());
        assert!(scopes.iter().any(|s| s == ROSTER_PROMOTE));
    }

    #[test]
    fn test_secretary_cannot_promote() {
        let scopes = for_role("secretary");
        assert!(scopes.iter().any(|s| s == STUDENTS_IMPORT));
        assert!(!scopes.iter().any(|s| s == ROSTER_PROMOTE));
    }

    #[test]
    fn test_unknown_role_has_nothing() {
        assert!(for_role("student").is_empty());
        assert!(for_role("").is_empty());
    }
}
