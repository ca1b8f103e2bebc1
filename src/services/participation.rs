//! Who may change a participation entry.
//!
//! Both confirmation routes share one mutation; they differ only in the gate
//! applied before it.

use crate::middleware::CurrentUser;
use crate::models::Member;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationPath {
    /// The caller answers for themselves.
    SelfService,
    /// An administrator answers on behalf of any member.
    Administrative,
}

/// True when the caller is the member being updated. An unknown target never
/// matches.
pub fn is_same_member(caller: &CurrentUser, target: Option<&Member>) -> bool {
    target.is_some_and(|member| member.email.eq_ignore_ascii_case(&caller.email))
}

pub fn authorize(
    path: ConfirmationPath,
    caller: &CurrentUser,
    target: Option<&Member>,
) -> Result<(), AppError> {
    let allowed = match path {
        ConfirmationPath::SelfService => is_same_member(caller, target),
        ConfirmationPath::Administrative => caller.is_admin(),
    };

    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden(match path {
            ConfirmationPath::SelfService => {
                "You can only answer for your own participation.".to_string()
            }
            ConfirmationPath::Administrative => {
                "Only administrators can answer on behalf of other members.".to_string()
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn member(email: &str) -> Member {
        let now = Utc::now();
        Member {
            id: Uuid::new_v4(),
            username: "m".to_string(),
            rut: "12345678-9".to_string(),
            birthdate: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            phone: "912345678".to_string(),
            email: email.to_string(),
            instrument: None,
            roles: vec![Role::Member],
            created_at: now,
            updated_at: now,
        }
    }

    fn caller(email: &str, roles: Vec<Role>) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
            roles,
        }
    }

    #[test]
    fn test_self_service_matches_on_email() {
        let target = member("Ana@Example.com");
        let me = caller("ana@example.com", vec![Role::Member]);
        assert!(authorize(ConfirmationPath::SelfService, &me, Some(&target)).is_ok());
    }

    #[test]
    fn test_self_service_rejects_other_member() {
        let target = member("ana@example.com");
        let other = caller("luis@example.com", vec![Role::Member]);
        assert!(matches!(
            authorize(ConfirmationPath::SelfService, &other, Some(&target)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_self_service_does_not_grant_admins_other_members() {
        let target = member("ana@example.com");
        let admin = caller("director@example.com", vec![Role::Administrator]);
        assert!(authorize(ConfirmationPath::SelfService, &admin, Some(&target)).is_err());
    }

    #[test]
    fn test_self_service_unknown_target() {
        let me = caller("ana@example.com", vec![Role::Member]);
        assert!(authorize(ConfirmationPath::SelfService, &me, None).is_err());
    }

    #[test]
    fn test_administrative_requires_role() {
        let admin = caller("director@example.com", vec![Role::Administrator]);
        let plain = caller("ana@example.com", vec![Role::Member]);

        assert!(authorize(ConfirmationPath::Administrative, &admin, None).is_ok());
        assert!(matches!(
            authorize(ConfirmationPath::Administrative, &plain, None),
            Err(AppError::Forbidden(_))
        ));
    }
}
