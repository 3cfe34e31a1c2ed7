//! Request actor context.
//!
//! Engine calls receive the acting user's identity, role and organizational
//! scope explicitly. Nothing in the workflow reads ambient auth state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Role of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Platform operator; unrestricted.
    SuperAdmin,
    /// Administers a single company: all its records, users and departments.
    CompanyAdmin,
    /// Works records of their own company (and department, when scoped).
    Staff,
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorRole::SuperAdmin => write!(f, "super_admin"),
            ActorRole::CompanyAdmin => write!(f, "company_admin"),
            ActorRole::Staff => write!(f, "staff"),
        }
    }
}

impl std::str::FromStr for ActorRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "super_admin" => Ok(ActorRole::SuperAdmin),
            "company_admin" => Ok(ActorRole::CompanyAdmin),
            "staff" => Ok(ActorRole::Staff),
            _ => Err(anyhow::anyhow!("Invalid role: {}", s)),
        }
    }
}

/// The authenticated actor behind an engine call.
///
/// Built from the verified JWT by the HTTP layer and passed into every
/// transition/assignment call.
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub user_id: UserId,
    pub role: ActorRole,
    /// Company scope; `None` only for super admins.
    pub company_id: Option<Uuid>,
    /// Department scope; set for department staff.
    pub department_id: Option<Uuid>,
    /// Source IP, recorded into the audit trail.
    pub ip_address: Option<String>,
}

impl ActorContext {
    /// Whether the actor may read or transition a record in the given scope.
    pub fn can_act_on(&self, company_id: Uuid, department_id: Option<Uuid>) -> bool {
        match self.role {
            ActorRole::SuperAdmin => true,
            ActorRole::CompanyAdmin => self.company_id == Some(company_id),
            ActorRole::Staff => {
                if self.company_id != Some(company_id) {
                    return false;
                }
                // Department-scoped records require a department match.
                match department_id {
                    Some(dept) => self.department_id == Some(dept),
                    None => true,
                }
            }
        }
    }

    /// Whether the actor may assign records of the given company.
    ///
    /// Assignment is a company-admin privilege.
    pub fn can_assign(&self, company_id: Uuid) -> bool {
        match self.role {
            ActorRole::SuperAdmin => true,
            ActorRole::CompanyAdmin => self.company_id == Some(company_id),
            ActorRole::Staff => false,
        }
    }

    /// Whether the actor administers the given company (users, departments).
    pub fn can_manage_company(&self, company_id: Uuid) -> bool {
        match self.role {
            ActorRole::SuperAdmin => true,
            ActorRole::CompanyAdmin => self.company_id == Some(company_id),
            ActorRole::Staff => false,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == ActorRole::SuperAdmin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: ActorRole, company: Option<Uuid>, department: Option<Uuid>) -> ActorContext {
        ActorContext {
            user_id: UserId::new(),
            role,
            company_id: company,
            department_id: department,
            ip_address: None,
        }
    }

    #[test]
    fn super_admin_acts_anywhere() {
        let a = actor(ActorRole::SuperAdmin, None, None);
        assert!(a.can_act_on(Uuid::new_v4(), Some(Uuid::new_v4())));
        assert!(a.can_assign(Uuid::new_v4()));
    }

    #[test]
    fn company_admin_is_bounded_by_company() {
        let company = Uuid::new_v4();
        let a = actor(ActorRole::CompanyAdmin, Some(company), None);
        assert!(a.can_act_on(company, Some(Uuid::new_v4())));
        assert!(a.can_assign(company));
        assert!(!a.can_act_on(Uuid::new_v4(), None));
        assert!(!a.can_assign(Uuid::new_v4()));
    }

    #[test]
    fn staff_needs_department_match_for_scoped_records() {
        let company = Uuid::new_v4();
        let dept = Uuid::new_v4();
        let a = actor(ActorRole::Staff, Some(company), Some(dept));
        assert!(a.can_act_on(company, Some(dept)));
        assert!(a.can_act_on(company, None));
        assert!(!a.can_act_on(company, Some(Uuid::new_v4())));
        assert!(!a.can_assign(company));
    }

    #[test]
    fn role_text_roundtrip() {
        for role in [ActorRole::SuperAdmin, ActorRole::CompanyAdmin, ActorRole::Staff] {
            let parsed: ActorRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("citizen".parse::<ActorRole>().is_err());
    }
}
