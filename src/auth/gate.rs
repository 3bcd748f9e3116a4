//! Request authorization for the quotation surface.
//!
//! The gate is a pure function of (actor, action, ownership): the same
//! inputs always produce the same allow/deny decision. Authentication
//! failures (missing/invalid token) never reach this layer; they are
//! rejected by the middleware with a 401 before a handler runs.

use thiserror::Error;
use uuid::Uuid;

use crate::auth::Role;

/// Authenticated caller, as established by the token claims.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub tenant: Uuid,
    pub role: Role,
}

/// Owner association of a stored quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub created_by: Uuid,
    pub tenant_id: Uuid,
}

/// Visibility of a listing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Records the caller created.
    Own,
    /// Records handled by the caller's tenant.
    Tenant,
    /// Every record.
    All,
}

impl ListScope {
    /// The one scope a role is granted.
    pub fn granted(role: Role) -> Self {
        match role {
            Role::User => ListScope::Own,
            Role::Admin => ListScope::Tenant,
            Role::Superadmin => ListScope::All,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    Create,
    Read(&'a Ownership),
    List(ListScope),
    /// Role-level check consulted before the target record is loaded.
    UpdateAny,
    Update(&'a Ownership),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct Denied(pub &'static str);

/// Decide whether `actor` may perform `action`.
pub fn authorize(actor: &Actor, action: Action<'_>) -> Result<(), Denied> {
    match action {
        Action::Create => match actor.role {
            Role::User => Ok(()),
            _ => Err(Denied("Only users may create quotations")),
        },

        Action::Read(ownership) => match actor.role {
            Role::User if ownership.created_by == actor.id => Ok(()),
            Role::User => Err(Denied("Users may only read their own quotations")),
            Role::Admin if ownership.tenant_id == actor.tenant => Ok(()),
            Role::Admin => Err(Denied("Admins may only read quotations in their tenant")),
            Role::Superadmin => Ok(()),
        },

        Action::List(scope) => {
            if scope == ListScope::granted(actor.role) {
                Ok(())
            } else {
                Err(Denied("Requested listing scope exceeds the caller's role"))
            }
        }

        Action::UpdateAny => match actor.role {
            Role::User => Err(Denied("Users may not update quotations")),
            Role::Admin | Role::Superadmin => Ok(()),
        },

        Action::Update(ownership) => match actor.role {
            Role::User => Err(Denied("Users may not update quotations")),
            Role::Admin if ownership.tenant_id == actor.tenant => Ok(()),
            Role::Admin => Err(Denied("Admins may only update quotations in their tenant")),
            Role::Superadmin => Ok(()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            tenant: Uuid::new_v4(),
            role,
        }
    }

    fn owned_by(actor: &Actor) -> Ownership {
        Ownership {
            created_by: actor.id,
            tenant_id: actor.tenant,
        }
    }

    fn foreign() -> Ownership {
        Ownership {
            created_by: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn only_users_create() {
        assert!(authorize(&actor(Role::User), Action::Create).is_ok());
        assert!(authorize(&actor(Role::Admin), Action::Create).is_err());
        assert!(authorize(&actor(Role::Superadmin), Action::Create).is_err());
    }

    #[test]
    fn user_reads_own_records_only() {
        let user = actor(Role::User);
        assert!(authorize(&user, Action::Read(&owned_by(&user))).is_ok());
        assert!(authorize(&user, Action::Read(&foreign())).is_err());
    }

    #[test]
    fn admin_reads_within_tenant_only() {
        let admin = actor(Role::Admin);
        let in_tenant = Ownership {
            created_by: Uuid::new_v4(),
            tenant_id: admin.tenant,
        };
        assert!(authorize(&admin, Action::Read(&in_tenant)).is_ok());
        assert!(authorize(&admin, Action::Read(&foreign())).is_err());
    }

    #[test]
    fn superadmin_reads_anything() {
        let root = actor(Role::Superadmin);
        assert!(authorize(&root, Action::Read(&foreign())).is_ok());
        assert!(authorize(&root, Action::Update(&foreign())).is_ok());
    }

    #[test]
    fn list_scope_must_match_role_grant() {
        assert!(authorize(&actor(Role::User), Action::List(ListScope::Own)).is_ok());
        assert!(authorize(&actor(Role::User), Action::List(ListScope::Tenant)).is_err());
        assert!(authorize(&actor(Role::User), Action::List(ListScope::All)).is_err());

        assert!(authorize(&actor(Role::Admin), Action::List(ListScope::Tenant)).is_ok());
        assert!(authorize(&actor(Role::Admin), Action::List(ListScope::All)).is_err());

        assert!(authorize(&actor(Role::Superadmin), Action::List(ListScope::All)).is_ok());
    }

    #[test]
    fn users_never_update() {
        let user = actor(Role::User);
        assert!(authorize(&user, Action::UpdateAny).is_err());
        assert!(authorize(&user, Action::Update(&owned_by(&user))).is_err());
    }

    #[test]
    fn admin_updates_within_tenant_only() {
        let admin = actor(Role::Admin);
        let in_tenant = Ownership {
            created_by: Uuid::new_v4(),
            tenant_id: admin.tenant,
        };
        assert!(authorize(&admin, Action::UpdateAny).is_ok());
        assert!(authorize(&admin, Action::Update(&in_tenant)).is_ok());
        assert!(authorize(&admin, Action::Update(&foreign())).is_err());
    }

    #[test]
    fn decisions_are_deterministic() {
        let user = actor(Role::User);
        let target = foreign();
        let first = authorize(&user, Action::Read(&target));
        for _ in 0..10 {
            assert_eq!(first, authorize(&user, Action::Read(&target)));
        }
    }
}
