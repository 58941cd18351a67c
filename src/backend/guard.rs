//! Role gate for the two protected areas.
//!
//! This is a navigation convenience only: the session lives in client storage
//! and can be edited by the user, so real authorization belongs to the backend.

use crate::backend::models::{Role, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Admin,
    Student,
}

impl Area {
    pub fn required_role(&self) -> Role {
        match self {
            Area::Admin => Role::Admin,
            Area::Student => Role::Student,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Area::Admin => "Admin Console",
            Area::Student => "Student Portal",
        }
    }
}

/// Where a redirect sends the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Login,
    AdminHome,
    PortalHome,
}

impl Target {
    pub fn path(&self) -> &'static str {
        match self {
            Target::Login => "/login",
            Target::AdminHome => "/admin",
            Target::PortalHome => "/portal",
        }
    }

    pub fn home_of(role: Role) -> Self {
        match role {
            Role::Admin => Target::AdminHome,
            Role::Student => Target::PortalHome,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Render(Area),
    Redirect(Target),
}

pub fn decide(session: Option<&Session>, requested: Area) -> Decision {
    match session {
        None => Decision::Redirect(Target::Login),
        Some(s) if s.role != requested.required_role() => Decision::Redirect(Target::home_of(s.role)),
        Some(_) => Decision::Render(requested),
    }
}

/// Resolves the bare `/` route.
pub fn landing(session: Option<&Session>) -> Target {
    match session {
        None => Target::Login,
        Some(s) => Target::home_of(s.role),
    }
}
