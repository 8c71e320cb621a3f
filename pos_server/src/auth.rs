//! Actor identification.
//!
//! The server does not authenticate users itself. It sits behind an identity layer (an API gateway or reverse proxy)
//! that has already verified the caller, and which forwards the caller's identity in two request headers:
//!
//! * `X-Actor-Id`: the numeric user id,
//! * `X-Actor-Role`: one of `admin`, `cashier` or `kitchen`.
//!
//! Requests without both headers are rejected with `401 Unauthorized` on every route under `/api`.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::HeaderMap, FromRequest, HttpMessage, HttpRequest};
use log::*;
use pos_engine::db_types::Role;
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

pub const ACTOR_ID_HEADER: &str = "X-Actor-Id";
pub const ACTOR_ROLE_HEADER: &str = "X-Actor-Role";

/// The authenticated user making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ServerError> {
        let id = header_value(headers, ACTOR_ID_HEADER)?;
        let id = id
            .parse::<i64>()
            .map_err(|_| ServerError::Unauthenticated(format!("{ACTOR_ID_HEADER} is not a valid user id: {id}")))?;
        let role = header_value(headers, ACTOR_ROLE_HEADER)?;
        let role = role.parse::<Role>().map_err(|e| ServerError::Unauthenticated(e.to_string()))?;
        Ok(Self { id, role })
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, ServerError> {
    headers
        .get(name)
        .ok_or_else(|| ServerError::Unauthenticated(format!("The {name} header is missing")))?
        .to_str()
        .map_err(|_| ServerError::Unauthenticated(format!("The {name} header is not valid text")))
}

impl FromRequest for Actor {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // The ACL middleware has usually done the work already
        if let Some(actor) = req.extensions().get::<Actor>() {
            return ready(Ok(*actor));
        }
        let result = Actor::from_headers(req.headers()).map_err(|e| {
            debug!("💻️ Could not identify the caller of {}. {e}", req.path());
            e
        });
        ready(result)
    }
}
