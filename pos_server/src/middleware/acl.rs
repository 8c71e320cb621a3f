//! Access control list middleware for the POS server.
//! This middleware can be placed on any route or service.
//!
//! It identifies the caller from the identity headers (see [`crate::auth`]) and checks the caller's role against the
//! roles allowed on the route. If the caller holds any of the allowed roles, the request continues, with the [`Actor`]
//! stored in the request extensions. Otherwise a 403 Forbidden response is returned, or a 401 Unauthorized if the
//! caller could not be identified at all.

use std::{future::Future, pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use futures::future::{ok, Ready};
use log::*;
use pos_engine::db_types::Role;

use crate::{auth::Actor, errors::ServerError};

pub struct AclMiddlewareFactory {
    allowed_roles: Vec<Role>,
}

impl AclMiddlewareFactory {
    pub fn new(allowed_roles: &[Role]) -> Self {
        AclMiddlewareFactory { allowed_roles: allowed_roles.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AclMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { allowed_roles: self.allowed_roles.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    allowed_roles: Vec<Role>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed_roles = self.allowed_roles.clone();
        Box::pin(async move {
            let actor = Actor::from_headers(req.headers()).map_err(|e| {
                debug!("💻️ Rejecting request to {}. {e}", req.path());
                e
            })?;
            if !actor.has_any_role(&allowed_roles) {
                debug!("💻️ User #{} ({}) may not access {}", actor.id, actor.role, req.path());
                return Err(ServerError::InsufficientPermissions(format!(
                    "The {} role cannot perform this action",
                    actor.role
                ))
                .into());
            }
            req.extensions_mut().insert(actor);
            service.call(req).await
        })
    }
}
