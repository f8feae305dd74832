use async_trait::async_trait;
use showcase_catalog::{owned, view};
use showcase_core::Location;
use showcase_shared::Destination;

use super::{auth, crud};
use crate::frontend::{Frontend, HandlerError, Outcome, Request, Services};
use crate::render::View;

pub struct Destinations;

#[async_trait]
impl Frontend for Destinations {
    fn name(&self) -> &'static str {
        "destinations"
    }

    async fn get(&self, services: &Services, request: Request) -> Result<Outcome, HandlerError> {
        let session = request.session.as_ref();

        match request.location.segments().as_slice() {
            ["home"] => {
                let destinations: Vec<_> = match session {
                    Some(s) => crud::list::<Destination>(services)
                        .await?
                        .into_iter()
                        .map(|r| view(r, Some(s)))
                        .collect(),
                    None => Vec::new(),
                };
                Ok(Outcome::render(View::new("home", session).with("destinations", destinations)))
            }
            ["register"] => Ok(Outcome::render(View::new("register", session))),
            ["login"] => Ok(Outcome::render(View::new("login", session))),
            ["logout"] => {
                auth::sign_out(services, session).await?;
                Ok(Outcome::redirect("login").with_notice("Logout successful!"))
            }
            ["create"] => {
                let session = request.session()?;
                Ok(Outcome::render(View::new("create", Some(session))))
            }
            ["details", id] => {
                let record = crud::fetch::<Destination>(services, id).await?;
                Ok(Outcome::render(
                    View::new("details", session).with("destination", view(record, session)),
                ))
            }
            ["edit", id] => {
                let session = request.session()?;
                let record = crud::fetch::<Destination>(services, id).await?;
                Ok(Outcome::render(View::new("edit", Some(session)).with("destination", record)))
            }
            ["dashboard"] => {
                let session = request.session()?;
                let mine = owned(crud::list::<Destination>(services).await?, session);
                Ok(Outcome::render(View::new("dashboard", Some(session)).with("destinations", mine)))
            }
            ["delete", id] => {
                request.session()?;
                crud::remove::<Destination>(services, id).await?;
                Ok(Outcome::redirect("dashboard").with_notice("Destination deleted!"))
            }
            _ => Err(HandlerError::UnknownRoute(request.location.clone())),
        }
    }

    async fn post(&self, services: &Services, request: Request) -> Result<Outcome, HandlerError> {
        match request.location.segments().as_slice() {
            ["register"] => {
                auth::sign_up(services, &request.form, "rePassword").await?;
                Ok(Outcome::redirect("home").with_notice("User registration successful."))
            }
            ["login"] => {
                auth::sign_in(services, &request.form).await?;
                Ok(Outcome::redirect("home").with_notice("Login successful!"))
            }
            ["create"] => {
                let session = request.session()?;
                crud::create::<Destination>(services, session, &request.form).await?;
                Ok(Outcome::redirect("home").with_notice("Successfully added a destination!"))
            }
            ["edit", id] => {
                request.session()?;
                crud::edit::<Destination>(services, id, &request.form).await?;
                Ok(Outcome::redirect(Location::new(["details", *id])).with_notice("Successfully edited destination."))
            }
            _ => Err(HandlerError::UnknownRoute(request.location.clone())),
        }
    }
}
