use async_trait::async_trait;
use showcase_catalog::offer::with_buyer;
use showcase_catalog::{view, CatalogItem};
use showcase_core::{EngagementPolicy, Location};
use showcase_shared::ShoeOffer;

use super::{auth, crud};
use crate::frontend::{Frontend, HandlerError, Outcome, Request, Services};
use crate::render::View;

pub struct ShoeShelf {
    pub purchases: EngagementPolicy,
}

fn details(id: &str) -> Location {
    Location::new(["details", id])
}

#[async_trait]
impl Frontend for ShoeShelf {
    fn name(&self) -> &'static str {
        "shoeshelf"
    }

    async fn get(&self, services: &Services, request: Request) -> Result<Outcome, HandlerError> {
        let session = request.session.as_ref();

        match request.location.segments().as_slice() {
            ["home"] => {
                // Offers are only listed to signed-in users
                let offers: Vec<_> = match session {
                    Some(s) => crud::list::<ShoeOffer>(services)
                        .await?
                        .into_iter()
                        .map(|r| view(r, Some(s)))
                        .collect(),
                    None => Vec::new(),
                };
                Ok(Outcome::render(View::new("home", session).with("offers", offers)))
            }
            ["register"] => Ok(Outcome::render(View::new("register", session))),
            ["login"] => Ok(Outcome::render(View::new("login", session))),
            ["logout"] => {
                auth::sign_out(services, session).await?;
                Ok(Outcome::redirect("home").with_notice("Successfully logged out!"))
            }
            ["create"] => {
                let session = request.session()?;
                Ok(Outcome::render(View::new("create", Some(session))))
            }
            ["details", id] => {
                let record = crud::fetch::<ShoeOffer>(services, id).await?;
                Ok(Outcome::render(View::new("details", session).with("offer", view(record, session))))
            }
            ["edit", id] => {
                let session = request.session()?;
                let record = crud::fetch::<ShoeOffer>(services, id).await?;
                Ok(Outcome::render(View::new("edit", Some(session)).with("offer", record)))
            }
            ["delete", id] => {
                request.session()?;
                crud::remove::<ShoeOffer>(services, id).await?;
                Ok(Outcome::redirect("home").with_notice("Offer deleted!"))
            }
            ["buy", id] => {
                let session = request.session()?;
                let stored = services.store.get(ShoeOffer::COLLECTION, id).await?;
                let offer: ShoeOffer = stored.decode()?;
                let fields = with_buyer(stored.fields, &offer, session, self.purchases)
                    .map_err(|_| HandlerError::Rejected("You have already bought this offer!".to_string()))?;
                services.store.replace(ShoeOffer::COLLECTION, id, fields).await?;
                Ok(Outcome::redirect(details(id)).with_notice("You bought this offer!"))
            }
            _ => Err(HandlerError::UnknownRoute(request.location.clone())),
        }
    }

    async fn post(&self, services: &Services, request: Request) -> Result<Outcome, HandlerError> {
        match request.location.segments().as_slice() {
            ["register"] => {
                auth::sign_up(services, &request.form, "rePassword").await?;
                Ok(Outcome::redirect("home").with_notice("Successfully registered!"))
            }
            ["login"] => {
                auth::sign_in(services, &request.form).await?;
                Ok(Outcome::redirect("home").with_notice("Successfully logged in!"))
            }
            ["create"] => {
                let session = request.session()?;
                crud::create::<ShoeOffer>(services, session, &request.form).await?;
                Ok(Outcome::redirect("home").with_notice("Offer created!"))
            }
            ["edit", id] => {
                request.session()?;
                crud::edit::<ShoeOffer>(services, id, &request.form).await?;
                Ok(Outcome::redirect(details(id)).with_notice("Offer updated!"))
            }
            _ => Err(HandlerError::UnknownRoute(request.location.clone())),
        }
    }
}
