use async_trait::async_trait;
use showcase_catalog::movie::{like_entry, LIKES_FIELD};
use showcase_catalog::{search, view};
use showcase_core::{EngagementPolicy, Location};
use showcase_shared::Movie;

use super::{auth, crud};
use crate::frontend::{Frontend, HandlerError, Outcome, Request, Services};
use crate::render::View;

pub struct Movies {
    pub likes: EngagementPolicy,
}

fn details(id: &str) -> Location {
    Location::new(["details", id])
}

#[async_trait]
impl Frontend for Movies {
    fn name(&self) -> &'static str {
        "movies"
    }

    async fn get(&self, services: &Services, request: Request) -> Result<Outcome, HandlerError> {
        let session = request.session.as_ref();

        match request.location.segments().as_slice() {
            ["home"] => {
                let query = request.location.query("search");
                let movies: Vec<_> = search(crud::list::<Movie>(services).await?, query)
                    .into_iter()
                    .map(|r| view(r, session))
                    .collect();
                Ok(Outcome::render(
                    View::new("home", session)
                        .with("movies", movies)
                        .with("search", query.unwrap_or_default()),
                ))
            }
            ["login"] => Ok(Outcome::render(View::new("login", session))),
            ["register"] => Ok(Outcome::render(View::new("register", session))),
            ["logout"] => {
                auth::sign_out(services, session).await?;
                Ok(Outcome::redirect("login").with_notice("Successfully logged out!"))
            }
            ["add-movie"] => {
                let session = request.session()?;
                Ok(Outcome::render(View::new("add-movie", Some(session))))
            }
            ["details", id] => {
                let record = crud::fetch::<Movie>(services, id).await?;
                Ok(Outcome::render(View::new("details", session).with("movie", view(record, session))))
            }
            ["details", id, "edit"] => {
                let session = request.session()?;
                let record = crud::fetch::<Movie>(services, id).await?;
                Ok(Outcome::render(View::new("edit", Some(session)).with("movie", record)))
            }
            _ => Err(HandlerError::UnknownRoute(request.location.clone())),
        }
    }

    async fn post(&self, services: &Services, request: Request) -> Result<Outcome, HandlerError> {
        match request.location.segments().as_slice() {
            ["login"] => {
                auth::sign_in(services, &request.form).await?;
                Ok(Outcome::redirect("home").with_notice("Successfully logged in!"))
            }
            ["register"] => {
                auth::sign_up(services, &request.form, "repeatPassword").await?;
                Ok(Outcome::redirect("home").with_notice("Successfully registered!"))
            }
            ["search"] => {
                let home = Location::new(["home"]);
                Ok(Outcome::redirect(match request.form.value("search-string") {
                    Some(text) => home.with_query("search", text),
                    None => home,
                }))
            }
            ["add-movie"] => {
                let session = request.session()?;
                crud::create::<Movie>(services, session, &request.form).await?;
                Ok(Outcome::redirect("home").with_notice("You successfully added a movie!"))
            }
            ["details", id, "edit"] => {
                request.session()?;
                crud::edit::<Movie>(services, id, &request.form).await?;
                Ok(Outcome::redirect(details(id)).with_notice("You successfully edited a movie!"))
            }
            ["details", id, "delete"] => {
                request.session()?;
                crud::remove::<Movie>(services, id).await?;
                Ok(Outcome::redirect("home").with_notice("You successfully deleted a movie!"))
            }
            ["details", id, "like"] => {
                let session = request.session()?;
                let record = crud::fetch::<Movie>(services, id).await?;
                let entry = like_entry(&record.item, session, self.likes)
                    .map_err(|_| HandlerError::Rejected("You have already liked this movie!".to_string()))?;
                crud::append::<Movie>(services, id, LIKES_FIELD, entry).await?;
                Ok(Outcome::redirect(details(id)).with_notice("You successfully liked a movie!"))
            }
            _ => Err(HandlerError::UnknownRoute(request.location.clone())),
        }
    }
}
