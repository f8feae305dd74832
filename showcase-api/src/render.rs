use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;
use serde_json::{Map, Value};
use showcase_core::{Banner, Session};

/// A template name plus the context it is rendered with. The last view a
/// front-end rendered is its current screen.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub template: &'static str,
    pub context: Map<String, Value>,
}

impl View {
    /// Start a context carrying the viewer's authentication flags.
    pub fn new(template: &'static str, viewer: Option<&Session>) -> Self {
        Self {
            template,
            context: Map::new(),
        }
        .for_viewer(viewer)
    }

    /// Replace the authentication flags with those of `viewer`.
    pub fn for_viewer(mut self, viewer: Option<&Session>) -> Self {
        self.context
            .insert("isAuthenticated".to_string(), Value::Bool(viewer.is_some()));
        match viewer {
            Some(session) => {
                self.context
                    .insert("email".to_string(), Value::String(session.email.clone()));
            }
            None => {
                self.context.remove("email");
            }
        }
        self
    }

    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.context.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }
}

const TEMPLATES: &[(&str, &str)] = &[
    ("layout", include_str!("../templates/layout.hbs")),
    ("empty", include_str!("../templates/empty.hbs")),
    ("destinations/nav", include_str!("../templates/destinations/nav.hbs")),
    ("destinations/home", include_str!("../templates/destinations/home.hbs")),
    ("destinations/register", include_str!("../templates/destinations/register.hbs")),
    ("destinations/login", include_str!("../templates/destinations/login.hbs")),
    ("destinations/create", include_str!("../templates/destinations/create.hbs")),
    ("destinations/details", include_str!("../templates/destinations/details.hbs")),
    ("destinations/edit", include_str!("../templates/destinations/edit.hbs")),
    ("destinations/dashboard", include_str!("../templates/destinations/dashboard.hbs")),
    ("movies/nav", include_str!("../templates/movies/nav.hbs")),
    ("movies/home", include_str!("../templates/movies/home.hbs")),
    ("movies/register", include_str!("../templates/movies/register.hbs")),
    ("movies/login", include_str!("../templates/movies/login.hbs")),
    ("movies/add-movie", include_str!("../templates/movies/add_movie.hbs")),
    ("movies/details", include_str!("../templates/movies/details.hbs")),
    ("movies/edit", include_str!("../templates/movies/edit.hbs")),
    ("shoeshelf/nav", include_str!("../templates/shoeshelf/nav.hbs")),
    ("shoeshelf/home", include_str!("../templates/shoeshelf/home.hbs")),
    ("shoeshelf/register", include_str!("../templates/shoeshelf/register.hbs")),
    ("shoeshelf/login", include_str!("../templates/shoeshelf/login.hbs")),
    ("shoeshelf/create", include_str!("../templates/shoeshelf/create.hbs")),
    ("shoeshelf/details", include_str!("../templates/shoeshelf/details.hbs")),
    ("shoeshelf/edit", include_str!("../templates/shoeshelf/edit.hbs")),
];

/// Compiles every page template once and renders views into full HTML pages.
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, source)?;
        }
        Ok(Self { registry })
    }

    /// Render `view` of `frontend` inside the shared layout. The `empty` view is
    /// shared by every front-end.
    pub fn render(&self, frontend: &str, view: &View, banner: Option<&Banner>) -> Result<String, RenderError> {
        let mut data = view.context.clone();
        data.insert("frontend".to_string(), Value::String(frontend.to_string()));
        data.insert(
            "banner".to_string(),
            serde_json::to_value(banner).unwrap_or(Value::Null),
        );

        let page = match view.template {
            "empty" => "empty".to_string(),
            name => format!("{}/{}", frontend, name),
        };
        let body = self.registry.render(&page, &data)?;
        let nav = self.registry.render(&format!("{}/nav", frontend), &data)?;

        data.insert("body".to_string(), Value::String(body));
        data.insert("nav".to_string(), Value::String(nav));
        self.registry.render("layout", &data)
    }
}
