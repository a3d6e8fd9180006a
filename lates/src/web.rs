//! An HTML front end for a [`DailyRegistry`].
//!
//! | route          | behavior |
//! |----------------|----------|
//! | `GET /`        | renders the request form and every current late |
//! | `POST /submit` | stores the submitted late, then redirects to `/` |
//! | `GET /submit`  | redirects to `/` |
//!
//! A submission whose name is blank, or whose body is not a valid form, is
//! logged and dropped; the client is redirected either way.

use std::{borrow::Cow, fmt, sync::Arc};

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, Redirect},
    routing::get,
    Form, Router,
};
use lates_core::{
    archive::ArchiveSink,
    time::{Clock, Timestamp},
    Record,
};
use serde::Deserialize;

#[allow(unused_imports)]
use crate::util::ErrorExt;
use crate::DailyRegistry;

/// The page heading used by [`router`].
pub const DEFAULT_TITLE: &str = "Lates";

const CHECKBOX_ON: &str = "on";

/// Builds a [`Router`] serving `registry` under [`DEFAULT_TITLE`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use lates::{web, DailyRegistry};
///
/// let app: axum::Router = web::router(Arc::new(DailyRegistry::new()));
/// ```
pub fn router<S, C>(registry: Arc<DailyRegistry<S, C>>) -> Router
where
    S: ArchiveSink,
    C: Clock,
{
    router_with_title(registry, DEFAULT_TITLE)
}

/// Like [`router`], with a custom page heading.
pub fn router_with_title<S, C>(
    registry: Arc<DailyRegistry<S, C>>,
    title: impl Into<Cow<'static, str>>,
) -> Router
where
    S: ArchiveSink,
    C: Clock,
{
    let state = AppState {
        registry,
        title: Arc::from(title.into()),
    };

    Router::new()
        .route("/", get(render::<S, C>))
        .route("/submit", get(back_home).post(submit::<S, C>))
        .with_state(state)
}

struct AppState<S, C> {
    registry: Arc<DailyRegistry<S, C>>,
    title: Arc<str>,
}

impl<S, C> Clone for AppState<S, C> {
    fn clone(&self) -> Self {
        AppState {
            registry: Arc::clone(&self.registry),
            title: Arc::clone(&self.title),
        }
    }
}

async fn render<S, C>(State(app): State<AppState<S, C>>) -> Html<String>
where
    S: ArchiveSink,
    C: Clock,
{
    let mut lates = app.registry.list_all();
    lates.sort_unstable_by(|a, b| a.key().cmp(b.key()));

    let page = Page {
        title: &app.title,
        lates: &lates,
        now: app.registry.clock().now(),
    };
    Html(page.to_string())
}

async fn submit<S, C>(
    State(app): State<AppState<S, C>>,
    form: Result<Form<SubmitForm>, FormRejection>,
) -> Redirect
where
    S: ArchiveSink,
    C: Clock,
{
    match form {
        Ok(Form(form)) => match form.into_record() {
            Some(record) => {
                debug!(key = %record.key(), "late submitted");
                app.registry.submit(record);
            }
            None => {
                warn!("ignoring late submitted without a name");
            }
        },
        Err(_rejection) => {
            warn!(err = %_rejection.display_chain(), "failed to parse submitted form");
        }
    }

    Redirect::to("/")
}

async fn back_home() -> Redirect {
    Redirect::to("/")
}

#[derive(Debug, Deserialize)]
struct SubmitForm {
    #[serde(default)]
    name: String,
    vegetarian: Option<String>,
    refrigerated: Option<String>,
}

impl SubmitForm {
    fn into_record(self) -> Option<Record> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Record::new(
            name,
            is_checked(self.vegetarian.as_deref()),
            is_checked(self.refrigerated.as_deref()),
        ))
    }
}

fn is_checked(value: Option<&str>) -> bool {
    value == Some(CHECKBOX_ON)
}

struct Page<'a> {
    title: &'a str,
    lates: &'a [Record],
    now: Timestamp,
}

impl fmt::Display for Page<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = Escaped(self.title);
        write!(
            f,
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <title>{title}</title>\n\
             </head>\n\
             <body>\n\
             <h1>{title}</h1>\n\
             <form method=\"post\" action=\"/submit\">\n\
             <label>Name <input type=\"text\" name=\"name\" required></label>\n\
             <label><input type=\"checkbox\" name=\"vegetarian\"> Vegetarian</label>\n\
             <label><input type=\"checkbox\" name=\"refrigerated\"> Refrigerated</label>\n\
             <button type=\"submit\">Request a late</button>\n\
             </form>\n"
        )?;

        let now = self.now;
        writeln!(
            f,
            "<p>Lates as of {:04}-{:02}-{:02} {:02}:{:02}</p>",
            now.year(),
            u8::from(now.month()),
            now.day(),
            now.hour(),
            now.minute(),
        )?;

        if self.lates.is_empty() {
            f.write_str("<p>No lates yet.</p>\n")?;
        } else {
            f.write_str(
                "<table>\n<tr><th>Name</th><th>Vegetarian</th><th>Refrigerated</th></tr>\n",
            )?;
            for late in self.lates {
                writeln!(
                    f,
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                    Escaped(late.key()),
                    yes_no(late.wants_vegetarian_option()),
                    yes_no(late.wants_refrigeration()),
                )?;
            }
            f.write_str("</table>\n")?;
        }

        f.write_str("</body>\n</html>\n")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Displays a string with HTML special characters escaped.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(i) = rest.find(['&', '<', '>', '"', '\'']) {
            f.write_str(&rest[..i])?;
            f.write_str(match rest.as_bytes()[i] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&quot;",
                _ => "&#39;",
            })?;
            rest = &rest[i + 1..];
        }
        f.write_str(rest)
    }
}
