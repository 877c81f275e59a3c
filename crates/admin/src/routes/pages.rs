//! Server-rendered admin screens.
//!
//! The gate on these routes is advisory: it redirects visitors away before
//! any admin chrome renders, and nothing more. Data access is enforced
//! separately on every privileged API route - by inspection, nothing in
//! this module can grant access to data.

use axum::{Router, response::Html, routing::get};

use crate::middleware::AdminPage;
use crate::state::AppState;

/// Build the pages router.
pub fn router() -> Router<AppState> {
    Router::new().route("/admin", get(dashboard))
}

/// Admin dashboard shell.
///
/// GET /admin
async fn dashboard(AdminPage(identity): AdminPage) -> Html<String> {
    let who = identity
        .display_name
        .as_deref()
        .unwrap_or_else(|| identity.email.as_str());

    Html(format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>Inkstone Admin</title></head>\n\
         <body>\n\
         <h1>Inkstone Admin</h1>\n\
         <p>Signed in as {} ({})</p>\n\
         <nav><a href=\"/admin\">Dashboard</a></nav>\n\
         <form method=\"post\" action=\"/auth/logout\"><button>Sign out</button></form>\n\
         </body>\n\
         </html>\n",
        escape_html(who),
        identity.role,
    ))
}

/// Minimal HTML escaping for backend-sourced display strings.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
