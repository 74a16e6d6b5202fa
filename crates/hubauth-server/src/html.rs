//! Minimal HTML rendering for the status and error pages.

use axum::response::Html;

/// Heading shown on every page.
pub const APP_TITLE: &str = "HubSpot OAuth 2.0 App";

/// Escape text for safe inclusion in HTML element content or attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap already-rendered body markup in a full document.
pub fn page(body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><h2>{title}</h2>{body}</body></html>",
        title = APP_TITLE,
        body = body,
    ))
}

/// Page for a session that has not installed the app yet.
pub fn install_prompt() -> Html<String> {
    page(r#"<a href="/install"><h3>Install the app</h3></a>"#)
}

/// Page showing the access token of an authorized session.
pub fn authorized(access_token: &str) -> Html<String> {
    page(&format!(
        "<p>&#x2705; OAuth successful</p>\
         <p>Access token obtained</p>\
         <p><strong>Access Token:</strong> {}</p>",
        escape(access_token)
    ))
}

/// Page for an authorized session whose token could not be refreshed.
pub fn token_unavailable(message: &str) -> Html<String> {
    page(&format!(
        "<p>Could not obtain an access token: {}</p>\
         <a href=\"/install\"><h3>Reinstall the app</h3></a>",
        escape(message)
    ))
}

/// Error page.
pub fn error(message: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>\
         <body><h4>Error: {}</h4></body></html>",
        APP_TITLE,
        escape(message)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(
            escape(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#x27;y&#x27;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_authorized_page_escapes_token() {
        let Html(body) = authorized("a<b");
        assert!(body.contains("OAuth successful"));
        assert!(body.contains("a&lt;b"));
        assert!(!body.contains("a<b"));
    }

    #[test]
    fn test_install_prompt() {
        let Html(body) = install_prompt();
        assert!(body.contains(APP_TITLE));
        assert!(body.contains(r#"href="/install""#));
    }

    #[test]
    fn test_error_page() {
        let Html(body) = error("<b>bad</b>");
        assert!(body.contains("<h4>Error: &lt;b&gt;bad&lt;/b&gt;</h4>"));
    }
}
