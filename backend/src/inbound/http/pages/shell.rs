//! Navigation shell wrapped around every page.
//!
//! The header is static: it shows the same links whether or not anyone is
//! signed in.

use super::escape;

const NAV_LINKS: [(&str, &str); 3] = [("Home", "/"), ("Dashboard", "/dashboard"), ("About", "/about")];
const AUTH_LINKS: [(&str, &str); 2] = [("Sign in", "/login"), ("Sign up", "/signup")];
const USER_MENU_LINKS: [(&str, &str); 2] = [("Profile", "/profile"), ("Settings", "/settings")];

fn links(items: &[(&str, &str)]) -> String {
    items
        .iter()
        .map(|(label, href)| format!(r#"<a href="{href}">{label}</a>"#))
        .collect::<Vec<_>>()
        .join("")
}

/// The shared page header.
pub fn header() -> String {
    format!(
        concat!(
            r#"<header class="site-header">"#,
            r#"<a class="brand" href="/">MyApp</a>"#,
            r#"<nav class="primary">{nav}</nav>"#,
            r#"<div class="auth">{auth}</div>"#,
            r#"<details class="user-menu"><summary>Account</summary>"#,
            r#"<div class="menu">{menu}"#,
            r#"<form method="post" action="/logout"><button type="submit">Sign out</button></form>"#,
            r#"</div></details>"#,
            r#"</header>"#
        ),
        nav = links(&NAV_LINKS),
        auth = links(&AUTH_LINKS),
        menu = links(&USER_MENU_LINKS),
    )
}

/// Complete HTML document with `title` and `body` inside the shell.
pub fn document(title: &str, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html lang="en"><head><meta charset="utf-8">"#,
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#,
            "<title>{title}</title></head><body>{header}<main>{body}</main></body></html>\n"
        ),
        title = escape(title),
        header = header(),
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"<a class="brand" href="/">MyApp</a>"#)]
    #[case(r#"<a href="/">Home</a>"#)]
    #[case(r#"<a href="/dashboard">Dashboard</a>"#)]
    #[case(r#"<a href="/about">About</a>"#)]
    #[case(r#"<a href="/login">Sign in</a>"#)]
    #[case(r#"<a href="/signup">Sign up</a>"#)]
    #[case(r#"<a href="/profile">Profile</a>"#)]
    #[case(r#"<a href="/settings">Settings</a>"#)]
    #[case(r#"<form method="post" action="/logout">"#)]
    fn header_carries_every_link(#[case] fragment: &str) {
        assert!(header().contains(fragment), "missing {fragment}");
    }

    #[test]
    fn document_escapes_title_but_not_body() {
        let html = document("A & B", "<p>ok</p>");
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("<main><p>ok</p></main>"));
    }
}
