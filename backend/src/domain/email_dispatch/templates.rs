//! Welcome message rendering.

use crate::domain::ports::OutgoingEmail;

pub const WELCOME_SUBJECT: &str = "Welcome to Marketplace Blog!";

/// Render the welcome email for `name` at `email`.
///
/// Both values are inserted into the HTML body escaped.
#[must_use]
pub fn welcome_email(email: &str, name: &str) -> OutgoingEmail {
    let text_body = format!(
        "Welcome, {name}!\n\n\
         You have successfully registered at Marketplace Blog.\n\
         Your login email: {email}\n\n\
         Thank you for signing up!\n\
         ---\n\
         This message was sent automatically."
    );

    let name_html = escape_html(name);
    let email_html = escape_html(email);
    let html_body = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background: #4CAF50; color: white; padding: 20px; text-align: center; }}
        .content {{ padding: 20px; background: #f9f9f9; }}
        .footer {{ padding: 20px; text-align: center; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header"><h1>Welcome, {name_html}!</h1></div>
        <div class="content">
            <p>You have successfully registered at <strong>Marketplace Blog</strong>.</p>
            <p>Your login email: <strong>{email_html}</strong></p>
            <p>You can now write articles and much more!</p>
        </div>
        <div class="footer">
            <p>This message was sent automatically, please do not reply.</p>
        </div>
    </div>
</body>
</html>"#
    );

    OutgoingEmail {
        to: email.to_owned(),
        subject: WELCOME_SUBJECT.to_owned(),
        text_body,
        html_body: Some(html_body),
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_has_plain_and_html_parts() {
        let email = welcome_email("ada@example.com", "Ada");
        assert_eq!(email.subject, WELCOME_SUBJECT);
        assert_eq!(email.to, "ada@example.com");
        assert!(email.text_body.contains("Welcome, Ada!"));
        let html = email.html_body.expect("html part");
        assert!(html.contains("<strong>ada@example.com</strong>"));
    }

    #[test]
    fn html_part_escapes_markup() {
        let email = welcome_email("a@x.com", "<script>");
        let html = email.html_body.expect("html part");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
