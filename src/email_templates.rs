pub const CONFIRMATION_SUBJECT: &str = "Welcome to Delta Capital Updates";

const STYLE: &str = r#"
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; }
        .container { max-width: 600px; margin: 0 auto; padding: 20px; }
        h1 { color: #111; }
        p { color: #555; line-height: 1.6; }
        .footer { margin-top: 30px; padding-top: 20px; border-top: 1px solid #e0e0e0; color: #999; }
"#;

const FOOTER: &str = r#"<p class="footer">
          <strong>Delta Capital</strong><br>
          Building quantitative trading systems from the ground up.
        </p>"#;

fn layout(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <style>{}</style>
</head>
<body>
  <div class="container">
    {}
    {}
  </div>
</body>
</html>
"#,
        STYLE, body, FOOTER
    )
}

pub fn confirmation_email() -> String {
    layout(
        r#"<h1>Thank You for Subscribing</h1>
    <p>You've successfully subscribed to Delta Capital updates.</p>
    <p>We'll send you periodic updates about our research, development progress, and milestones.</p>"#,
    )
}

/// Subject and content are inserted as given (they may carry markup); newlines become `<br>`.
pub fn newsletter_email(subject: &str, content: &str) -> String {
    layout(&format!(
        "<h1>{}</h1>\n    <p>{}</p>",
        subject,
        content.replace('\n', "<br>")
    ))
}
