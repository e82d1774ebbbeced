//! HTML body shared by every relayed email: heading, field table, message
//! block and footer. All interpolated values are escaped.

/// Company named in subjects and the footer.
pub const COMPANY_NAME: &str = "RSN & Co";

/// Rendered in place of an absent optional field.
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone)]
pub struct EmailContent<'a> {
    pub heading: &'a str,
    /// Label / value pairs shown in the field table, in order.
    pub rows: Vec<(&'a str, &'a str)>,
    pub message: &'a str,
}

pub fn render_email(content: &EmailContent<'_>, year: i32) -> String {
    let rows: String = content
        .rows
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<tr><td style="padding:6px 12px;font-weight:bold;border:1px solid #ddd;">{}</td><td style="padding:6px 12px;border:1px solid #ddd;">{}</td></tr>"#,
                escape_html(label),
                escape_html(value)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<div style="font-family:Arial,sans-serif;max-width:640px;margin:0 auto;color:#222;">
<h2 style="background:#0b3d91;color:#fff;padding:16px;margin:0;">{heading}</h2>
<table style="border-collapse:collapse;width:100%;margin:16px 0;">
{rows}
</table>
<h3 style="margin:16px 0 8px;">Message</h3>
<div style="padding:12px;background:#f6f6f6;border-left:4px solid #0b3d91;">{message}</div>
<p style="font-size:12px;color:#888;margin-top:24px;">&copy; {year} {company}. Sent from the website form.</p>
</div>"#,
        heading = escape_html(content.heading),
        rows = rows,
        message = escape_html(content.message).replace('\n', "<br>"),
        year = year,
        company = escape_html(COMPANY_NAME),
    )
}

/// Escapes the characters significant in HTML text and attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
