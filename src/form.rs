//! Hosted-form payload and the ways to hand it to a browser.

use serde::Serialize;

/// Output of the hosted-form build: the three posted fields plus the intermediate
/// plaintexts, useful when reconciling with gateway support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltHostedForm {
    pub me_id: String,
    pub merchant_request_plain: String,
    pub merchant_request: String,
    pub hash_input: String,
    pub hash_hex: String,
    pub hash: String,
    pub action_url: String,
}

impl BuiltHostedForm {
    /// Form fields in the order the gateway documents them.
    pub fn form_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("me_id", self.me_id.as_str()),
            ("merchant_request", self.merchant_request.as_str()),
            ("hash", self.hash.as_str()),
        ]
    }
}

/// `application/x-www-form-urlencoded` body for posting the form server-side.
pub fn to_form_urlencoded(form: &BuiltHostedForm) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form.form_fields())
        .finish()
}

/// A minimal page that auto-submits the hosted form to the gateway on load.
pub fn render_auto_submit_form(form: &BuiltHostedForm) -> String {
    let inputs = form
        .form_fields()
        .iter()
        .map(|(name, value)| {
            format!(
                r#"<input type="hidden" name="{}" value="{}" />"#,
                name,
                escape_html(value)
            )
        })
        .collect::<Vec<_>>()
        .join("\n      ");

    format!(
        r#"<!doctype html>
<html>
  <head><meta charset="utf-8" /><title>Redirecting…</title></head>
  <body onload="document.forms[0].submit()">
    <form method="POST" action="{}" enctype="application/x-www-form-urlencoded">
      {}
      <noscript><button type="submit">Continue</button></noscript>
    </form>
  </body>
</html>"#,
        escape_html(&form.action_url),
        inputs
    )
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built() -> BuiltHostedForm {
        BuiltHostedForm {
            me_id: "M1".to_string(),
            merchant_request_plain: "plain".to_string(),
            merchant_request: "ab+c/d==".to_string(),
            hash_input: "M1~O1~1.00~ETH~ETB".to_string(),
            hash_hex: "00".to_string(),
            hash: "h=".to_string(),
            action_url: "https://pay.example/form?a=1&b=2".to_string(),
        }
    }

    #[test]
    fn test_form_fields_order() {
        let names: Vec<&str> = built().form_fields().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["me_id", "merchant_request", "hash"]);
    }

    #[test]
    fn test_to_form_urlencoded_escapes_base64() {
        assert_eq!(
            to_form_urlencoded(&built()),
            "me_id=M1&merchant_request=ab%2Bc%2Fd%3D%3D&hash=h%3D"
        );
    }

    #[test]
    fn test_render_auto_submit_form() {
        let html = render_auto_submit_form(&built());
        assert!(html.contains(r#"action="https://pay.example/form?a=1&amp;b=2""#));
        assert!(html.contains(r#"<input type="hidden" name="merchant_request" value="ab+c/d==" />"#));
        assert!(html.contains(r#"name="hash" value="h=""#));
        assert!(html.contains("document.forms[0].submit()"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }
}
