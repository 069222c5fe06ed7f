use axum::{extract::State, response::Html};

use crate::AppState;

const INDEX_TEMPLATE: &str = include_str!("../../../templates/index.html");
const OWNER_CONFIRM_TEMPLATE: &str = include_str!("../../../templates/owner_confirm.html");

/// 模板中电话按钮的占位符
const PHONE_PLACEHOLDER: &str = "{{PHONE_BUTTON}}";

fn escape_html(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            c => c.to_string(),
        })
        .collect()
}

pub(crate) fn render_index(phone_number: Option<&str>) -> String {
    let phone_button = phone_number
        .map(|phone| {
            format!(
                r#"<a href="tel:{}" class="btn btn-call">📞 电话联系</a>"#,
                escape_html(phone)
            )
        })
        .unwrap_or_default();

    INDEX_TEMPLATE.replace(PHONE_PLACEHOLDER, &phone_button)
}

/// 请求方页面
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.config.phone_number.as_deref()))
}

/// 车主确认页面
pub async fn owner_confirm_page() -> Html<&'static str> {
    Html(OWNER_CONFIRM_TEMPLATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_without_phone_has_no_call_button() {
        let html = render_index(None);
        assert!(!html.contains(PHONE_PLACEHOLDER));
        assert!(!html.contains("tel:"));
    }

    #[test]
    fn index_with_phone_renders_escaped_call_button() {
        let html = render_index(Some("138<0013>8000"));
        assert!(html.contains(r#"href="tel:138&lt;0013&gt;8000""#));
    }
}
