use dioxus::document::eval;
use guide_core::model::QuestionId;
use guide_core::progress::ScrollMetrics;
use serde::Deserialize;

/// Scroll container whose depth feeds page progress.
pub const CONTENT_BODY_ID: &str = "content-body";
pub const SEARCH_INPUT_ID: &str = "search-input";

const SCROLL_METRICS_SCRIPT: &str = r#"
    await new Promise((resolve) => requestAnimationFrame(resolve));
    const body = document.getElementById("content-body");
    if (!body) { return null; }
    return {
        scroll_top: body.scrollTop,
        scroll_height: body.scrollHeight,
        viewport_height: body.clientHeight,
    };
"#;

/// Scroll metrics of the content body, read on the next animation frame.
/// `None` when the page has no content body.
pub async fn read_scroll_metrics() -> Option<ScrollMetrics> {
    eval(SCROLL_METRICS_SCRIPT)
        .join::<Option<ScrollMetrics>>()
        .await
        .ok()
        .flatten()
}

#[derive(Debug, Deserialize)]
struct ClipboardOutcome {
    ok: bool,
    error: Option<String>,
}

/// Put `text` on the system clipboard.
///
/// # Errors
///
/// Returns a description of the failure when the clipboard rejects the write.
pub async fn write_clipboard(text: &str) -> Result<(), String> {
    let script = write_clipboard_script(text);
    let outcome = eval(&script)
        .join::<ClipboardOutcome>()
        .await
        .map_err(|err| err.to_string())?;
    if outcome.ok {
        Ok(())
    } else {
        Err(outcome.error.unwrap_or_else(|| "clipboard unavailable".to_string()))
    }
}

/// Scroll a question card into view and replay its attention animation.
/// Missing cards are skipped.
pub async fn reveal_question(id: &QuestionId) {
    let script = reveal_question_script(id.as_str());
    let _ = eval(&script).await;
}

pub fn focus_element(element_id: &str) {
    let _ = eval(&format!(
        "document.getElementById({})?.focus();",
        js_string_literal(element_id)
    ));
}

const PRINT_SCRIPT: &str = r#"
    await new Promise((resolve) => requestAnimationFrame(() => requestAnimationFrame(resolve)));
    window.print();
"#;

/// Open the print dialog after pending DOM updates have painted.
pub async fn print_page() {
    let _ = eval(PRINT_SCRIPT).await;
}

fn write_clipboard_script(text: &str) -> String {
    let text_literal = js_string_literal(text);
    format!(
        r#"
        const text = {text_literal};
        try {{
            await navigator.clipboard.writeText(text);
            return {{ ok: true, error: null }};
        }} catch (err) {{
            return {{ ok: false, error: String(err) }};
        }}
        "#
    )
}

fn reveal_question_script(id: &str) -> String {
    let id_literal = js_string_literal(id);
    format!(
        r#"
        const card = document.getElementById({id_literal});
        if (!card) {{ return; }}
        card.scrollIntoView({{ behavior: "smooth", block: "center" }});
        card.style.animation = "none";
        void card.offsetHeight;
        card.style.animation = "borderGlow 1s ease-in-out 3";
        "#
    )
}

fn js_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_literals_escape_quotes_and_newlines() {
        assert_eq!(js_string_literal("a\"b\nc\\"), r#""a\"b\nc\\""#);
    }

    #[test]
    fn clipboard_script_embeds_code_verbatim() {
        let script = write_clipboard_script("echo \"hi\"\nexit 0");
        assert!(script.contains(r#"const text = "echo \"hi\"\nexit 0";"#));
    }

    #[test]
    fn reveal_script_targets_card_id() {
        let script = reveal_question_script("q3");
        assert!(script.contains(r#"document.getElementById("q3")"#));
        assert!(script.contains("borderGlow"));
    }
}
