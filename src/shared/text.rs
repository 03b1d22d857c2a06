/// Strips markup tags from instruction text coming back from the directions
/// service, which embeds `<b>`/`<div>` styling in `html_instructions`.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            ch if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text
}

#[test]
fn strip_tags_test() {
    let html = "Turn <b>left</b> onto <b>King St W</b>";
    assert_eq!(strip_tags(html), "Turn left onto King St W")
}

#[test]
fn strip_tags_nested_divs_test() {
    let html = r#"Head south<div style="font-size:0.9em">Toll road</div>"#;
    assert_eq!(strip_tags(html), "Head southToll road")
}

#[test]
fn strip_tags_plain_text_test() {
    let plain = "Continue onto Gardiner Expressway";
    assert_eq!(strip_tags(plain), plain)
}

#[test]
fn strip_tags_empty_test() {
    assert_eq!(strip_tags(""), "")
}
