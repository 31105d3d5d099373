//! Block-level markup rewrite for Anki field HTML.
//!
//! Anki stores fields as HTML fragments. The renderer only understands inline
//! markup plus `<br/>`, so block elements become line breaks or bullets here.

pub const BREAK: &str = "<br/>";

/// Ordered rewrite table, applied repeatedly until nothing matches.
const REWRITES: &[(&str, &str)] = &[
    ("<br>", BREAK),
    ("<br />", BREAK),
    ("<hr>", BREAK),
    ("<hr/>", BREAK),
    ("<hr />", BREAK),
    ("<div>", ""),
    ("</div>", BREAK),
    ("<ul>", BREAK),
    ("</ul>", BREAK),
    ("<ol>", BREAK),
    ("</ol>", BREAK),
    ("<li>", "<br/>&bull; "),
    ("</li>", ""),
    ("<p>", ""),
    ("</p>", BREAK),
];

/// Rewrites block tags, collapses runs of breaks and strips one leading break.
///
/// Idempotent: `sanitize_html(&sanitize_html(s)) == sanitize_html(s)`.
pub fn sanitize_html(text: &str) -> String {
    // Removing a tag can join its neighbours into a new one, e.g. `<di<div>v>`.
    let mut out = text.to_string();
    loop {
        let next = rewrite_pass(&out);
        if next == out {
            break;
        }
        out = next;
    }

    match out.strip_prefix(BREAK) {
        Some(rest) => rest.to_string(),
        None => out,
    }
}

fn rewrite_pass(text: &str) -> String {
    let mut out = text.to_string();
    for (from, to) in REWRITES {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }

    let doubled = "<br/><br/>";
    while out.contains(doubled) {
        out = out.replace(doubled, BREAK);
    }
    out
}
