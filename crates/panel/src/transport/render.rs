// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-side rendering of the panel pages.

use std::fmt::Write;

use crate::upstream::types::{MpskEntry, MpskStatus, ROLES};

const PANEL_HTML: &str = include_str!("../web/panel.html");
const LOGS_HTML: &str = include_str!("../web/logs.html");

/// Render the entry list page.
///
/// `filter` is echoed back into the search box and `result` is the outcome
/// message of the last mutation (empty for none).
pub fn list_page(group: &str, entries: &[MpskEntry], filter: &str, result: &str) -> String {
    let mut rows = String::new();
    for entry in entries {
        render_row(&mut rows, group, entry);
    }
    if entries.is_empty() {
        rows.push_str("<tr><td colspan=\"4\">No mPSK keys found.</td></tr>\n");
    }

    PANEL_HTML
        .replace("{{ROWS}}", &rows)
        .replace("{{FILTER}}", &escape_html(filter))
        .replace("{{RESULT}}", &escape_html(result))
        .replace("{{GROUP}}", &escape_html(group))
}

/// Render the raw audit log inside a `<pre>` block.
pub fn logs_page(log: &str) -> String {
    LOGS_HTML.replace("{{LOG}}", &escape_html(log))
}

fn render_row(out: &mut String, group: &str, entry: &MpskEntry) {
    let hidden = format!(
        "<input type=\"hidden\" name=\"mpsk_id\" value=\"{}\">\
         <input type=\"hidden\" name=\"group\" value=\"{}\">\
         <input type=\"hidden\" name=\"name\" value=\"{}\">",
        escape_html(&entry.id),
        escape_html(group),
        escape_html(&entry.name),
    );
    let next = entry.status.toggled();
    let toggle_label = match next {
        MpskStatus::Enabled => "Enable",
        MpskStatus::Disabled => "Disable",
    };

    let _ = writeln!(out, "<tr>");
    let _ = writeln!(out, "<td>{}</td>", escape_html(&entry.name));
    let _ = writeln!(
        out,
        "<td><button type=\"button\" class=\"reveal\" onclick=\"reveal(this)\">Show</button>\
         <span class=\"secret\" hidden>{}</span></td>",
        escape_html(&entry.mpsk)
    );
    let _ = writeln!(out, "<td class=\"status-{0}\">{0}</td>", entry.status);
    let _ = writeln!(out, "<td class=\"actions\">");
    let _ = writeln!(
        out,
        "<form method=\"POST\" action=\"/reset-key\" onsubmit=\"return confirmReset();\">\
         {hidden}<button type=\"submit\" class=\"reset\">Reset</button></form>"
    );
    let _ = writeln!(
        out,
        "<form method=\"POST\" action=\"/toggle-key\">{hidden}\
         <input type=\"hidden\" name=\"status\" value=\"{next}\">\
         <button type=\"submit\" class=\"{class}\">{label}</button></form>",
        class = toggle_label.to_lowercase(),
        label = toggle_label,
    );
    let _ = writeln!(
        out,
        "<form method=\"POST\" action=\"/update-role\">{hidden}\
         <select name=\"role\" onchange=\"this.form.submit()\">{}</select></form>",
        role_options(&entry.role)
    );
    let _ = writeln!(out, "</td>");
    let _ = writeln!(out, "</tr>");
}

/// `<option>`s for the role selector with `current` selected. A role the
/// panel does not know about is listed first so the selector still shows it.
fn role_options(current: &str) -> String {
    let mut out = String::new();
    if !current.is_empty() && !ROLES.contains(&current) {
        let role = escape_html(current);
        let _ = write!(out, "<option value=\"{role}\" selected>{role}</option>");
    }
    for role in ROLES {
        let selected = if *role == current { " selected" } else { "" };
        let _ = write!(out, "<option value=\"{role}\"{selected}>{role}</option>");
    }
    out
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Percent-encode a query value byte by byte over its UTF-8 form.
pub fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(b))
            }
            _ => {
                let _ = write!(out, "%{b:02X}");
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
