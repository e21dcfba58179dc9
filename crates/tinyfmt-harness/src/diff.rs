//! Diff rendering for fixture comparison.

/// Render a diff between expected and actual output.
///
/// Control bytes are escaped so that a stray `\n` or `\0` is visible, and
/// each differing line reports the first differing column.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");

    let exp_lines: Vec<&str> = expected.split('\n').collect();
    let act_lines: Vec<&str> = actual.split('\n').collect();
    for i in 0..exp_lines.len().max(act_lines.len()) {
        let e = exp_lines.get(i).copied();
        let a = act_lines.get(i).copied();
        if e == a {
            continue;
        }
        let column = first_difference(e.unwrap_or(""), a.unwrap_or(""));
        out.push_str(&format!("@@ line {} col {} @@\n", i + 1, column + 1));
        match e {
            Some(e) => out.push_str(&format!("-{}\n", escape(e))),
            None => out.push_str("-<missing>\n"),
        }
        match a {
            Some(a) => out.push_str(&format!("+{}\n", escape(a))),
            None => out.push_str("+<missing>\n"),
        }
    }
    out
}

fn first_difference(a: &str, b: &str) -> usize {
    a.bytes()
        .zip(b.bytes())
        .position(|(x, y)| x != y)
        .unwrap_or_else(|| a.len().min(b.len()))
}

fn escape(line: &str) -> String {
    line.chars().flat_map(char::escape_debug).collect()
}
