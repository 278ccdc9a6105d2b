use crate::parser::blocks::{Block, Label, Line};

/// Text following `**Summary:**`, across lines, up to a blank line followed
/// by a line opening with `#`, `*` or `-`. Without that blank line the
/// summary runs on through whatever follows.
pub fn summary(lines: &[Line<'_>]) -> Option<String> {
    let start = find_label(lines, Label::Summary)?;
    let Block::Label { rest, .. } = lines[start].block else {
        return None;
    };

    let mut parts = vec![rest];
    let mut prev_blank = false;
    for line in &lines[start + 1..] {
        if prev_blank && line.raw.starts_with(['#', '*', '-']) {
            break;
        }
        prev_blank = line.block == Block::Empty;
        parts.push(line.raw);
    }

    let text = parts.join("\n").trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Bullet items directly under `label`. Blank lines between the label and
/// the first bullet are allowed; the first other line ends the list.
pub fn bullet_list(lines: &[Line<'_>], label: Label) -> Vec<String> {
    let Some(start) = find_label(lines, label) else {
        return Vec::new();
    };

    lines[start + 1..]
        .iter()
        .skip_while(|l| l.block == Block::Empty)
        .map_while(|l| match l.block {
            Block::Bullet(item) => Some(item),
            _ => None,
        })
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remainder of the line carrying `label`, when non-empty.
pub fn inline_value(lines: &[Line<'_>], label: Label) -> Option<String> {
    let idx = find_label(lines, label)?;
    match lines[idx].block {
        Block::Label { rest, .. } if !rest.is_empty() => Some(rest.to_string()),
        _ => None,
    }
}

fn find_label(lines: &[Line<'_>], wanted: Label) -> Option<usize> {
    lines
        .iter()
        .position(|l| matches!(l.block, Block::Label { label, .. } if label == wanted))
}
