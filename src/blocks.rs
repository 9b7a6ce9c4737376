//! Block structure of a script
//!
//! A script is a forest of lines nested by indentation. The indentation unit is whatever
//! leading whitespace the first indented line uses.

use serde::Serialize;

/// One statement line and the lines nested under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Statement text without indentation
    pub line: String,
    /// 1-based source line number
    pub number: usize,
    pub depth: usize,
    pub children: Vec<Block>,
}

struct Line {
    text: String,
    number: usize,
    depth: usize,
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Non-overlapping occurrences of `unit` in `indent`
fn depth_of(indent: &str, unit: &str) -> usize {
    if unit.is_empty() {
        return 0;
    }
    indent.matches(unit).count()
}

/// Split source text into the nested block forest
pub fn structure(source: &str) -> Vec<Block> {
    let raw: Vec<(usize, &str)> = source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .collect();

    let unit = raw
        .iter()
        .map(|(_, line)| leading_whitespace(line))
        .find(|indent| !indent.is_empty())
        .unwrap_or("\t");

    let lines: Vec<Line> = raw
        .iter()
        .map(|(number, line)| Line {
            text: line.trim().to_string(),
            number: *number,
            depth: depth_of(leading_whitespace(line), unit),
        })
        .collect();

    nest(&lines)
}

fn nest(lines: &[Line]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        let head = &lines[index];
        let body_len = lines[index + 1..]
            .iter()
            .take_while(|line| line.depth > head.depth)
            .count();
        blocks.push(Block {
            line: head.text.clone(),
            number: head.number,
            depth: head.depth,
            children: nest(&lines[index + 1..index + 1 + body_len]),
        });
        index += 1 + body_len;
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_script() {
        let blocks = structure("output 1\n\n# note\noutput 2\r\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].line, "output 2");
        assert_eq!(blocks[1].number, 4);
    }

    #[test]
    fn test_nesting_with_spaces() {
        let source = "if 1 == 1:\n  output 1\n  for $x in 2:\n    output $x\noutput 3";
        let blocks = structure(source);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].children.len(), 2);
        assert_eq!(blocks[0].children[1].children[0].line, "output $x");
        assert_eq!(blocks[0].children[1].children[0].depth, 2);
    }

    #[test]
    fn test_skipped_levels() {
        let blocks = structure("if 1 == 1:\n\t\t\toutput 1\n\toutput 2");
        assert_eq!(blocks[0].children.len(), 2);
        assert_eq!(blocks[0].children[0].depth, 3);
    }
}
