/// One source line split into its label, mnemonic and operands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line<'a> {
    pub label: Option<&'a str>,
    /// Upper-cased.
    pub mnemonic: Option<String>,
    pub operands: Vec<&'a str>,
}

pub const COMMENT: char = ';';
pub const LABEL_SEP: char = ':';

pub fn tokenize_line(line: &str) -> Line<'_> {
    let code = match line.find(COMMENT) {
        Some(p) => &line[..p],
        None => line,
    };
    let mut rest = code.trim();
    if rest.is_empty() {
        return Line::default();
    }

    let mut label = None;
    if let Some((name, tail)) = rest.split_once(LABEL_SEP) {
        let name = name.trim();
        // `: ADD ...` carries no label
        if !name.is_empty() {
            label = Some(name);
        }
        rest = tail.trim();
    }
    if rest.is_empty() {
        return Line { label, ..Line::default() };
    }

    let (mn, tail) = match rest.split_once(char::is_whitespace) {
        Some((mn, tail)) => (mn, Some(tail.trim())),
        None => (rest, None),
    };
    let operands = match tail {
        Some(t) => t.split(',').map(str::trim).collect(),
        None => Vec::new(),
    };
    Line { label, mnemonic: Some(mn.to_uppercase()), operands }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_line() {
        let l = tokenize_line("loop:  addi R1 , 0x01   ; counter++");
        assert_eq!(l.label, Some("loop"));
        assert_eq!(l.mnemonic.as_deref(), Some("ADDI"));
        assert_eq!(l.operands, vec!["R1", "0x01"]);
    }

    #[test]
    fn comment_and_blank_lines_are_empty() {
        assert_eq!(tokenize_line("   ; nothing here"), Line::default());
        assert_eq!(tokenize_line(""), Line::default());
    }

    #[test]
    fn label_only() {
        let l = tokenize_line("  start:   ");
        assert_eq!(l.label, Some("start"));
        assert_eq!(l.mnemonic, None);
        assert!(l.operands.is_empty());
    }

    #[test]
    fn only_first_colon_splits() {
        let l = tokenize_line("a: b: HALT");
        assert_eq!(l.label, Some("a"));
        // the remainder starts with `b:` which becomes the mnemonic token
        assert_eq!(l.mnemonic.as_deref(), Some("B:"));
        assert_eq!(l.operands, vec!["HALT"]);
    }

    #[test]
    fn bare_mnemonic_has_no_operands() {
        let l = tokenize_line("halt");
        assert_eq!(l.mnemonic.as_deref(), Some("HALT"));
        assert!(l.operands.is_empty());
    }

    #[test]
    fn empty_operand_is_kept() {
        let l = tokenize_line("ADD R1,,R2");
        assert_eq!(l.operands, vec!["R1", "", "R2"]);
    }
}
