//! Key scripts for replaying input against a field.
//!
//! Plain characters are typed as-is; named keys go in braces:
//! `{Up}`, `{Down}`, `{PageUp}`, `{PageDown}`, `{Left}`, `{Right}`,
//! `{Home}`, `{End}`, `{Backspace}`, `{Delete}`, `{SelectAll}`,
//! `{Click:N}` (pointer at character offset N). `{{` types a literal brace.

use anyhow::{bail, Context};
use sectionfield_core::{DateAdapter, FieldEngine, KeyEvent, KeyResult};
use tracing::trace;

/// One replayable input step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Key(KeyEvent),
    Click(usize),
}

fn named_key(name: &str) -> anyhow::Result<Step> {
    let key = match name {
        "Up" => KeyEvent::Up,
        "Down" => KeyEvent::Down,
        "PageUp" => KeyEvent::PageUp,
        "PageDown" => KeyEvent::PageDown,
        "Left" => KeyEvent::Left,
        "Right" => KeyEvent::Right,
        "Home" => KeyEvent::Home,
        "End" => KeyEvent::End,
        "Backspace" => KeyEvent::Backspace,
        "Delete" => KeyEvent::Delete,
        "SelectAll" => KeyEvent::SelectAll,
        _ => match name.strip_prefix("Click:") {
            Some(offset) => {
                let offset = offset
                    .trim()
                    .parse()
                    .with_context(|| format!("bad click offset in {{{name}}}"))?;
                return Ok(Step::Click(offset));
            }
            None => bail!("unknown key {{{name}}}"),
        },
    };
    Ok(Step::Key(key))
}

/// Parse a key script into steps.
pub fn parse_script(script: &str) -> anyhow::Result<Vec<Step>> {
    let mut steps = Vec::new();
    let mut chars = script.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '{' {
            steps.push(Step::Key(KeyEvent::Char(c)));
            continue;
        }
        if chars.peek() == Some(&'{') {
            chars.next();
            steps.push(Step::Key(KeyEvent::Char('{')));
            continue;
        }
        let mut name = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) => name.push(c),
                None => bail!("unterminated key name {{{name}"),
            }
        }
        steps.push(named_key(&name)?);
    }
    Ok(steps)
}

/// Replay `steps` against `field`; returns how many key events were handled.
pub fn replay<A: DateAdapter>(field: &mut FieldEngine<A>, steps: &[Step]) -> usize {
    steps
        .iter()
        .map(|step| {
            let handled = match *step {
                Step::Key(key) => field.process_key(key) == KeyResult::Handled,
                Step::Click(offset) => field.select_at_offset(offset),
            };
            trace!(?step, handled, text = %field.text(), "replay step");
            handled
        })
        .filter(|handled| *handled)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_script() {
        let steps = parse_script("{Click:0}12{Right}{{").unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Click(0),
                Step::Key(KeyEvent::Char('1')),
                Step::Key(KeyEvent::Char('2')),
                Step::Key(KeyEvent::Right),
                Step::Key(KeyEvent::Char('{')),
            ]
        );
    }

    #[test]
    fn test_bad_scripts() {
        assert!(parse_script("{Nope}").is_err());
        assert!(parse_script("{Up").is_err());
        assert!(parse_script("{Click:x}").is_err());
    }
}
