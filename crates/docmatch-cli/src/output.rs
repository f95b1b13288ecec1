use std::io::Write;

use docmatch_core::{ClassifierVerdict, NormalizedAuthors};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print a normalized list together with the decisions that produced it.
pub fn print_explanation(
    w: &mut dyn Write,
    result: &NormalizedAuthors,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "input:         {}", result.raw())?;

    match &result.collaboration {
        Some(collab) => writeln!(w, "collaboration: {} ({:?})", collab.text, collab.placement)?,
        None => writeln!(w, "collaboration: none")?,
    }

    if let Some(scores) = &result.scores {
        writeln!(w, "scores:        {scores}")?;
    }

    let verdict = match result.verdict {
        Some(ClassifierVerdict::Convention(convention)) => convention.to_string(),
        Some(ClassifierVerdict::Ambiguous) => "ambiguous".to_string(),
        Some(ClassifierVerdict::Conflicting) => "conflicting".to_string(),
        None => "not classified".to_string(),
    };
    if color.enabled() {
        match result.verdict {
            Some(ClassifierVerdict::Convention(_)) => {
                writeln!(w, "verdict:       {}", verdict.green())?
            }
            _ => writeln!(w, "verdict:       {}", verdict.yellow())?,
        }
    } else {
        writeln!(w, "verdict:       {verdict}")?;
    }

    if color.enabled() {
        writeln!(w, "output:        {}", result.to_string().bold())?;
    } else {
        writeln!(w, "output:        {result}")?;
    }
    writeln!(w)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmatch_core::{NormalizerConfig, normalize_author_list};

    fn explain(raw: &str) -> String {
        let result = normalize_author_list(raw, &NormalizerConfig::default());
        let mut buf = Vec::new();
        print_explanation(&mut buf, &result, ColorMode(false)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn explains_collaboration_and_scores() {
        let text = explain("the ALICE Collaboration; Lijiao, Liu");
        assert!(text.contains("collaboration: the ALICE Collaboration (Leading)"));
        assert!(text.contains("scores:        TI=0 LI=0 TF=2 LF=0"));
        assert!(text.contains("verdict:       trailing full given name"));
        assert!(text.contains("output:        the ALICE Collaboration; Lijiao, L"));
    }

    #[test]
    fn unclassified_input() {
        let text = explain("");
        assert!(text.contains("collaboration: none"));
        assert!(text.contains("verdict:       not classified"));
        assert!(!text.contains("scores:"));
    }
}
