use std::path::Path;

use anyhow::Result;
use questionnaire::{Question, Questionnaire};

use super::read_tree;

pub fn run(file: &Path) -> Result<()> {
    let tree = read_tree(file)?;
    println!("{}", outline(&tree));
    Ok(())
}

/// Numbered outline of sections and questions. Required questions are
/// marked with `*`, correct options with `(correct)`.
pub fn outline(tree: &Questionnaire) -> String {
    let meta = tree.meta();
    let mut lines = vec![format!(
        "{} [{}, {}]",
        meta.title,
        meta.status.as_str(),
        meta.kind.as_str()
    )];

    for (s, section) in tree.sections().enumerate() {
        lines.push(format!("{}. {}", s + 1, section.title()));
        for (q, question) in tree.questions_in(section.id()).enumerate() {
            lines.push(question_line(s, q, question));
            let correct = question.kind().correct_answers().unwrap_or_default();
            for (i, option) in question.kind().options().unwrap_or_default().iter().enumerate() {
                let mark = if correct.contains(&i) { " (correct)" } else { "" };
                lines.push(format!("      - {option}{mark}"));
            }
        }
    }
    lines.join("\n")
}

pub fn question_line(s: usize, q: usize, question: &Question) -> String {
    let required = if question.is_required() { "* " } else { "" };
    let logic = if question.conditional_logic().is_some() {
        "  (conditional)"
    } else {
        ""
    };
    format!(
        "   {}.{} [{}] {required}{}{logic}",
        s + 1,
        q + 1,
        question.question_type().as_str(),
        question.prompt()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use questionnaire::{MetaField, QuestionField, QuestionType};

    #[test]
    fn test_outline() {
        let tree = Questionnaire::new().update_meta(MetaField::Title("Pulse".into()));
        let section = tree.section_ids().next().unwrap();
        let (tree, choice) = tree.add_question(section, QuestionType::MultipleChoice);
        let (tree, text) = tree.add_question(section, QuestionType::Text);
        let tree = tree
            .toggle_correct_answer(section, choice.unwrap(), 1)
            .update_question_field(section, text.unwrap(), QuestionField::Required(true));

        assert_eq!(
            outline(&tree),
            [
                "Pulse [draft, survey]",
                "1. Section 1",
                "   1.1 [mcq] New mcq question",
                "      - Option 1",
                "      - Option 2 (correct)",
                "      - Option 3",
                "   1.2 [text] * New text question",
            ]
            .join("\n")
        );
    }
}
