//! Interactive editing of a questionnaire file.
//!
//! Every action produces a new tree through the mutation functions and is
//! committed to an undo history. The file is only written on request.

use std::path::Path;

use anyhow::Result;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Confirm, Input, Select};
use log::debug;
use questionnaire::{
    History, Question, QuestionField, QuestionId, QuestionType, Questionnaire, SectionId,
};

use super::show::{outline, question_line};
use super::{read_tree, write_tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    AddSection,
    RenameSection,
    MoveSection,
    DeleteSection,
    AddQuestion,
    EditPrompt,
    ToggleRequired,
    EditOptions,
    ToggleCorrect,
    DuplicateQuestion,
    MoveQuestion,
    DeleteQuestion,
    Undo,
    Redo,
    Write,
    Quit,
}

impl Action {
    const ALL: [Action; 16] = [
        Action::AddSection,
        Action::RenameSection,
        Action::MoveSection,
        Action::DeleteSection,
        Action::AddQuestion,
        Action::EditPrompt,
        Action::ToggleRequired,
        Action::EditOptions,
        Action::ToggleCorrect,
        Action::DuplicateQuestion,
        Action::MoveQuestion,
        Action::DeleteQuestion,
        Action::Undo,
        Action::Redo,
        Action::Write,
        Action::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            Action::AddSection => "Add section",
            Action::RenameSection => "Rename section",
            Action::MoveSection => "Move section",
            Action::DeleteSection => "Delete section",
            Action::AddQuestion => "Add question",
            Action::EditPrompt => "Edit question text",
            Action::ToggleRequired => "Toggle required",
            Action::EditOptions => "Edit options",
            Action::ToggleCorrect => "Toggle correct answer",
            Action::DuplicateQuestion => "Duplicate question",
            Action::MoveQuestion => "Move question",
            Action::DeleteQuestion => "Delete question",
            Action::Undo => "Undo",
            Action::Redo => "Redo",
            Action::Write => "Write file",
            Action::Quit => "Quit",
        }
    }
}

pub fn run(file: &Path, plain: bool) -> Result<()> {
    let prompts = Prompts::new(plain);
    let mut history = History::new(read_tree(file)?);
    let mut written = history.current().clone();

    loop {
        println!("\n{}\n", outline(history.current()));
        let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();
        let Some(choice) = prompts.select("What next?", &labels)? else {
            continue;
        };

        match Action::ALL[choice] {
            Action::Undo => {
                if history.undo().is_none() {
                    println!("Nothing to undo");
                }
            }
            Action::Redo => {
                if history.redo().is_none() {
                    println!("Nothing to redo");
                }
            }
            Action::Write => {
                write_tree(file, history.current())?;
                written = history.current().clone();
                println!("Wrote {}", file.display());
            }
            Action::Quit => {
                if *history.current() == written
                    || prompts.confirm("Discard unsaved changes?")?
                {
                    return Ok(());
                }
            }
            action => match prompts.perform(history.current(), action) {
                Ok(Some(next)) => {
                    if !history.commit(next) {
                        println!("No change");
                    }
                }
                Ok(None) => {}
                Err(e) if e.downcast_ref::<dialoguer::Error>().is_some_and(is_cancelled) => {
                    println!("Cancelled");
                }
                Err(e) => return Err(e),
            },
        }
    }
}

/// Ctrl+C inside a prompt surfaces as an interrupted read.
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

struct Prompts {
    theme: Box<dyn Theme>,
}

impl Prompts {
    fn new(plain: bool) -> Self {
        let theme: Box<dyn Theme> = if plain {
            Box::new(SimpleTheme)
        } else {
            Box::new(ColorfulTheme::default())
        };
        Self { theme }
    }

    /// `None` when the user pressed Escape.
    fn select<T: ToString>(&self, prompt: &str, items: &[T]) -> Result<Option<usize>> {
        Ok(Select::with_theme(&*self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()?)
    }

    fn input(&self, prompt: &str, initial: &str) -> Result<String> {
        Ok(Input::<String>::with_theme(&*self.theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()?)
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(Confirm::with_theme(&*self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    fn pick_section(&self, tree: &Questionnaire) -> Result<Option<SectionId>> {
        let sections: Vec<_> = tree.sections().collect();
        if sections.is_empty() {
            println!("There are no sections");
            return Ok(None);
        }
        let labels: Vec<String> = sections
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}", i + 1, s.title()))
            .collect();
        Ok(self.select("Section", &labels)?.map(|i| sections[i].id()))
    }

    /// Pick a question, optionally only among those `filter` accepts.
    fn pick_question(
        &self,
        tree: &Questionnaire,
        filter: impl Fn(&Question) -> bool,
    ) -> Result<Option<(SectionId, QuestionId)>> {
        let mut entries = Vec::new();
        for (s, section) in tree.sections().enumerate() {
            for (q, question) in tree.questions_in(section.id()).enumerate() {
                if filter(question) {
                    entries.push((section.id(), question.id(), question_line(s, q, question)));
                }
            }
        }
        if entries.is_empty() {
            println!("There are no matching questions");
            return Ok(None);
        }
        let labels: Vec<&str> = entries.iter().map(|(_, _, label)| label.trim()).collect();
        Ok(self
            .select("Question", &labels)?
            .map(|i| (entries[i].0, entries[i].1)))
    }

    fn pick_position(&self, prompt: &str, len: usize) -> Result<Option<usize>> {
        let positions: Vec<String> = (1..=len).map(|p| p.to_string()).collect();
        self.select(prompt, &positions)
    }

    /// Ask for whatever `action` needs and return the resulting tree.
    fn perform(&self, tree: &Questionnaire, action: Action) -> Result<Option<Questionnaire>> {
        debug!("performing {action:?}");
        let next = match action {
            Action::AddSection => Some(tree.add_section().0),
            Action::RenameSection => match self.pick_section(tree)? {
                Some(section) => {
                    let current = tree.section(section).map(|s| s.title()).unwrap_or_default();
                    let title = self.input("Title", current)?;
                    Some(tree.update_section_title(section, title))
                }
                None => None,
            },
            Action::MoveSection => match self.pick_section(tree)? {
                Some(section) => {
                    let from = tree.section_position(section).unwrap_or_default();
                    self.pick_position("Move to position", tree.section_count())?
                        .map(|to| tree.reorder_sections(from, to))
                }
                None => None,
            },
            Action::DeleteSection => match self.pick_section(tree)? {
                Some(section) => Some(tree.delete_section(section)),
                None => None,
            },
            Action::AddQuestion => match self.pick_section(tree)? {
                Some(section) => {
                    let labels: Vec<&str> = QuestionType::ALL.iter().map(|t| t.label()).collect();
                    self.select("Type", &labels)?
                        .map(|i| tree.add_question(section, QuestionType::ALL[i]).0)
                }
                None => None,
            },
            Action::EditPrompt => match self.pick_question(tree, |_| true)? {
                Some((section, question)) => {
                    let current = tree.question(question).map(|q| q.prompt()).unwrap_or_default();
                    let prompt = self.input("Question text", current)?;
                    Some(tree.update_question_field(section, question, QuestionField::Prompt(prompt)))
                }
                None => None,
            },
            Action::ToggleRequired => match self.pick_question(tree, |_| true)? {
                Some((section, question)) => {
                    let required = tree.question(question).is_some_and(|q| q.is_required());
                    Some(tree.update_question_field(
                        section,
                        question,
                        QuestionField::Required(!required),
                    ))
                }
                None => None,
            },
            Action::EditOptions => {
                match self.pick_question(tree, |q| q.kind().options().is_some())? {
                    Some((section, question)) => self.edit_options(tree, section, question)?,
                    None => None,
                }
            }
            Action::ToggleCorrect => {
                match self.pick_question(tree, |q| q.kind().correct_answers().is_some())? {
                    Some((section, question)) => self
                        .pick_option(tree, question)?
                        .map(|i| tree.toggle_correct_answer(section, question, i)),
                    None => None,
                }
            }
            Action::DuplicateQuestion => match self.pick_question(tree, |_| true)? {
                Some((section, question)) => Some(tree.duplicate_question(section, question).0),
                None => None,
            },
            Action::MoveQuestion => match self.pick_question(tree, |_| true)? {
                Some((section, question)) => {
                    let (_, from) = tree.question_position(question).unwrap_or_default();
                    let len = tree.section(section).map(|s| s.len()).unwrap_or_default();
                    self.pick_position("Move to position", len)?
                        .map(|to| tree.reorder_questions(section, from, to))
                }
                None => None,
            },
            Action::DeleteQuestion => match self.pick_question(tree, |_| true)? {
                Some((section, question)) => Some(tree.delete_question(section, question)),
                None => None,
            },
            Action::Undo | Action::Redo | Action::Write | Action::Quit => None,
        };
        Ok(next)
    }

    fn pick_option(&self, tree: &Questionnaire, question: QuestionId) -> Result<Option<usize>> {
        let options = tree
            .question(question)
            .and_then(|q| q.kind().options())
            .unwrap_or_default();
        if options.is_empty() {
            println!("This question has no options");
            return Ok(None);
        }
        self.select("Option", options)
    }

    fn edit_options(
        &self,
        tree: &Questionnaire,
        section: SectionId,
        question: QuestionId,
    ) -> Result<Option<Questionnaire>> {
        let choice = self.select("Options", &["Add option", "Rename option", "Remove option"])?;
        let next = match choice {
            Some(0) => Some(tree.add_question_option(section, question)),
            Some(1) => match self.pick_option(tree, question)? {
                Some(index) => {
                    let current = tree
                        .question(question)
                        .and_then(|q| q.kind().options())
                        .and_then(|options| options.get(index))
                        .map(String::as_str)
                        .unwrap_or_default();
                    let label = self.input("Label", current)?;
                    Some(tree.update_question_option(section, question, index, label))
                }
                None => None,
            },
            Some(2) => self
                .pick_option(tree, question)?
                .map(|index| tree.remove_question_option(section, question, index)),
            _ => None,
        };
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_interrupted_read_is_cancellation() {
        let interrupted = dialoguer::Error::IO(io::Error::from(io::ErrorKind::Interrupted));
        let broken = dialoguer::Error::IO(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(is_cancelled(&interrupted));
        assert!(!is_cancelled(&broken));
    }

    #[test]
    fn test_every_action_has_a_distinct_label() {
        let mut labels: Vec<_> = Action::ALL.iter().map(|a| a.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), Action::ALL.len());
    }
}
