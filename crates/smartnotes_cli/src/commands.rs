//! Command parsing and execution against a note board.

use crate::error::CliError;
use smartnotes_core::{
    core_version, EntityId, IdGenerator, KeyValueStore, NoteBoard, Prompt, SaveOutcome,
};
use std::io::Write;

pub const USAGE: &str = "usage: smartnotes [--yes] [--] <command> [args]

options (before the command):
  -y, --yes                            answer yes to every confirmation
  -h, --help                           print this help

commands:
  notes                                list notes grouped by category
  add-note <category> <text...>        add a note
  edit-note <id> <category> <text...>  replace a note's text and category
  delete-note <id>                     delete a note
  categories                           list categories with note counts
  add-category <name...>               add a category
  delete-category <name...>            delete a category and its notes
  todos                                list todos
  add-todo <text...>                   add a todo
  edit-todo <id> <text...>             replace a todo's text
  delete-todo <id>                     delete a todo
  toggle <id>                          flip a todo's done flag
  theme                                flip the dark mode flag
  version                              print the core version";

/// A board action named by a subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Notes,
    AddNote { category: String, text: String },
    EditNote { id: EntityId, category: String, text: String },
    DeleteNote(EntityId),
    Categories,
    AddCategory(String),
    DeleteCategory(String),
    Todos,
    AddTodo(String),
    EditTodo { id: EntityId, text: String },
    DeleteTodo(EntityId),
    Toggle(EntityId),
    Theme,
}

/// What one run of the binary does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Help,
    Version,
    Board(Command),
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub action: Action,
    /// Answer every confirmation with yes.
    pub assume_yes: bool,
}

impl Invocation {
    /// Parses `[options] [--] <command> [args]`.
    ///
    /// Options are only recognised before the subcommand; everything after
    /// it, dashes included, belongs to the subcommand's arguments.
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut assume_yes = false;
        let mut rest = args;
        while let Some((first, tail)) = rest.split_first() {
            match first.as_str() {
                "--yes" | "-y" => assume_yes = true,
                "--help" | "-h" => {
                    return Ok(Self {
                        action: Action::Help,
                        assume_yes,
                    })
                }
                "--" => {
                    rest = tail;
                    break;
                }
                flag if flag.starts_with('-') => {
                    return Err(CliError::Usage(format!("unknown option `{flag}`")))
                }
                _ => break,
            }
            rest = tail;
        }

        let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
        let Some((name, params)) = rest.split_first() else {
            return Ok(Self {
                action: Action::Help,
                assume_yes,
            });
        };

        let command = match *name {
            "version" => {
                return Ok(Self {
                    action: Action::Version,
                    assume_yes,
                })
            }
            "help" => {
                return Ok(Self {
                    action: Action::Help,
                    assume_yes,
                })
            }
            "notes" => Command::Notes,
            "add-note" => match params {
                [category, text @ ..] if !text.is_empty() => Command::AddNote {
                    category: category.to_string(),
                    text: text.join(" "),
                },
                _ => return Err(usage("add-note <category> <text...>")),
            },
            "edit-note" => match params {
                [id, category, text @ ..] if !text.is_empty() => Command::EditNote {
                    id: parse_id(id)?,
                    category: category.to_string(),
                    text: text.join(" "),
                },
                _ => return Err(usage("edit-note <id> <category> <text...>")),
            },
            "delete-note" => Command::DeleteNote(single_id(params, "delete-note <id>")?),
            "categories" => Command::Categories,
            "add-category" => Command::AddCategory(joined(params, "add-category <name...>")?),
            "delete-category" => {
                Command::DeleteCategory(joined(params, "delete-category <name...>")?)
            }
            "todos" => Command::Todos,
            "add-todo" => Command::AddTodo(joined(params, "add-todo <text...>")?),
            "edit-todo" => match params {
                [id, text @ ..] if !text.is_empty() => Command::EditTodo {
                    id: parse_id(id)?,
                    text: text.join(" "),
                },
                _ => return Err(usage("edit-todo <id> <text...>")),
            },
            "delete-todo" => Command::DeleteTodo(single_id(params, "delete-todo <id>")?),
            "toggle" => Command::Toggle(single_id(params, "toggle <id>")?),
            "theme" => Command::Theme,
            other => return Err(CliError::Usage(format!("unknown command `{other}`"))),
        };

        Ok(Self {
            action: Action::Board(command),
            assume_yes,
        })
    }
}

/// Runs `command` against `board`, writing results to `out`.
///
/// Returns `Ok(false)` when the board declined the action.
pub fn execute<S, P, G>(
    board: &mut NoteBoard<S, P, G>,
    command: Command,
    out: &mut impl Write,
) -> Result<bool, CliError>
where
    S: KeyValueStore,
    P: Prompt,
    G: IdGenerator,
{
    match command {
        Command::Notes => {
            render_notes(board, out)?;
            Ok(true)
        }
        Command::AddNote { category, text } => {
            if !board.select_category(&category) {
                writeln!(out, "unknown category `{category}`")?;
                return Ok(false);
            }
            board.set_note_draft(text);
            report_save(board.save_note(), "note", out)
        }
        Command::EditNote { id, category, text } => {
            let Some(note) = board.state().note(id).cloned() else {
                writeln!(out, "no note with id {id}")?;
                return Ok(false);
            };
            if !board.state().has_category(&category) {
                writeln!(out, "unknown category `{category}`")?;
                return Ok(false);
            }
            board.start_edit_note(note.id, &note.text, &note.category);
            board.set_note_draft(text);
            board.select_category(&category);
            let outcome = board.save_note();
            if outcome == SaveOutcome::Ignored {
                board.cancel_edit_note();
            }
            report_save(outcome, "note", out)
        }
        Command::DeleteNote(id) => report_delete(board.delete_note(id), "note", id, out),
        Command::Categories => {
            for (category, count) in board.state().category_counts() {
                writeln!(out, "{category} ({count})")?;
            }
            Ok(true)
        }
        Command::AddCategory(name) => match board.add_category(&name) {
            Ok(()) => {
                writeln!(out, "added category `{}`", name.trim())?;
                Ok(true)
            }
            Err(rejection) => {
                if !rejection.is_user_visible() {
                    writeln!(out, "{rejection}")?;
                }
                Ok(false)
            }
        },
        Command::DeleteCategory(name) => match board.delete_category(&name) {
            Ok(cascaded) => {
                writeln!(out, "deleted category `{name}` and {cascaded} note(s)")?;
                Ok(true)
            }
            Err(rejection) => {
                if !rejection.is_user_visible() {
                    writeln!(out, "{rejection}")?;
                }
                Ok(false)
            }
        },
        Command::Todos => {
            render_todos(board, out)?;
            Ok(true)
        }
        Command::AddTodo(text) => {
            board.set_todo_draft(text);
            report_save(board.save_todo(), "todo", out)
        }
        Command::EditTodo { id, text } => {
            let Some(todo) = board.state().todo(id).cloned() else {
                writeln!(out, "no todo with id {id}")?;
                return Ok(false);
            };
            board.start_edit_todo(todo.id, &todo.text);
            board.set_todo_draft(text);
            let outcome = board.save_todo();
            if outcome == SaveOutcome::Ignored {
                board.cancel_edit_todo();
            }
            report_save(outcome, "todo", out)
        }
        Command::DeleteTodo(id) => report_delete(board.delete_todo(id), "todo", id, out),
        Command::Toggle(id) => match board.toggle_done(id) {
            Some(done) => {
                writeln!(out, "todo {id} is now {}", if done { "done" } else { "open" })?;
                Ok(true)
            }
            None => {
                writeln!(out, "no todo with id {id}")?;
                Ok(false)
            }
        },
        Command::Theme => {
            let dark = board.toggle_theme();
            writeln!(out, "theme: {}", if dark { "dark" } else { "light" })?;
            Ok(true)
        }
    }
}

/// Writes the usage text.
pub fn write_help(out: &mut impl Write) -> Result<bool, CliError> {
    writeln!(out, "{USAGE}")?;
    Ok(true)
}

/// Writes the core library version.
pub fn write_version(out: &mut impl Write) -> Result<bool, CliError> {
    writeln!(out, "smartnotes_core version={}", core_version())?;
    Ok(true)
}

fn render_notes<S, P, G>(board: &NoteBoard<S, P, G>, out: &mut impl Write) -> Result<(), CliError>
where
    S: KeyValueStore,
    P: Prompt,
    G: IdGenerator,
{
    for group in board.state().notes_by_category() {
        writeln!(out, "{} ({})", group.category, group.notes.len())?;
        if group.notes.is_empty() {
            writeln!(out, "  (no notes)")?;
        }
        for note in group.notes {
            writeln!(out, "  [{}] {}", note.id, note.text)?;
        }
    }
    Ok(())
}

fn render_todos<S, P, G>(board: &NoteBoard<S, P, G>, out: &mut impl Write) -> Result<(), CliError>
where
    S: KeyValueStore,
    P: Prompt,
    G: IdGenerator,
{
    let todos = &board.state().todos;
    if todos.is_empty() {
        writeln!(out, "(no todos)")?;
        return Ok(());
    }
    writeln!(
        out,
        "{} open of {}",
        board.state().open_todo_count(),
        todos.len()
    )?;
    for todo in todos {
        let mark = if todo.done { 'x' } else { ' ' };
        writeln!(out, "[{mark}] {} {}", todo.id, todo.text)?;
    }
    Ok(())
}

fn report_save(outcome: SaveOutcome, kind: &str, out: &mut impl Write) -> Result<bool, CliError> {
    match outcome {
        SaveOutcome::Created(id) => writeln!(out, "created {kind} {id}")?,
        SaveOutcome::Updated(id) => writeln!(out, "updated {kind} {id}")?,
        SaveOutcome::Ignored => {
            writeln!(out, "{kind} text is empty; nothing saved")?;
            return Ok(false);
        }
    }
    Ok(true)
}

fn report_delete(
    removed: bool,
    kind: &str,
    id: EntityId,
    out: &mut impl Write,
) -> Result<bool, CliError> {
    if removed {
        writeln!(out, "deleted {kind} {id}")?;
    } else {
        writeln!(out, "no {kind} with id {id}")?;
    }
    Ok(removed)
}

fn usage(form: &str) -> CliError {
    CliError::Usage(format!("usage: smartnotes {form}"))
}

fn joined(params: &[&str], form: &str) -> Result<String, CliError> {
    if params.is_empty() {
        return Err(usage(form));
    }
    Ok(params.join(" "))
}

fn single_id(params: &[&str], form: &str) -> Result<EntityId, CliError> {
    match params {
        [id] => parse_id(id),
        _ => Err(usage(form)),
    }
}

fn parse_id(value: &str) -> Result<EntityId, CliError> {
    value
        .parse()
        .map_err(|_| CliError::Usage(format!("invalid id `{value}`")))
}
