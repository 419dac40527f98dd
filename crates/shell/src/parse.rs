//! Line grammar for the console.
//!
//! ```text
//! load <entity>
//! show <entity>
//! add <entity> k=v ...
//! edit <entity> <id> k=v ...
//! delete <entity> <id>
//! undo | redo | history | clear | pending | help | quit
//! ```
//!
//! Values are read as JSON when they parse (`price=18000`, `is_active=false`,
//! `due=null`) and as plain strings otherwise. Double quotes group words
//! and always yield a string: `name="김 민수"`, `code="007"`.

use hakwon_core::{EntityId, EntityType, Record};
use serde_json::Value;

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Load(EntityType),
    Show(EntityType),
    Add {
        entity: EntityType,
        fields: Record,
    },
    Edit {
        entity: EntityType,
        id: EntityId,
        fields: Record,
    },
    Delete {
        entity: EntityType,
        id: EntityId,
    },
    Undo,
    Redo,
    History,
    Clear,
    Pending,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("expected key=value, got {0:?}")]
    BadField(String),

    #[error("unterminated quote")]
    UnterminatedQuote,
}

pub const HELP: &str = "\
load <entity>                 fetch rows from the server
show <entity>                 print local rows
add <entity> k=v ...          create a record
edit <entity> <id> k=v ...    change fields of a loaded record
delete <entity> <id>          delete a loaded record
undo | redo                   walk the history
history                       list recorded commands
clear                         forget the history
pending                       list remote writes in flight
quit                          leave

entities: students, teachers, materials, lectures";

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, ParseError> {
    let tokens = tokenize(line)?;
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match head.text.to_ascii_lowercase().as_str() {
        "load" => ShellCommand::Load(single_entity(rest, "load <entity>")?),
        "show" => ShellCommand::Show(single_entity(rest, "show <entity>")?),
        "add" => {
            let (entity, rest) = rest
                .split_first()
                .ok_or(ParseError::Usage("add <entity> k=v ..."))?;
            ShellCommand::Add {
                entity: entity_of(entity)?,
                fields: fields_of(rest)?,
            }
        }
        "edit" => match rest {
            [entity, id, fields @ ..] if !fields.is_empty() => ShellCommand::Edit {
                entity: entity_of(entity)?,
                id: EntityId::from(id.text.as_str()),
                fields: fields_of(fields)?,
            },
            _ => return Err(ParseError::Usage("edit <entity> <id> k=v ...")),
        },
        "delete" => match rest {
            [entity, id] => ShellCommand::Delete {
                entity: entity_of(entity)?,
                id: EntityId::from(id.text.as_str()),
            },
            _ => return Err(ParseError::Usage("delete <entity> <id>")),
        },
        "undo" => ShellCommand::Undo,
        "redo" => ShellCommand::Redo,
        "history" => ShellCommand::History,
        "clear" => ShellCommand::Clear,
        "pending" => ShellCommand::Pending,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Token {
    text: String,
    /// Some part of the token was inside double quotes.
    quoted: bool,
}

fn tokenize(line: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut current: Option<Token> = None;
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current
                    .get_or_insert_with(|| Token {
                        text: String::new(),
                        quoted: false,
                    })
                    .quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if let Some(token) = current.take() {
                    tokens.push(token);
                }
            }
            c => current
                .get_or_insert_with(|| Token {
                    text: String::new(),
                    quoted: false,
                })
                .text
                .push(c),
        }
    }

    if in_quotes {
        return Err(ParseError::UnterminatedQuote);
    }
    tokens.extend(current);
    Ok(tokens)
}

fn single_entity(rest: &[Token], usage: &'static str) -> Result<EntityType, ParseError> {
    match rest {
        [entity] => entity_of(entity),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn entity_of(token: &Token) -> Result<EntityType, ParseError> {
    token
        .text
        .parse()
        .map_err(|_| ParseError::UnknownEntity(token.text.clone()))
}

fn fields_of(tokens: &[Token]) -> Result<Record, ParseError> {
    let mut fields = Record::new();
    for token in tokens {
        let (key, raw) = token
            .text
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| ParseError::BadField(token.text.clone()))?;
        fields.insert(key.to_string(), field_value(raw, token.quoted));
    }
    Ok(fields)
}

fn field_value(raw: &str, quoted: bool) -> Value {
    if quoted {
        return Value::String(raw.to_string());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
