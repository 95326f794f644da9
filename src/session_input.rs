use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::Sender;

pub const USAGE: &str = "Commands: b <bandwidth>, p <x1> <x2> ..., e <a...> ; <b...>, t <distance>, k, i, q";

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("channel closed while sending session input")]
    ChannelError,
}

/// A request for the session loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionInput {
    /// Rebuild the kernel with a new bandwidth.
    Bandwidth(f64),
    /// Add a point to the stored set.
    Point(Vec<f64>),
    Evaluate { a: Vec<f64>, b: Vec<f64> },
    EvaluateDistance(f64),
    /// Kernel matrix of the stored points.
    Matrix,
    Info,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Input(SessionInput),
    Help,
    Quit,
}

fn parse_number(token: &str) -> Result<f64, InputError> {
    token
        .parse()
        .map_err(|_| InputError::InvalidInput(format!("not a number: {token}")))
}

fn parse_vector(text: &str) -> Result<Vec<f64>, InputError> {
    text.split_whitespace().map(parse_number).collect()
}

fn single_number<'a>(mut parts: impl Iterator<Item = &'a str>, usage: &str) -> Result<f64, InputError> {
    let (Some(token), None) = (parts.next(), parts.next()) else {
        return Err(InputError::InvalidInput(format!("usage: {usage}")));
    };
    parse_number(token)
}

/// Parses one line of user input. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let cmd = parts.next().unwrap_or("");
    let rest = line[cmd.len()..].trim();

    let command = match cmd {
        "q" | "Q" => Command::Quit,
        "?" | "help" => Command::Help,
        "i" => Command::Input(SessionInput::Info),
        "k" => Command::Input(SessionInput::Matrix),
        "b" => Command::Input(SessionInput::Bandwidth(single_number(parts, "b <bandwidth>")?)),
        "t" => Command::Input(SessionInput::EvaluateDistance(single_number(
            parts,
            "t <distance>",
        )?)),
        "p" => {
            let coord = parse_vector(rest)?;
            if coord.is_empty() {
                return Err(InputError::InvalidInput("usage: p <x1> <x2> ...".into()));
            }
            Command::Input(SessionInput::Point(coord))
        }
        "e" => {
            let Some((a, b)) = rest.split_once(';') else {
                return Err(InputError::InvalidInput("usage: e <a...> ; <b...>".into()));
            };
            Command::Input(SessionInput::Evaluate {
                a: parse_vector(a)?,
                b: parse_vector(b)?,
            })
        }
        other => {
            return Err(InputError::InvalidInput(format!("unknown command: {other}")));
        }
    };
    Ok(Some(command))
}

impl SessionInput {
    /// Reads commands line by line and forwards them to the session until
    /// `q` or end of input.
    pub async fn input_loop<R>(reader: R, tx: Sender<SessionInput>) -> Result<(), InputError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();

        eprintln!("{USAGE}");

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| InputError::InvalidInput(e.to_string()))?
        {
            match parse_line(&line) {
                Ok(None) => continue,
                Ok(Some(Command::Quit)) => break,
                Ok(Some(Command::Help)) => eprintln!("{USAGE}"),
                Ok(Some(Command::Input(input))) => {
                    tx.send(input).await.map_err(|_| InputError::ChannelError)?;
                }
                Err(e) => eprintln!("{e}"),
            }
        }
        Ok(())
    }
}
