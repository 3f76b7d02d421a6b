use std::io::{self, BufRead, Write};

use crate::error::PrepareError;
use crate::row::Row;
use crate::table::Table;

const PROMPT: &str = "db > ";

struct InputBuffer {
    buffer: String,
    raw: Vec<u8>,
}

impl InputBuffer {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            raw: Vec::new(),
        }
    }

    /// Returns `false` once the input is exhausted. Bytes that aren't UTF-8
    /// are replaced rather than ending the session.
    fn read_input(&mut self, input: &mut impl BufRead) -> io::Result<bool> {
        self.raw.clear();
        let read = input.read_until(b'\n', &mut self.raw)?;
        self.buffer = String::from_utf8_lossy(&self.raw).trim().to_string();
        Ok(read > 0)
    }
}

// Non-SQL statements like .exit are called “meta-commands”.
#[derive(Debug, PartialEq, Eq)]
enum MetaCommands {
    Exit,
    Unrecognized,
}

impl MetaCommands {
    fn parse(input: &str) -> Option<MetaCommands> {
        match input {
            ".exit" => Some(MetaCommands::Exit),
            _ => {
                if input.starts_with('.') {
                    Some(MetaCommands::Unrecognized)
                } else {
                    None
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Statement {
    Insert(Row),
    Select,
}

impl Statement {
    fn prepare(input: &str) -> Result<Statement, PrepareError> {
        let mut tokens = input.split_whitespace();
        match tokens.next() {
            Some("insert") => Self::prepare_insert(tokens.collect()),
            Some("select") if tokens.next().is_none() => Ok(Statement::Select),
            _ => Err(PrepareError::Unrecognized(input.to_string())),
        }
    }

    fn prepare_insert(args: Vec<&str>) -> Result<Statement, PrepareError> {
        let [id, username, email] = args[..] else {
            return Err(PrepareError::SyntaxError);
        };
        let id: i64 = id.parse().map_err(|_| PrepareError::SyntaxError)?;
        if id < 0 {
            return Err(PrepareError::NegativeId);
        }
        let id = u32::try_from(id).map_err(|_| PrepareError::SyntaxError)?;

        Ok(Statement::Insert(Row::build(id, username, email)?))
    }

    fn execute(&self, table: &mut Table, output: &mut impl Write) -> io::Result<()> {
        let result = match self {
            Statement::Insert(row) => table.insert_row(row),
            Statement::Select => Self::execute_select(table, output),
        };

        match result {
            Ok(()) => writeln!(output, "Executed."),
            Err(e) => writeln!(output, "Error: {e}"),
        }
    }

    fn execute_select(table: &mut Table, output: &mut impl Write) -> crate::Result<()> {
        for row_num in 0..table.row_count() {
            let row = table.read(row_num)?;
            writeln!(output, "{row}")?;
        }
        Ok(())
    }
}

enum InputType {
    Meta(MetaCommands),
    Statement(Result<Statement, PrepareError>),
}

impl InputType {
    fn parse(input: &str) -> InputType {
        if let Some(meta) = MetaCommands::parse(input) {
            InputType::Meta(meta)
        } else {
            InputType::Statement(Statement::prepare(input))
        }
    }
}

/// Runs the read-eval loop until `.exit` or end of input. The table is left
/// open; closing it is up to the caller.
pub fn run(table: &mut Table, mut input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    let mut input_buffer = InputBuffer::new();

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;
        if !input_buffer.read_input(&mut input)? {
            return Ok(());
        }
        if input_buffer.buffer.is_empty() {
            continue;
        }

        match InputType::parse(&input_buffer.buffer) {
            InputType::Meta(MetaCommands::Exit) => return Ok(()),
            InputType::Meta(MetaCommands::Unrecognized) => {
                writeln!(output, "Unrecognized meta-command: {}", input_buffer.buffer)?;
            }
            InputType::Statement(Ok(statement)) => statement.execute(table, &mut output)?,
            InputType::Statement(Err(e)) => writeln!(output, "{e}")?,
        }
    }
}
