//! # Parsing Module
//!
//! This module parses the textual program format into instructions that
//! a [`Machine`](crate::vm::Machine) can run.
//!
//! The format is one instruction per line: a mnemonic followed by its
//! operands, separated by spaces. Operands are either a register (`a`
//! through `d`) or a signed decimal integer.
//!
//! ```text
//! cpy 41 a    // comments run to the end of the line
//! inc a        /* or span
//!                 several lines */
//! jnz a -1
//! ```
//!
//! The synthetic `mul` opcode cannot be written in program text. It is
//! only ever introduced by [`patch_multiply_loops`](crate::vm::patch_multiply_loops).
//!
//! #### Error Types
//!
//! Every error carries the (1-based) line it occurred on and the byte span
//! of the offending text in the source, ready to be reported with
//! `codespan-reporting`.
use crate::vm::{self, Instruction, Opcode, Operand, Register, Word};
use core::{fmt, num::ParseIntError, ops::Range};

use log::debug;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{alpha1, char, digit1, line_ending, multispace1, not_line_ending, space1},
    combinator::{eof, map, map_res, opt, recognize, value},
    error::{context, convert_error, ContextError, FromExternalError, ParseError, VerboseError},
    multi::{many0, many0_count, many1_count},
    sequence::{pair, preceded, tuple},
    IResult,
};

/// An error produced while parsing program text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The line could not be tokenized.
    Syntax {
        line: usize,
        span: Range<usize>,
        message: String,
    },
    /// The mnemonic is not one that can appear in program text.
    Unsupported {
        line: usize,
        span: Range<usize>,
        mnemonic: String,
    },
    /// The line was tokenized, but is not a valid instruction.
    Invalid {
        line: usize,
        span: Range<usize>,
        error: vm::Error,
    },
}

impl Error {
    /// The line of the program this error occurred on.
    pub fn line(&self) -> usize {
        match self {
            Self::Syntax { line, .. } | Self::Unsupported { line, .. } | Self::Invalid { line, .. } => *line,
        }
    }

    /// The byte span of the offending text in the source.
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Syntax { span, .. } | Self::Unsupported { span, .. } | Self::Invalid { span, .. } => span.clone(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Syntax { line, message, .. } => write!(f, "line {line}: syntax error\n{message}"),
            Self::Unsupported { line, mnemonic, .. } => write!(f, "line {line}: unknown instruction `{mnemonic}`"),
            Self::Invalid { line, error, .. } => write!(f, "line {line}: {error}"),
        }
    }
}

impl std::error::Error for Error {}

/// Parse a whole program. Blank lines and comments are skipped.
///
/// `//` comments run to the end of the line, and `/* */` comments may span
/// several lines. A block comment counts as a space, so an instruction
/// still ends at the first line break outside of a comment.
pub fn parse_program(input: impl ToString) -> Result<Vec<Instruction>, Error> {
    let code = input.to_string();

    let mut program = vec![];
    let mut rest = skip_blank(&code);
    while !rest.is_empty() {
        let (next, instruction) = parse_line(&code, rest)?;
        program.push(instruction);
        rest = skip_blank(next);
    }

    debug!("parsed {} instructions", program.len());
    Ok(program)
}

/// Parse a single instruction, like `cpy 41 a`.
pub fn parse_instruction(input: &str) -> Result<Instruction, Error> {
    let program = parse_program(input)?;
    match program[..] {
        [instruction] => Ok(instruction),
        _ => Err(Error::Syntax {
            line: 1,
            span: 0..input.len(),
            message: format!("expected one instruction, found {}", program.len()),
        }),
    }
}

/// Skip any whitespace, line breaks and comments.
fn skip_blank(input: &str) -> &str {
    match blank::<VerboseError<&str>>(input) {
        Ok((rest, _)) => rest,
        Err(_) => input,
    }
}

/// Parse the instruction at the start of `input`, which is a suffix of `code`.
/// Returns the text after the instruction's line break.
fn parse_line<'a>(code: &'a str, input: &'a str) -> Result<(&'a str, Instruction), Error> {
    let start = code.len() - input.len();
    let line = code[..start].matches('\n').count() + 1;

    let (rest, (mnemonic, operands)) = match instruction::<VerboseError<&str>>(input) {
        Ok(parsed) => parsed,
        Err(e) => return Err(syntax_error(code, input, line, e)),
    };
    let span = start..code.len() - rest.len();
    let rest = match line_end::<VerboseError<&str>>(rest) {
        Ok((rest, _)) => rest,
        Err(e) => return Err(syntax_error(code, input, line, e)),
    };

    let opcode = match Opcode::from_mnemonic(mnemonic) {
        Some(Opcode::Mul) | None => {
            return Err(Error::Unsupported {
                line,
                span: start..start + mnemonic.len(),
                mnemonic: mnemonic.to_string(),
            })
        }
        Some(opcode) => opcode,
    };

    let instruction = operands
        .into_iter()
        .map(|token| match token {
            Token::Literal(n) => Ok(Operand::Literal(n)),
            Token::Name(name) => name.parse::<Register>().map(Operand::Register),
        })
        .collect::<Result<Vec<_>, _>>()
        .and_then(|operands| Instruction::new(opcode, &operands));

    match instruction {
        Ok(instruction) => Ok((rest, instruction)),
        Err(error) => Err(Error::Invalid { line, span, error }),
    }
}

/// A syntax error covering the rest of the line that `input` starts on.
fn syntax_error<'a>(code: &'a str, input: &'a str, line: usize, err: nom::Err<VerboseError<&'a str>>) -> Error {
    let start = code.len() - input.len();
    let text = input.split('\n').next().unwrap_or_default().trim_end();
    let message = match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => convert_error(code, e),
        nom::Err::Incomplete(_) => "incomplete instruction".to_string(),
    };
    Error::Syntax {
        line,
        span: start..start + text.len(),
        message,
    }
}

/// An operand as it is written, before register names are checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token<'a> {
    Literal(Word),
    Name(&'a str),
}

/// A mnemonic followed by any number of operands, separated by spaces or
/// block comments.
fn instruction<'a, E>(input: &'a str) -> IResult<&'a str, (&'a str, Vec<Token<'a>>), E>
where
    E: ParseError<&'a str> + ContextError<&'a str> + FromExternalError<&'a str, ParseIntError>,
{
    let (input, mnemonic) = context("mnemonic", alpha1)(input)?;
    let (input, operands) = many0(preceded(many1_count(gap), operand))(input)?;
    Ok((input, (mnemonic, operands)))
}

/// Whatever may follow the last operand: spaces, comments, and then a line
/// break or the end of the program.
fn line_end<'a, E>(input: &'a str) -> IResult<&'a str, (), E>
where
    E: ParseError<&'a str> + ContextError<&'a str>,
{
    let (input, _) = many0_count(gap)(input)?;
    let (input, _) = opt(line_comment)(input)?;
    context("end of line", value((), alt((line_ending, eof))))(input)
}

/// Space between the tokens of one instruction.
fn gap<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    alt((space1, block_comment))(input)
}

/// Space between instructions, including line breaks.
fn blank<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, usize, E> {
    many0_count(alt((multispace1, line_comment, block_comment)))(input)
}

fn line_comment<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    recognize(pair(tag("//"), not_line_ending))(input)
}

fn block_comment<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    recognize(tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

/// Any run of letters is read as a name, so that `e` or `ab` are reported
/// as invalid registers rather than as stray text.
fn operand<'a, E>(input: &'a str) -> IResult<&'a str, Token<'a>, E>
where
    E: ParseError<&'a str> + ContextError<&'a str> + FromExternalError<&'a str, ParseIntError>,
{
    context(
        "operand",
        alt((map(literal, Token::Literal), map(alpha1, Token::Name))),
    )(input)
}

fn literal<'a, E>(input: &'a str) -> IResult<&'a str, Word, E>
where
    E: ParseError<&'a str> + ContextError<&'a str> + FromExternalError<&'a str, ParseIntError>,
{
    context(
        "integer",
        map_res(recognize(pair(opt(alt((char('-'), char('+')))), digit1)), str::parse::<Word>),
    )(input)
}
