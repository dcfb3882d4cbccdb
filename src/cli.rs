use assembunny::{
    parse::{self, parse_program},
    search::find_clock_seed,
    vm::{self, patch_multiply_loops, Interpreter, Machine, Register, Word},
};
use clap::Parser;
use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFiles,
    term::{
        emit,
        termcolor::{ColorChoice, StandardStream},
    },
};
use log::info;
use std::{fmt, fs::read_to_string};

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum RegisterName {
    A,
    B,
    C,
    D,
}

impl From<RegisterName> for Register {
    fn from(name: RegisterName) -> Self {
        match name {
            RegisterName::A => Register::A,
            RegisterName::B => Register::B,
            RegisterName::C => Register::C,
            RegisterName::D => Register::D,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// The program to run.
    input: String,

    /// The starting value of register `a`.
    #[arg(short, allow_hyphen_values = true)]
    a: Option<Word>,
    /// The starting value of register `b`.
    #[arg(short, allow_hyphen_values = true)]
    b: Option<Word>,
    /// The starting value of register `c`.
    #[arg(short, allow_hyphen_values = true)]
    c: Option<Word>,
    /// The starting value of register `d`.
    #[arg(short, allow_hyphen_values = true)]
    d: Option<Word>,

    /// The number of values the output buffer holds. Filling it halts the program.
    #[arg(long, default_value = "64")]
    capacity: usize,

    /// Replace multiply loops with `mul` instructions before running.
    #[arg(long)]
    patch: bool,

    /// Print the program as it was when the machine halted.
    #[arg(long)]
    listing: bool,

    /// Instead of running once, search for the smallest value of this
    /// register that makes the program output a clock signal.
    #[arg(long, value_enum)]
    search: Option<RegisterName>,

    /// The first seed to try when searching.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    from: Word,

    /// One past the last seed to try when searching.
    #[arg(long, default_value = "100000", allow_hyphen_values = true)]
    to: Word,

    /// The most instructions a single seed may run for when searching.
    #[arg(long, default_value = "10000000")]
    max_steps: usize,
}

enum Error {
    IO(std::io::Error),
    Parse(parse::Error),
    Patch(vm::Error),
    Report(codespan_reporting::files::Error),
    NotFound,
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IO(e) => write!(f, "IO error: {:?}", e),
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::Patch(e) => write!(f, "Patch error: {}", e),
            Error::Report(e) => write!(f, "Could not report error: {}", e),
            Error::NotFound => write!(f, "No seed in the given range produces a clock signal"),
        }
    }
}

/// Print a parse error against the source it came from.
fn report(filename: &str, src: &str, err: &parse::Error) -> Result<(), Error> {
    let mut files = SimpleFiles::new();
    let file_id = files.add(filename, src);

    let diagnostic = Diagnostic::error()
        .with_message(format!("could not parse line {}", err.line()))
        .with_labels(vec![Label::primary(file_id, err.span()).with_message(format!("{err}"))]);

    let writer = StandardStream::stderr(ColorChoice::Auto);
    let mut lock = writer.lock();
    let config = codespan_reporting::term::Config::default();
    emit(&mut lock, &config, &files, &diagnostic).map_err(Error::Report)
}

fn load(args: &Args, program: Vec<vm::Instruction>) -> Result<Machine, Error> {
    let mut machine = Machine::new(program, args.capacity);
    for (register, seed) in Register::ALL.into_iter().zip([args.a, args.b, args.c, args.d]) {
        if let Some(seed) = seed {
            machine.set_register(register, seed);
        }
    }
    if args.patch {
        patch_multiply_loops(&mut machine).map_err(Error::Patch)?;
    }
    Ok(machine)
}

fn run(args: &Args, mut machine: Machine) {
    let halt = Interpreter.run(&mut machine);
    info!("halted: {halt}");

    if args.listing {
        print!("{machine:#}");
    }
    for register in Register::ALL {
        println!("{register} = {}", machine.register(register));
    }
    if machine.output_count() > 0 {
        println!("output ({}/{}) = {:?}", machine.output_count(), machine.capacity(), machine.output());
    }
}

fn search(args: &Args, machine: Machine, register: Register) -> Result<(), Error> {
    info!("searching {}..{} for register {register}", args.from, args.to);
    match find_clock_seed(&machine, register, args.from..args.to, args.max_steps) {
        Some(seed) => {
            println!("{register} = {seed}");
            Ok(())
        }
        None => Err(Error::NotFound),
    }
}

fn read_file(name: &str) -> Result<String, Error> {
    read_to_string(name).map_err(Error::IO)
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::parse();

    let src = read_file(&args.input)?;
    let program = match parse_program(&src) {
        Ok(program) => program,
        Err(e) => {
            report(&args.input, &src, &e)?;
            return Err(Error::Parse(e));
        }
    };

    let machine = load(&args, program)?;
    match args.search {
        Some(register) => search(&args, machine, register.into()),
        None => {
            run(&args, machine);
            Ok(())
        }
    }
}
