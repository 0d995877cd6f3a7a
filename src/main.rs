mod checker;
mod cli;
mod error_handling;
mod generator;
mod grammar;
mod normalizer;
mod parser;

use std::process::ExitCode;

use clap::Parser;
use log::info;
use rand::prelude::*;

use checker::MembershipChecker;
use cli::Cli;
use error_handling::*;
use generator::Limits;
use normalizer::NormalizeError;

fn report<T: ErrorType>(errors: &[Error<T>]) {
    for error in errors {
        eprintln!("{}", error);
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let source = cli.file.clone().unwrap_or_else(Location::stdin);

    let parsed = match &cli.file {
        Some(path) => parser::parse_file(path),
        None => parser::parse_stdin(),
    };
    let mut problem = match parsed {
        Ok(problem) => problem,
        Err(errors) => {
            report(&errors);
            return ExitCode::FAILURE;
        }
    };

    if let Some(start) = cli.start {
        problem.grammar.set_start_symbol(start);
    }

    // Sampling works on the grammar as written, before normalization
    if let Some(amount) = cli.sample {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut printed = 0;
        for word in generator::samples(&problem.grammar, &mut rng, Limits::default()).take(amount) {
            println!("{}", word);
            printed += 1;
        }
        if printed < amount {
            info!("only {} of {} words could be generated", printed, amount);
        }
        return ExitCode::SUCCESS;
    }

    if let Err(error) = normalizer::normalize(&mut problem.grammar) {
        report(&[NormalizeError { location: Location::whole(source), error }]);
        return ExitCode::FAILURE;
    }
    if cli.print_cnf {
        eprintln!("{}", problem.grammar);
    }

    let checker = MembershipChecker::new(&problem.grammar);
    info!("checking {} words", problem.words.len());
    for accepted in checker.parse_all(problem.words.iter().map(String::as_str)) {
        println!("{}", if accepted { "YES" } else { "NO" });
    }

    ExitCode::SUCCESS
}
