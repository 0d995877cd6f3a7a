use std::path::PathBuf;

use clap::Parser;

fn parse_nonterminal(text: &str) -> Result<char, String> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Ok(c),
        _ => Err(format!("`{}` is not a single uppercase letter", text)),
    }
}

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File holding the rule count, word count, rules and words (default: stdin)
    pub file: Option<PathBuf>,

    /// Start symbol (default: first rule in the input)
    #[arg(short, long, value_name = "SYMBOL", value_parser = parse_nonterminal)]
    pub start: Option<char>,

    /// Print the grammar after it has been brought into normal form
    #[arg(long)]
    pub print_cnf: bool,

    /// Print this many random words of the grammar instead of checking words
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub sample: Option<usize>,

    /// Seed for --sample (default: random)
    #[arg(long, value_name = "SEED", requires = "sample")]
    pub seed: Option<u64>,
}
