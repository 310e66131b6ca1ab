use console::{Style, Term};

use crate::messages::message;
use crate::report::file_url;

pub fn print_error(msg: &str) {
    let style = Style::new().red().bold();
    eprintln!("{} {}", style.apply_to("✗"), msg);
}

pub fn print_success(msg: &str) {
    let style = Style::new().green().bold();
    println!("{} {}", style.apply_to("✓"), msg);
}

pub fn print_warning(msg: &str) {
    let style = Style::new().yellow().bold();
    eprintln!("{} {}", style.apply_to("!"), msg);
}

/// Show the launch command, one token per line after the program so long
/// classpaths stay readable.
pub fn print_argv(program: &str, argv: &[String]) {
    let dim = Style::new().dim();
    let flag = Style::new().cyan();
    println!("{}", Style::new().bold().apply_to(program));
    for token in argv {
        if token.starts_with('-') {
            println!("  {}", flag.apply_to(token));
        } else {
            println!("  {}", dim.apply_to(token));
        }
    }
}

/// Clickable link on terminals that understand OSC 8, plain text elsewhere.
pub fn print_hyperlink(link: &str) {
    let text = message("report.hyperlink.text");
    let url = file_url(link);
    let style = Style::new().cyan().bold().underlined();
    if Term::stdout().is_term() {
        println!(
            "{} \x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\",
            style.apply_to("→"),
            url,
            style.apply_to(text)
        );
    } else {
        println!("→ {text}: {url}");
    }
}
