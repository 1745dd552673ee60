use flagbind::{OptionRegistry, OutputFile};
use std::io::Write;

fn main() {
    // A string set with -t.
    let mut test = String::default();
    // A switch enabled with -y.
    let mut yesno = false;
    // A double set with -p.
    let mut param: f64 = 100.0;
    // A file opened with -l.
    let mut log = OutputFile::default();

    let mut registry = OptionRegistry::new()
        .make(&mut test, "t")
        .make(&mut yesno, "y")
        .make(&mut param, "p")
        .make(&mut log, "l");

    // Prints the current table of known options.
    registry.print();
    println!();

    let argv: Vec<String> = std::env::args().collect();
    let index = registry.parse_tokens(&argv);
    drop(registry);

    println!("{test}\t{yesno}\t{param}");
    println!("operands: {:?}", &argv[index..]);

    if log.is_open() {
        writeln!(log, "{test}\t{yesno}\t{param}").expect("Failed to write the log");
    } else if let Some(error) = log.error() {
        eprintln!("Could not open the log: {error}");
    }
}
