//! `flagbind` is a small command line option parser for Rust.
//!
//! It follows one idea: bind your program's variables to flag names, then let a single pass over the command line fill them in.
//! There is nothing to declare up front beyond the variables themselves, and nothing to query afterwards.
//! `flagbind` prioritizes the following:
//! * *Type directed binding*:
//! The option behaviour is picked from the variable's type.
//! A `bool` is a switch, a `String` takes its value verbatim, numbers parse via [`std::str::FromStr`], and an [`OutputFile`] opens the given path.
//! * *Best effort parsing*:
//! Parsing never fails.
//! Unknown flags are skipped, and bad values leave the variable untouched.
//! A strict mode is available for programs that want to report these.
//! * *Operands are yours*:
//! Parsing stops at the first token that is not a flag, and hands back its index.
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/options.rs")]
//! ```
//!
//! ```console
//! $ options -t hello -y -p 2.5 -l run.log input.txt
//! option  default  type
//! l       file     flagbind_core::api::file::OutputFile
//! p       100      f64
//! t                alloc::string::String
//! y       false    bool
//!
//! hello   true     2.5
//! operands: ["input.txt"]
//! ```
//!
//! # Flags
//! Flags are written `-NAME` for switches, and `-NAME VALUE` for everything else.
//! ```text
//! Variable type  | Option     | Cli grammar  | Effect
//! ---------------|------------|--------------|------------------------------------
//! bool           | Switch     | -NAME        | set to true
//! String         | Text       | -NAME VALUE  | assigned verbatim
//! T: FromStr     | Scalar<T>  | -NAME VALUE  | converted via FromStr
//! OutputFile     | FileSink   | -NAME PATH   | opened for writing (create/truncate)
//! ```
//!
//! The parser walks the command line from `argv[1]`:
//! * A token starting with `-` names a flag; the remainder is looked up verbatim (case sensitive).
//! * A matched flag that takes a value consumes the following token, whatever it looks like (`-n -5` sets `n` to `-5`).
//! * An unknown flag is skipped, without consuming anything.
//! * The first token not starting with `-` ends the walk; its index is returned.
//!
//! There is no `--` terminator, no combined short flags, and no `-NAME=VALUE` syntax.
//! Repeating a flag overwrites the earlier value.
//!
//! # Custom types
//! Any `T: FromStr + Display` can be bound via [`Scalar`] and [`OptionRegistry::add`].
//! Implement [`Bindable`](prelude::Bindable) to use [`OptionRegistry::make`] instead.
//!
//! # Diagnostics
//! [`OptionRegistry::print`] writes a tab separated table of every flag, its current value and its type.
//! It may be called before or after parsing.
//!
//! # Features
//! * `unit_test`: For features that help with unit testing.
//! * `tracing_debug`: Emit `tracing` debug events for skipped flags and rejected values.
pub use flagbind_core::*;
